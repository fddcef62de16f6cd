//! Row validation
//!
//! Structural checks and typed conversion of one row. Lookups against the
//! category or asset snapshots happen later in the pipeline.

use super::error::RowError;
use super::models::{ProductFields, RawRow, ValidatedRow};

pub const DEFAULT_RATING: f64 = 0.0;
pub const DEFAULT_STOCK: i32 = 0;
pub const DEFAULT_MIN_ORDER_QUANTITY: i32 = 1;

/// Validate one row and convert its fields.
///
/// `title`, `rate` and `category` must be present and non-blank. Numeric
/// columns must parse when given; blank optional columns take their defaults.
pub fn validate_row(row: &RawRow) -> Result<ValidatedRow, RowError> {
    let (Some(title), Some(rate), Some(category)) = (
        row.non_blank("title"),
        row.non_blank("rate"),
        row.non_blank("category"),
    ) else {
        return Err(RowError::MissingFields);
    };

    let fields = ProductFields {
        title: title.to_string(),
        rate: parse_amount("rate", rate)?,
        rating: optional(row, "rating", parse_amount, DEFAULT_RATING)?,
        description: row.non_blank("description").unwrap_or_default().to_string(),
        stock: optional(row, "stock", parse_count, DEFAULT_STOCK)?,
        min_order_quantity: optional(
            row,
            "minOrderQuantity",
            parse_count,
            DEFAULT_MIN_ORDER_QUANTITY,
        )?,
    };

    Ok(ValidatedRow {
        position: row.position,
        fields,
        category: category.to_string(),
        image: row.non_blank("image").map(str::to_string),
    })
}

fn optional<T>(
    row: &RawRow,
    field: &'static str,
    parse: fn(&'static str, &str) -> Result<T, RowError>,
    default: T,
) -> Result<T, RowError> {
    match row.non_blank(field) {
        Some(value) => parse(field, value),
        None => Ok(default),
    }
}

fn parse_amount(field: &'static str, value: &str) -> Result<f64, RowError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| invalid(field, value))
}

fn parse_count(field: &'static str, value: &str) -> Result<i32, RowError> {
    value.parse::<i32>().map_err(|_| invalid(field, value))
}

fn invalid(field: &'static str, value: &str) -> RowError {
    RowError::InvalidField {
        field,
        value: value.to_string(),
    }
}
