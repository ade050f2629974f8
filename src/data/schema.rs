//! Dataset Schema Module
//! Column names of the app listing table and the required-column check.

use polars::prelude::*;
use thiserror::Error;

pub const APP_ID: &str = "App_Id";
pub const APP_NAME: &str = "App_Name";
pub const RELEASED: &str = "Released";
pub const SIZE_BYTES: &str = "Size_Bytes";
pub const PRICE: &str = "Price";
pub const FREE: &str = "Free";
pub const DEVELOPER_URL: &str = "Developer_Url";
pub const DEVELOPER_WEBSITE: &str = "Developer_Website";
pub const PRIMARY_GENRE: &str = "Primary_Genre";
pub const CONTENT_RATING: &str = "Content_Rating";
pub const CURRENCY: &str = "Currency";
pub const DEVELOPER: &str = "Developer";
pub const REVIEWS: &str = "Reviews";
pub const AVERAGE_USER_RATING: &str = "Average_User_Rating";

/// Every column the cleaner expects in the loaded file.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    APP_NAME,
    RELEASED,
    SIZE_BYTES,
    PRICE,
    FREE,
    DEVELOPER_URL,
    DEVELOPER_WEBSITE,
    PRIMARY_GENRE,
    CONTENT_RATING,
    CURRENCY,
    DEVELOPER,
    REVIEWS,
    AVERAGE_USER_RATING,
    APP_ID,
];

/// Columns that receive an integer category code.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [PRIMARY_GENRE, CONTENT_RATING, CURRENCY, DEVELOPER];

/// Columns never referenced after cleaning.
pub const DROPPED_COLUMNS: [&str; 2] = [DEVELOPER_URL, DEVELOPER_WEBSITE];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Name of the code column derived from a categorical column.
pub fn code_column(column: &str) -> String {
    format!("{column}_Code")
}

/// Check that every required column is present, reporting all absent ones.
pub fn validate_schema(df: &DataFrame) -> Result<(), SchemaError> {
    let names = df.get_column_names();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !names.iter().any(|name| name.as_str() == **required))
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_missing_column() {
        let df = df!(
            APP_NAME => ["a"],
            RELEASED => ["2020-01-01"],
        )
        .unwrap();

        let err = validate_schema(&df).unwrap_err();
        let SchemaError::MissingColumns(missing) = err;
        assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 2);
        assert!(missing.contains(&PRICE.to_string()));
        assert!(!missing.contains(&APP_NAME.to_string()));
    }

    #[test]
    fn code_column_suffix() {
        assert_eq!(code_column(PRIMARY_GENRE), "Primary_Genre_Code");
    }
}
