//! Column value extraction helpers shared by the cleaner and the stats modules.

use polars::prelude::*;

/// Column values as floats, nulls kept as `None`.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let values = casted.f64()?.into_iter().collect();
    Ok(values)
}

/// Non-null, non-NaN column values as floats.
pub fn present_floats(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    Ok(float_values(df, name)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Column values rendered as text, nulls kept as `None`.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_with_nulls() {
        let df = df!(
            "n" => [Some(1i64), None, Some(3)],
            "s" => [Some("a"), None, Some("c")],
        )
        .unwrap();

        assert_eq!(float_values(&df, "n").unwrap(), vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(present_floats(&df, "n").unwrap(), vec![1.0, 3.0]);
        assert_eq!(
            string_values(&df, "s").unwrap(),
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
    }
}
