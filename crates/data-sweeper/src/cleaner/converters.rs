//! Column type conversion.

use crate::config::TargetType;
use crate::error::{Result, SweeperError};
use crate::utils::{DtypeCategory, get_dtype_category};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Truncated floats must fall inside this range to fit an `i64`.
/// `i64::MAX as f64` rounds up to 2^63, so the upper end is exclusive.
const I64_RANGE: std::ops::Range<f64> = (i64::MIN as f64)..(i64::MAX as f64);

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a series to the target type.
///
/// Integer and Float fail on present values that cannot be represented;
/// nulls stay null. Date never fails: unparseable values become null.
pub(crate) fn convert_series(series: &Series, target: TargetType) -> Result<Series> {
    match target {
        TargetType::Integer => to_integer(series),
        TargetType::Float => to_float(series),
        TargetType::String => Ok(series.cast(&DataType::String)?),
        TargetType::Date => to_date(series),
    }
}

fn conversion_error(series: &Series, target: TargetType, reason: String) -> SweeperError {
    SweeperError::TypeConversionFailed {
        column: series.name().to_string(),
        target_type: target.display_name().to_string(),
        reason,
    }
}

fn to_integer(series: &Series) -> Result<Series> {
    let values: Vec<Option<i64>> = match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric | DtypeCategory::Boolean => {
            let floats = series.cast(&DataType::Float64)?;
            let mut out = Vec::with_capacity(series.len());
            for value in floats.f64()?.into_iter() {
                match value {
                    Some(v) if !v.is_finite() || !I64_RANGE.contains(&v.trunc()) => {
                        return Err(conversion_error(
                            series,
                            TargetType::Integer,
                            format!("cannot represent {} as an integer", v),
                        ));
                    }
                    Some(v) => out.push(Some(v.trunc() as i64)),
                    None => out.push(None),
                }
            }
            out
        }
        DtypeCategory::String => {
            let mut out = Vec::with_capacity(series.len());
            for value in series.str()?.into_iter() {
                match value {
                    Some(text) => match text.trim().parse::<i64>() {
                        Ok(v) => out.push(Some(v)),
                        Err(_) => {
                            return Err(conversion_error(
                                series,
                                TargetType::Integer,
                                format!("invalid integer '{}'", text),
                            ));
                        }
                    },
                    None => out.push(None),
                }
            }
            out
        }
        _ => {
            return Err(conversion_error(
                series,
                TargetType::Integer,
                format!("unsupported source type {}", series.dtype()),
            ));
        }
    };

    Ok(Series::new(series.name().clone(), values))
}

fn to_float(series: &Series) -> Result<Series> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric | DtypeCategory::Boolean => Ok(series.cast(&DataType::Float64)?),
        DtypeCategory::String => {
            let mut out: Vec<Option<f64>> = Vec::with_capacity(series.len());
            for value in series.str()?.into_iter() {
                match value {
                    Some(text) => match text.trim().parse::<f64>() {
                        Ok(v) => out.push(Some(v)),
                        Err(_) => {
                            return Err(conversion_error(
                                series,
                                TargetType::Float,
                                format!("invalid number '{}'", text),
                            ));
                        }
                    },
                    None => out.push(None),
                }
            }
            Ok(Series::new(series.name().clone(), out))
        }
        _ => Err(conversion_error(
            series,
            TargetType::Float,
            format!("unsupported source type {}", series.dtype()),
        )),
    }
}

fn to_date(series: &Series) -> Result<Series> {
    match series.dtype() {
        DataType::Date => return Ok(series.clone()),
        DataType::Datetime(_, _) => return Ok(series.cast(&DataType::Date)?),
        _ => {}
    }

    let text = series.cast(&DataType::String)?;
    let days: Vec<Option<i32>> = text
        .str()?
        .into_iter()
        .map(|value| {
            value
                .and_then(parse_date)
                .map(|date| date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        })
        .collect();

    Ok(Series::new(series.name().clone(), days).cast(&DataType::Date)?)
}

/// Parse a date from the common textual layouts.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_null_at(series: &Series, idx: usize) -> bool {
        matches!(series.get(idx).unwrap(), AnyValue::Null)
    }

    #[test]
    fn test_string_to_integer() {
        let series = Series::new("n".into(), &[Some(" 1"), None, Some("42")]);
        let result = convert_series(&series, TargetType::Integer).unwrap();
        assert_eq!(result.dtype(), &DataType::Int64);
        assert_eq!(result.i64().unwrap().get(0), Some(1));
        assert!(is_null_at(&result, 1));
        assert_eq!(result.i64().unwrap().get(2), Some(42));
    }

    #[test]
    fn test_string_to_integer_rejects_text() {
        let series = Series::new("n".into(), &["1", "two"]);
        let err = convert_series(&series, TargetType::Integer).unwrap_err();
        assert!(matches!(err, SweeperError::TypeConversionFailed { .. }));
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn test_float_to_integer_truncates() {
        let series = Series::new("f".into(), &[1.9f64, -2.5]);
        let result = convert_series(&series, TargetType::Integer).unwrap();
        assert_eq!(result.i64().unwrap().get(0), Some(1));
        assert_eq!(result.i64().unwrap().get(1), Some(-2));
    }

    #[test]
    fn test_nan_to_integer_fails() {
        let series = Series::new("f".into(), &[1.0f64, f64::NAN]);
        assert!(convert_series(&series, TargetType::Integer).is_err());
    }

    #[test]
    fn test_float_out_of_integer_range_fails() {
        let series = Series::new("a".into(), &[1e300f64, 2.0]);
        let err = convert_series(&series, TargetType::Integer).unwrap_err();
        assert!(matches!(err, SweeperError::TypeConversionFailed { .. }));

        // 2^63 is one past i64::MAX
        let series = Series::new("a".into(), &[9_223_372_036_854_775_808.0f64]);
        assert!(convert_series(&series, TargetType::Integer).is_err());

        let series = Series::new("a".into(), &[-9_223_372_036_854_775_808.0f64]);
        let result = convert_series(&series, TargetType::Integer).unwrap();
        assert_eq!(result.i64().unwrap().get(0), Some(i64::MIN));
    }

    #[test]
    fn test_string_to_float() {
        let series = Series::new("f".into(), &["1.5", "-2", "3e2"]);
        let result = convert_series(&series, TargetType::Float).unwrap();
        let values: Vec<Option<f64>> = result.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.5), Some(-2.0), Some(300.0)]);
    }

    #[test]
    fn test_string_to_float_rejects_text() {
        let series = Series::new("f".into(), &["abc"]);
        assert!(convert_series(&series, TargetType::Float).is_err());
    }

    #[test]
    fn test_integer_to_string() {
        let series = Series::new("n".into(), &[1i64, 2]);
        let result = convert_series(&series, TargetType::String).unwrap();
        assert_eq!(result.dtype(), &DataType::String);
        assert_eq!(result.str().unwrap().get(1), Some("2"));
    }

    #[test]
    fn test_string_to_date_coerces_invalid() {
        let series = Series::new("d".into(), &[Some("2024-01-15"), Some("not a date"), None]);
        let result = convert_series(&series, TargetType::Date).unwrap();
        assert_eq!(result.dtype(), &DataType::Date);
        assert!(!is_null_at(&result, 0));
        assert!(is_null_at(&result, 1));
        assert!(is_null_at(&result, 2));
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("03/09/2024"), expected);
        assert_eq!(parse_date("2024-03-09 10:30:00"), expected);
        assert_eq!(parse_date("2024-03-09T10:30:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }
}
