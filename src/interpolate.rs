//! Client-side parameter interpolation.
//!
//! The REST endpoint has no bind protocol, so positional `?` placeholders are
//! replaced with SQL literals before the text is sent.

use std::fmt::Write;

use chrono::SecondsFormat;

use crate::error::{TaosError, TaosResult};
use crate::value::Value;

/// Replace each `?` outside quoted strings and backtick identifiers with the
/// literal for the next argument.
pub fn interpolate(sql: &str, args: &[Value]) -> TaosResult<String> {
    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    let mut args_iter = args.iter();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in sql.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                out.push(ch);
            }
            '?' => {
                let arg = args_iter.next().ok_or_else(|| {
                    TaosError::Params(format!("not enough arguments: {} given", args.len()))
                })?;
                write_literal(&mut out, arg)?;
            }
            _ => out.push(ch),
        }
    }

    if args_iter.next().is_some() {
        return Err(TaosError::Params(format!(
            "too many arguments: {} given",
            args.len()
        )));
    }
    Ok(out)
}

fn write_literal(out: &mut String, value: &Value) -> TaosResult<()> {
    // Writing to a String cannot fail.
    let _ = match value {
        Value::Null => write!(out, "NULL"),
        Value::Bool(v) => write!(out, "{v}"),
        Value::TinyInt(v) => write!(out, "{v}"),
        Value::SmallInt(v) => write!(out, "{v}"),
        Value::Int(v) => write!(out, "{v}"),
        Value::BigInt(v) => write!(out, "{v}"),
        Value::UTinyInt(v) => write!(out, "{v}"),
        Value::USmallInt(v) => write!(out, "{v}"),
        Value::UInt(v) => write!(out, "{v}"),
        Value::UBigInt(v) => write!(out, "{v}"),
        Value::Float(v) if v.is_finite() => write!(out, "{v}"),
        Value::Double(v) if v.is_finite() => write!(out, "{v}"),
        Value::Float(_) | Value::Double(_) => {
            return Err(TaosError::Params("non-finite float argument".to_string()));
        }
        Value::Binary(s) | Value::NChar(s) => {
            write_quoted(out, s);
            Ok(())
        }
        Value::Timestamp(ts) => {
            write_quoted(out, &ts.to_rfc3339_opts(SecondsFormat::Nanos, false));
            Ok(())
        }
        Value::Json(raw) => {
            let s = std::str::from_utf8(raw)
                .map_err(|e| TaosError::Params(format!("JSON argument is not UTF-8: {e}")))?;
            write_quoted(out, s);
            Ok(())
        }
    };
    Ok(())
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_interpolate_basic() {
        let sql = interpolate(
            "insert into d0 values(?, ?, ?, ?)",
            &[Value::BigInt(1), Value::Double(2.5), Value::Bool(true), Value::Null],
        )
        .unwrap();
        assert_eq!(sql, "insert into d0 values(1, 2.5, true, NULL)");
    }

    #[test]
    fn test_string_escaping() {
        let sql = interpolate("select * from t where s = ?", &["it's a \\ test".into()]).unwrap();
        assert_eq!(sql, r"select * from t where s = 'it\'s a \\ test'");
    }

    #[test]
    fn test_placeholders_in_literals_untouched() {
        let sql = interpolate(
            "select '?', `a?b`, \"x\\\"?\" from t where v = ?",
            &[Value::Int(3)],
        )
        .unwrap();
        assert_eq!(sql, "select '?', `a?b`, \"x\\\"?\" from t where v = 3");
    }

    #[test]
    fn test_timestamp_literal() {
        let ts = DateTime::parse_from_rfc3339("2023-06-01T12:00:00.000000001+08:00").unwrap();
        let sql = interpolate("select ?", &[ts.into()]).unwrap();
        assert_eq!(sql, "select '2023-06-01T12:00:00.000000001+08:00'");
    }

    #[test]
    fn test_argument_count_mismatch() {
        assert!(matches!(interpolate("select ?, ?", &[Value::Int(1)]), Err(TaosError::Params(_))));
        assert!(matches!(interpolate("select 1", &[Value::Int(1)]), Err(TaosError::Params(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(interpolate("select ?", &[Value::Double(f64::NAN)]).is_err());
        assert!(interpolate("select ?", &[Value::Float(f32::INFINITY)]).is_err());
    }
}
