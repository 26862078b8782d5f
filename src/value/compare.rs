//! Type-aware comparison of JSON values
//!
//! Two flavours:
//! - [`compare_values`]: partial, used by query predicates. Values of
//!   different kinds are incomparable and never satisfy a range predicate.
//! - [`total_order`]: total, used by key sorts. Kinds are ranked
//!   null < bool < number < string < array < object, a missing field ranks
//!   with null. Within strings, timestamps sort before plain text.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde_json::{Number, Value};

use super::collation::Collation;

/// Rank of a value's kind in the total sort order
pub fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Compares two numbers by value, whatever their representation.
///
/// Integers are never rounded through `f64`, so mixed integer/float
/// comparisons stay exact and the ordering is transitive.
pub fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (integer(a), integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_int_float(x, float(b)),
        (None, Some(y)) => compare_int_float(y, float(a)).reverse(),
        (None, None) => float(a).partial_cmp(&float(b)).unwrap_or(Ordering::Equal),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(0.0)
}

fn compare_int_float(int: i128, float: f64) -> Ordering {
    // Finite floats at or beyond 2^127 are outside every i64/u64.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if float.is_nan() {
        return Ordering::Equal;
    }
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    int.cmp(&(whole as i128)).then_with(|| {
        // Same integer part: the fraction decides.
        if float > whole {
            Ordering::Less
        } else if float < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if !looks_temporal(s) {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    FixedOffset::east_opt(0)?
        .from_local_datetime(&midnight)
        .single()
}

fn looks_temporal(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

/// Compares two strings, chronologically when both are timestamps.
pub fn compare_strings(a: &str, b: &str, collation: Collation) -> Ordering {
    if let (Some(x), Some(y)) = (parse_timestamp(a), parse_timestamp(b)) {
        return x.cmp(&y);
    }
    collation.compare(a, b)
}

/// Total order over strings for sorting: timestamps first, chronologically,
/// then every other string under `collation`.
pub fn order_strings(a: &str, b: &str, collation: Collation) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| collation.compare(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collation.compare(a, b),
    }
}

/// Compares two scalars of the same kind; `None` when they are incomparable.
pub fn compare_values(a: &Value, b: &Value, collation: Collation) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => Some(compare_numbers(x, y)),
        (Value::String(x), Value::String(y)) => Some(compare_strings(x, y, collation)),
        _ => None,
    }
}

/// Total ordering over optional values for sorting.
pub fn total_order(a: Option<&Value>, b: Option<&Value>, collation: Collation) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Value::Array(xs), Value::Array(ys)) => xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| total_order(Some(x), Some(y), collation))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| xs.len().cmp(&ys.len())),
        (Value::Object(xs), Value::Object(ys)) => xs
            .iter()
            .zip(ys.iter())
            .map(|((xk, xv), (yk, yv))| {
                xk.cmp(yk)
                    .then_with(|| total_order(Some(xv), Some(yv), collation))
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| xs.len().cmp(&ys.len())),
        (Value::String(x), Value::String(y)) => order_strings(x, y, collation),
        _ => compare_values(a, b, collation).unwrap_or(Ordering::Equal),
    }
}

/// Structural equality with numeric equality across representations.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}
