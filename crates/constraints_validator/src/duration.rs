//! Duration parameters: `300ms`, `1h30m`, `-1.5s`, `2d`.
//!
//! A duration is an optional sign followed by either `0` or one or more
//! `<decimal><unit>` segments. Units are `ns`, `us` (or `µs`), `ms`, `s`,
//! `m`, `h`, `d` and `w`.

use crate::DurationError;
use chrono::TimeDelta;

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;

// Digits past this point cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<i128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SECOND,
        "m" => NANOS_PER_MINUTE,
        "h" => NANOS_PER_HOUR,
        "d" => NANOS_PER_DAY,
        "w" => NANOS_PER_WEEK,
        _ => return None,
    };
    Some(nanos)
}

/// Parses a duration string into a [`TimeDelta`].
///
/// # Example
///
/// ```rust
/// use chrono::TimeDelta;
/// use constraints_validator::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), TimeDelta::minutes(90));
/// assert_eq!(parse_duration("-1.5s").unwrap(), TimeDelta::milliseconds(-1500));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let limit = i128::from(i64::MAX) + i128::from(negative);
    let mut total: i128 = 0;

    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, tail) = rest.split_at(int_len);

        let (frac_part, tail) = match tail.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", tail),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let out_of_range = || DurationError::OutOfRange(input.to_string());

        let whole = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<i128>().map_err(|_| out_of_range())?
        };
        let mut segment = whole.checked_mul(scale).ok_or_else(out_of_range)?;

        if !frac_part.is_empty() {
            let mut numerator: i128 = 0;
            let mut denominator: i128 = 1;
            for digit in frac_part.bytes().take(MAX_FRACTION_DIGITS) {
                numerator = numerator * 10 + i128::from(digit - b'0');
                denominator *= 10;
            }
            segment = segment
                .checked_add(numerator * scale / denominator)
                .ok_or_else(out_of_range)?;
        }

        total = total.checked_add(segment).ok_or_else(out_of_range)?;
        if total > limit {
            return Err(out_of_range());
        }

        rest = tail;
    }

    let nanos = if negative { -total } else { total };
    i64::try_from(nanos)
        .map(TimeDelta::nanoseconds)
        .map_err(|_| DurationError::OutOfRange(input.to_string()))
}
