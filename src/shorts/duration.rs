//! ISO-8601 duration handling for the YouTube `contentDetails.duration` field

/// Longest runtime, in seconds, that still counts as a Short
pub const SHORT_MAX_SECONDS: u64 = 60;

/// Parse an ISO-8601 duration such as `PT1M30S` or `P1DT2H` into seconds.
///
/// Every component is optional, so `PT` is zero. Returns `None` for anything that
/// is not of the form `P[nD][T[nH][nM][nS]]`.
pub fn parse_duration_secs(duration: &str) -> Option<u64> {
    let rest = duration.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = 0u64;
    for (value, unit) in components(date_part)? {
        let factor = match unit {
            'W' => 7 * 86_400,
            'D' => 86_400,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(factor)?)?;
    }

    if let Some(time_part) = time_part {
        for (value, unit) in components(time_part)? {
            let factor = match unit {
                'H' => 3_600,
                'M' => 60,
                'S' => 1,
                _ => return None,
            };
            total = total.checked_add(value.checked_mul(factor)?)?;
        }
    }

    Some(total)
}

/// Split `1H2M3S` into `[(1, 'H'), (2, 'M'), (3, 'S')]`
fn components(part: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            out.push((digits.parse().ok()?, c));
            digits.clear();
        }
    }

    if digits.is_empty() {
        Some(out)
    } else {
        None
    }
}

/// Whether a video of this duration is a Short.
///
/// Only durations with a time part qualify: `P0D` is what YouTube reports for
/// live streams and premieres.
pub fn is_short(duration: &str) -> bool {
    duration.contains('T')
        && parse_duration_secs(duration).is_some_and(|secs| secs <= SHORT_MAX_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_secs() {
        assert_eq!(parse_duration_secs("PT45S"), Some(45));
        assert_eq!(parse_duration_secs("PT1M30S"), Some(90));
        assert_eq!(parse_duration_secs("PT2M"), Some(120));
        assert_eq!(parse_duration_secs("PT"), Some(0));
        assert_eq!(parse_duration_secs("PT1H2M3S"), Some(3723));
        assert_eq!(parse_duration_secs("P1DT1S"), Some(86_401));
        assert_eq!(parse_duration_secs("P0D"), Some(0));
        assert_eq!(parse_duration_secs(""), None);
        assert_eq!(parse_duration_secs("1M30S"), None);
        assert_eq!(parse_duration_secs("PTM"), None);
        assert_eq!(parse_duration_secs("PT10"), None);
        assert_eq!(parse_duration_secs("PT5X"), None);
    }

    #[test]
    fn test_is_short() {
        assert!(is_short("PT45S"));
        assert!(is_short("PT1M"));
        assert!(is_short("PT60S"));
        assert!(is_short("PT"));
        assert!(!is_short("PT61S"));
        assert!(!is_short("PT1M30S"));
        assert!(!is_short("PT1H"));
        assert!(!is_short("P0D"));
        assert!(!is_short("garbage"));
    }

    #[test]
    fn test_minutes_and_seconds_grid() {
        for m in 0..3u64 {
            for s in [0u64, 1, 30, 59] {
                let iso = format!("PT{}M{}S", m, s);
                assert_eq!(is_short(&iso), 60 * m + s <= 60, "{}", iso);
            }
        }
    }
}
