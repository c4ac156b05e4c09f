use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::BoardError;

static RE_INTERVAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]*\.?[0-9]+)\s*(ms|s|m)?\s*$").unwrap());

/// Parses `250ms`, `1s`, `1.5s`, `2m` or a bare number of seconds.
pub fn parse_interval(value: &str) -> Result<Duration, BoardError> {
    let invalid = |message: String| BoardError::InvalidInterval { message };

    let caps = RE_INTERVAL
        .captures(value)
        .ok_or_else(|| invalid(format!("'{value}' is not a duration like 1s or 250ms")))?;
    let number = caps[1]
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    let millis = match caps.get(2).map(|m| m.as_str()) {
        Some("ms") => number,
        Some("m") => number * 60_000.0,
        _ => number * 1_000.0,
    };

    let micros = (millis * 1_000.0).round();
    if micros < 1.0 {
        return Err(invalid("interval must be greater than zero".to_string()));
    }
    Ok(Duration::from_micros(micros as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse_interval("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_interval("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_interval(" 3 ").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(
            parse_interval("0s"),
            Err(BoardError::InvalidInterval { .. })
        ));
        assert!(parse_interval("fast").is_err());
        assert!(parse_interval("-1s").is_err());
        assert!(parse_interval("").is_err());
    }
}
