//! Conversions between `Duration` and the clock strings UPnP uses

use std::time::Duration;

/// Format as `H:MM:SS`, the form Seek and position info use
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format as `HH:MM:SS`, the form ConfigureSleepTimer expects
pub fn format_sleep_timer(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Parse `H:MM:SS` or `MM:SS`
///
/// Returns `None` for empty strings, `NOT_IMPLEMENTED` (live streams) and
/// anything else that is not a clock value. Fractional seconds are dropped.
pub fn parse_hms(value: &str) -> Option<Duration> {
    let value = value.trim();
    let value = value.split('.').next().unwrap_or(value);
    let parts = value
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let secs = match parts.as_slice() {
        [h, m, s] => h * 3600 + m * 60 + s,
        [m, s] => m * 60 + s,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0:03:58", Some(238))]
    #[case("01:00:00", Some(3600))]
    #[case("4:05", Some(245))]
    #[case("0:00:12.500", Some(12))]
    #[case("NOT_IMPLEMENTED", None)]
    #[case("", None)]
    #[case("1:2:3:4", None)]
    fn test_parse_hms(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_hms(input), expected.map(Duration::from_secs));
    }

    #[test]
    fn test_formats() {
        assert_eq!(format_hms(Duration::from_secs(3723)), "1:02:03");
        assert_eq!(format_hms(Duration::from_secs(59)), "0:00:59");
        assert_eq!(format_sleep_timer(Duration::from_secs(1800)), "00:30:00");
        assert_eq!(format_sleep_timer(Duration::from_secs(7200)), "02:00:00");
    }
}
