//! Pure parse functions for CLI parameter values.

use chrono::Duration;
use url::Url;

/// Parse a duration like `30s`, `45m`, `2h`, `7d` or `1w`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let unit_start = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("'{value}' is missing a unit (expected e.g. 30m, 2h)"))?;

    let (count, unit) = value.split_at(unit_start);
    let count: i64 = count
        .parse()
        .map_err(|_| format!("'{value}' does not start with a number"))?;

    match unit {
        "s" => Ok(Duration::seconds(count)),
        "m" => Ok(Duration::minutes(count)),
        "h" => Ok(Duration::hours(count)),
        "d" => Ok(Duration::days(count)),
        "w" => Ok(Duration::weeks(count)),
        other => Err(format!("Unknown duration unit '{other}' (use s, m, h, d or w)")),
    }
}

/// Normalize a hostname to a base URL, applying `default_scheme` when
/// the value carries none. Query and fragment are dropped.
pub fn parse_hostname(value: &str, default_scheme: &str) -> Result<Url, String> {
    let parsed = Url::parse(value)
        .ok()
        .filter(|url| url.host().is_some())
        .map(Ok)
        .unwrap_or_else(|| Url::parse(&format!("{default_scheme}://{value}")))
        .map_err(|e| format!("Invalid hostname '{value}': {e}"))?;

    if parsed.host().is_none() {
        return Err(format!("Invalid hostname '{value}': no host"));
    }

    let mut url = parsed;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::seconds(30));
        assert_eq!(parse_duration("45m").unwrap(), Duration::minutes(45));
        assert_eq!(parse_duration("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("1w").unwrap(), Duration::weeks(1));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("30x").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_parse_hostname_applies_default_scheme() {
        let url = parse_hostname("localhost:5000", "http").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_parse_hostname_keeps_explicit_scheme() {
        let url = parse_hostname("https://example.com/base", "http").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/base");
    }

    #[test]
    fn test_parse_hostname_drops_query_and_fragment() {
        let url = parse_hostname("http://example.com/x?y=1#z", "http").unwrap();
        assert_eq!(url.as_str(), "http://example.com/x");
    }
}
