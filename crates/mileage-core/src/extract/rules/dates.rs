//! Date normalization for extracted trips.

use chrono::NaiveDate;

use super::patterns::{ISO_DATE, US_DATE};

/// Parse a `M/D/YY`, `M/D/YYYY` or `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some(caps) = US_DATE.captures(s) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = ISO_DATE.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse a date, substituting `today` when the text is not a calendar date.
pub fn normalize_date(s: &str, today: NaiveDate) -> NaiveDate {
    parse_date(s).unwrap_or(today)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_us_dates() {
        assert_eq!(parse_date("01/15/2025"), Some(date(2025, 1, 15)));
        assert_eq!(parse_date("1/5/25"), Some(date(2025, 1, 5)));
        assert_eq!(parse_date("12/31/99"), Some(date(1999, 12, 31)));
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_date("2025-01-15"), Some(date(2025, 1, 15)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date("13/01/2025"), None);
        assert_eq!(parse_date("2/30/2025"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_normalize_falls_back_to_today() {
        let today = date(2025, 6, 1);
        assert_eq!(normalize_date("2/30/2025", today), today);
        assert_eq!(normalize_date("2/28/2025", today), date(2025, 2, 28));
    }
}
