//! Regex patterns for odometer log recognition.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // M/D/YY or M/D/YYYY followed by two readings
    pub static ref DATE_PAIR: Regex = Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{2,4})\s+(\d+)\s+(\d+)"
    ).unwrap();

    // "Odometer: 45230 - 45480"
    pub static ref ODOMETER: Regex = Regex::new(
        r"(?i)odometer[\s\p{P}\p{S}]*(\d+)[\s\p{P}\p{S}]+(\d+)"
    ).unwrap();

    // "Start: 45230 End: 45480"
    pub static ref START_END: Regex = Regex::new(
        r"(?i)start[\s\p{P}\p{S}]*(\d+)[\s\p{P}\p{S}]*end[\s\p{P}\p{S}]*(\d+)"
    ).unwrap();

    // A standalone US-style date token
    pub static ref US_DATE: Regex = Regex::new(
        r"^(\d{1,2})/(\d{1,2})/(\d{2,4})$"
    ).unwrap();

    // ISO calendar date
    pub static ref ISO_DATE: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_pair_captures() {
        let caps = DATE_PAIR.captures("1/5/25   100 200").unwrap();
        assert_eq!(&caps[1], "1/5/25");
        assert_eq!(&caps[2], "100");
        assert_eq!(&caps[3], "200");
    }

    #[test]
    fn test_odometer_separators() {
        for text in [
            "ODOMETER: 100 - 200",
            "odometer 100/200",
            "Odometer:100, 200",
            "Odometer: 100 => 200",
            "odometer 100 | 200",
            "Odometer = 100 + 200",
        ] {
            let caps = ODOMETER.captures(text).unwrap();
            assert_eq!((&caps[1], &caps[2]), ("100", "200"), "{}", text);
        }
        assert!(!ODOMETER.is_match("odometer reading 100 200"));
    }

    #[test]
    fn test_start_end_labels() {
        let caps = START_END.captures("START: 100 end: 200").unwrap();
        assert_eq!((&caps[1], &caps[2]), ("100", "200"));
        let caps = START_END.captures("Start = 5 | End => 9").unwrap();
        assert_eq!((&caps[1], &caps[2]), ("5", "9"));
        assert!(!START_END.is_match("start 100 finish 200"));
    }
}
