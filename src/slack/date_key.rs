use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

/// One archived day of a channel, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DateKey {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    pub fn new(year: u32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Name of the day's log file inside its channel directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }

    pub fn file_stem(&self) -> String {
        join_date_key(self.year, self.month, self.day, '-')
    }

    /// Parse the `YYYY-MM-DD` form used by log file names and `days.json`
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        split_date_key(stem, '-').map(|(y, m, d)| Self::new(y, m, d))
    }

    /// Calendar date, if the key names a real day
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        // Archives never predate year 0
        Self::new(date.year().max(0) as u32, date.month(), date.day())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_date_key(self.year, self.month, self.day))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key: {0:?} (expected YYYY/MM/DD or YYYY-MM-DD)")]
pub struct InvalidDateKey(pub String);

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    /// Accepts both the slash-joined display form and the dashed file form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        parse_date_key(trimmed)
            .or_else(|| split_date_key(trimmed, '-'))
            .map(|(y, m, d)| Self::new(y, m, d))
            .ok_or_else(|| InvalidDateKey(s.to_string()))
    }
}

/// Render a day as zero-padded `YYYY/MM/DD`
pub fn format_date_key(year: u32, month: u32, day: u32) -> String {
    join_date_key(year, month, day, '/')
}

/// Inverse of [`format_date_key`]
pub fn parse_date_key(s: &str) -> Option<(u32, u32, u32)> {
    split_date_key(s, '/')
}

fn join_date_key(year: u32, month: u32, day: u32, sep: char) -> String {
    format!("{:04}{sep}{:02}{sep}{:02}", year, month, day)
}

fn split_date_key(s: &str, sep: char) -> Option<(u32, u32, u32)> {
    let mut parts = s.split(sep);
    let year = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((year, month, day))
}

// Digits only: `u32::from_str` would also take a leading '+'
fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_format_date_key_zero_pads() {
        assert_eq!(format_date_key(2021, 1, 5), "2021/01/05");
        assert_eq!(format_date_key(987, 12, 31), "0987/12/31");
    }

    #[rstest]
    #[case(2021, 1, 5)]
    #[case(0, 0, 0)]
    #[case(1999, 12, 31)]
    #[case(12345, 7, 4)]
    #[case(2024, 123, 456)]
    fn test_date_key_round_trip(#[case] y: u32, #[case] m: u32, #[case] d: u32) {
        assert_eq!(parse_date_key(&format_date_key(y, m, d)), Some((y, m, d)));
    }

    #[rstest]
    #[case("")]
    #[case("2021/01")]
    #[case("2021/01/05/01")]
    #[case("2021-01-05")]
    #[case("2021/+1/05")]
    #[case("2021/-1/05")]
    #[case("2021/ab/05")]
    #[case("2021//05")]
    fn test_parse_date_key_rejects(#[case] input: &str) {
        assert_eq!(parse_date_key(input), None);
    }

    #[test]
    fn test_from_str_accepts_both_forms() {
        let expected = DateKey::new(2021, 1, 5);
        assert_eq!("2021/01/05".parse::<DateKey>().unwrap(), expected);
        assert_eq!("2021-01-05".parse::<DateKey>().unwrap(), expected);
        assert!("yesterday".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_file_name_and_stem() {
        let key = DateKey::new(2021, 1, 5);
        assert_eq!(key.file_name(), "2021-01-05.json");
        assert_eq!(DateKey::from_file_stem("2021-01-05"), Some(key));
        assert_eq!(key.to_string(), "2021/01/05");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![
            DateKey::new(2021, 2, 1),
            DateKey::new(2020, 12, 31),
            DateKey::new(2021, 1, 15),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                DateKey::new(2020, 12, 31),
                DateKey::new(2021, 1, 15),
                DateKey::new(2021, 2, 1),
            ]
        );
    }

    #[test]
    fn test_to_naive_date() {
        assert!(DateKey::new(2021, 2, 29).to_naive_date().is_none());
        let date = DateKey::new(2020, 2, 29).to_naive_date().unwrap();
        assert_eq!(DateKey::from(date), DateKey::new(2020, 2, 29));
    }
}
