//! Validated query date windows.

use chrono::{Months, NaiveDate};

use super::error::InvalidArgument;

/// Date format used by the upstream API and by callers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive date window at most one calendar month wide.
///
/// "One month" follows calendar arithmetic clamped to month end, so
/// 2024-01-31 may extend to 2024-02-29 but not to 2024-03-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from already-parsed dates.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidArgument> {
        if end < start {
            return Err(InvalidArgument::InvertedRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }

        // Only overflows at the end of chrono's representable range.
        let limit = start.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
        if end > limit {
            return Err(InvalidArgument::RangeTooWide {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }

        Ok(Self { start, end })
    }

    /// Parse a range from optional `YYYY-MM-DD` strings.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, InvalidArgument> {
        let start = parse_date("start", start)?;
        let end = parse_date("end", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, InvalidArgument> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(InvalidArgument::MissingDate(field))?;

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| InvalidArgument::MalformedDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn single_day_is_valid() {
        let range = DateRange::parse(Some("2015-10-14"), Some("2015-10-14")).unwrap();
        assert_eq!(range.start(), date("2015-10-14"));
        assert_eq!(range.end(), date("2015-10-14"));
    }

    #[test]
    fn exactly_one_month_is_accepted() {
        assert!(DateRange::parse(Some("2017-01-01"), Some("2017-02-01")).is_ok());
        assert!(DateRange::parse(Some("2024-01-31"), Some("2024-02-29")).is_ok());
    }

    #[test]
    fn over_one_month_is_rejected() {
        let err = DateRange::parse(Some("2017-01-01"), Some("2017-02-02")).unwrap_err();
        assert!(matches!(err, InvalidArgument::RangeTooWide { .. }));

        let err = DateRange::parse(Some("2024-01-31"), Some("2024-03-01")).unwrap_err();
        assert!(matches!(err, InvalidArgument::RangeTooWide { .. }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::parse(Some("2017-01-10"), Some("2017-01-01")).unwrap_err();
        assert_eq!(
            err,
            InvalidArgument::InvertedRange {
                start: "2017-01-10".into(),
                end: "2017-01-01".into(),
            }
        );
    }

    #[test]
    fn missing_dates_are_rejected() {
        assert_eq!(
            DateRange::parse(None, Some("2017-01-01")),
            Err(InvalidArgument::MissingDate("start"))
        );
        assert_eq!(
            DateRange::parse(Some("2017-01-01"), Some("  ")),
            Err(InvalidArgument::MissingDate("end"))
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["2017/01/01", "01-01-2017", "2017-13-01", "2017-02-30", "yesterday"] {
            let err = DateRange::parse(Some(bad), Some("2017-01-01")).unwrap_err();
            assert!(
                matches!(err, InvalidArgument::MalformedDate { field: "start", .. }),
                "{bad} should be malformed, got {err:?}"
            );
        }
    }
}
