use chrono::NaiveDate;

/// Formats a `YYYY-MM` token as `Month YYYY`.
///
/// Empty input stays empty; `present` (any case) and tokens without a dash
/// come back unchanged. Anything that does not parse as a year and a month
/// is also returned as-is, so this never fails.
pub fn format_date(token: &str) -> String {
    if token.is_empty() || token.eq_ignore_ascii_case("present") || !token.contains('-') {
        return token.to_string();
    }

    let mut parts = token.split('-');
    let year = parts.next().and_then(|y| y.trim().parse::<i32>().ok());
    let month = parts.next().and_then(|m| m.trim().parse::<u32>().ok());

    match (year, month) {
        (Some(year), Some(month)) if (0..=9999).contains(&year) => {
            NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| token.to_string())
        }
        _ => token.to_string(),
    }
}

/// `"<start> - <end>"`, with a missing end shown as `Present`.
pub fn format_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(format_date).unwrap_or_default();
    let end = match end.filter(|e| !e.is_empty()) {
        Some(end) => format_date(end),
        None => "Present".to_string(),
    };
    format!("{start} - {end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_becomes_month_name() {
        assert_eq!(format_date("2021-03"), "March 2021");
        assert_eq!(format_date("1999-12"), "December 1999");
    }

    #[test]
    fn test_full_date_uses_year_and_month() {
        assert_eq!(format_date("2020-01-15"), "January 2020");
    }

    #[test]
    fn test_passthrough_cases() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("Present"), "Present");
        assert_eq!(format_date("PRESENT"), "PRESENT");
        assert_eq!(format_date("2019"), "2019");
        assert_eq!(format_date("Spring 2020"), "Spring 2020");
    }

    #[test]
    fn test_unparseable_tokens_returned_unchanged() {
        assert_eq!(format_date("2021-13"), "2021-13");
        assert_eq!(format_date("abc-def"), "abc-def");
        assert_eq!(format_date("-"), "-");
        assert_eq!(format_date("2021-"), "2021-");
        assert_eq!(
            format_date("not-a-real-date-9999-99"),
            "not-a-real-date-9999-99"
        );
    }

    #[test]
    fn test_range_defaults_end_to_present() {
        assert_eq!(format_range(Some("2020-02"), None), "February 2020 - Present");
        assert_eq!(format_range(Some("2020-02"), Some("")), "February 2020 - Present");
        assert_eq!(
            format_range(Some("2018-06"), Some("2020-02")),
            "June 2018 - February 2020"
        );
        assert_eq!(format_range(None, None), " - Present");
        assert_eq!(format_range(None, Some("2021-06")), " - June 2021");
    }
}
