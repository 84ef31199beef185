//! Strict parsing of raw form text into the typed values used by the domain modules.
//!
//! Handlers deserialize forms and query strings into plain strings and then
//! convert each field with the functions here, so that a malformed value is
//! reported as a validation error instead of a generic extractor rejection.

use std::str::FromStr;

use time::{Date, macros::format_description};

use crate::{
    Error,
    amount::{MAX_AMOUNT, validate_amount},
    database_id::DatabaseId,
    monthly_budget::YearMonth,
};

/// Parse a whole amount of currency units between zero and [MAX_AMOUNT].
///
/// # Errors
/// Returns [Error::InvalidFormValue] if `value` is not an integer,
/// [Error::NegativeAmount] if it is below zero and [Error::AmountTooLarge] if
/// it is above [MAX_AMOUNT].
pub fn parse_amount(field: &'static str, value: &str) -> Result<i64, Error> {
    let amount: i64 = parse_field(field, value)?;

    validate_amount(amount)
}

/// Parse an ISO 8601 calendar date, e.g. "2025-03-14".
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, Error> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| invalid_value(field, value))
}

/// Parse a database ID.
pub fn parse_id(field: &'static str, value: &str) -> Result<DatabaseId, Error> {
    parse_field(field, value)
}

/// Parse an optional database ID where an empty string means no ID.
pub fn parse_optional_id(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DatabaseId>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_id(field, text).map(Some),
    }
}

/// Parse a year and month pair into a validated [YearMonth].
pub fn parse_year_month(year: &str, month: &str) -> Result<YearMonth, Error> {
    let year: i64 = parse_field("year", year)?;
    let month: i64 = parse_field("month", month)?;

    YearMonth::new(year, month)
}

/// Parse `value` with its [FromStr] implementation, mapping failures to
/// [Error::InvalidFormValue].
pub fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_value(field, value))
}

fn invalid_value(field: &'static str, value: &str) -> Error {
    Error::InvalidFormValue {
        field,
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod parse_tests {
    use time::macros::date;

    use crate::{Error, amount::MAX_AMOUNT, monthly_budget::YearMonth};

    use super::{parse_amount, parse_date, parse_optional_id, parse_year_month};

    #[test]
    fn amount_accepts_whole_units() {
        assert_eq!(parse_amount("amount", " 150000 "), Ok(150000));
        assert_eq!(parse_amount("amount", "0"), Ok(0));
    }

    #[test]
    fn amount_rejects_negative_values() {
        assert_eq!(parse_amount("amount", "-1"), Err(Error::NegativeAmount(-1)));
    }

    #[test]
    fn amount_rejects_values_above_maximum() {
        assert_eq!(
            parse_amount("amount", "9223372036854775807"),
            Err(Error::AmountTooLarge(i64::MAX))
        );
        assert_eq!(
            parse_amount("amount", &(MAX_AMOUNT + 1).to_string()),
            Err(Error::AmountTooLarge(MAX_AMOUNT + 1))
        );
        assert_eq!(
            parse_amount("amount", &MAX_AMOUNT.to_string()),
            Ok(MAX_AMOUNT)
        );
    }

    #[test]
    fn amount_rejects_fractions_and_text() {
        for raw in ["12.50", "abc", "", "1e3"] {
            assert_eq!(
                parse_amount("amount", raw),
                Err(Error::InvalidFormValue {
                    field: "amount",
                    value: raw.to_owned()
                }),
                "want {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn date_parses_iso_format() {
        assert_eq!(parse_date("date", "2024-02-29"), Ok(date!(2024 - 02 - 29)));
    }

    #[test]
    fn date_rejects_impossible_dates() {
        assert!(parse_date("date", "2025-02-29").is_err());
        assert!(parse_date("date", "29/02/2024").is_err());
    }

    #[test]
    fn empty_optional_id_is_none() {
        assert_eq!(parse_optional_id("monthly_budget_id", None), Ok(None));
        assert_eq!(parse_optional_id("monthly_budget_id", Some("")), Ok(None));
        assert_eq!(parse_optional_id("monthly_budget_id", Some("7")), Ok(Some(7)));
        assert!(parse_optional_id("monthly_budget_id", Some("x")).is_err());
    }

    #[test]
    fn year_month_is_range_checked() {
        assert_eq!(
            parse_year_month("2025", "3"),
            Ok(YearMonth::new(2025, 3).unwrap())
        );
        assert_eq!(parse_year_month("2025", "13"), Err(Error::InvalidMonth(13)));
        assert!(matches!(
            parse_year_month("twenty", "3"),
            Err(Error::InvalidFormValue { field: "year", .. })
        ));
    }
}
