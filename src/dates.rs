//! Air date parsing.
//!
//! Episode pages print their air date as `"Mon D, YYYY"`, e.g. `"Jan 3, 2015"`.

use crate::error::ScrapeError;
use chrono::NaiveDate;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Look up a three-letter month abbreviation, returning its 1-based number.
pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

/// Parse an air date of the form `"Mon D, YYYY"`. The comma is optional.
///
/// # Arguments
///
/// * `text` - The date text as shown on an episode page, e.g. `"Nov 17, 1995"`
///
/// # Returns
///
/// The calendar date, with no time or zone attached.
///
/// # Errors
///
/// - [`ScrapeError::MalformedDate`] if there are fewer than three tokens
/// - [`ScrapeError::UnknownMonth`] if the first token is not `Jan`..`Dec`
/// - [`ScrapeError::InvalidNumber`] if the day or year is not an integer
/// - [`ScrapeError::InvalidDate`] if the triple is not a real calendar day
pub fn parse_air_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    let cleaned = text.replace(',', "");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let [month_tok, day_tok, year_tok, ..] = tokens.as_slice() else {
        return Err(ScrapeError::MalformedDate(text.to_string()));
    };

    let month =
        month_number(month_tok).ok_or_else(|| ScrapeError::UnknownMonth(month_tok.to_string()))?;
    let day: u32 = parse_number(day_tok)?;
    let year: i32 = parse_number(year_tok)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScrapeError::InvalidDate { year, month, day })
}

fn parse_number<T>(token: &str) -> Result<T, ScrapeError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    token.parse().map_err(|source| ScrapeError::InvalidNumber {
        token: token.to_string(),
        source,
    })
}
