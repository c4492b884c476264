//! Departure date scoring
//!
//! Departure dates are free text typed by the admins: "13 Ago", "Ago", "Consultar" or nothing at
//! all. They are turned into a single number so a catalog can be sorted by proximity.

use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeDelta;
use chrono::TimeZone;

/// Spanish month abbreviations, January first
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Spanish month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Departure text meaning "ask us, no fixed date yet"
const INQUIRE: &str = "consultar";

/// Score of destinations without a fixed date, later than any real departure
pub const SENTINEL_SCORE: i64 = 9_999_999_999_999;

/// Result of reading a departure date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParsedDate {
    /// A month was recognised, `month` is zero based
    ///
    /// The day defaults to the first when the text has no digits.
    Exact { day: u32, month: u32, year: i32 },

    /// No fixed date: empty text or "Consultar"
    Inquire,

    /// Text without any recognisable month, sorted as January
    Unknown { day: u32, year: i32 },
}

impl ParsedDate {
    /// Read a departure date of the given trip year
    pub fn parse(departure_date: &str, year: i32) -> Self {
        let lower = departure_date.to_lowercase();

        if lower.is_empty() || lower == INQUIRE {
            return ParsedDate::Inquire;
        }

        let day = first_number(&lower).unwrap_or(1);

        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|abbreviation| lower.contains(abbreviation));

        match month {
            // at most 11, always fits
            Some(month) => ParsedDate::Exact {
                day,
                month: u32::try_from(month).unwrap_or_default(),
                year,
            },
            None => ParsedDate::Unknown { day, year },
        }
    }

    /// Sortable score: milliseconds since the epoch of local midnight on the departure day
    ///
    /// Days past the end of the month roll over into the next months, day 0 is the last day of
    /// the previous month. Dates that can not be represented get the sentinel score.
    pub fn score(self) -> i64 {
        match self {
            ParsedDate::Inquire => SENTINEL_SCORE,
            ParsedDate::Exact { day, month, year } => local_timestamp(year, month, day),
            ParsedDate::Unknown { day, year } => local_timestamp(year, 0, day),
        }
    }
}

/// Score a departure date of the given trip year
///
/// Never fails, see [`ParsedDate::score`]
pub fn date_score(departure_date: &str, year: i32) -> i64 {
    ParsedDate::parse(departure_date, year).score()
}

/// First run of ASCII digits in the text
///
/// Numbers too large for a day saturate, they end up as the sentinel anyway
fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let digits = &text[start..];
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());

    Some(digits[..end].parse().unwrap_or(u32::MAX))
}

fn local_timestamp(year: i32, month: u32, day: u32) -> i64 {
    let date = NaiveDate::from_ymd_opt(year, month + 1, 1).and_then(|first| {
        let offset = TimeDelta::try_days(i64::from(day) - 1)?;
        first.checked_add_signed(offset)
    });

    let Some(midnight) = date.and_then(|date| date.and_hms_opt(0, 0, 0)) else {
        return SENTINEL_SCORE;
    };

    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || midnight.and_utc().timestamp_millis(),
            |local| local.timestamp_millis(),
        )
        .min(SENTINEL_SCORE)
}
