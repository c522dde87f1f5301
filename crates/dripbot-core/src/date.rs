// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict `DD.MM.YYYY` order dates.
//!
//! Dates travel through the bot and the database as zero-padded
//! `DD.MM.YYYY` strings, but every comparison happens on the parsed
//! [`chrono::NaiveDate`]. String order is NOT chronological for this
//! format (`05.11.2025` < `28.10.2025` lexicographically), so raw string
//! comparison is never used for range containment.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DripbotError;

/// The wire format shown to users in prompts and error messages.
pub const DATE_FORMAT_HINT: &str = "DD.MM.YYYY";

/// A validated calendar date in strict zero-padded `DD.MM.YYYY` form.
///
/// Ordering and equality are calendar-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderDate(NaiveDate);

impl OrderDate {
    /// Parses a strict `DD.MM.YYYY` string.
    ///
    /// Rejects wrong separators, missing zero-padding, out-of-range
    /// day/month combinations (including leap-year rules), and any
    /// non-numeric content.
    pub fn parse(input: &str) -> Result<Self, DripbotError> {
        let bytes = input.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[2] == b'.'
            && bytes[5] == b'.'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
        if !shape_ok {
            return Err(Self::format_error(input));
        }

        let day: u32 = input[0..2].parse().map_err(|_| Self::format_error(input))?;
        let month: u32 = input[3..5].parse().map_err(|_| Self::format_error(input))?;
        let year: i32 = input[6..10].parse().map_err(|_| Self::format_error(input))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(OrderDate)
            .ok_or_else(|| Self::format_error(input))
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    fn format_error(input: &str) -> DripbotError {
        DripbotError::Validation(format!(
            "`{input}` is not a valid {DATE_FORMAT_HINT} date"
        ))
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02}.{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

impl FromStr for OrderDate {
    type Err = DripbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<OrderDate> for String {
    fn from(d: OrderDate) -> Self {
        d.to_string()
    }
}

impl TryFrom<String> for OrderDate {
    type Error = DripbotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
