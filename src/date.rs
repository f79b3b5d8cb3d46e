//! Publication dates and the recency window they are checked against.
//!
//! Metadata dates arrive as loosely structured strings (`2026 Feb 15`, `2026 Feb`, `2026`,
//! `2026/02/15`, ...). Parsing tries a fixed, ordered list of shapes and yields a calendar day
//! or nothing; there is no lenient fallback.

use std::fmt;

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// A calendar day attached to a record. Partial dates resolve to the first day they cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicationDate(NaiveDate);

impl PublicationDate {
    pub fn new(date: NaiveDate) -> Self {
        PublicationDate(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Parse a metadata date string. Returns `None` when no supported shape matches.
    pub fn parse(s: &str) -> Option<Self> {
        let t = s.trim();
        if t.is_empty() {
            return None;
        }
        PARSERS.iter().find_map(|f| f(t)).map(PublicationDate::new)
    }
}

impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

type ParserFn = fn(&str) -> Option<NaiveDate>;

/// Ordered from most to least specific; the first shape that matches wins.
static PARSERS: &[ParserFn] = &[
    iso_full,
    provider_full,
    provider_year_month,
    iso_year_month,
    year_only,
];

fn iso_full(s: &str) -> Option<NaiveDate> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:$|[T\s])").unwrap());
    let c = RE.captures(s)?;
    ymd(&c[1], &c[2], &c[3])
}

fn provider_full(s: &str) -> Option<NaiveDate> {
    // `2026 Feb 15`, `2026 February 15`, `2025 Dec 30-2026 Jan 5`
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{4})\s+([A-Za-z]+)\.?\s+(\d{1,2})\b").unwrap());
    let c = RE.captures(s)?;
    let year = c[1].parse().ok()?;
    let month = month_number(&c[2])?;
    let day = c[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn provider_year_month(s: &str) -> Option<NaiveDate> {
    // `2026 Feb`, `2026 Jan-Feb`
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{4})\s+([A-Za-z]+)\.?(?:$|-[A-Za-z]+$)").unwrap());
    let c = RE.captures(s)?;
    let year = c[1].parse().ok()?;
    let month = month_number(&c[2])?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn iso_year_month(s: &str) -> Option<NaiveDate> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").unwrap());
    let c = RE.captures(s)?;
    ymd(&c[1], &c[2], "1")
}

fn year_only(s: &str) -> Option<NaiveDate> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());
    let c = RE.captures(s)?;
    ymd(&c[1], "1", "1")
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// English month names, abbreviated or in full. Anything else is rejected.
fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = name.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| *m == lower || (lower.len() == 3 && m.starts_with(&lower)))
        .or_else(|| (lower == "sept").then_some(8))
        .map(|i| i as u32 + 1)
}

/// Earliest day still considered recent: `today - window_days`, at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    cutoff: NaiveDate,
    today: NaiveDate,
}

impl Cutoff {
    /// Saturates at the earliest representable day for windows reaching past it.
    pub fn new(today: NaiveDate, window_days: u32) -> Self {
        let cutoff = today
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);
        Cutoff { cutoff, today }
    }

    pub fn date(&self) -> NaiveDate {
        self.cutoff
    }

    /// Inclusive lower bound.
    pub fn admits(&self, date: PublicationDate) -> bool {
        date.date() >= self.date()
    }

    /// Human-readable `cutoff ~ today` span.
    pub fn range(&self) -> String {
        format!(
            "{} ~ {}",
            self.cutoff.format("%Y-%m-%d"),
            self.today.format("%Y-%m-%d")
        )
    }
}
