//! Date extraction from snippets and normalization to `DD MonthName YYYY`.
//!
//! Both stages are ordered rule lists evaluated first-match-wins, so a new
//! date shape is added by appending a pattern or a rule rather than by
//! touching the aggregation code.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Output format of every recognized date.
pub const CANONICAL_FORMAT: &str = "%d %B %Y";

const DAY_MONTH_YEAR: &str = r"\b\d{1,2} [A-Za-z]+ \d{4}\b";
const ISO_TIMESTAMP: &str =
    r"\b\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+\-]\d{2}:\d{2})\b";
const MONTH_DAY_YEAR: &str = r"\b[A-Za-z]{3} \d{1,2}, \d{4}\b";

#[allow(clippy::expect_used)]
static BUILTIN_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    [
        ("day-month-year", DAY_MONTH_YEAR),
        ("iso-8601", ISO_TIMESTAMP),
        ("month-day-year", MONTH_DAY_YEAR),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        DatePattern::new(name, pattern).expect("built-in date pattern compiles")
    })
    .collect()
});

#[allow(clippy::expect_used)]
static DAY_MONTH_YEAR_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DAY_MONTH_YEAR}")).expect("built-in date pattern compiles")
});

#[allow(clippy::expect_used)]
static DAY_MONTH_YEAR_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}) ([A-Za-z]+) (\d{4})$").expect("built-in date pattern compiles")
});

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

/// A named regular expression that locates a date inside free text.
#[derive(Debug, Clone)]
pub struct DatePattern {
    name: String,
    regex: Regex,
}

impl DatePattern {
    /// Compiles a pattern.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    /// The pattern name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leftmost match in `text`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// Result of running the extractor over a snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateExtraction {
    /// The matched date text, empty when nothing matched.
    pub date: String,
    /// The snippet with the date removed.
    pub snippet: String,
}

impl DateExtraction {
    /// Whether a date was found.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.date.is_empty()
    }
}

/// Pulls the first recognizable date out of a snippet.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    patterns: Vec<DatePattern>,
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self {
            patterns: BUILTIN_PATTERNS.clone(),
        }
    }
}

impl DateExtractor {
    /// Creates an extractor with the built-in patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pattern, tried after the existing ones.
    #[must_use]
    pub fn with_pattern(mut self, pattern: DatePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Pattern names in priority order.
    pub fn pattern_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(DatePattern::name)
    }

    /// Finds a date and strips every occurrence of it from the snippet.
    ///
    /// Patterns are tried in order; the first one matching anywhere wins and
    /// its leftmost match is taken. The cleaned snippet is trimmed. With no
    /// match the snippet is returned untouched.
    #[must_use]
    pub fn extract(&self, snippet: &str) -> DateExtraction {
        for pattern in &self.patterns {
            if let Some(date) = pattern.find(snippet) {
                return DateExtraction {
                    date: date.to_string(),
                    snippet: snippet.replace(date, "").trim().to_string(),
                };
            }
        }
        DateExtraction {
            date: String::new(),
            snippet: snippet.to_string(),
        }
    }
}

/// A formatting rule: inputs it claims and how to read a date from them.
#[derive(Debug, Clone, Copy)]
pub struct DateRule {
    /// Rule name.
    pub name: &'static str,
    /// Whether the rule claims this input.
    pub applies: fn(&str) -> bool,
    /// Reads the calendar date, `None` when the text does not parse.
    pub parse: fn(&str) -> Option<NaiveDate>,
}

/// Normalizes recognized dates to [`CANONICAL_FORMAT`].
///
/// The first rule that claims an input decides the outcome. Unclaimed or
/// unparseable input comes back unchanged.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    rules: Vec<DateRule>,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            rules: vec![
                DateRule {
                    name: "iso-8601",
                    applies: |text| text.contains('T'),
                    parse: parse_iso_date,
                },
                DateRule {
                    name: "day-month-year",
                    applies: |text| DAY_MONTH_YEAR_PREFIX.is_match(text),
                    parse: parse_day_month_year,
                },
            ],
        }
    }
}

impl DateFormatter {
    /// Creates a formatter with the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, consulted after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: DateRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Formats `date`, falling back to the input on any failure.
    #[must_use]
    pub fn format(&self, date: &str) -> String {
        let Some(rule) = self.rules.iter().find(|rule| (rule.applies)(date)) else {
            return date.to_string();
        };
        match (rule.parse)(date) {
            Some(parsed) => parsed.format(CANONICAL_FORMAT).to_string(),
            None => {
                tracing::trace!(rule = rule.name, input = date, "date left unformatted");
                date.to_string()
            }
        }
    }
}

/// Reads the date part of an ISO-8601 timestamp; `Z` means `+00:00`.
///
/// The date is taken in the timestamp's own offset, not converted to UTC.
#[must_use]
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().replace('Z', "+00:00");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"] {
        if let Ok(dt) = DateTime::parse_from_str(&text, format) {
            return Some(dt.date_naive());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(dt.date());
        }
    }
    None
}

/// Reads `D(D) MonthName YYYY` with a full, case-insensitive English month name.
#[must_use]
pub fn parse_day_month_year(text: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH_YEAR_PARTS.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month_name = caps[2].to_ascii_lowercase();
    let month = MONTHS.iter().position(|m| *m == month_name)?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, u32::try_from(month + 1).ok()?, day)
}
