//! Persisted record types: the countdown configuration and the quote pool.

use crate::error::{ClockError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Calendar date format used on disk and in settings input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Startup quote shown before the first rotation. Not a pool member.
pub const DEFAULT_QUOTE: &str = "Anicca|Change, Dukkha|Suffering, Anatta|Non-Self, \
Sati|Mindfulness, Equanimity|Observation, Sila|Morality, Samadhi|Concentration.";

/// Built-in seed list written when the quote file is missing or corrupt.
pub const SEED_QUOTES: [&str; 3] = [
    "Anicca (Impermanence): This is the fundamental teaching that everything is constantly \
changing, in a perpetual state of flux.",
    "Dukkha (Suffering/Unsatisfactoriness): Often translated as 'suffering,' dukkha encompasses \
a broader sense of unsatisfactoriness, dis-ease, or inherent instability in conditioned existence.",
    "Anatta (Non-Self): This teaching asserts that there is no permanent, unchanging 'self' or \
'soul.'",
];

/// The single persisted countdown record.
///
/// Every field is required on disk. A record missing any field fails to
/// deserialize and is replaced wholesale by [`ClockConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Birth date the life countdown is measured from.
    pub birth_date: NaiveDate,
    /// Life expectancy in years (must be positive).
    pub life_expectancy_years: u32,
    /// Label of the themed countdown.
    pub theme_name: String,
    /// Date the themed countdown ends (midnight local time).
    pub theme_end_date: NaiveDate,
    /// Last calendar day the daily rotation fired. Persisted as `""` when unset.
    #[serde(with = "optional_date")]
    pub last_quote_update: Option<NaiveDate>,
    /// Quote currently displayed.
    pub current_quote: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            life_expectancy_years: 80,
            theme_name: "Next Vacation".to_owned(),
            theme_end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            last_quote_update: None,
            current_quote: DEFAULT_QUOTE.to_owned(),
        }
    }
}

impl ClockConfig {
    /// Semantic checks serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidSettingsInput`] when the life expectancy is zero.
    pub fn validate(&self) -> Result<()> {
        if self.life_expectancy_years == 0 {
            return Err(ClockError::InvalidSettingsInput(
                "life_expectancy_years must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Ordered, immutable list of candidate quotes.
///
/// Cloning is cheap; every clone shares the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePool(Arc<[String]>);

impl QuotePool {
    /// Build a pool from owned quotes.
    pub fn new(quotes: Vec<String>) -> Self {
        Self(quotes.into())
    }

    /// The built-in seed pool.
    pub fn seed() -> Self {
        Self::new(SEED_QUOTES.iter().map(|q| (*q).to_owned()).collect())
    }

    /// Quotes in their persisted order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the pool has no quotes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `quote` is one of the pool entries.
    pub fn contains(&self, quote: &str) -> bool {
        self.0.iter().any(|q| q == quote)
    }
}

impl From<Vec<String>> for QuotePool {
    fn from(quotes: Vec<String>) -> Self {
        Self::new(quotes)
    }
}

/// Serde adapter for `Option<NaiveDate>` stored as `"YYYY-MM-DD"` or `""`.
mod optional_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
