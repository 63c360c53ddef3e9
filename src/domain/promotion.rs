//! Core promotion entities shared across the scraping pipeline
//!
//! A `RawCandidate` is what the collector pulls off the page; a `Promotion`
//! is the durable, typed record the parser produces from it. Identity of a
//! promotion is a pure function of `(airline, bonus, valid_until)` so that
//! differently-worded announcements of the same offer collapse to one id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One transfer partner from the fixed set Livelo announces promotions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Airline {
    #[serde(rename = "LATAM")]
    Latam,
    Azul,
    Smiles,
    #[serde(rename = "Flying Blue")]
    FlyingBlue,
    United,
    #[serde(rename = "TAP")]
    Tap,
    Iberia,
    #[serde(rename = "British Airways")]
    BritishAirways,
    Aeromexico,
    Etihad,
    /// Candidate text matched no partner keyword. Records carrying this
    /// value are filtered out before persistence.
    Unresolved,
}

impl Airline {
    /// Display name as it appears in stored documents and notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Latam => "LATAM",
            Self::Azul => "Azul",
            Self::Smiles => "Smiles",
            Self::FlyingBlue => "Flying Blue",
            Self::United => "United",
            Self::Tap => "TAP",
            Self::Iberia => "Iberia",
            Self::BritishAirways => "British Airways",
            Self::Aeromexico => "Aeromexico",
            Self::Etihad => "Etihad",
            Self::Unresolved => "Unresolved",
        }
    }

    /// Lowercased, hyphen-joined form used as the leading id segment
    /// (e.g. "Flying Blue" -> "flying-blue").
    pub fn id_slug(&self) -> String {
        self.display_name()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl std::fmt::Display for Airline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raw text triple scraped from the page, not yet known to describe a
/// real promotion. Transient: produced by the collector, consumed by the
/// parser, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub title: String,
    pub description: String,
    /// Resolved absolute URL; may be empty when the element had no link.
    pub link: String,
}

impl RawCandidate {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
        }
    }
}

/// A parsed transfer-bonus promotion as observed during one scrape cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Deterministic identity derived from `(airline, bonus, valid_until)`.
    /// Title/description/link differences never change the id.
    pub id: String,
    pub airline: Airline,
    #[serde(rename = "bonusPercentage")]
    pub bonus_percentage: Option<u32>,
    /// `None` means "ongoing / no stated expiry".
    #[serde(rename = "validUntil")]
    pub valid_until: Option<NaiveDate>,
    #[serde(rename = "minimumPoints")]
    pub minimum_points: Option<u64>,
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "scrapedAt")]
    pub scraped_at: DateTime<Utc>,
}

impl Promotion {
    /// Build the deterministic id for a `(airline, bonus, valid_until)`
    /// triple: `<airline-slug>-<bonus|0>-<ISO date|"ongoing">`.
    pub fn identity(
        airline: Airline,
        bonus_percentage: Option<u32>,
        valid_until: Option<NaiveDate>,
    ) -> String {
        let date_segment = valid_until
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "ongoing".to_string());
        format!(
            "{}-{}-{}",
            airline.id_slug(),
            bonus_percentage.unwrap_or(0),
            date_segment
        )
    }

    /// A promotion with no stated expiry is treated as ongoing; otherwise
    /// it is valid while the expiry date has not passed.
    pub fn is_valid(&self, today: NaiveDate) -> bool {
        match self.valid_until {
            Some(expiry) => expiry > today,
            None => true,
        }
    }
}

/// Retain only promotions still valid as of `today`.
pub fn filter_valid(promotions: &[Promotion], today: NaiveDate) -> Vec<Promotion> {
    promotions
        .iter()
        .filter(|p| p.is_valid(today))
        .cloned()
        .collect()
}
