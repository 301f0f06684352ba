//! Price-target predictions.

use super::profile::UserProfile;
use crate::backend::Document;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Collection holding every prediction.
pub const PREDICTIONS: &str = "predictions";

/// Label used when a prediction's author cannot be resolved.
pub const UNKNOWN_ANALYST: &str = "Unknown Analyst";

/// How far out a price target is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1 month")]
    OneMonth,
    #[default]
    #[serde(rename = "3 months")]
    ThreeMonths,
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
    ];

    /// The next option, wrapping around.
    pub fn cycle(self, delta: i32) -> Self {
        cycle(&Self::ALL, self, delta)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneMonth => write!(f, "1 month"),
            Self::ThreeMonths => write!(f, "3 months"),
            Self::SixMonths => write!(f, "6 months"),
            Self::OneYear => write!(f, "1 year"),
        }
    }
}

/// How sure the analyst is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Self::Low, Self::Medium, Self::High];

    /// The next option, wrapping around.
    pub fn cycle(self, delta: i32) -> Self {
        cycle(&Self::ALL, self, delta)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, delta: i32) -> T {
    let len = options.len() as i32;
    let index = options.iter().position(|o| *o == current).unwrap_or(0) as i32;
    options[(index + delta).rem_euclid(len) as usize]
}

/// Lifecycle of a prediction.
///
/// Predictions are always created `Active`; any later status is set by
/// whatever resolves them outside this application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    #[default]
    Active,
    Correct,
    Incorrect,
    Expired,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
            Self::Expired => write!(f, "expired"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A stored prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Document id; not part of the stored body.
    #[serde(skip)]
    pub id: String,
    pub user_id: String,
    /// Ticker, always uppercase.
    pub stock: String,
    /// Placeholder price sampled at submission, not a market quote.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_price: Decimal,
    pub timeframe: Timeframe,
    pub reasoning: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub status: PredictionStatus,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub likes: u32,
    #[serde(
        default = "Utc::now",
        with = "chrono::serde::ts_microseconds"
    )]
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    /// Build a new active record from a validated draft.
    pub fn new(
        user_id: impl Into<String>,
        draft: NewPrediction,
        current_price: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            stock: draft.stock,
            current_price,
            target_price: draft.target_price,
            timeframe: draft.timeframe,
            reasoning: draft.reasoning,
            confidence: draft.confidence,
            status: PredictionStatus::Active,
            views: 0,
            likes: 0,
            created_at,
        }
    }

    /// Decode a prediction document.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let mut prediction: Self = doc.decode()?;
        prediction.id = doc.id.clone();
        Ok(prediction)
    }

    /// Implied move from the current price to the target, in percent.
    pub fn upside_percent(&self) -> Decimal {
        if self.current_price.is_zero() {
            Decimal::ZERO
        } else {
            (self.target_price - self.current_price) / self.current_price * Decimal::ONE_HUNDRED
        }
    }
}

/// A prediction joined with its author's display fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub prediction: Prediction,
    pub analyst: String,
    pub analyst_specialty: String,
    pub analyst_rating: f64,
}

impl PredictionView {
    /// Join a prediction with its author, if the author is known.
    pub fn join(prediction: Prediction, author: Option<&UserProfile>) -> Self {
        match author {
            Some(profile) => Self {
                prediction,
                analyst: if profile.name.is_empty() {
                    UNKNOWN_ANALYST.to_string()
                } else {
                    profile.name.clone()
                },
                analyst_specialty: profile.specialty.clone(),
                analyst_rating: profile.stats.rating,
            },
            None => Self::unknown_author(prediction),
        }
    }

    /// The fallback used when the author lookup fails or finds nothing.
    pub fn unknown_author(prediction: Prediction) -> Self {
        Self {
            prediction,
            analyst: UNKNOWN_ANALYST.to_string(),
            analyst_specialty: String::new(),
            analyst_rating: 0.0,
        }
    }
}

/// A validated submission, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub stock: String,
    pub target_price: Decimal,
    pub timeframe: Timeframe,
    pub reasoning: String,
    pub confidence: Confidence,
}

/// Raw submission form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionDraft {
    pub stock: String,
    pub target_price: String,
    pub timeframe: Timeframe,
    pub reasoning: String,
    pub confidence: Confidence,
}

impl PredictionDraft {
    /// Check required fields and normalize the input.
    ///
    /// The symbol is trimmed and uppercased; the target price must parse as
    /// a decimal number.
    pub fn validate(&self) -> Result<NewPrediction> {
        let stock = self.stock.trim();
        let target = self.target_price.trim();
        let reasoning = self.reasoning.trim();
        if stock.is_empty() || target.is_empty() || reasoning.is_empty() {
            return Err(Error::validation("Please fill in all required fields"));
        }

        let target_price = Decimal::from_str(target)
            .or_else(|_| Decimal::from_scientific(target))
            .map_err(|_| Error::validation("Target price must be a number"))?;

        Ok(NewPrediction {
            stock: stock.to_uppercase(),
            target_price,
            timeframe: self.timeframe,
            reasoning: reasoning.to_string(),
            confidence: self.confidence,
        })
    }
}
