//! Analyst profiles.

use crate::backend::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding one profile per identity.
pub const USERS: &str = "users";

/// Specialties offered on sign-up.
pub const SPECIALTIES: [&str; 10] = [
    "Technology Stocks",
    "Healthcare & Biotech",
    "Financial Services",
    "Energy & Utilities",
    "Consumer Goods",
    "Real Estate",
    "Cryptocurrency",
    "International Markets",
    "Small Cap Stocks",
    "ESG Investing",
];

/// Track-record statistics embedded in a profile.
///
/// Only `total_predictions` is ever changed by this application. The
/// remaining fields are maintained elsewhere and shown as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalystStats {
    pub total_predictions: u32,
    pub correct_predictions: u32,
    /// Percentage, 0-100.
    pub accuracy: f64,
    /// Average return, percent.
    pub avg_return: f64,
    pub rating: f64,
    pub followers: u32,
    pub following: u32,
}

/// A user's public profile, keyed by identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Empty when no specialty was chosen.
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(
        default = "Utc::now",
        with = "chrono::serde::ts_microseconds"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: AnalystStats,
}

impl UserProfile {
    /// A fresh profile with every statistic at zero.
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
            specialty: specialty.into(),
            bio: String::new(),
            profile_image: String::new(),
            verified: false,
            created_at: Utc::now(),
            stats: AnalystStats::default(),
        }
    }

    /// Decode a profile document. The document id wins over a missing uid.
    pub fn from_document(doc: &Document) -> crate::Result<Self> {
        let mut profile: Self = doc.decode()?;
        if profile.uid.is_empty() {
            profile.uid = doc.id.clone();
        }
        Ok(profile)
    }

    /// Specialty, or `None` when unset.
    pub fn specialty(&self) -> Option<&str> {
        Some(self.specialty.as_str()).filter(|s| !s.is_empty())
    }
}
