//! Domain records stored in the document store.

mod prediction;
mod profile;

pub use prediction::{
    Confidence, NewPrediction, PREDICTIONS, Prediction, PredictionDraft, PredictionStatus,
    PredictionView, Timeframe, UNKNOWN_ANALYST,
};
pub use profile::{AnalystStats, SPECIALTIES, USERS, UserProfile};
