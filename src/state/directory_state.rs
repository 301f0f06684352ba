//! Analyst directory and prediction list state.

use crate::model::{PredictionView, UserProfile};
use chrono::{DateTime, Utc};

/// State for the analyst directory tab.
#[derive(Debug, Default)]
pub struct AnalystState {
    /// Latest published list, best first.
    pub analysts: Vec<UserProfile>,
    /// Currently selected row.
    pub selected_index: Option<usize>,
    /// Whether the first snapshot is still pending.
    pub loading: bool,
    /// When the last snapshot arrived.
    pub last_updated: Option<DateTime<Utc>>,
}

impl AnalystState {
    /// Replace the list with a new snapshot.
    pub fn replace(&mut self, analysts: Vec<UserProfile>) {
        self.analysts = analysts;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.selected_index = clamp_selection(self.selected_index, self.analysts.len());
    }

    /// Get the currently selected analyst.
    pub fn selected(&self) -> Option<&UserProfile> {
        self.selected_index.and_then(|i| self.analysts.get(i))
    }
}

/// State for the prediction list tab.
#[derive(Debug, Default)]
pub struct PredictionState {
    /// Latest published list, newest first.
    pub predictions: Vec<PredictionView>,
    /// Currently selected row.
    pub selected_index: Option<usize>,
    /// Whether the first snapshot is still pending.
    pub loading: bool,
    /// When the last snapshot arrived.
    pub last_updated: Option<DateTime<Utc>>,
}

impl PredictionState {
    /// Replace the list with a new snapshot.
    pub fn replace(&mut self, predictions: Vec<PredictionView>) {
        self.predictions = predictions;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.selected_index = clamp_selection(self.selected_index, self.predictions.len());
    }

    /// Get the currently selected prediction.
    pub fn selected(&self) -> Option<&PredictionView> {
        self.selected_index.and_then(|i| self.predictions.get(i))
    }
}

fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> UserProfile {
        UserProfile::new(id, id, "", "")
    }

    #[test]
    fn test_replace_clamps_selection() {
        let mut state = AnalystState {
            loading: true,
            ..Default::default()
        };
        state.replace(vec![profile("a"), profile("b"), profile("c")]);
        assert_eq!(state.selected_index, Some(0));
        assert!(!state.loading);

        state.selected_index = Some(2);
        state.replace(vec![profile("a")]);
        assert_eq!(state.selected().map(|p| p.uid.as_str()), Some("a"));

        state.replace(Vec::new());
        assert_eq!(state.selected_index, None);
    }
}
