//! Prediction submission form.

use crate::model::PredictionDraft;

/// Fields of the submission form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitField {
    #[default]
    Stock,
    TargetPrice,
    Timeframe,
    Confidence,
    Reasoning,
}

impl SubmitField {
    pub const ALL: [SubmitField; 5] = [
        Self::Stock,
        Self::TargetPrice,
        Self::Timeframe,
        Self::Confidence,
        Self::Reasoning,
    ];

    /// Field label; required fields carry a star.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stock => "Stock Symbol *",
            Self::TargetPrice => "Target Price ($) *",
            Self::Timeframe => "Timeframe",
            Self::Confidence => "Confidence Level",
            Self::Reasoning => "Reasoning *",
        }
    }

    /// Whether the field is a fixed choice rather than free text.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Timeframe | Self::Confidence)
    }
}

/// Ephemeral edit state for a new prediction.
#[derive(Debug, Default)]
pub struct SubmitForm {
    pub draft: PredictionDraft,
    pub focus: SubmitField,
    /// Whether a submission is in flight.
    pub submitting: bool,
}

impl SubmitForm {
    /// Back to defaults: empty fields, 3 months, medium confidence.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move focus by `delta` fields, wrapping around.
    pub fn move_focus(&mut self, delta: i32) {
        let len = SubmitField::ALL.len() as i32;
        let index = SubmitField::ALL
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as i32;
        self.focus = SubmitField::ALL[(index + delta).rem_euclid(len) as usize];
    }

    /// Type a character into the focused text field.
    pub fn push_char(&mut self, c: char) {
        if self.submitting {
            return;
        }
        if let Some(field) = self.focused_text_mut() {
            field.push(c);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn pop_char(&mut self) {
        if self.submitting {
            return;
        }
        if let Some(field) = self.focused_text_mut() {
            field.pop();
        }
    }

    /// Cycle the focused choice field.
    pub fn cycle_option(&mut self, delta: i32) {
        if self.submitting {
            return;
        }
        match self.focus {
            SubmitField::Timeframe => self.draft.timeframe = self.draft.timeframe.cycle(delta),
            SubmitField::Confidence => self.draft.confidence = self.draft.confidence.cycle(delta),
            _ => {}
        }
    }

    /// Text shown for a field.
    pub fn value(&self, field: SubmitField) -> String {
        match field {
            SubmitField::Stock => self.draft.stock.clone(),
            SubmitField::TargetPrice => self.draft.target_price.clone(),
            SubmitField::Timeframe => self.draft.timeframe.to_string(),
            SubmitField::Confidence => self.draft.confidence.to_string(),
            SubmitField::Reasoning => self.draft.reasoning.clone(),
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SubmitField::Stock => Some(&mut self.draft.stock),
            SubmitField::TargetPrice => Some(&mut self.draft.target_price),
            SubmitField::Reasoning => Some(&mut self.draft.reasoning),
            SubmitField::Timeframe | SubmitField::Confidence => None,
        }
    }
}
