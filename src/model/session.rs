use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::payload::{DeltaPayload, PayloadError};
use super::selection::SelectionState;
use super::tag::TagLabel;

/// Form field values keyed by field name. Ordered by key so that anything
/// derived from "all values" is reproducible.
pub type FieldSnapshot = BTreeMap<String, String>;

/// An in-progress edit session (written to .tagdelta.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// When the session was opened
    pub created: DateTime<Local>,
    /// The record's persisted tags at the time the session was opened
    pub original: Vec<TagLabel>,
    /// Current selection and delta
    pub payload: DeltaPayload,
    /// Form fields feeding tag suggestions
    #[serde(default)]
    pub fields: FieldSnapshot,
}

impl Session {
    /// Open a fresh session on the given persisted tags
    pub fn open(original: Vec<TagLabel>) -> Self {
        let state = SelectionState::new(original);
        Session {
            created: Local::now(),
            original: state.original().iter().cloned().collect(),
            payload: state.to_payload(),
            fields: FieldSnapshot::new(),
        }
    }

    /// Restore the selection state, validating the stored payload
    pub fn state(&self) -> Result<SelectionState, PayloadError> {
        SelectionState::from_payload(self.original.iter().cloned(), &self.payload)
    }

    /// Store a state's payload back into the session
    pub fn update(&mut self, state: &SelectionState) {
        self.payload = state.to_payload();
    }
}
