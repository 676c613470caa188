use serde::{Deserialize, Serialize};

use crate::model::tag::TagLabel;

/// Pending changes against the persisted tag set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Labels to attach (in the order they were added)
    #[serde(default)]
    pub added: Vec<TagLabel>,
    /// Labels to detach (in the order they were removed)
    #[serde(default)]
    pub removed: Vec<TagLabel>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The form submission payload: `{"selected": [..], "delta": {"added": [..], "removed": [..]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaPayload {
    pub selected: Vec<TagLabel>,
    #[serde(default)]
    pub delta: Delta,
}

/// Error type for decoding and validating a payload
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{0} is both added and removed")]
    Overlap(TagLabel),
    #[error("{0} is marked added but is already persisted")]
    AddedPersisted(TagLabel),
    #[error("{0} is marked removed but was never persisted")]
    RemovedUnknown(TagLabel),
    #[error("{0} appears more than once")]
    DuplicateLabel(TagLabel),
    #[error("selected tags do not match the persisted tags plus the delta")]
    SelectionMismatch,
}

impl DeltaPayload {
    /// Encode as compact JSON for the hidden form field
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("payload is plain string lists")
    }

    pub fn decode(s: &str) -> Result<DeltaPayload, PayloadError> {
        Ok(serde_json::from_str(s)?)
    }
}
