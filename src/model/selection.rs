use indexmap::IndexSet;

use crate::model::payload::{Delta, DeltaPayload, PayloadError};
use crate::model::tag::TagLabel;

/// Error type for adding a tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddError {
    #[error("tag is empty")]
    Empty,
    #[error("{0} is already selected")]
    Duplicate(TagLabel),
}

/// Error type for removing a tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    #[error("{0} is not selected")]
    NotSelected(TagLabel),
}

/// Selected tags for one record, plus the pending delta against the
/// record's persisted tags.
///
/// Invariants, held after every operation (successful or not):
/// - `added` and `removed` are disjoint
/// - `added` holds only labels outside `original`, `removed` only labels inside it
/// - `selected` holds exactly `(original - removed) + added`; labels added
///   during the session (including cancelled removals) go to the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    original: IndexSet<TagLabel>,
    selected: Vec<TagLabel>,
    added: IndexSet<TagLabel>,
    removed: IndexSet<TagLabel>,
}

impl SelectionState {
    /// Seed a state with the record's persisted tags. Duplicates are dropped,
    /// first occurrence wins.
    pub fn new<I>(original: I) -> Self
    where
        I: IntoIterator<Item = TagLabel>,
    {
        let original: IndexSet<TagLabel> = original.into_iter().collect();
        let selected = original.iter().cloned().collect();
        SelectionState {
            original,
            selected,
            added: IndexSet::new(),
            removed: IndexSet::new(),
        }
    }

    /// Rebuild a state from a previously serialized payload, checking it
    /// against the persisted baseline.
    pub fn from_payload<I>(original: I, payload: &DeltaPayload) -> Result<Self, PayloadError>
    where
        I: IntoIterator<Item = TagLabel>,
    {
        let mut state = SelectionState::new(original);

        let added = collect_unique(&payload.delta.added)?;
        let removed = collect_unique(&payload.delta.removed)?;
        for label in &added {
            if removed.contains(label) {
                return Err(PayloadError::Overlap(label.clone()));
            }
            if state.original.contains(label) {
                return Err(PayloadError::AddedPersisted(label.clone()));
            }
        }
        for label in &removed {
            if !state.original.contains(label) {
                return Err(PayloadError::RemovedUnknown(label.clone()));
            }
        }

        state.selected.retain(|l| !removed.contains(l));
        state.selected.extend(added.iter().cloned());
        state.added = added;
        state.removed = removed;

        // Content must agree; order of `selected` is taken from the payload.
        let expected: IndexSet<&TagLabel> = state.selected.iter().collect();
        let given = collect_unique(&payload.selected)?;
        if given.len() != expected.len() || !given.iter().all(|l| expected.contains(l)) {
            return Err(PayloadError::SelectionMismatch);
        }
        state.selected = given.into_iter().collect();
        Ok(state)
    }

    /// Add a raw tag. Trims, `#`-prefixes, rejects blanks and duplicates.
    ///
    /// Re-adding a tag that was removed this session cancels the removal.
    pub fn add(&mut self, raw: &str) -> Result<TagLabel, AddError> {
        let label = TagLabel::parse(raw).ok_or(AddError::Empty)?;
        if self.selected.contains(&label) {
            return Err(AddError::Duplicate(label));
        }
        self.selected.push(label.clone());
        if !self.removed.shift_remove(&label) {
            self.added.insert(label.clone());
        }
        Ok(label)
    }

    /// Remove a selected tag.
    ///
    /// Removing a tag that was added this session cancels the addition;
    /// it never enters `removed`.
    pub fn remove(&mut self, label: &TagLabel) -> Result<(), RemoveError> {
        let pos = self
            .selected
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| RemoveError::NotSelected(label.clone()))?;
        self.selected.remove(pos);
        if !self.added.shift_remove(label) {
            self.removed.insert(label.clone());
        }
        Ok(())
    }

    pub fn original(&self) -> &IndexSet<TagLabel> {
        &self.original
    }

    pub fn selected(&self) -> &[TagLabel] {
        &self.selected
    }

    pub fn added(&self) -> &IndexSet<TagLabel> {
        &self.added
    }

    pub fn removed(&self) -> &IndexSet<TagLabel> {
        &self.removed
    }

    pub fn is_selected(&self, label: &TagLabel) -> bool {
        self.selected.contains(label)
    }

    /// True when there is anything to submit
    pub fn is_dirty(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn delta(&self) -> Delta {
        Delta {
            added: self.added.iter().cloned().collect(),
            removed: self.removed.iter().cloned().collect(),
        }
    }

    pub fn to_payload(&self) -> DeltaPayload {
        DeltaPayload {
            selected: self.selected.clone(),
            delta: self.delta(),
        }
    }
}

fn collect_unique(labels: &[TagLabel]) -> Result<IndexSet<TagLabel>, PayloadError> {
    let mut set = IndexSet::with_capacity(labels.len());
    for label in labels {
        if !set.insert(label.clone()) {
            return Err(PayloadError::DuplicateLabel(label.clone()));
        }
    }
    Ok(set)
}
