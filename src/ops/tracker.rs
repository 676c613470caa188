use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::model::config::SuggestConfig;
use crate::model::payload::{Delta, DeltaPayload};
use crate::model::selection::{AddError, RemoveError, SelectionState};
use crate::model::session::FieldSnapshot;
use crate::model::tag::TagLabel;
use crate::ops::suggest::suggest_tags;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// Receives the selection after every change. Owns all presentation.
pub trait TagView {
    fn render(&mut self, selected: &[TagLabel], suggestions: &[TagLabel]);
}

impl<F> TagView for F
where
    F: FnMut(&[TagLabel], &[TagLabel]),
{
    fn render(&mut self, selected: &[TagLabel], suggestions: &[TagLabel]) {
        self(selected, suggestions)
    }
}

/// Transient user feedback (toasts, status lines, stderr)
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: NoticeKind);
}

impl<F> Notifier for F
where
    F: FnMut(&str, NoticeKind),
{
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        self(message, kind)
    }
}

/// Supplies the current form field values for suggestions
pub trait FieldSource {
    fn snapshot(&self) -> FieldSnapshot;
}

impl FieldSource for FieldSnapshot {
    fn snapshot(&self) -> FieldSnapshot {
        self.clone()
    }
}

/// Shared, mutable fields: the view layer keeps a handle and edits values
/// while the tracker reads them on each render.
impl FieldSource for Rc<RefCell<FieldSnapshot>> {
    fn snapshot(&self) -> FieldSnapshot {
        self.borrow().clone()
    }
}

/// Tracks the tag selection for one record during an edit session.
///
/// State changes go through [`SelectionState`]; after each successful change
/// the tracker renders through its [`TagView`] and reports through its
/// [`Notifier`]. A failed change reports once and leaves state and view
/// untouched.
pub struct TagSelectionTracker {
    state: SelectionState,
    config: SuggestConfig,
    view: Box<dyn TagView>,
    notifier: Box<dyn Notifier>,
    fields: Box<dyn FieldSource>,
}

impl TagSelectionTracker {
    /// Start an edit session on the record's persisted tags
    pub fn create<I>(
        original: I,
        view: impl TagView + 'static,
        notifier: impl Notifier + 'static,
        fields: impl FieldSource + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = TagLabel>,
    {
        Self::from_state(SelectionState::new(original), view, notifier, fields)
    }

    /// Resume a session from an existing state
    pub fn from_state(
        state: SelectionState,
        view: impl TagView + 'static,
        notifier: impl Notifier + 'static,
        fields: impl FieldSource + 'static,
    ) -> Self {
        TagSelectionTracker {
            state,
            config: SuggestConfig::default(),
            view: Box::new(view),
            notifier: Box::new(notifier),
            fields: Box::new(fields),
        }
    }

    pub fn with_config(mut self, config: SuggestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_tag(&mut self, raw: &str) -> Result<TagLabel, AddError> {
        match self.state.add(raw) {
            Ok(label) => {
                log::debug!("tag added: {} (selected: {})", label, self.state.selected().len());
                self.render();
                self.notifier
                    .notify(&format!("Added {}", label), NoticeKind::Success);
                Ok(label)
            }
            Err(e) => {
                log::info!("add rejected for {:?}: {}", raw, e);
                let kind = match e {
                    AddError::Empty => NoticeKind::Error,
                    AddError::Duplicate(_) => NoticeKind::Warning,
                };
                self.notifier.notify(&e.to_string(), kind);
                Err(e)
            }
        }
    }

    pub fn remove_tag(&mut self, label: &TagLabel) -> Result<(), RemoveError> {
        match self.state.remove(label) {
            Ok(()) => {
                log::debug!("tag removed: {} (selected: {})", label, self.state.selected().len());
                self.render();
                self.notifier
                    .notify(&format!("Removed {}", label), NoticeKind::Success);
                Ok(())
            }
            Err(e) => {
                log::info!("remove rejected: {}", e);
                self.notifier.notify(&e.to_string(), NoticeKind::Warning);
                Err(e)
            }
        }
    }

    /// Suggestions for an explicit field snapshot
    pub fn suggest_tags(&self, fields: &FieldSnapshot) -> Vec<TagLabel> {
        suggest_tags(fields, self.state.selected(), &self.config)
    }

    /// Suggestions for the injected field source
    pub fn suggestions(&self) -> Vec<TagLabel> {
        self.suggest_tags(&self.fields.snapshot())
    }

    /// Encode the selection and delta for the form's hidden field
    pub fn serialize_delta(&self) -> String {
        self.payload().encode()
    }

    pub fn payload(&self) -> DeltaPayload {
        self.state.to_payload()
    }

    /// Render the current state without changing it (initial paint)
    pub fn refresh(&mut self) {
        self.render();
    }

    pub fn selected(&self) -> &[TagLabel] {
        self.state.selected()
    }

    pub fn original(&self) -> &IndexSet<TagLabel> {
        self.state.original()
    }

    pub fn added(&self) -> &IndexSet<TagLabel> {
        self.state.added()
    }

    pub fn removed(&self) -> &IndexSet<TagLabel> {
        self.state.removed()
    }

    pub fn delta(&self) -> Delta {
        self.state.delta()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Hand the state over to the submission flow, ending the session
    pub fn into_state(self) -> SelectionState {
        self.state
    }

    fn render(&mut self) {
        let suggestions = self.suggestions();
        self.view.render(self.state.selected(), &suggestions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type Frames = Rc<RefCell<Vec<(Vec<String>, Vec<String>)>>>;
    type Notices = Rc<RefCell<Vec<(String, NoticeKind)>>>;

    fn label(s: &str) -> TagLabel {
        TagLabel::parse(s).unwrap()
    }

    fn strings(labels: &[TagLabel]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    fn tracker_with(
        original: &[&str],
        fields: Rc<RefCell<FieldSnapshot>>,
    ) -> (TagSelectionTracker, Frames, Notices) {
        let frames: Frames = Rc::default();
        let notices: Notices = Rc::default();
        let f = frames.clone();
        let n = notices.clone();
        let tracker = TagSelectionTracker::create(
            original.iter().map(|s| label(s)),
            move |selected: &[TagLabel], suggestions: &[TagLabel]| {
                f.borrow_mut().push((strings(selected), strings(suggestions)));
            },
            move |message: &str, kind: NoticeKind| {
                n.borrow_mut().push((message.to_string(), kind));
            },
            fields,
        );
        (tracker, frames, notices)
    }

    fn tracker(original: &[&str]) -> (TagSelectionTracker, Frames, Notices) {
        tracker_with(original, Rc::default())
    }

    #[test]
    fn test_add_renders_and_notifies() {
        let (mut t, frames, notices) = tracker(&["#growth"]);
        let added = t.add_tag("value").unwrap();
        assert_eq!(added, label("#value"));

        let frames = frames.borrow();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, vec!["#growth", "#value"]);
        assert_eq!(
            notices.borrow().as_slice(),
            &[("Added #value".to_string(), NoticeKind::Success)]
        );
    }

    #[test]
    fn test_failed_add_notifies_once_without_render() {
        let (mut t, frames, notices) = tracker(&["#growth"]);
        assert_eq!(t.add_tag("  "), Err(AddError::Empty));
        assert_eq!(t.add_tag("growth"), Err(AddError::Duplicate(label("#growth"))));

        assert!(frames.borrow().is_empty());
        let notices = notices.borrow();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].1, NoticeKind::Error);
        assert_eq!(notices[1], ("#growth is already selected".to_string(), NoticeKind::Warning));
        assert_eq!(t.selected(), &[label("#growth")]);
        assert!(!t.is_dirty());
    }

    #[test]
    fn test_remove_not_selected() {
        let (mut t, frames, notices) = tracker(&["#growth"]);
        assert_eq!(
            t.remove_tag(&label("#value")),
            Err(RemoveError::NotSelected(label("#value")))
        );
        assert!(frames.borrow().is_empty());
        assert_eq!(notices.borrow()[0].1, NoticeKind::Warning);
    }

    #[test]
    fn test_growth_value_scenario() {
        let (mut t, _frames, _notices) = tracker(&["#growth"]);
        t.add_tag("value").unwrap();
        assert_eq!(t.selected(), &[label("#growth"), label("#value")]);
        assert!(t.added().contains(&label("#value")));

        t.remove_tag(&label("#growth")).unwrap();
        assert_eq!(t.selected(), &[label("#value")]);
        assert!(t.removed().contains(&label("#growth")));

        let decoded = DeltaPayload::decode(&t.serialize_delta()).unwrap();
        assert_eq!(decoded.selected, vec![label("#value")]);
        assert_eq!(decoded.delta.added, vec![label("#value")]);
        assert_eq!(decoded.delta.removed, vec![label("#growth")]);
    }

    #[test]
    fn test_auto_prefix_on_empty_tracker() {
        let (mut t, _frames, _notices) = tracker(&[]);
        t.add_tag("7203").unwrap();
        assert_eq!(t.selected(), &[label("#7203")]);
    }

    #[test]
    fn test_render_includes_suggestions_from_fields() {
        let fields: Rc<RefCell<FieldSnapshot>> = Rc::default();
        let (mut t, frames, _notices) = tracker_with(&[], fields.clone());

        fields
            .borrow_mut()
            .insert("status".to_string(), "ARCHIVED".to_string());
        t.refresh();
        t.add_tag("#アーカイブ").unwrap();

        let frames = frames.borrow();
        assert_eq!(frames[0].1, vec!["#アーカイブ"]);
        // Once selected it is no longer suggested
        assert_eq!(frames[1].0, vec!["#アーカイブ"]);
        assert!(frames[1].1.is_empty());
    }

    #[test]
    fn test_suggest_tags_with_explicit_snapshot() {
        let (mut t, _frames, _notices) = tracker(&["#高配当"]);
        t.add_tag("#配当株").unwrap();
        let snapshot: FieldSnapshot = [("content".to_string(), "配当重視".to_string())]
            .into_iter()
            .collect();
        assert_eq!(t.suggest_tags(&snapshot), vec![label("#株主還元")]);
    }

    #[test]
    fn test_with_config_overrides_rules() {
        let config: SuggestConfig = toml::from_str(
            r##"
max_suggestions = 1

[keywords]
chip = ["#semis", "#hardware"]
"##,
        )
        .unwrap();
        let snapshot: FieldSnapshot = [("content".to_string(), "Chip makers".to_string())]
            .into_iter()
            .collect();
        let t = TagSelectionTracker::create(
            Vec::new(),
            |_: &[TagLabel], _: &[TagLabel]| {},
            |_: &str, _: NoticeKind| {},
            snapshot,
        )
        .with_config(config);
        assert_eq!(t.suggestions(), vec![label("#semis")]);
    }

    #[test]
    fn test_into_state_hands_over_delta() {
        let (mut t, _frames, _notices) = tracker(&["#a", "#b"]);
        t.remove_tag(&label("#a")).unwrap();
        t.add_tag("c").unwrap();
        let state = t.into_state();
        assert_eq!(state.delta().added, vec![label("#c")]);
        assert_eq!(state.delta().removed, vec![label("#a")]);
    }
}
