use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::model::selection::SelectionState;
use crate::model::tag::TagLabel;
use crate::ops::tracker::{NoticeKind, Notifier, TagView};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RenderJson<'a> {
    pub selected: &'a [TagLabel],
    pub suggestions: &'a [TagLabel],
}

#[derive(Serialize)]
pub struct ShowJson {
    pub created: DateTime<Local>,
    pub selected: Vec<TagLabel>,
    pub added: Vec<TagLabel>,
    pub removed: Vec<TagLabel>,
    pub dirty: bool,
}

#[derive(Serialize)]
pub struct SubmitJson {
    pub payload: String,
    pub tags: Vec<TagLabel>,
}

pub fn show_to_json(state: &SelectionState, created: DateTime<Local>) -> ShowJson {
    ShowJson {
        created,
        selected: state.selected().to_vec(),
        added: state.added().iter().cloned().collect(),
        removed: state.removed().iter().cloned().collect(),
        dirty: state.is_dirty(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Space-separated labels, or `(none)`
pub fn format_tags<'a, I>(labels: I) -> String
where
    I: IntoIterator<Item = &'a TagLabel>,
{
    let joined = labels
        .into_iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

pub fn format_render(selected: &[TagLabel], suggestions: &[TagLabel]) -> String {
    format!(
        "selected:  {}\nsuggested: {}",
        format_tags(selected),
        format_tags(suggestions)
    )
}

pub fn format_show(state: &SelectionState) -> String {
    let mut out = format!("selected: {}", format_tags(state.selected()));
    if state.is_dirty() {
        if !state.added().is_empty() {
            out.push_str(&format!("\n  + {}", format_tags(state.added())));
        }
        if !state.removed().is_empty() {
            out.push_str(&format!("\n  - {}", format_tags(state.removed())));
        }
    } else {
        out.push_str("\n  (no changes)");
    }
    out
}

// ---------------------------------------------------------------------------
// Terminal collaborators
// ---------------------------------------------------------------------------

/// Renders the selection to stdout
pub struct StdoutView {
    pub json: bool,
}

impl TagView for StdoutView {
    fn render(&mut self, selected: &[TagLabel], suggestions: &[TagLabel]) {
        if self.json {
            let out = RenderJson {
                selected,
                suggestions,
            };
            match serde_json::to_string(&out) {
                Ok(s) => println!("{}", s),
                Err(e) => log::error!("could not encode render output: {}", e),
            }
        } else {
            println!("{}", format_render(selected, suggestions));
        }
    }
}

/// Prints notifications to stderr as `<kind>: <message>`
pub struct StderrNotifier {
    /// Drop info and success notices
    pub quiet: bool,
}

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        if self.quiet && matches!(kind, NoticeKind::Info | NoticeKind::Success) {
            return;
        }
        eprintln!("{}: {}", kind.as_str(), message);
    }
}

enum Pending {
    Render(Vec<TagLabel>, Vec<TagLabel>),
    Notice(String, NoticeKind),
}

/// Stands in for both the view and the notifier while a command runs, then
/// replays everything in order once the session is safely on disk.
///
/// Clones share one queue, so the same `Deferred` can be handed to the
/// tracker twice.
#[derive(Clone, Default)]
pub struct Deferred {
    queue: Rc<RefCell<Vec<Pending>>>,
}

impl Deferred {
    pub fn flush(&self, view: &mut dyn TagView, notifier: &mut dyn Notifier) {
        let pending = std::mem::take(&mut *self.queue.borrow_mut());
        for item in pending {
            match item {
                Pending::Render(selected, suggestions) => view.render(&selected, &suggestions),
                Pending::Notice(message, kind) => notifier.notify(&message, kind),
            }
        }
    }
}

impl TagView for Deferred {
    fn render(&mut self, selected: &[TagLabel], suggestions: &[TagLabel]) {
        self.queue
            .borrow_mut()
            .push(Pending::Render(selected.to_vec(), suggestions.to_vec()));
    }
}

impl Notifier for Deferred {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        self.queue
            .borrow_mut()
            .push(Pending::Notice(message.to_string(), kind));
    }
}
