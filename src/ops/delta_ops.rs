use crate::model::payload::Delta;
use crate::model::tag::TagLabel;

/// Apply a submitted delta to a record's persisted tags.
///
/// `removed` labels are detached from the record, `added` labels are
/// attached (appended when absent), anything in neither list is left as is.
/// Labels are only detached from this record, never deleted globally.
pub fn apply_delta(persisted: &[TagLabel], delta: &Delta) -> Vec<TagLabel> {
    let mut result: Vec<TagLabel> = Vec::with_capacity(persisted.len() + delta.added.len());
    for label in persisted {
        if !delta.removed.contains(label) && !result.contains(label) {
            result.push(label.clone());
        }
    }
    for label in &delta.added {
        if !result.contains(label) {
            result.push(label.clone());
        }
    }
    log::debug!(
        "applied delta (+{} -{}): {} -> {} tags",
        delta.added.len(),
        delta.removed.len(),
        persisted.len(),
        result.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(items: &[&str]) -> Vec<TagLabel> {
        items.iter().map(|s| TagLabel::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_apply_adds_and_removes() {
        let persisted = labels(&["#growth", "#tech"]);
        let delta = Delta {
            added: labels(&["#value"]),
            removed: labels(&["#growth"]),
        };
        assert_eq!(apply_delta(&persisted, &delta), labels(&["#tech", "#value"]));
    }

    #[test]
    fn test_apply_leaves_untouched_labels() {
        let persisted = labels(&["#a", "#b", "#c"]);
        let delta = Delta {
            added: vec![],
            removed: labels(&["#b"]),
        };
        assert_eq!(apply_delta(&persisted, &delta), labels(&["#a", "#c"]));
    }

    #[test]
    fn test_apply_is_tolerant_of_stale_baseline() {
        // Server already has `#value` attached and never had `#gone`
        let persisted = labels(&["#value", "#keep"]);
        let delta = Delta {
            added: labels(&["#value"]),
            removed: labels(&["#gone"]),
        };
        assert_eq!(apply_delta(&persisted, &delta), labels(&["#value", "#keep"]));
    }

    #[test]
    fn test_apply_empty_delta_is_identity() {
        let persisted = labels(&["#a", "#b"]);
        assert_eq!(apply_delta(&persisted, &Delta::default()), persisted);
    }
}
