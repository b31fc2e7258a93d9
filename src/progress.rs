//! Progress bubbles.
//!
//! One numbered, clickable bubble per task, padded with blank inert slots to
//! a minimum of [`MIN_BUBBLES`].

use serde::Serialize;

pub const MIN_BUBBLES: usize = 6;

/// One indicator slot in the bubble row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    pub slot: usize,
    /// Task index opened by this bubble. `None` for padding slots.
    pub task: Option<usize>,
}

impl Bubble {
    pub fn is_clickable(&self) -> bool {
        self.task.is_some()
    }

    /// The visible number, 1-based. Blank for padding slots.
    pub fn label(&self) -> String {
        self.task.map(|i| (i + 1).to_string()).unwrap_or_default()
    }
}

pub fn bubbles(count: usize) -> Vec<Bubble> {
    (0..count.max(MIN_BUBBLES))
        .map(|slot| Bubble { slot, task: (slot < count).then_some(slot) })
        .collect()
}

/// `"<opened>/<count>"`, with `0` before any task has been opened.
pub fn progress_label(current: Option<usize>, count: usize) -> String {
    let opened = current.map_or(0, |i| i + 1);
    format!("{opened}/{count}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 6)]
    #[case(1, 6)]
    #[case(6, 6)]
    #[case(7, 7)]
    #[case(20, 20)]
    fn test_slot_count_and_clickable_prefix(#[case] count: usize, #[case] slots: usize) {
        let row = bubbles(count);
        assert_eq!(row.len(), slots);
        assert_eq!(row.iter().filter(|b| b.is_clickable()).count(), count);
        assert!(row.iter().take(count).all(Bubble::is_clickable));
        assert!(row.iter().skip(count).all(|b| !b.is_clickable() && b.label().is_empty()));
    }

    #[test]
    fn test_labels_are_one_based() {
        let labels: Vec<_> = bubbles(3).iter().map(Bubble::label).collect();
        assert_eq!(labels, ["1", "2", "3", "", "", ""]);
    }

    #[test]
    fn test_progress_label() {
        assert_eq!(progress_label(None, 4), "0/4");
        assert_eq!(progress_label(Some(0), 4), "1/4");
        assert_eq!(progress_label(Some(3), 4), "4/4");
        assert_eq!(progress_label(None, 0), "0/0");
    }
}
