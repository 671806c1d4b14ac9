/// The past/present/future triple and its linear undo/redo moves.
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Undo/redo history over values of type `T`.
///
/// `past` is ordered oldest first; `future` is ordered nearest-undo first.
/// Serializes as `{"past": [..], "present": .., "future": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline<T> {
    pub past: Vec<T>,
    pub present: T,
    pub future: VecDeque<T>,
}

impl<T> Timeline<T> {
    /// Creates a timeline holding only `present`.
    pub fn new(present: T) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: VecDeque::new(),
        }
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Records `value` as the new present. Always drops the redo branch.
    pub fn set(&mut self, value: T) {
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push(previous);
        self.future.clear();
    }

    /// Steps back one entry. Returns `false` when `past` is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Steps forward one entry. Returns `false` when `future` is empty.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    /// Replaces everything with a fresh timeline holding `present`.
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    /// Drops the oldest `past` entries beyond `max_depth`.
    ///
    /// Returns the number of entries dropped.
    pub fn truncate_past(&mut self, max_depth: usize) -> usize {
        let excess = self.past.len().saturating_sub(max_depth);
        if excess > 0 {
            self.past.drain(..excess);
        }
        excess
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(t: &Timeline<i32>) -> (Vec<i32>, i32, Vec<i32>) {
        (t.past.clone(), t.present, t.future.iter().copied().collect())
    }

    #[test]
    fn test_new_is_empty() {
        let t = Timeline::new(0);
        assert!(!t.can_undo());
        assert!(!t.can_redo());
        assert_eq!(triple(&t), (vec![], 0, vec![]));
    }

    #[test]
    fn test_set_pushes_present() {
        let mut t = Timeline::new(0);
        t.set(1);
        t.set(2);
        assert_eq!(triple(&t), (vec![0, 1], 2, vec![]));
    }

    #[test]
    fn test_undo_moves_present_to_front_of_future() {
        let mut t = Timeline::new(0);
        t.set(1);
        t.set(2);
        assert!(t.undo());
        assert_eq!(triple(&t), (vec![0], 1, vec![2]));
        assert!(t.undo());
        assert_eq!(triple(&t), (vec![], 0, vec![1, 2]));
    }

    #[test]
    fn test_redo_inverts_undo() {
        let mut t = Timeline::new(0);
        t.set(1);
        t.set(2);
        t.undo();
        let before = t.clone();
        t.undo();
        t.redo();
        assert_eq!(t, before);
    }

    #[test]
    fn test_empty_moves_are_noops() {
        let mut t = Timeline::new(5);
        assert!(!t.undo());
        assert!(!t.redo());
        assert_eq!(triple(&t), (vec![], 5, vec![]));
    }

    #[test]
    fn test_set_drops_redo_branch() {
        let mut t = Timeline::new(0);
        t.set(1);
        t.set(2);
        t.undo();
        t.undo();
        t.set(9);
        assert_eq!(triple(&t), (vec![0], 9, vec![]));
    }

    #[test]
    fn test_reset() {
        let mut t = Timeline::new(0);
        t.set(1);
        t.undo();
        t.reset(0);
        assert_eq!(triple(&t), (vec![], 0, vec![]));
    }

    #[test]
    fn test_truncate_past() {
        let mut t = Timeline::new(0);
        for i in 1..=5 {
            t.set(i);
        }
        assert_eq!(t.truncate_past(3), 2);
        assert_eq!(t.past, vec![2, 3, 4]);
        assert_eq!(t.truncate_past(3), 0);
    }

    #[test]
    fn test_serde_field_layout() {
        let mut t = Timeline::new("a".to_string());
        t.set("b".to_string());
        t.undo();
        let json = serde_json::to_string(&t).expect("serialize");
        assert_eq!(json, r#"{"past":[],"present":"a","future":["b"]}"#);
    }

    #[test]
    fn test_set_equal_to_present_is_recorded() {
        let mut t = Timeline::new(5);
        t.set(5);
        assert_eq!(triple(&t), (vec![5], 5, vec![]));
        assert!(t.undo());
        assert_eq!(triple(&t), (vec![], 5, vec![5]));
    }

    #[test]
    fn test_deserialize_future_from_array() {
        let t: Timeline<i32> =
            serde_json::from_str(r#"{"past":[0],"present":1,"future":[2,3]}"#).expect("parse");
        assert_eq!(t.future, [2, 3]);
    }
}
