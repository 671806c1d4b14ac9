/// Remembers the value seen on the previous observation.
///
/// Each call to [`Previous::track`] records the new value and hands back the
/// one recorded before it. The first call returns `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Previous<T> {
    last: Option<T>,
}

impl<T> Previous<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Records `value` and returns the previously recorded one.
    pub fn track(&mut self, value: T) -> Option<T> {
        self.last.replace(value)
    }

    /// Most recently recorded value.
    pub fn latest(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Forgets the recorded value.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_track_has_no_previous() {
        let mut prev = Previous::new();
        assert_eq!(prev.track(1), None);
        assert_eq!(prev.latest(), Some(&1));
    }

    #[test]
    fn test_track_returns_prior_value() {
        let mut prev = Previous::new();
        prev.track("a");
        assert_eq!(prev.track("b"), Some("a"));
        assert_eq!(prev.track("b"), Some("b"));
        assert_eq!(prev.track("c"), Some("b"));
    }

    #[test]
    fn test_reset_forgets() {
        let mut prev = Previous::new();
        prev.track(5);
        prev.reset();
        assert_eq!(prev.latest(), None);
        assert_eq!(prev.track(6), None);
    }
}
