/// A mutation request: either a new value or a function of the current one.
pub enum Update<T> {
    /// Replace the current value.
    Literal(T),
    /// Compute the new value from the current one.
    Transform(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    /// Builds a transform update from a closure.
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::Transform(Box::new(f))
    }

    /// Resolves the update against `current`, producing the new value.
    pub fn apply(self, current: &T) -> T {
        match self {
            Self::Literal(value) => value,
            Self::Transform(f) => f(current),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}
