/// Substitutes a fallback for missing or invalid values.
use serde_json::Value;

/// Values that can be "blank": missing or empty.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl<T> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for &str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Value {
    fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Returns `fallback` when `is_invalid(&value)` holds, otherwise `value`.
pub fn default_if<T>(value: T, fallback: T, is_invalid: impl FnOnce(&T) -> bool) -> T {
    if is_invalid(&value) {
        fallback
    } else {
        value
    }
}

/// Returns `fallback` when `value` is blank.
pub fn default_if_blank<T: Blank>(value: T, fallback: T) -> T {
    default_if(value, fallback, T::is_blank)
}
