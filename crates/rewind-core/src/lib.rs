/// Reactive state primitives shared by the rewind bindings.
///
/// - [`Update`]: a literal value or a transform of the current one.
/// - [`Listeners`] / [`Subscription`]: ordered change callbacks with an
///   explicit dispose handle.
/// - [`StoredValue`]: a single value mirrored to a key-value store.
/// - [`Toggle`], [`Previous`], [`default_if`]: small owned-state helpers.
pub mod fallback;
pub mod previous;
pub mod stored_value;
pub mod subscription;
pub mod toggle;
pub mod update;

pub use fallback::{default_if, default_if_blank, Blank};
pub use previous::Previous;
pub use stored_value::StoredValue;
pub use subscription::{Listeners, Subscription};
pub use toggle::Toggle;
pub use update::Update;
