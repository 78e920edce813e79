use std::sync::Arc;

use parking_lot::Mutex;

/// A thread-safe, mutually exclusive shared component.
///
/// Stateful pieces such as `RateSampler` take `&mut self`; several producers
/// feeding one instance go through this wrapper.
pub type Shared<T> = Arc<Mutex<T>>;

/// A generic boxed error type.
pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// A convenient Result alias returning `AnyError`.
pub type AnyResult<T> = std::result::Result<T, AnyError>;

/// Wraps a value for sharing across producers.
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
