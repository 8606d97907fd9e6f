//! Per-request key/value storage.
//!
//! The [`DataBag`] is created empty alongside each request context and
//! shared by reference with every step of the interception chain. It is
//! never replaced mid-request: filters write, later steps and the binder
//! read the same bag.

use std::any::Any;
use std::collections::HashMap;

/// String-keyed, type-erased per-request storage.
///
/// Values are stored as `Box<dyn Any>` and retrieved with typed
/// accessors, so unrelated filters can share the bag without agreeing on
/// a common value type.
///
/// # Example
///
/// ```
/// use keryx_core::DataBag;
///
/// let mut bag = DataBag::new();
/// bag.insert("caller", "svc-billing".to_string());
/// bag.insert("attempt", 2_u32);
///
/// assert_eq!(bag.get::<String>("caller").map(String::as_str), Some("svc-billing"));
/// assert_eq!(bag.get::<u32>("attempt"), Some(&2));
/// assert_eq!(bag.get::<u32>("caller"), None);
/// ```
#[derive(Default)]
pub struct DataBag {
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl DataBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under a key, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Returns the value under a key, if present and of type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the value under a key.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Returns a string value under a key.
    ///
    /// Accepts both `String` and `&'static str` entries; this is the view
    /// the parameter binder uses when it consults the bag before headers.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        let value = self.entries.get(key)?;
        value
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| value.downcast_ref::<&'static str>().copied())
    }

    /// Removes the value under a key. Returns `true` if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns `true` if a value exists under the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for DataBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataBag")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
