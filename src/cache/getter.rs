//! Getter Module
//!
//! The data source a group falls back to on a cache miss.

// == Getter ==
/// Loads the bytes for a key from the backing data source.
///
/// Implemented for every `Fn(&str) -> anyhow::Result<Vec<u8>>` closure, so a
/// plain function can be handed to a group directly.
pub trait Getter: Send + Sync {
    /// Fetches the value for `key`. Errors reach the group's caller as-is.
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}
