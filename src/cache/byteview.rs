//! Byte View Module
//!
//! Immutable byte payload stored as the value of every cache entry.

use std::fmt;
use std::sync::Arc;

use crate::cache::Value;

// == Byte View ==
/// A read-only view over cached bytes.
///
/// The payload is never mutated after construction. Cloning a view shares
/// the payload; reading it through [`ByteView::to_vec`] always hands out a
/// fresh copy so callers can never alter what the cache holds.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view holding a private copy of `bytes`.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: Arc::from(bytes.as_ref()),
        }
    }

    // == Length ==
    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    // == Is Empty ==
    /// Returns true for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == To Vec ==
    /// Returns a copy of the payload.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    // == As String ==
    /// Decodes the payload as UTF-8, replacing invalid sequences.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl Value for ByteView {
    fn size(&self) -> usize {
        self.len()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byteview_len() {
        let view = ByteView::new("630");
        assert_eq!(view.len(), 3);
        assert_eq!(view.size(), 3);
        assert!(!view.is_empty());
        assert!(ByteView::default().is_empty());
    }

    #[test]
    fn test_to_vec_returns_distinct_copies() {
        let view = ByteView::new(b"hello");

        let mut first = view.to_vec();
        let second = view.to_vec();

        assert_eq!(first, second);
        assert_ne!(first.as_ptr(), second.as_ptr());

        // Mutating a copy leaves the view and other copies untouched
        first[0] = b'j';
        assert_eq!(second, b"hello");
        assert_eq!(view.to_vec(), b"hello");
    }

    #[test]
    fn test_new_copies_input() {
        let mut source = b"589".to_vec();
        let view = ByteView::new(&source);

        source[0] = b'0';
        assert_eq!(view.as_string(), "589");
    }

    #[test]
    fn test_as_string_and_display() {
        let view = ByteView::from("567");
        assert_eq!(view.as_string(), "567");
        assert_eq!(view.to_string(), "567");
    }

    #[test]
    fn test_as_string_lossy_on_invalid_utf8() {
        let view = ByteView::from(vec![0x66, 0xff, 0x6f]);
        assert_eq!(view.as_string(), "f\u{fffd}o");
        assert_eq!(view.len(), 3);
    }
}
