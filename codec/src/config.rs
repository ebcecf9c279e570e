//! Limits applied while encoding and decoding.

/// Largest length accepted when decoding a string, byte string, or collection.
pub const MAX_LENGTH: usize = i32::MAX as usize;

/// Configuration shared by [crate::Serializer] and [crate::Deserializer].
///
/// # Examples
///
/// ```
/// use serdegen_codec::Config;
///
/// // Reject input nested more than 64 containers deep.
/// let cfg = Config::default().with_max_container_depth(64);
/// assert_eq!(cfg.max_container_depth, 64);
/// assert_eq!(cfg.max_length, serdegen_codec::config::MAX_LENGTH);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Config {
    /// Number of nested containers that may be open at once.
    pub max_container_depth: usize,

    /// Largest decoded length, checked before anything is allocated.
    pub max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_container_depth: usize::MAX,
            max_length: MAX_LENGTH,
        }
    }
}

impl Config {
    /// Returns a copy with the container depth budget set to `depth`.
    pub fn with_max_container_depth(mut self, depth: usize) -> Self {
        self.max_container_depth = depth;
        self
    }

    /// Returns a copy with the decoded length limit set to `len`.
    ///
    /// Values above [MAX_LENGTH] are clamped.
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_length = len.min(MAX_LENGTH);
        self
    }

    /// Returns true if a decoded length is acceptable.
    pub fn allows_length(&self, len: i64) -> bool {
        match u64::try_from(len) {
            Ok(len) => len <= self.max_length as u64,
            Err(_) => false,
        }
    }
}
