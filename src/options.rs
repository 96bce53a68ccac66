//! Configuration options for parsing, loading and serialization.
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::Options;
//!
//! let options = Options::new().with_max_depth(8);
//! assert_eq!(options.max_depth, 8);
//! ```

/// Default limit on nested composite processing (arrays of arrays of ...).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration shared by every handler call in one operation.
///
/// # Examples
///
/// ```rust
/// use internet_object::Options;
///
/// let options = Options::default();
/// assert_eq!(options.max_depth, internet_object::options::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// How many composite levels a parse, load or serialize call may descend
    /// before failing with [`MaxDepthExceeded`](crate::ErrorKind::MaxDepthExceeded).
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recursion-depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
