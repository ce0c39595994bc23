//! Read options for PAK decoding
//!
//! By default the reader accepts everything Chromium's own loader accepts:
//! absolute offsets are only used to compute payload lengths. Strict mode
//! also checks them against the layout.

/// Options controlling how strictly a PAK index is validated.
///
/// # Example
///
/// ```
/// use chromepak::pak::PakReadOptions;
///
/// // Reject files whose offsets disagree with the header and index size
/// let options = PakReadOptions::strict();
/// assert!(options.strict_offsets);
///
/// // Or configure individually
/// let options = PakReadOptions::new().with_strict_offsets(false);
/// assert!(!options.strict_offsets);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PakReadOptions {
    /// Require the first offset to equal the end of the index, and offsets
    /// to never decrease
    /// Default: false
    pub strict_offsets: bool,
}

impl PakReadOptions {
    /// Create lenient options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strict_offsets: false,
        }
    }

    /// Create options with every layout check enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_offsets: true,
        }
    }

    /// Set whether absolute offsets are validated.
    #[must_use]
    pub fn with_strict_offsets(mut self, strict: bool) -> Self {
        self.strict_offsets = strict;
        self
    }
}
