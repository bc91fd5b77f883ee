//! Package loading options.

/// Default ceiling on a single part's uncompressed size (256 MiB).
pub const DEFAULT_MAX_PART_SIZE: u64 = 256 * 1024 * 1024;

/// Default ceiling on the number of parts materialized from one package.
pub const DEFAULT_MAX_PARTS: usize = 10_000;

/// Default ceiling on element nesting within one XML part.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options controlling how a package is loaded.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Reject parts whose uncompressed size exceeds this many bytes
    pub max_part_size: Option<u64>,

    /// Maximum number of parts to materialize
    pub max_parts: usize,

    /// Maximum element nesting in an XML part before its parse fails
    pub max_depth: usize,

    /// Treat a part without a content type as fatal even when it is not required
    pub strict_content_types: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            max_part_size: Some(DEFAULT_MAX_PART_SIZE),
            max_parts: DEFAULT_MAX_PARTS,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_content_types: false,
        }
    }
}

impl PackageOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-part size ceiling (`None` disables the check).
    pub fn with_max_part_size(mut self, max: Option<u64>) -> Self {
        self.max_part_size = max;
        self
    }

    /// Set the maximum number of parts.
    pub fn with_max_parts(mut self, max: usize) -> Self {
        self.max_parts = max;
        self
    }

    /// Set the maximum XML element nesting.
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Enable or disable strict content-type checking.
    pub fn with_strict_content_types(mut self, strict: bool) -> Self {
        self.strict_content_types = strict;
        self
    }
}
