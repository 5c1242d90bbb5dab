use smol_str::SmolStr;

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DECLARATION_MARKER: &str = "<?xml";

/// Tunables for [`crate::Parser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum element nesting depth before a document is rejected.
    pub max_depth: usize,
    /// Line prefix that starts a new document in a multi-document response.
    pub declaration_marker: SmolStr,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            declaration_marker: SmolStr::new_static(DECLARATION_MARKER),
        }
    }
}
