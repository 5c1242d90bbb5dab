use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Document-level parse failure.
///
/// Every variant is scoped to a single document: the document splitter drops
/// the failing document and keeps going with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("Unclosed tag at offset {offset}")]
    #[diagnostic(
        code(ribcl_parser::malformed_markup),
        help("The tag or declaration opened here is not terminated (`>` for tags, `?>` for an `<?xml` declaration) before the end of the document.")
    )]
    MalformedMarkup {
        offset: usize,
        #[source_code]
        src: String,
        #[label("tag starts here")]
        span: SourceSpan,
    },

    #[error("No element found in document")]
    #[diagnostic(code(ribcl_parser::empty_input))]
    EmptyInput,

    #[error("Nesting depth {depth} exceeds the configured limit at offset {offset}")]
    #[diagnostic(
        code(ribcl_parser::nesting_too_deep),
        help("Raise `ParserOptions::max_depth` if the controller legitimately nests this deep.")
    )]
    NestingTooDeep { depth: usize, offset: usize },
}

impl ParseError {
    pub(crate) fn malformed(src: &str, offset: usize) -> Self {
        let len = src[offset..]
            .find(char::is_whitespace)
            .unwrap_or(src.len() - offset)
            .max(1);

        Self::MalformedMarkup {
            offset,
            src: src.to_string(),
            span: SourceSpan::new(offset.into(), len.min(src.len() - offset)),
        }
    }

    /// Byte offset into the document text where the failure was detected, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::MalformedMarkup { offset, .. } => Some(*offset),
            ParseError::NestingTooDeep { offset, .. } => Some(*offset),
            ParseError::EmptyInput => None,
        }
    }
}
