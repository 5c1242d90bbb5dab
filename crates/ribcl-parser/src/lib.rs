//! # ribcl-parser: tolerant parsing of RIBCL management-controller responses
//!
//! RIBCL responses look like XML but are not well-formed: several documents
//! are concatenated into one transport response, closing tags do not always
//! pair with their opener and attribute syntax is ad hoc. This crate turns
//! such a response into an ordered list of owned [`Node`] trees and lets
//! callers navigate them with simple path queries.
//!
//! ## Quick Start
//!
//! ```rust
//! let response = "<?xml version=\"1.0\"?>\n\
//!     <RIBCL VERSION=\"2.23\">\n\
//!     <RESPONSE STATUS=\"0x0000\" MESSAGE=\"No error\"/>\n\
//!     </RIBCL>";
//!
//! let roots = ribcl_parser::parse_response(response);
//! assert_eq!(roots.len(), 1);
//!
//! let status = roots[0].find(".//RESPONSE").unwrap();
//! assert_eq!(status.get_or("STATUS", "N/A"), "0x0000");
//! ```
//!
//! ## Tolerance
//!
//! A document that cannot be parsed is dropped without affecting the other
//! documents of the same response. [`Parser::parse_response_with_errors`]
//! reports which documents were dropped and why.
//!
//! ## Tracing
//!
//! [`Parser::with_trace`] installs a callback receiving [`TraceEvent`]s, so
//! the parser itself does not depend on any logging framework.
mod document;
mod error;
mod node;
mod options;
mod parser;
mod query;
mod response;
mod storage;
mod trace;

pub use document::{DroppedDocument, ParseReport};
pub use error::ParseError;
pub use node::{Attributes, Descendants, Node};
pub use options::{DECLARATION_MARKER, DEFAULT_MAX_DEPTH, ParserOptions};
pub use parser::Parser;
pub use query::Path;
pub use response::{ResponseStatus, response_status, response_statuses};
pub use storage::{
    Backplane, Controller, DriveEnclosure, HostPort, LogicalDrive, PhysicalDrive, StorageSummary,
};
pub use trace::{TraceEvent, TraceSink};

/// Parses a multi-document response with the default [`Parser`].
pub fn parse_response(text: &str) -> Vec<Node> {
    Parser::default().parse_response(text)
}

/// Parses a single document with the default [`Parser`].
pub fn parse_document(text: &str) -> Result<Node, ParseError> {
    Parser::default().parse_document(text)
}
