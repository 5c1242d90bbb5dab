use crate::error::ParseError;
use crate::node::Node;
use crate::parser::Parser;
use crate::trace::TraceEvent;

/// A candidate document that failed to parse and was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDocument {
    /// Zero-based position of the document in the response.
    pub index: usize,
    pub error: ParseError,
}

/// Outcome of parsing a whole response, including the documents that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub roots: Vec<Node>,
    pub dropped: Vec<DroppedDocument>,
}

impl ParseReport {
    /// Number of declaration-delimited documents seen in the response.
    pub fn documents_found(&self) -> usize {
        self.roots.len() + self.dropped.len()
    }
}

impl Parser {
    /// Slices a raw response into per-document text blocks.
    ///
    /// Lines are trimmed and blank lines dropped. Every line starting with the
    /// declaration marker begins a new block; lines seen before the first
    /// marker belong to no document and are discarded.
    pub fn split_documents(&self, text: &str) -> Vec<String> {
        let marker = self.options().declaration_marker.as_str();
        let mut documents = Vec::new();
        let mut current: Option<Vec<&str>> = None;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if line.starts_with(marker) {
                if let Some(lines) = current.take() {
                    documents.push(lines.join("\n"));
                }
                current = Some(vec![line]);
            } else if let Some(lines) = current.as_mut() {
                lines.push(line);
            }
        }

        if let Some(lines) = current {
            documents.push(lines.join("\n"));
        }

        documents
    }

    /// Parses every document in `text`, returning the roots in source order.
    ///
    /// Documents that fail to parse are silently left out; use
    /// [`Parser::parse_response_with_errors`] to find out why.
    pub fn parse_response(&self, text: &str) -> Vec<Node> {
        self.parse_response_with_errors(text).roots
    }

    pub fn parse_response_with_errors(&self, text: &str) -> ParseReport {
        let tracer = self.tracer();
        let mut report = ParseReport::default();

        for (index, document) in self.split_documents(text).iter().enumerate() {
            tracer.emit(TraceEvent::DocumentStart { index });

            match self.parse_document(document) {
                Ok(root) => {
                    tracer.emit(TraceEvent::DocumentParsed {
                        index,
                        tag: root.tag(),
                    });
                    report.roots.push(root);
                }
                Err(error) => {
                    tracer.emit(TraceEvent::DocumentDropped {
                        index,
                        error: &error,
                    });
                    report.dropped.push(DroppedDocument { index, error });
                }
            }
        }

        report
    }
}
