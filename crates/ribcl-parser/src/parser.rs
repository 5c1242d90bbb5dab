//! Tolerant recursive-descent tree builder for a single RIBCL document.
//!
//! RIBCL output is "XML-looking" rather than XML, so the builder only keeps
//! the structure it can recognize and skips everything else:
//!
//! - a leading `<?xml ...?>` declaration is skipped,
//! - stray text and closing markers that close nothing are ignored,
//! - a block `<X>` is closed by the first closing marker whose text *starts
//!   with* `X` (so `</X2>` also closes `X`),
//! - only the first top-level element becomes the root; anything after it is
//!   ignored.
//!
//! The last two behaviors are kept for compatibility with existing callers.
use nom::{
    IResult, Parser as _,
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    sequence::{delimited, separated_pair},
};
use smol_str::SmolStr;

use crate::error::ParseError;
use crate::node::{Attributes, Node};
use crate::options::ParserOptions;
use crate::trace::{TraceEvent, TraceSink, Tracer};

/// Entry point for parsing RIBCL text.
///
/// A parser holds only configuration and an optional trace sink, so a single
/// instance can be shared across threads and reused for any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
    tracer: Tracer,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            tracer: Tracer::default(),
        }
    }

    /// Installs a callback that receives a [`TraceEvent`] at each document
    /// boundary, recognized tag, parsed attribute and attached child.
    pub fn with_trace<F>(mut self, sink: F) -> Self
    where
        F: Fn(&TraceEvent<'_>) + Send + Sync + 'static,
    {
        self.tracer = Tracer::new(std::sync::Arc::new(sink));
        self
    }

    pub fn with_trace_sink(mut self, sink: TraceSink) -> Self {
        self.tracer = Tracer::new(sink);
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub(crate) fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Parses exactly one document into its root node.
    pub fn parse_document(&self, text: &str) -> Result<Node, ParseError> {
        Builder {
            src: text,
            pos: 0,
            options: &self.options,
            tracer: &self.tracer,
        }
        .document()
    }
}

struct Builder<'a> {
    src: &'a str,
    pos: usize,
    options: &'a ParserOptions,
    tracer: &'a Tracer,
}

impl<'a> Builder<'a> {
    fn document(mut self) -> Result<Node, ParseError> {
        let src = self.src;
        self.pos = src.len() - src.trim_start().len();

        let marker = self.options.declaration_marker.as_str();
        if !marker.is_empty() && src[self.pos..].starts_with(marker) {
            self.pos = self.declaration_end(self.pos)?;
        }

        while let Some(lt) = self.find_from(self.pos, '<') {
            if src[lt + 1..].starts_with('/') {
                // A closing marker with no open block at this level.
                self.pos = self.closing_marker_end(lt)?;
                continue;
            }

            self.pos = lt;
            if let Some(root) = self.element(0)? {
                return Ok(root);
            }
        }

        Err(ParseError::EmptyInput)
    }

    /// Parses the element whose `<` is at `self.pos`.
    ///
    /// Returns `Ok(None)` for markup with an empty tag name, which is skipped
    /// like any other stray text.
    fn element(&mut self, depth: usize) -> Result<Option<Node>, ParseError> {
        let src = self.src;
        let open = self.pos;

        if depth >= self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                depth: depth + 1,
                offset: open,
            });
        }

        let header_end = self
            .find_from(open, '>')
            .ok_or_else(|| ParseError::malformed(src, open))?;
        let header = &src[open + 1..header_end];
        self.pos = header_end + 1;

        let (name, attribute_text) = split_header(header);
        if name.is_empty() {
            return Ok(None);
        }

        self.tracer.emit(TraceEvent::TagRecognized {
            tag: name,
            offset: open,
        });
        let attributes = self.attributes(name, attribute_text);

        if header.ends_with('/') {
            return Ok(Some(Node::from_parts(
                SmolStr::new(name),
                attributes,
                Vec::new(),
                None,
            )));
        }

        let mut children = Vec::new();
        let mut inner_text = String::new();
        loop {
            let Some(lt) = self.find_from(self.pos, '<') else {
                inner_text.push_str(&src[self.pos..]);
                self.tracer.emit(TraceEvent::ImplicitClose { tag: name });
                self.pos = src.len();
                break;
            };
            inner_text.push_str(&src[self.pos..lt]);

            if src[lt + 1..].starts_with('/') {
                self.pos = self.closing_marker_end(lt)?;
                if src[lt + 2..].starts_with(name) {
                    break;
                }
                continue;
            }

            self.pos = lt;
            if let Some(child) = self.element(depth + 1)? {
                self.tracer.emit(TraceEvent::ChildAttached {
                    parent: name,
                    child: child.tag(),
                });
                children.push(child);
            }
        }

        // Skipped markup (stray closing markers, empty tags) is not text.
        let text = if children.is_empty() {
            let inner = inner_text.trim();
            (!inner.is_empty()).then(|| inner.to_string())
        } else {
            None
        };

        Ok(Some(Node::from_parts(
            SmolStr::new(name),
            attributes,
            children,
            text,
        )))
    }

    fn attributes(&self, tag: &str, text: &str) -> Attributes {
        let mut attributes = Attributes::new();

        for (name, value) in scan_attributes(text) {
            self.tracer.emit(TraceEvent::AttributeParsed { tag, name, value });
            attributes.insert(name, value);
        }

        let leftover = text.trim().trim_end_matches('/');
        if attributes.is_empty() && !leftover.is_empty() {
            self.tracer.emit(TraceEvent::NoAttributesFound {
                tag,
                text: leftover,
            });
        }

        attributes
    }

    /// Offset just past the declaration starting at `start`.
    ///
    /// A `<?` marker runs to the next `?>`; any other marker takes up the
    /// rest of its line.
    fn declaration_end(&self, start: usize) -> Result<usize, ParseError> {
        let rest = &self.src[start..];

        if self.options.declaration_marker.starts_with("<?") {
            rest.find("?>")
                .map(|end| start + end + 2)
                .ok_or_else(|| ParseError::malformed(self.src, start))
        } else {
            Ok(rest
                .find('\n')
                .map_or(self.src.len(), |end| start + end + 1))
        }
    }

    /// Offset just past the `>` of the closing marker starting at `lt`.
    fn closing_marker_end(&self, lt: usize) -> Result<usize, ParseError> {
        self.find_from(lt, '>')
            .map(|gt| gt + 1)
            .ok_or_else(|| ParseError::malformed(self.src, lt))
    }

    fn find_from(&self, from: usize, needle: char) -> Option<usize> {
        self.src[from..].find(needle).map(|i| from + i)
    }
}

/// Splits a tag header (the text between `<` and `>`) into name and attribute text.
fn split_header(header: &str) -> (&str, &str) {
    match header.find(char::is_whitespace) {
        Some(i) => (&header[..i], &header[i..]),
        None => (header.trim_end_matches('/'), ""),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_while1(is_word_char),
        char('='),
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
    )
    .parse(input)
}

/// Extracts `name="value"` pairs left to right, skipping anything that is not a pair.
pub(crate) fn scan_attributes(text: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match attribute(rest) {
            Ok((remaining, pair)) => {
                pairs.push(pair);
                rest = remaining;
            }
            Err(_) => {
                // No suffix of a word that failed to match can match either.
                let word = rest.len() - rest.trim_start_matches(is_word_char).len();
                let skip = if word > 0 {
                    word
                } else {
                    rest.chars().next().map_or(1, char::len_utf8)
                };
                rest = &rest[skip..];
            }
        }
    }

    pairs
}
