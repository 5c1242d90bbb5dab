use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use crate::error::ParseError;

/// Structured events emitted while parsing, for callers that want visibility
/// into how a response was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent<'a> {
    DocumentStart { index: usize },
    DocumentParsed { index: usize, tag: &'a str },
    DocumentDropped { index: usize, error: &'a ParseError },
    TagRecognized { tag: &'a str, offset: usize },
    AttributeParsed { tag: &'a str, name: &'a str, value: &'a str },
    NoAttributesFound { tag: &'a str, text: &'a str },
    ChildAttached { parent: &'a str, child: &'a str },
    ImplicitClose { tag: &'a str },
}

impl Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::DocumentStart { index } => write!(f, "document {index}: start"),
            TraceEvent::DocumentParsed { index, tag } => {
                write!(f, "document {index}: parsed root <{tag}>")
            }
            TraceEvent::DocumentDropped { index, error } => {
                write!(f, "document {index}: dropped ({error})")
            }
            TraceEvent::TagRecognized { tag, offset } => write!(f, "tag <{tag}> at {offset}"),
            TraceEvent::AttributeParsed { tag, name, value } => {
                write!(f, "<{tag}> {name}=\"{value}\"")
            }
            TraceEvent::NoAttributesFound { tag, text } => {
                write!(f, "<{tag}> no attributes in `{text}`")
            }
            TraceEvent::ChildAttached { parent, child } => write!(f, "<{parent}> += <{child}>"),
            TraceEvent::ImplicitClose { tag } => {
                write!(f, "<{tag}> closed implicitly at end of document")
            }
        }
    }
}

/// Callback receiving [`TraceEvent`]s.
pub type TraceSink = Arc<dyn Fn(&TraceEvent<'_>) + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct Tracer(Option<TraceSink>);

impl Tracer {
    pub(crate) fn new(sink: TraceSink) -> Self {
        Self(Some(sink))
    }

    #[inline]
    pub(crate) fn emit(&self, event: TraceEvent<'_>) {
        if let Some(sink) = &self.0 {
            sink(&event);
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracer")
            .field(&if self.is_enabled() { "enabled" } else { "disabled" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    #[rstest]
    #[case::start(TraceEvent::DocumentStart { index: 0 }, "document 0: start")]
    #[case::parsed(TraceEvent::DocumentParsed { index: 1, tag: "RIBCL" }, "document 1: parsed root <RIBCL>")]
    #[case::attr(
        TraceEvent::AttributeParsed { tag: "R", name: "S", value: "1" },
        "<R> S=\"1\""
    )]
    #[case::child(TraceEvent::ChildAttached { parent: "A", child: "B" }, "<A> += <B>")]
    fn test_display(#[case] event: TraceEvent<'_>, #[case] expected: &str) {
        assert_eq!(event.to_string(), expected);
    }

    #[test]
    fn test_tracer_forwards_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let tracer = Tracer::new(Arc::new(move |event: &TraceEvent<'_>| {
            sink.lock().unwrap().push(event.to_string());
        }));

        tracer.emit(TraceEvent::ImplicitClose { tag: "A" });
        assert!(tracer.is_enabled());
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["<A> closed implicitly at end of document".to_string()]
        );
    }

    #[test]
    fn test_disabled_tracer() {
        let tracer = Tracer::default();
        tracer.emit(TraceEvent::DocumentStart { index: 0 });
        assert!(!tracer.is_enabled());
    }
}
