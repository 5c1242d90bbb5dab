use std::fmt::{self, Display, Formatter};

use crate::node::Node;

const DESCENDANT_PREFIX: &str = ".//";

/// A parsed query path.
///
/// `A/B/C` is a chain of direct-child links starting below the node the
/// query runs on. `.//TAG` matches `TAG` at any depth below that node; the
/// descendant form is never combined with chain segments, so `.//A/B` looks
/// for a tag literally named `A/B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path<'a> {
    Chain(Vec<&'a str>),
    Descendant(&'a str),
}

impl<'a> Path<'a> {
    pub fn parse(path: &'a str) -> Self {
        match path.strip_prefix(DESCENDANT_PREFIX) {
            Some(tag) => Path::Descendant(tag),
            None => Path::Chain(path.trim_matches('/').split('/').collect()),
        }
    }
}

impl<'a> From<&'a str> for Path<'a> {
    fn from(path: &'a str) -> Self {
        Path::parse(path)
    }
}

impl Display for Path<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Path::Chain(segments) => write!(f, "{}", segments.join("/")),
            Path::Descendant(tag) => write!(f, "{}{}", DESCENDANT_PREFIX, tag),
        }
    }
}

impl Node {
    /// Returns the first node reached by `path`, or `None` when any link is missing.
    pub fn find<'a>(&self, path: impl Into<Path<'a>>) -> Option<&Node> {
        match path.into() {
            Path::Descendant(tag) => self.descendants().find(|node| node.tag() == tag),
            Path::Chain(segments) => segments.iter().try_fold(self, |current, segment| {
                current.children().iter().find(|child| child.tag() == *segment)
            }),
        }
    }

    /// Returns every node reached by `path`, in document order.
    ///
    /// Unlike [`Node::find`], a chain fans out over every child that matches
    /// a segment.
    pub fn find_all<'a>(&self, path: impl Into<Path<'a>>) -> Vec<&Node> {
        match path.into() {
            Path::Descendant(tag) => self
                .descendants()
                .filter(|node| node.tag() == tag)
                .collect(),
            Path::Chain(segments) => {
                let mut results = Vec::new();
                collect_chain(self, &segments, &mut results);
                results
            }
        }
    }
}

fn collect_chain<'n>(node: &'n Node, segments: &[&str], results: &mut Vec<&'n Node>) {
    let Some((segment, rest)) = segments.split_first() else {
        results.push(node);
        return;
    };

    for child in node.children().iter().filter(|child| child.tag() == *segment) {
        collect_chain(child, rest, results);
    }
}
