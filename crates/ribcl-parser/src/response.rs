#[cfg(feature = "json")]
use serde::Serialize;

use crate::node::Node;

/// The raw `STATUS`/`MESSAGE` pair of a `RESPONSE` node.
///
/// The code is carried through untouched; deciding whether it means success
/// is up to the caller.
#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseStatus<'a> {
    pub status: &'a str,
    pub message: &'a str,
}

impl<'a> From<&'a Node> for ResponseStatus<'a> {
    fn from(node: &'a Node) -> Self {
        ResponseStatus {
            status: node.get_or("STATUS", ""),
            message: node.get_or("MESSAGE", ""),
        }
    }
}

/// The first `RESPONSE` node anywhere below `root`.
pub fn response_status(root: &Node) -> Option<ResponseStatus<'_>> {
    root.find(".//RESPONSE").map(ResponseStatus::from)
}

/// Every `RESPONSE` node of every root, in document order.
pub fn response_statuses(roots: &[Node]) -> Vec<ResponseStatus<'_>> {
    roots
        .iter()
        .flat_map(|root| root.find_all(".//RESPONSE"))
        .map(ResponseStatus::from)
        .collect()
}
