use std::fmt::{self, Display, Formatter};

#[cfg(feature = "json")]
use serde::Serialize;
use smol_str::SmolStr;

/// Attribute map of a [`Node`].
///
/// Keys are unique. Insertion order is kept so that serialization and tests
/// are deterministic; re-inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(SmolStr, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Inserts a pair, returning the previous value when `name` was already present.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();

        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<SmolStr>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

#[cfg(feature = "json")]
impl Serialize for Attributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name.as_str(), value)?;
        }
        map.end()
    }
}

/// One parsed tag: its name, attributes, ordered children and optional leaf text.
///
/// Each node exclusively owns its children. Trees are built once by the
/// parser and only handed out by shared reference afterwards.
#[cfg_attr(feature = "json", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    tag: SmolStr,
    attributes: Attributes,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Vec::is_empty"))]
    children: Vec<Node>,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    text: Option<String>,
}

impl Node {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Node {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub(crate) fn from_parts(
        tag: SmolStr,
        attributes: Attributes,
        children: Vec<Node>,
        text: Option<String>,
    ) -> Self {
        Node {
            tag,
            attributes,
            children,
            text,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Attribute lookup falling back to `default` when the attribute is absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attributes.get(name).unwrap_or(default)
    }

    /// Pre-order iterator over every node strictly below `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in self.attributes.iter() {
            write!(f, " {}=\"{}\"", name, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}
