use cuid2::create_id;
use std::fmt::Display;

/// Opaque node identifier, unique across a forest and stable for the node's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id for a node created by the user, e.g. `node-tz4a98xxat96iws9zmbrgj3a`.
    pub fn generate() -> Self {
        Self::with_prefix("node")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", create_id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert!(a.as_str().starts_with("node-"));
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(NodeId::from("1-2").to_string(), "1-2");
    }
}
