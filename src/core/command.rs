// src/core/command.rs

use std::fmt;

use anyhow::Result;

use crate::core::{context::Context, error::RegistryError, flag::FlagSchema};

/// The work attached to a leaf of the command tree.
///
/// Actions are opaque to the dispatch core: they receive the resolved flag
/// bindings and the leftover positional tokens, and either produce a payload
/// for the operator or fail. The core never interprets the payload.
pub type Action = Box<dyn Fn(&Context, &[String]) -> Result<Vec<u8>> + Send + Sync>;

/// A named, described unit of work, composed recursively into a command tree.
///
/// Nodes are built once at module-init time and are immutable afterwards;
/// the registry replaces whole top-level entries, never merges them.
pub struct CommandNode {
    pub name: String,
    pub usage: String,
    pub flags: Vec<FlagSchema>,
    pub subcommands: Vec<CommandNode>,
    pub action: Option<Action>,
}

impl CommandNode {
    pub fn new(name: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            flags: Vec::new(),
            subcommands: Vec::new(),
            action: None,
        }
    }

    pub fn with_flags(mut self, flags: Vec<FlagSchema>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_subcommands(mut self, subcommands: Vec<Self>) -> Self {
        self.subcommands = subcommands;
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context, &[String]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Finds a direct child by exact name match.
    pub fn subcommand(&self, name: &str) -> Option<&Self> {
        self.subcommands.iter().find(|sub| sub.name == name)
    }

    /// Validates this node and its whole subtree for registration.
    ///
    /// Checks non-empty names and per-node flag-name uniqueness. Flag names
    /// are deliberately not checked across parent/child nodes: a child's
    /// binding shadows its parent's at lookup time.
    pub(crate) fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidRegistration(
                "command node has an empty name".to_string(),
            ));
        }
        for (i, flag) in self.flags.iter().enumerate() {
            if flag.name.is_empty() {
                return Err(RegistryError::InvalidRegistration(format!(
                    "command '{}' declares a flag with an empty name",
                    self.name
                )));
            }
            if self.flags[..i].iter().any(|f| f.name == flag.name) {
                return Err(RegistryError::InvalidRegistration(format!(
                    "command '{}' declares flag '--{}' more than once",
                    self.name, flag.name
                )));
            }
        }
        for sub in &self.subcommands {
            sub.validate()?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flag::FlagSchema;

    #[test]
    fn test_subcommand_is_exact_match() {
        let node = CommandNode::new("list", "List things").with_subcommands(vec![
            CommandNode::new("nodes", "List nodes"),
            CommandNode::new("routes", "List routes"),
        ]);

        assert!(node.subcommand("nodes").is_some());
        assert!(node.subcommand("node").is_none());
        assert!(node.subcommand("NODES").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_flags_within_a_node() {
        let node = CommandNode::new("call", "Call a service").with_flags(vec![
            FlagSchema::string("address", "Target address", ""),
            FlagSchema::string("address", "Duplicate", ""),
        ]);

        assert!(node.validate().is_err());
    }

    #[test]
    fn test_validate_allows_parent_and_child_sharing_a_flag_name() {
        let node = CommandNode::new("store", "Store operations")
            .with_flags(vec![FlagSchema::string("database", "Database", "micro")])
            .with_subcommands(vec![CommandNode::new("read", "Read a record")
                .with_flags(vec![FlagSchema::string("database", "Database", "micro")])]);

        assert!(node.validate().is_ok());
    }

    #[test]
    fn test_validate_recurses_into_subtree() {
        let node = CommandNode::new("network", "Network operations")
            .with_subcommands(vec![CommandNode::new("", "Nameless")]);

        assert!(node.validate().is_err());
    }
}
