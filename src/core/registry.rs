// src/core/registry.rs

use std::collections::HashMap;

use crate::core::{command::CommandNode, error::RegistryError};

/// The process-wide mapping from top-level command name to its command tree.
///
/// This is an explicit object, passed by reference to the dispatcher and
/// shell constructors, rather than hidden global state. It is populated by
/// every contributing module before any input is routed; registration order
/// across modules is unspecified, and the last module to register a given
/// name wins, silently.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, CommandNode>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces one entry per node, keyed by the node's name.
    ///
    /// The batch is validated up front: if any node (anywhere in its subtree)
    /// is malformed, the whole call is rejected and nothing is inserted.
    /// Replacement is whole-entry: flags and subcommands from a previous
    /// registration under the same name are never merged in.
    pub fn register(&mut self, nodes: Vec<CommandNode>) -> Result<(), RegistryError> {
        for node in &nodes {
            node.validate()?;
        }
        for node in nodes {
            if self.entries.contains_key(&node.name) {
                log::debug!("replacing registered command '{}'", node.name);
            }
            self.entries.insert(node.name.clone(), node);
        }
        Ok(())
    }

    /// Plain map access; absence is a normal "not found", not an error.
    pub fn lookup(&self, name: &str) -> Option<&CommandNode> {
        self.entries.get(name)
    }

    /// A sorted `(name, usage)` snapshot of the top-level entries, for help
    /// listings.
    pub fn summaries(&self) -> Vec<(String, String)> {
        let mut summaries: Vec<_> = self
            .entries
            .values()
            .map(|node| (node.name.clone(), node.usage.clone()))
            .collect();
        summaries.sort();
        summaries
    }
}
