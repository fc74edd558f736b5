// src/commands/mod.rs

//! Contributed command trees.
//!
//! Each module here is an independent contributor: it exposes a
//! `commands(...)` function returning the top-level [`CommandNode`] values
//! it wants routed, and the core consumes them via `Registry::register`
//! without interpreting their contents. Backends are handed in as shared
//! state captured by the action closures.
//!
//! [`CommandNode`]: crate::core::command::CommandNode

pub mod env;
pub mod help;
pub mod network;
pub mod registry;
pub mod rpc;
pub mod runtime;
pub mod store;
