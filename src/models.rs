// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- Service directory models ---
// These are the structures exchanged with `register service` / `get service`
// as JSON definitions, and rendered back to the operator.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub nodes: Vec<ServiceNode>,
}

/// One running instance of a service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceNode {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

// --- Network models ---

/// A routing table entry, filterable from `network routes`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Route {
    pub service: String,
    pub address: String,
    #[serde(default)]
    pub gateway: String,
    #[serde(default)]
    pub router: String,
    #[serde(default)]
    pub network: String,
}

// --- Environment configuration ---

/// Named CLI environments, persisted in the user config directory.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EnvConfig {
    /// The currently selected environment name.
    #[serde(default)]
    pub selected: String,
    /// Environment name to mesh proxy address.
    #[serde(default)]
    pub environments: BTreeMap<String, String>,
}
