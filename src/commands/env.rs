// src/commands/env.rs

//! # Environment commands
//!
//! Named CLI environments (`local`, `staging`, ...) mapping to mesh proxy
//! addresses, persisted as JSON in the user config directory. `env` lists
//! them, `env get` shows the selection, `env set` switches it and
//! `env add` defines a new one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};

use crate::{
    constants::{CONFIG_DIR, ENVIRONMENTS_FILENAME},
    core::{command::CommandNode, context::Context, parser::required_arg},
    models::EnvConfig,
};

/// Where environments live for this user. Falls back to the working
/// directory when no config directory is available.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(ENVIRONMENTS_FILENAME)
}

fn load(path: &Path) -> Result<EnvConfig> {
    if !path.exists() {
        return Ok(EnvConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed {}", path.display()))
}

fn save(path: &Path, config: &EnvConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(config).context("failed to serialize environments")?;
    fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
}

/// The command tree this module contributes.
pub fn commands(path: PathBuf) -> Vec<CommandNode> {
    let list = {
        let path = path.clone();
        move |_: &Context, _: &[String]| -> Result<Vec<u8>> {
            let config = load(&path)?;
            let lines: Vec<String> = config
                .environments
                .iter()
                .map(|(name, address)| {
                    let marker = if *name == config.selected { "* " } else { "  " };
                    format!("{marker}{name} {address}")
                })
                .collect();
            Ok(lines.join("\n").into_bytes())
        }
    };

    let get = {
        let path = path.clone();
        CommandNode::new("get", "Show the selected environment").with_action(move |_, _| {
            let config = load(&path)?;
            if config.selected.is_empty() {
                return Err(anyhow!("no environment selected"));
            }
            let address = config
                .environments
                .get(&config.selected)
                .cloned()
                .unwrap_or_default();
            Ok(format!("{} {address}", config.selected).into_bytes())
        })
    };

    let set = {
        let path = path.clone();
        CommandNode::new("set", "Select an environment").with_action(move |_, args| {
            let name = required_arg(args, 0, "name")?;
            let mut config = load(&path)?;
            if !config.environments.contains_key(name) {
                return Err(anyhow!("unknown environment: '{name}'"));
            }
            config.selected = name.to_string();
            save(&path, &config)?;
            Ok(b"ok".to_vec())
        })
    };

    let add = {
        let path = path.clone();
        CommandNode::new("add", "Add a named environment").with_action(move |_, args| {
            let name = required_arg(args, 0, "name")?;
            let address = required_arg(args, 1, "address")?;
            let mut config = load(&path)?;
            config
                .environments
                .insert(name.to_string(), address.to_string());
            if config.selected.is_empty() {
                config.selected = name.to_string();
            }
            save(&path, &config)?;
            Ok(b"ok".to_vec())
        })
    };

    vec![
        CommandNode::new("env", "Get and set the mesh environment")
            .with_action(list)
            .with_subcommands(vec![get, set, add]),
    ]
}
