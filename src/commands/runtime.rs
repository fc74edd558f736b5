// src/commands/runtime.rs

//! # Runtime commands
//!
//! `runtime ps|start|stop` over a shared table of managed services. The
//! real orchestration lives behind this surface; the table tracks what the
//! operator asked for.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;

use crate::core::{command::CommandNode, flag::FlagSchema, parser::required_arg};

/// One managed service, as shown by `runtime ps`.
#[derive(Debug, Clone)]
pub struct ManagedService {
    pub version: String,
    pub source: String,
    pub status: String,
}

pub type ServiceTable = Arc<Mutex<BTreeMap<String, ManagedService>>>;

pub fn table() -> ServiceTable {
    Arc::default()
}

fn lock(table: &ServiceTable) -> MutexGuard<'_, BTreeMap<String, ManagedService>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The command tree this module contributes.
pub fn commands(table: &ServiceTable) -> Vec<CommandNode> {
    let ps = {
        let table = Arc::clone(table);
        CommandNode::new("ps", "List services managed by the runtime").with_action(move |_, _| {
            let services = lock(&table);
            let lines: Vec<String> = services
                .iter()
                .map(|(name, service)| {
                    format!(
                        "{name} {} {} {}",
                        service.version, service.source, service.status
                    )
                })
                .collect();
            Ok(lines.join("\n").into_bytes())
        })
    };

    let start = {
        let table = Arc::clone(table);
        CommandNode::new("start", "Start a service")
            .with_flags(vec![
                FlagSchema::string("version", "Version of the service to run", "latest")
                    .env("MESH_RUNTIME_VERSION"),
                FlagSchema::string("source", "Source of the service, e.g. a repository", ""),
            ])
            .with_action(move |ctx, args| {
                let name = required_arg(args, 0, "service")?;
                lock(&table).insert(
                    name.to_string(),
                    ManagedService {
                        version: ctx.get_string("version"),
                        source: ctx.get_string("source"),
                        status: "running".to_string(),
                    },
                );
                Ok(format!("started {name}").into_bytes())
            })
    };

    let stop = {
        let table = Arc::clone(table);
        CommandNode::new("stop", "Stop a running service").with_action(move |_, args| {
            let name = required_arg(args, 0, "service")?;
            let mut services = lock(&table);
            let service = services
                .get_mut(name)
                .ok_or_else(|| anyhow!("service not running: '{name}'"))?;
            service.status = "stopped".to_string();
            Ok(format!("stopped {name}").into_bytes())
        })
    };

    vec![
        CommandNode::new("runtime", "Manage services in the runtime")
            .with_subcommands(vec![ps, start, stop]),
    ]
}
