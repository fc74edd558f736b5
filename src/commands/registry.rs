// src/commands/registry.rs

//! # Service registry commands
//!
//! `list services`, `get service`, `register service` and
//! `deregister service` over a shared service directory. Registration takes
//! a JSON service definition (see [`Service`]); deregistration accepts
//! either a definition or a bare service name.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context as _, anyhow};

use crate::{
    core::{command::CommandNode, parser::required_arg},
    models::Service,
};

/// The directory of known services, shared across the captured actions.
pub type ServiceDirectory = Arc<Mutex<BTreeMap<String, Service>>>;

pub fn directory() -> ServiceDirectory {
    Arc::default()
}

fn lock(directory: &ServiceDirectory) -> MutexGuard<'_, BTreeMap<String, Service>> {
    directory.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The command trees this module contributes.
pub fn commands(directory: &ServiceDirectory) -> Vec<CommandNode> {
    let list_services = {
        let directory = Arc::clone(directory);
        CommandNode::new("services", "List services in registry").with_action(move |_, _| {
            let services = lock(&directory);
            let names: Vec<&str> = services.keys().map(String::as_str).collect();
            Ok(names.join("\n").into_bytes())
        })
    };

    let get_service = {
        let directory = Arc::clone(directory);
        CommandNode::new("service", "Get service from registry").with_action(move |_, args| {
            let name = required_arg(args, 0, "service")?;
            let services = lock(&directory);
            let service = services
                .get(name)
                .ok_or_else(|| anyhow!("service not found: '{name}'"))?;
            serde_json::to_vec_pretty(service).context("failed to render service definition")
        })
    };

    let register_service = {
        let directory = Arc::clone(directory);
        CommandNode::new("service", "Register a service with JSON definition").with_action(
            move |_, args| {
                let definition = required_arg(args, 0, "definition")?;
                let service: Service = serde_json::from_str(definition)
                    .context("invalid service definition")?;
                lock(&directory).insert(service.name.clone(), service);
                Ok(b"ok".to_vec())
            },
        )
    };

    let deregister_service = {
        let directory = Arc::clone(directory);
        CommandNode::new("service", "Deregister a service with JSON definition").with_action(
            move |_, args| {
                let definition = required_arg(args, 0, "definition")?;
                // Accept a full definition or a bare name.
                let name = serde_json::from_str::<Service>(definition)
                    .map(|service| service.name)
                    .unwrap_or_else(|_| definition.to_string());
                match lock(&directory).remove(&name) {
                    Some(_) => Ok(b"ok".to_vec()),
                    None => Err(anyhow!("service not found: '{name}'")),
                }
            },
        )
    };

    vec![
        CommandNode::new("list", "List items in registry or network")
            .with_subcommands(vec![list_services]),
        CommandNode::new("get", "Get item from registry").with_subcommands(vec![get_service]),
        CommandNode::new("register", "Register an item in the registry")
            .with_subcommands(vec![register_service]),
        CommandNode::new("deregister", "Deregister an item in the registry")
            .with_subcommands(vec![deregister_service]),
    ]
}
