// src/commands/store.rs

//! # Store commands
//!
//! `store read|write|delete|list` over a shared key-value backend, plus the
//! `databases` and `tables` listings. Record subcommands scope their
//! operation with `--database` and `--table` flags, which fall back to
//! `MESH_STORE_DATABASE` / `MESH_STORE_TABLE` and then to the built-in
//! defaults.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;

use crate::{
    constants::{DEFAULT_DATABASE, DEFAULT_TABLE},
    core::{command::CommandNode, context::Context, flag::FlagSchema, parser::required_arg},
};

/// Records keyed by (database, table), then by record key.
type Tables = BTreeMap<(String, String), BTreeMap<String, String>>;

/// The store backend shared across the captured actions.
pub type SharedStore = Arc<Mutex<Tables>>;

pub fn in_memory() -> SharedStore {
    Arc::default()
}

fn lock(store: &SharedStore) -> MutexGuard<'_, Tables> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

fn database_flag() -> FlagSchema {
    FlagSchema::string("database", "Database for the command", DEFAULT_DATABASE)
        .env("MESH_STORE_DATABASE")
}

fn scope_flags() -> Vec<FlagSchema> {
    vec![
        database_flag(),
        FlagSchema::string("table", "Table for the command", DEFAULT_TABLE)
            .env("MESH_STORE_TABLE"),
    ]
}

fn scope(ctx: &Context) -> (String, String) {
    (ctx.get_string("database"), ctx.get_string("table"))
}

/// The command tree this module contributes.
pub fn commands(store: &SharedStore) -> Vec<CommandNode> {
    let read = {
        let store = Arc::clone(store);
        let mut flags = scope_flags();
        flags.push(FlagSchema::boolean(
            "prefix",
            "Read every record whose key starts with the given key",
            false,
        ));
        flags.push(FlagSchema::boolean(
            "verbose",
            "Show keys alongside values (only values shown by default)",
            false,
        ));
        CommandNode::new("read", "Read a record")
            .with_flags(flags)
            .with_action(move |ctx, args| {
                let key = required_arg(args, 0, "key")?;
                let (database, table) = scope(ctx);
                let tables = lock(&store);
                let records = tables.get(&(database.clone(), table));
                let matched: Vec<(&String, &String)> = match records {
                    Some(records) if ctx.get_bool("prefix") => records
                        .iter()
                        .filter(|(record_key, _)| record_key.starts_with(key))
                        .collect(),
                    Some(records) => records.get_key_value(key).into_iter().collect(),
                    None => Vec::new(),
                };
                if matched.is_empty() {
                    return Err(anyhow!("not found: '{key}' in database '{database}'"));
                }
                let verbose = ctx.get_bool("verbose");
                let lines: Vec<String> = matched
                    .into_iter()
                    .map(|(record_key, value)| {
                        if verbose {
                            format!("{record_key} {value}")
                        } else {
                            value.clone()
                        }
                    })
                    .collect();
                Ok(lines.join("\n").into_bytes())
            })
    };

    let write = {
        let store = Arc::clone(store);
        CommandNode::new("write", "Write a record")
            .with_flags(scope_flags())
            .with_action(move |ctx, args| {
                let key = required_arg(args, 0, "key")?;
                let value = required_arg(args, 1, "value")?;
                let mut tables = lock(&store);
                tables
                    .entry(scope(ctx))
                    .or_default()
                    .insert(key.to_string(), value.to_string());
                Ok(b"ok".to_vec())
            })
    };

    let delete = {
        let store = Arc::clone(store);
        CommandNode::new("delete", "Delete a record")
            .with_flags(scope_flags())
            .with_action(move |ctx, args| {
                let key = required_arg(args, 0, "key")?;
                let (database, table) = scope(ctx);
                let mut tables = lock(&store);
                let removed = tables
                    .get_mut(&(database.clone(), table))
                    .and_then(|records| records.remove(key));
                match removed {
                    Some(_) => Ok(b"ok".to_vec()),
                    None => Err(anyhow!("not found: '{key}' in database '{database}'")),
                }
            })
    };

    let list = {
        let store = Arc::clone(store);
        let mut flags = scope_flags();
        flags.push(FlagSchema::boolean(
            "prefix",
            "List only keys starting with the given prefix",
            false,
        ));
        flags.push(FlagSchema::uint("limit", "Maximum number of keys to list", 0));
        flags.push(FlagSchema::uint("offset", "Number of keys to skip", 0));
        CommandNode::new("list", "List record keys")
            .with_flags(flags)
            .with_action(move |ctx, args| {
                let tables = lock(&store);
                let mut keys: Vec<&str> = tables
                    .get(&scope(ctx))
                    .map(|records| records.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                if ctx.get_bool("prefix") {
                    let wanted = required_arg(args, 0, "prefix")?;
                    keys.retain(|key| key.starts_with(wanted));
                }
                let keys = keys.into_iter().skip(ctx.get_uint("offset") as usize);
                let keys: Vec<&str> = match ctx.get_uint("limit") {
                    0 => keys.collect(),
                    limit => keys.take(limit as usize).collect(),
                };
                Ok(keys.join("\n").into_bytes())
            })
    };

    let databases = {
        let store = Arc::clone(store);
        CommandNode::new("databases", "List all databases known to the store").with_action(
            move |_, _| {
                let tables = lock(&store);
                // Keys are sorted, so a single dedup pass suffices.
                let mut names: Vec<&str> =
                    tables.keys().map(|(database, _)| database.as_str()).collect();
                names.dedup();
                Ok(names.join("\n").into_bytes())
            },
        )
    };

    let table_names = {
        let store = Arc::clone(store);
        CommandNode::new("tables", "List all tables in the selected database")
            .with_flags(vec![database_flag()])
            .with_action(move |ctx, _| {
                let database = ctx.get_string("database");
                let tables = lock(&store);
                let names: Vec<&str> = tables
                    .keys()
                    .filter(|(owner, _)| *owner == database)
                    .map(|(_, table)| table.as_str())
                    .collect();
                Ok(names.join("\n").into_bytes())
            })
    };

    vec![
        CommandNode::new("store", "Read, write and list records in the store")
            .with_subcommands(vec![read, write, delete, list, databases, table_names]),
    ]
}
