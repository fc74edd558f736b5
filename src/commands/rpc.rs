// src/commands/rpc.rs

//! # RPC commands
//!
//! `call` and `publish`. A call resolves its target against the service
//! directory unless `--address` (or `MESH_ADDRESS`) pins a specific
//! instance; the request body is a JSON document passed as the last
//! positional argument.

use std::sync::Arc;

use anyhow::{Context as _, Result, anyhow};
use serde_json::{Value, json};

use crate::{
    commands::registry::ServiceDirectory,
    core::{command::CommandNode, context::Context, flag::FlagSchema, parser::required_arg},
};

fn call_flags() -> Vec<FlagSchema> {
    vec![
        FlagSchema::string(
            "address",
            "Set the address of the service instance to call",
            "",
        )
        .env("MESH_ADDRESS"),
        FlagSchema::string("output", "Set the output format; json (default), raw", "json")
            .env("MESH_OUTPUT"),
        FlagSchema::list("metadata", "A list of key-value pairs forwarded as metadata")
            .env("MESH_METADATA"),
    ]
}

/// Resolves the node address for a call: an explicit `--address` wins,
/// otherwise the first registered node of the service.
fn resolve_address(ctx: &Context, directory: &ServiceDirectory, service: &str) -> Result<String> {
    let pinned = ctx.get_string("address");
    if !pinned.is_empty() {
        return Ok(pinned);
    }
    let services = directory
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let found = services
        .get(service)
        .ok_or_else(|| anyhow!("service not found: '{service}'"))?;
    found
        .nodes
        .first()
        .map(|node| node.address.clone())
        .ok_or_else(|| anyhow!("service '{service}' has no registered nodes"))
}

/// The command trees this module contributes.
pub fn commands(directory: &ServiceDirectory) -> Vec<CommandNode> {
    let call = {
        let directory = Arc::clone(directory);
        CommandNode::new(
            "call",
            "Call a service, e.g. call greeter Say.Hello '{\"name\": \"John\"}'",
        )
        .with_flags(call_flags())
        .with_action(move |ctx, args| {
            let service = required_arg(args, 0, "service")?;
            let endpoint = required_arg(args, 1, "endpoint")?;
            let request: Value = match args.get(2) {
                Some(body) => serde_json::from_str(body).context("invalid request body")?,
                None => json!({}),
            };

            let address = resolve_address(ctx, &directory, service)?;
            let reply = json!({
                "service": service,
                "endpoint": endpoint,
                "node": address,
                "request": request,
                "metadata": ctx.get_list("metadata"),
            });
            let rendered = if ctx.get_string("output") == "raw" {
                reply.to_string()
            } else {
                serde_json::to_string_pretty(&reply).context("failed to render reply")?
            };
            Ok(rendered.into_bytes())
        })
    };

    let publish = CommandNode::new("publish", "Publish a message to a topic")
        .with_flags(vec![FlagSchema::list(
            "metadata",
            "A list of key-value pairs forwarded as metadata",
        )
        .env("MESH_METADATA")])
        .with_action(|_, args| {
            let _topic = required_arg(args, 0, "topic")?;
            let message = required_arg(args, 1, "message")?;
            serde_json::from_str::<Value>(message).context("invalid message body")?;
            Ok(b"ok".to_vec())
        });

    vec![call, publish]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::{alias::AliasTable, dispatcher::Dispatcher},
        commands::registry as registry_commands,
        core::registry::Registry,
    };

    const GREETER: &str =
        r#"{"name":"greeter","nodes":[{"id":"greeter-1","address":"10.0.0.4:8080"}]}"#;

    fn wired() -> Registry {
        let directory = registry_commands::directory();
        let mut registry = Registry::new();
        registry
            .register(registry_commands::commands(&directory))
            .unwrap();
        registry.register(commands(&directory)).unwrap();
        registry
    }

    fn dispatch(registry: &Registry, line: &str) -> Result<String> {
        let aliases = AliasTable::standard();
        let tokens = shlex::split(line).unwrap();
        let payload = Dispatcher::new(registry, &aliases)
            .dispatch_tokens(&tokens)
            .map_err(anyhow::Error::from)?;
        Ok(String::from_utf8(payload)?)
    }

    #[test]
    fn test_call_resolves_node_from_directory() {
        let registry = wired();
        dispatch(&registry, &format!("register service '{GREETER}'")).unwrap();

        let reply = dispatch(
            &registry,
            r#"call greeter Say.Hello '{"name": "John"}'"#,
        )
        .unwrap();
        assert!(reply.contains("10.0.0.4:8080"));
        assert!(reply.contains("Say.Hello"));
        assert!(reply.contains("John"));
    }

    #[test]
    fn test_call_unknown_service_fails() {
        let registry = wired();
        let err = dispatch(&registry, "call greeter Say.Hello").unwrap_err();
        assert!(err.to_string().contains("service not found"));
    }

    #[test]
    fn test_explicit_address_skips_directory_lookup() {
        let registry = wired();
        let reply = dispatch(
            &registry,
            "call --address=10.9.9.9:9000 greeter Say.Hello",
        )
        .unwrap();
        assert!(reply.contains("10.9.9.9:9000"));
    }

    #[test]
    fn test_call_rejects_malformed_request_body() {
        let registry = wired();
        let err = dispatch(
            &registry,
            "call --address=10.9.9.9:9000 greeter Say.Hello not-json",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid request body"));
    }

    #[test]
    fn test_raw_output_is_single_line() {
        let registry = wired();
        let reply = dispatch(
            &registry,
            "call --address=10.9.9.9:9000 --output=raw greeter Say.Hello",
        )
        .unwrap();
        assert!(!reply.contains('\n'));
    }

    #[test]
    fn test_publish_validates_message() {
        let registry = wired();
        let ok = dispatch(&registry, r#"publish events '{"type": "deploy"}'"#).unwrap();
        assert_eq!(ok, "ok");

        let err = dispatch(&registry, "publish events not-json").unwrap_err();
        assert!(err.to_string().contains("invalid message body"));
    }
}
