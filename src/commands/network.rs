// src/commands/network.rs

//! # Network commands
//!
//! `network connect|connections|graph|nodes|routes|services` over a shared
//! view of the mesh topology. The routing table is filterable with the
//! `routes` flags; all other subcommands are plain views.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    core::{command::CommandNode, context::Context, flag::FlagSchema, parser::required_arg},
    models::Route,
};

/// The locally known mesh topology.
#[derive(Debug, Clone)]
pub struct Topology {
    pub node_id: String,
    pub address: String,
    /// Immediate connections: peer id to peer address.
    pub peers: BTreeMap<String, String>,
    pub routes: Vec<Route>,
}

impl Topology {
    pub fn with_local_node(node_id: &str, address: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            address: address.to_string(),
            peers: BTreeMap::new(),
            routes: vec![Route {
                service: node_id.to_string(),
                address: address.to_string(),
                gateway: String::new(),
                router: node_id.to_string(),
                network: "mesh".to_string(),
            }],
        }
    }
}

pub type SharedTopology = Arc<Mutex<Topology>>;

/// A topology seeded with only the local node.
pub fn topology() -> SharedTopology {
    Arc::new(Mutex::new(Topology::with_local_node(
        "mesh.node.local",
        "127.0.0.1:8085",
    )))
}

fn lock(topology: &SharedTopology) -> MutexGuard<'_, Topology> {
    topology.lock().unwrap_or_else(PoisonError::into_inner)
}

fn route_filters() -> Vec<FlagSchema> {
    vec![
        FlagSchema::string("service", "Filter by service", ""),
        FlagSchema::string("address", "Filter by address", ""),
        FlagSchema::string("gateway", "Filter by gateway", ""),
        FlagSchema::string("router", "Filter by router", ""),
        FlagSchema::string("network", "Filter by network", ""),
    ]
}

fn matches_filters(route: &Route, ctx: &Context) -> bool {
    let check = |flag: &str, field: &str| {
        let wanted = ctx.get_string(flag);
        wanted.is_empty() || wanted == field
    };
    check("service", &route.service)
        && check("address", &route.address)
        && check("gateway", &route.gateway)
        && check("router", &route.router)
        && check("network", &route.network)
}

/// The command tree this module contributes.
pub fn commands(topology: &SharedTopology) -> Vec<CommandNode> {
    let connect = {
        let topology = Arc::clone(topology);
        CommandNode::new("connect", "Connect to the network; specify a node as ip:port")
            .with_action(move |_, args| {
                let address = required_arg(args, 0, "address")?;
                let mut topo = lock(&topology);
                let peer_id = format!("mesh.node.{}", topo.peers.len() + 1);
                let router = topo.node_id.clone();
                topo.peers.insert(peer_id.clone(), address.to_string());
                topo.routes.push(Route {
                    service: peer_id.clone(),
                    address: address.to_string(),
                    gateway: address.to_string(),
                    router,
                    network: "mesh".to_string(),
                });
                Ok(format!("connected to {address} as {peer_id}").into_bytes())
            })
    };

    let connections = {
        let topology = Arc::clone(topology);
        CommandNode::new("connections", "List the immediate connections to the network")
            .with_action(move |_, _| {
                let topo = lock(&topology);
                let lines: Vec<String> = topo
                    .peers
                    .iter()
                    .map(|(id, address)| format!("{id} {address}"))
                    .collect();
                Ok(lines.join("\n").into_bytes())
            })
    };

    let graph = {
        let topology = Arc::clone(topology);
        CommandNode::new("graph", "Get the network graph").with_action(move |_, _| {
            let topo = lock(&topology);
            let mut lines = vec![format!("{} ({})", topo.node_id, topo.address)];
            for (id, address) in &topo.peers {
                lines.push(format!("  |- {id} ({address})"));
            }
            Ok(lines.join("\n").into_bytes())
        })
    };

    let nodes = {
        let topology = Arc::clone(topology);
        CommandNode::new("nodes", "List nodes in the network").with_action(move |_, _| {
            let topo = lock(&topology);
            let mut lines = vec![format!("{} {}", topo.node_id, topo.address)];
            lines.extend(
                topo.peers
                    .iter()
                    .map(|(id, address)| format!("{id} {address}")),
            );
            Ok(lines.join("\n").into_bytes())
        })
    };

    let routes = {
        let topology = Arc::clone(topology);
        CommandNode::new("routes", "List network routes")
            .with_flags(route_filters())
            .with_action(move |ctx, _| {
                let topo = lock(&topology);
                let lines: Vec<String> = topo
                    .routes
                    .iter()
                    .filter(|route| matches_filters(route, ctx))
                    .map(|route| {
                        format!(
                            "{} {} {} {} {}",
                            route.service, route.address, route.gateway, route.router,
                            route.network
                        )
                    })
                    .collect();
                Ok(lines.join("\n").into_bytes())
            })
    };

    let services = {
        let topology = Arc::clone(topology);
        CommandNode::new("services", "Get the network services").with_action(move |_, _| {
            let topo = lock(&topology);
            let mut names: Vec<&str> =
                topo.routes.iter().map(|route| route.service.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            Ok(names.join("\n").into_bytes())
        })
    };

    vec![
        CommandNode::new("network", "Inspect and join the service mesh network")
            .with_subcommands(vec![connect, connections, graph, nodes, routes, services]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::{
        cli::{alias::AliasTable, dispatcher::Dispatcher},
        core::registry::Registry,
    };

    fn wired() -> (SharedTopology, Registry) {
        let topology = topology();
        let mut registry = Registry::new();
        registry.register(commands(&topology)).unwrap();
        (topology, registry)
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
    fn test_nodes_always_includes_the_local_node() {
        let (_topology, registry) = wired();
        let listing = dispatch(&registry, "network nodes").unwrap();
        assert!(listing.contains("mesh.node.local 127.0.0.1:8085"));
    }

    #[test]
    fn test_connect_adds_a_connection_and_a_route() {
        let (_topology, registry) = wired();
        dispatch(&registry, "network connect 10.0.0.9:8085").unwrap();

        let connections = dispatch(&registry, "network connections").unwrap();
        assert!(connections.contains("10.0.0.9:8085"));

        let routes = dispatch(&registry, "network routes").unwrap();
        assert!(routes.contains("10.0.0.9:8085"));
    }

    #[test]
    fn test_connect_without_address_reports_missing_argument() {
        let (_topology, registry) = wired();
        let err = dispatch(&registry, "network connect").unwrap_err();
        assert!(err.to_string().contains("missing required argument <address>"));
    }

    #[test]
    fn test_connect_routes_the_peer_through_the_local_node() {
        let (_topology, registry) = wired();
        dispatch(&registry, "network connect 10.0.0.9:8085").unwrap();

        let routed = dispatch(&registry, "network routes --router=mesh.node.local").unwrap();
        assert!(routed.contains("10.0.0.9:8085"));
    }

    #[test]
    fn test_routes_filters_by_service() {
        let (_topology, registry) = wired();
        dispatch(&registry, "network connect 10.0.0.9:8085").unwrap();

        let filtered = dispatch(&registry, "network routes --service=mesh.node.local").unwrap();
        assert!(filtered.contains("mesh.node.local"));
        assert!(!filtered.contains("10.0.0.9:8085"));
    }

    #[test]
    fn test_routes_filter_with_no_match_is_empty() {
        let (_topology, registry) = wired();
        let filtered = dispatch(&registry, "network routes --service=absent").unwrap();
        assert!(filtered.is_empty());
    }
}
