// src/cli/dispatcher.rs

use crate::{
    cli::alias::AliasTable,
    core::{
        context::Context,
        error::{DispatchError, ParseError},
        parser::FlagParser,
        registry::Registry,
    },
};

/// The outcome of dispatching one line of operator input.
#[derive(Debug)]
pub enum Dispatch {
    /// The line was empty or whitespace-only; nothing was looked up or run.
    Skipped,
    /// The matched action ran and produced this payload.
    Completed(Vec<u8>),
}

/// Resolves, parses and executes operator input against the command registry.
///
/// The dispatcher holds no state between calls: every dispatched line
/// re-walks the tree and rebuilds flag parsers, trading a small constant
/// cost for correctness under environment-sourced defaults.
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    aliases: &'a AliasTable,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, aliases: &'a AliasTable) -> Self {
        Self { registry, aliases }
    }

    /// Dispatches one raw line of text.
    ///
    /// Lines are trimmed and split with shell-style quoting; an empty result
    /// is a no-op, not an error.
    pub fn dispatch_line(&self, line: &str) -> Result<Dispatch, DispatchError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Dispatch::Skipped);
        }
        let tokens = shlex::split(line).ok_or(ParseError::UnterminatedQuote)?;
        if tokens.is_empty() {
            return Ok(Dispatch::Skipped);
        }
        self.dispatch_tokens(&tokens).map(Dispatch::Completed)
    }

    /// Dispatches an already-tokenized command: alias-resolves the leading
    /// token, walks the matched tree's subcommands greedily, binds flags for
    /// the path into a chained context, and invokes the final node's action.
    pub fn dispatch_tokens(&self, tokens: &[String]) -> Result<Vec<u8>, DispatchError> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(DispatchError::UnknownCommand(String::new()));
        };

        let name = self.aliases.resolve(first);
        log::debug!("dispatching '{}' with {} token(s)", name, rest.len());

        let mut node = self
            .registry
            .lookup(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        // Greedy subcommand walk: descend while the next unconsumed token
        // exactly matches a child name. Intermediate nodes contribute their
        // environment/default-resolved flag bindings to the context chain;
        // explicit flag tokens always bind to the final node, since the
        // grammar requires them to follow the exhausted subcommand path.
        let mut consumed = 0;
        let mut parent: Option<Box<Context>> = None;
        while let Some(token) = rest.get(consumed) {
            let Some(child) = node.subcommand(token) else {
                break;
            };
            let bindings = FlagParser::build(&node.flags).parse(&[])?;
            parent = Some(Box::new(Context::new(bindings.values, parent)));
            node = child;
            consumed += 1;
        }

        let trailing = rest.get(consumed..).unwrap_or_default();
        let parsed = FlagParser::build(&node.flags).parse(trailing)?;
        let context = Context::new(parsed.values, parent);

        let Some(action) = node.action.as_ref() else {
            return Err(DispatchError::NotExecutable(node.name.clone()));
        };
        action(&context, &parsed.positionals).map_err(DispatchError::Action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{command::CommandNode, flag::FlagSchema};
    use anyhow::anyhow;

    /// A registry mirroring the store module's shape: `store read` with a
    /// defaulted `--database` flag and one positional key.
    fn store_registry() -> Registry {
        let read = CommandNode::new("read", "Read a record")
            .with_flags(vec![FlagSchema::string(
                "database",
                "Database for the command",
                "micro",
            )])
            .with_action(|ctx, args| {
                let key = args.first().map(String::as_str).unwrap_or("<none>");
                Ok(format!("{}/{}", ctx.get_string("database"), key).into_bytes())
            });
        let store = CommandNode::new("store", "Store operations").with_subcommands(vec![read]);

        let mut registry = Registry::new();
        registry.register(vec![store]).unwrap();
        registry
    }

    fn dispatch(registry: &Registry, line: &str) -> Result<Dispatch, DispatchError> {
        let aliases = AliasTable::standard();
        Dispatcher::new(registry, &aliases).dispatch_line(line)
    }

    fn payload_of(outcome: Dispatch) -> Vec<u8> {
        match outcome {
            Dispatch::Completed(payload) => payload,
            Dispatch::Skipped => panic!("expected a completed dispatch"),
        }
    }

    #[test]
    fn test_empty_and_whitespace_lines_are_noops() {
        let registry = store_registry();
        assert!(matches!(dispatch(&registry, "").unwrap(), Dispatch::Skipped));
        assert!(matches!(
            dispatch(&registry, "   \t  ").unwrap(),
            Dispatch::Skipped
        ));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let registry = store_registry();
        let err = dispatch(&registry, "frobnicate now").unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(ref name) if name == "frobnicate"));
    }

    #[test]
    fn test_subcommand_route_with_explicit_flag_and_positional() {
        let registry = store_registry();
        let payload = payload_of(dispatch(&registry, "store read --database=test mykey").unwrap());
        assert_eq!(payload, b"test/mykey");
    }

    #[test]
    fn test_subcommand_route_falls_back_to_static_default() {
        let registry = store_registry();
        let payload = payload_of(dispatch(&registry, "store read mykey").unwrap());
        assert_eq!(payload, b"micro/mykey");
    }

    #[test]
    fn test_parent_node_without_action_is_not_executable() {
        let registry = store_registry();
        let err = dispatch(&registry, "store").unwrap_err();
        assert!(matches!(err, DispatchError::NotExecutable(ref name) if name == "store"));
    }

    #[test]
    fn test_alias_dispatch_matches_canonical_dispatch() {
        let mut registry = Registry::new();
        registry
            .register(vec![CommandNode::new("list", "List services")
                .with_action(|_, _| Ok(b"svc.a\nsvc.b".to_vec()))])
            .unwrap();

        let via_alias = payload_of(dispatch(&registry, "ls").unwrap());
        let via_name = payload_of(dispatch(&registry, "list").unwrap());
        assert_eq!(via_alias, via_name);
    }

    #[test]
    fn test_subcommand_tokens_are_not_alias_resolved() {
        // "ls" aliases "list" at the top level only; as a subcommand token
        // it must be matched literally (and here, miss).
        let store = CommandNode::new("store", "Store operations").with_subcommands(vec![
            CommandNode::new("list", "List keys")
                .with_action(|_, args| Ok(format!("listed {}", args.join(" ")).into_bytes())),
        ]);
        let mut registry = Registry::new();
        registry.register(vec![store]).unwrap();

        let err = dispatch(&registry, "store ls").unwrap_err();
        assert!(matches!(err, DispatchError::NotExecutable(_)));
    }

    #[test]
    fn test_parent_flags_remain_visible_to_child_action() {
        let get = CommandNode::new("get", "Get one environment")
            .with_action(|ctx, _| Ok(ctx.get_string("profile").into_bytes()));
        let env = CommandNode::new("env", "Environments")
            .with_flags(vec![FlagSchema::string(
                "profile",
                "Profile name",
                "default-profile",
            )])
            .with_subcommands(vec![get]);
        let mut registry = Registry::new();
        registry.register(vec![env]).unwrap();

        let payload = payload_of(dispatch(&registry, "env get").unwrap());
        assert_eq!(payload, b"default-profile");
    }

    #[test]
    fn test_quoted_tokens_stay_whole() {
        let echo = CommandNode::new("echo", "Echo arguments")
            .with_action(|_, args| Ok(args.join("|").into_bytes()));
        let mut registry = Registry::new();
        registry.register(vec![echo]).unwrap();

        let payload = payload_of(dispatch(&registry, "echo 'hello world' second").unwrap());
        assert_eq!(payload, b"hello world|second");
    }

    #[test]
    fn test_unterminated_quote_is_a_parse_error() {
        let registry = store_registry();
        let err = dispatch(&registry, "store read 'mykey").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Parse(ParseError::UnterminatedQuote)
        ));
    }

    #[test]
    fn test_action_failure_surfaces_as_action_error() {
        let boom =
            CommandNode::new("boom", "Always fails").with_action(|_, _| Err(anyhow!("went wrong")));
        let mut registry = Registry::new();
        registry.register(vec![boom]).unwrap();

        let err = dispatch(&registry, "boom").unwrap_err();
        assert!(matches!(err, DispatchError::Action(_)));
        assert_eq!(err.to_string(), "went wrong");
    }

    #[test]
    fn test_last_registered_module_wins_dispatch() {
        // Two modules both contribute a top-level "list"; routing must
        // resolve against whichever registered last.
        let mut registry = Registry::new();
        registry
            .register(vec![CommandNode::new("list", "List services")
                .with_action(|_, _| Ok(b"services".to_vec()))])
            .unwrap();
        registry
            .register(vec![
                CommandNode::new("list", "List network items").with_subcommands(vec![
                    CommandNode::new("nodes", "List nodes")
                        .with_action(|_, _| Ok(b"nodes".to_vec())),
                ]),
            ])
            .unwrap();

        let payload = payload_of(dispatch(&registry, "list nodes").unwrap());
        assert_eq!(payload, b"nodes");
    }
}
