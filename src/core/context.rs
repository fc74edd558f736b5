// src/core/context.rs

use std::collections::HashMap;

use crate::core::flag::FlagValue;

/// The resolved-flag binding environment handed to an action.
///
/// A context owns its parent link, forming an immutable chain from the final
/// matched node back up through the subcommand path. Lookups walk the chain
/// innermost-first, so a child's binding shadows a parent's binding of the
/// same name.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, FlagValue>,
    parent: Option<Box<Context>>,
}

impl Context {
    pub fn new(values: HashMap<String, FlagValue>, parent: Option<Box<Self>>) -> Self {
        Self { values, parent }
    }

    /// Looks up a bound value, walking the parent chain innermost-first.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        match self.values.get(name) {
            Some(value) => Some(value),
            None => self.parent.as_deref().and_then(|p| p.get(name)),
        }
    }

    /// The bound string value, or an empty string if the flag is unknown.
    pub fn get_string(&self, name: &str) -> String {
        match self.get(name) {
            Some(FlagValue::Str(s)) => s.clone(),
            _ => String::new(),
        }
    }

    /// The bound boolean value, or `false` if the flag is unknown.
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FlagValue::Bool(true)))
    }

    /// The bound unsigned-integer value, or `0` if the flag is unknown.
    pub fn get_uint(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(FlagValue::Uint(n)) => *n,
            _ => 0,
        }
    }

    /// The bound string-list value, or an empty list if the flag is unknown.
    pub fn get_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FlagValue::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, FlagValue)]) -> HashMap<String, FlagValue> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let parent = Context::new(
            bindings(&[("address", FlagValue::Str("10.0.0.1:8085".into()))]),
            None,
        );
        let child = Context::new(
            bindings(&[("output", FlagValue::Str("json".into()))]),
            Some(Box::new(parent)),
        );

        assert_eq!(child.get_string("output"), "json");
        assert_eq!(child.get_string("address"), "10.0.0.1:8085");
    }

    #[test]
    fn test_innermost_binding_shadows_parent() {
        let parent = Context::new(
            bindings(&[("database", FlagValue::Str("micro".into()))]),
            None,
        );
        let child = Context::new(
            bindings(&[("database", FlagValue::Str("test".into()))]),
            Some(Box::new(parent)),
        );

        assert_eq!(child.get_string("database"), "test");
    }

    #[test]
    fn test_typed_getters_default_on_absence() {
        let ctx = Context::default();
        assert_eq!(ctx.get_string("missing"), "");
        assert!(!ctx.get_bool("missing"));
        assert_eq!(ctx.get_uint("missing"), 0);
        assert!(ctx.get_list("missing").is_empty());
    }
}
