// src/cli/alias.rs

use std::collections::HashMap;

/// A fixed mapping from shorthand tokens to canonical top-level command
/// names, loaded once at shell construction and read-only thereafter.
///
/// Resolution applies exactly once, to the leading token of a line;
/// subcommand tokens are never alias-resolved.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// The built-in shorthands.
    pub fn standard() -> Self {
        Self::from_pairs(&[("?", "help"), ("ls", "list")])
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(short, canonical)| (short.to_string(), canonical.to_string()))
                .collect(),
        }
    }

    /// Exact-match lookup; unresolved tokens pass through unchanged, since
    /// most commands have no alias.
    pub fn resolve<'t>(&'t self, token: &'t str) -> &'t str {
        self.entries.get(token).map_or(token, String::as_str)
    }
}
