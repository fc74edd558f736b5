// src/commands/help.rs

//! `help` renders a snapshot of the registered top-level commands. The
//! snapshot is taken after all modules have registered, so it reflects
//! whatever won the registration order.

use crate::core::command::CommandNode;

/// Formats a `(name, usage)` listing with aligned columns.
pub fn render(summaries: &[(String, String)]) -> String {
    let width = summaries
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);
    summaries
        .iter()
        .map(|(name, usage)| format!("{name:width$}   {usage}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The command tree this module contributes.
pub fn commands(summaries: Vec<(String, String)>) -> Vec<CommandNode> {
    vec![
        CommandNode::new("help", "List available commands")
            .with_action(move |_, _| Ok(render(&summaries).into_bytes())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_usage_column() {
        let summaries = vec![
            ("env".to_string(), "Get and set the mesh environment".to_string()),
            ("network".to_string(), "Inspect the network".to_string()),
        ];
        let listing = render(&summaries);
        assert_eq!(
            listing,
            "env       Get and set the mesh environment\nnetwork   Inspect the network"
        );
    }

    #[test]
    fn test_render_empty_snapshot() {
        assert_eq!(render(&[]), "");
    }
}
