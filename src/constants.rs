// src/constants.rs

/// The prompt printed before each interactive read.
pub const PROMPT: &str = "mesh> ";

/// The top-level token that drops the process into interactive mode.
pub const INTERACTIVE_COMMAND: &str = "cli";

/// The name of the directory containing meshctl configuration
/// (in ~/.config/).
pub const CONFIG_DIR: &str = "meshctl";

/// The file holding named CLI environments (inside the config directory).
pub const ENVIRONMENTS_FILENAME: &str = "environments.json";

/// The database a store command targets when neither a flag nor the
/// environment says otherwise.
pub const DEFAULT_DATABASE: &str = "micro";

/// The table a store command targets by default.
pub const DEFAULT_TABLE: &str = "store";
