// src/core/flag.rs

/// The typed shape of a flag, carrying its static default value.
///
/// The static default is the weakest binding source: it is overridden by the
/// first set environment variable in the schema's `env_vars` list, which in
/// turn is overridden by an explicit token on the dispatched line.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagKind {
    Str { default: String },
    Bool { default: bool },
    Uint { default: u64 },
    List { default: Vec<String> },
}

/// A resolved flag value, as bound into a `Context`.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Str(String),
    Bool(bool),
    Uint(u64),
    List(Vec<String>),
}

/// Declarative description of one named option.
///
/// Schemas are plain data: all binding logic (environment resolution, token
/// parsing) lives in `core::parser`, which is rebuilt from these schemas for
/// every dispatched invocation.
#[derive(Debug, Clone)]
pub struct FlagSchema {
    /// Flag name, unique within its owning command node.
    pub name: String,
    /// Human-readable description, used only for display.
    pub usage: String,
    pub kind: FlagKind,
    /// Environment variables that may supply a default; first one set wins.
    pub env_vars: Vec<String>,
}

impl FlagSchema {
    /// A string flag with a static default.
    pub fn string(name: &str, usage: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            kind: FlagKind::Str {
                default: default.to_string(),
            },
            env_vars: Vec::new(),
        }
    }

    /// A boolean flag. Present-without-value means `true`.
    pub fn boolean(name: &str, usage: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            kind: FlagKind::Bool { default },
            env_vars: Vec::new(),
        }
    }

    /// An unsigned-integer flag.
    pub fn uint(name: &str, usage: &str, default: u64) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            kind: FlagKind::Uint { default },
            env_vars: Vec::new(),
        }
    }

    /// A string-list flag. Repeated occurrences accumulate in input order.
    pub fn list(name: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            kind: FlagKind::List {
                default: Vec::new(),
            },
            env_vars: Vec::new(),
        }
    }

    /// Adds an environment variable as a default source. Chainable; sources
    /// are consulted in the order they were added.
    pub fn env(mut self, var: &str) -> Self {
        self.env_vars.push(var.to_string());
        self
    }

    /// The static default, as a bound value.
    pub fn static_default(&self) -> FlagValue {
        match &self.kind {
            FlagKind::Str { default } => FlagValue::Str(default.clone()),
            FlagKind::Bool { default } => FlagValue::Bool(*default),
            FlagKind::Uint { default } => FlagValue::Uint(*default),
            FlagKind::List { default } => FlagValue::List(default.clone()),
        }
    }
}
