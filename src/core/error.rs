// src/core/error.rs

use thiserror::Error;

/// Failures while binding a line's tokens against a node's flag schemas.
///
/// These are always recoverable: the dispatcher reports them to the operator
/// and, in interactive mode, the shell keeps reading.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown flag '--{0}'")]
    UnknownFlag(String),

    #[error("flag '--{flag}' requires a value")]
    MissingValue { flag: String },

    #[error("invalid value '{value}' for flag '--{flag}': expected {expected}")]
    InvalidValue {
        flag: String,
        value: String,
        expected: &'static str,
    },

    #[error("missing required argument <{0}>")]
    MissingArgument(String),

    #[error("unterminated quote in input")]
    UnterminatedQuote,
}

/// Failures while attaching command trees to the registry. Fatal to the
/// registration call only; the whole batch is rejected without partial
/// application.
#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
}

/// Everything that can go wrong while routing one line of operator input.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("'{0}' is not executable; expected one of its subcommands")]
    NotExecutable(String),

    #[error("{0:#}")]
    Action(anyhow::Error),
}
