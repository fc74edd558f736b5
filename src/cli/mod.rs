use clap::Parser;

pub mod alias;
pub mod dispatcher;
pub mod output;
pub mod shell;

/// meshctl: an operator shell for a microservice mesh.
///
/// `meshctl` routes a single command in one-shot mode:
///
///   - `meshctl store read --database=test mykey`
///   - `meshctl list services`
///
/// or drops into an interactive session with `meshctl cli`, where the same
/// commands are dispatched one line at a time.
///
/// The command set is assembled at startup from independent modules
/// (network, store, registry, runtime, ...), so clap only captures the raw
/// token stream here; resolution happens in the dispatcher.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command line to dispatch: a top-level command name, optional
    /// subcommand names, then flags and positional arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}
