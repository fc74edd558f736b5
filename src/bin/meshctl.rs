// src/bin/meshctl.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use meshctl::{
    cli::{Cli, alias::AliasTable, dispatcher::Dispatcher, output, shell::Shell},
    commands, constants,
    core::registry::Registry,
};
use std::io::{self, Write};

/// The main entry point of the `meshctl` application.
///
/// It sets up logging, assembles the command registry from every
/// contributing module, routes argv through the dispatcher (or into the
/// interactive shell), and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let registry = build_registry()?;
    let aliases = AliasTable::standard();
    let dispatcher = Dispatcher::new(&registry, &aliases);

    match cli.command.first().map(String::as_str) {
        // No arguments: show what is available.
        None => {
            let mut stdout = io::stdout();
            writeln!(stdout, "Available commands:\n")?;
            output::render(
                &mut stdout,
                commands::help::render(&registry.summaries()).as_bytes(),
            )?;
            writeln!(stdout, "\nRun 'meshctl cli' for the interactive shell.")?;
            Ok(())
        }
        // `meshctl cli` drops into the interactive read-eval loop.
        Some(name) if name == constants::INTERACTIVE_COMMAND => {
            let stdin = io::stdin();
            let mut shell = Shell::new(dispatcher, stdin.lock(), io::stdout());
            shell.run()?;
            Ok(())
        }
        // One-shot mode: dispatch argv exactly once and exit. Any dispatch
        // error propagates to the centralized handler and a non-zero exit.
        Some(_) => {
            let payload = dispatcher.dispatch_tokens(&cli.command)?;
            output::render(&mut io::stdout(), &payload)?;
            Ok(())
        }
    }
}

/// Assembles the registry from every contributing module.
///
/// Registration order is the only coupling between modules: if two of them
/// claim the same top-level name, the later one wins. The registry is
/// complete before any input is routed.
fn build_registry() -> Result<Registry> {
    let store = commands::store::in_memory();
    let directory = commands::registry::directory();
    let topology = commands::network::topology();
    let services = commands::runtime::table();

    let mut registry = Registry::new();
    registry.register(commands::store::commands(&store))?;
    registry.register(commands::registry::commands(&directory))?;
    registry.register(commands::network::commands(&topology))?;
    registry.register(commands::runtime::commands(&services))?;
    registry.register(commands::rpc::commands(&directory))?;
    registry.register(commands::env::commands(commands::env::default_path()))?;

    // Help sees everything registered before it.
    let summaries = registry.summaries();
    registry.register(commands::help::commands(summaries))?;

    Ok(registry)
}
