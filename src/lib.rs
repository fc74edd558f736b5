pub mod cli;
pub mod commands;
pub mod constants;
pub mod core;
pub mod models;
