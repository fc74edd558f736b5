// src/core/mod.rs

pub mod command;
pub mod context;
pub mod error;
pub mod flag;
pub mod parser;
pub mod registry;
