//! CLI module for ModelKit
//!
//! Provides subcommands for running the HTTP adapter and for inspecting or
//! changing overrides against the configured store.

pub mod overrides;
pub mod serve;

use clap::{Parser, Subcommand};

/// ModelKit - runtime model overrides for AI features
#[derive(Parser)]
#[command(name = "modelkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP override API
    Serve,

    /// Resolve the model ID a feature would use right now
    Resolve(overrides::ResolveArgs),

    /// Print every persisted override
    List,

    /// Print the effective configuration of a feature
    Show(overrides::ShowArgs),

    /// Persist an override for a feature
    Set(overrides::SetArgs),

    /// Remove a feature's override
    Clear(overrides::ClearArgs),
}
