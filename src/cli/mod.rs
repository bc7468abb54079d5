//! CLI module for PMP Response Cache

pub mod serve;

use clap::{Parser, Subcommand};

/// PMP Response Cache - exact and semantic caching in front of a slow generator
#[derive(Parser)]
#[command(name = "pmp-response-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}
