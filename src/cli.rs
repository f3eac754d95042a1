use clap::{Parser, Subcommand};

/// gemrelay — secret-holding relay for the Gemini generateContent API
#[derive(Parser)]
#[command(name = "gemrelay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Serve {
        /// Port to bind (overrides RELAY_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration without starting the server
    Check,
}
