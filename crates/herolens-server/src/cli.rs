use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "herolens")]
#[command(
    author,
    version,
    about = "Classify uploaded images and chart the class probabilities"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "herolens.yaml", env = "HEROLENS_CONFIG")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Without a command the model is fetched and loaded, then the process exits
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and start the HTTP server
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// True when the network listener should be started
    pub fn should_serve(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { .. }))
    }
}
