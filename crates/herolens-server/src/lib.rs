pub mod cli;
pub mod config;
pub mod render;
pub mod server;
pub mod startup;
pub mod state;

pub use cli::*;
pub use config::*;
pub use server::*;
pub use startup::*;
pub use state::*;
