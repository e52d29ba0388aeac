pub mod command;
pub mod config;
pub mod session;

pub use command::{Command, CommandError};
pub use config::VaultConfig;
pub use session::{Flow, Session};
