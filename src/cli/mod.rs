pub mod context;
pub mod output;
mod shell;
pub mod table;

pub use context::CliError;
pub use shell::run_cli;
