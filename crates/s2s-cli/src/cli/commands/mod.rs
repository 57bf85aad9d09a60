//! CLI command handlers. Each command is in its own file.

mod batch;
mod config;
mod transfer;

pub use batch::run_batch_file;
pub use config::run_show_config;
pub use transfer::run_transfer;

#[cfg(test)]
pub(crate) use batch::{parse_batch, render_outcomes};
