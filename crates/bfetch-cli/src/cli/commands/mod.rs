//! CLI command handlers. Each command is in its own file.

mod completions;
mod config;
mod run;

pub use completions::{run_completions, run_man};
pub use config::{load_config, run_show_config};
pub use run::{exit_status, finish_printer, format_progress, run_batch, RunOverrides};
