//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod info;
pub mod list;
pub mod serve;

pub use info::run_info;
pub use list::run_list;
pub use serve::run_serve;
