// Handler modules
pub mod explain;
pub mod modes;

// Re-export all handler functions
pub use explain::{ExplainOptions, build_report, handle_explain};
pub use modes::{format_modes, handle_modes};
