//! Command handlers invoked by the binary

pub mod relocate;

pub use relocate::{handle_relocate_command, handle_relocate_in, render_outcome};
