//! Relocation workflow: state machine, author resolution and outcome reporting

pub mod author;
pub mod engine;
pub mod outcome;
pub mod state;
pub mod status;

pub use author::AuthorDescriptor;
pub use engine::{relocate, RelocationWorkflow};
pub use outcome::{Diagnostic, Level, WorkflowOutcome};
pub use state::WorkflowState;
pub use status::ExitStatus;
