//! The conversion pipeline: output layout and the per-job state machine.

pub mod layout;
pub mod orchestrator;

pub use layout::MediaLayout;
pub use orchestrator::Orchestrator;
