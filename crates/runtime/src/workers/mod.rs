//! Worker tasks that back the runtime orchestration.
//!
//! One session worker runs per started session and owns that session
//! exclusively; handles talk to it over channels.

mod session;

pub use session::{Command, Oracles, SessionWorker};
