//! Async session driver for the combat engine.
//!
//! This crate wires the synchronous [`combat_core::CombatEngine`] into tokio:
//! each started session is owned by a worker task, player input arrives
//! through a cloneable [`SessionHandle`], and the boss acts on its own timers.
//! Timers are tied to the session's cancellation token, so ending a session
//! guarantees nothing fires against it afterwards.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder, and pacing config
//! - [`api`] exposes the types downstream clients interact with
//! - `workers` keeps the session task internal to the crate
pub mod api;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, CombatEvent, RandomProvider, Result, RuntimeError, ScriptedProvider,
    SessionHandle,
};
pub use runtime::{CombatRuntime, RuntimeBuilder, RuntimeConfig};
