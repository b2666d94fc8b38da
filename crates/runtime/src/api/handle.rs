//! Cloneable façade for driving one running session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! issuing player input, reading snapshots, or streaming events.
use std::sync::Arc;

use combat_core::{CombatAction, CombatSession, Phase, SessionSummary, Transition};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use super::errors::{Result, RuntimeError};
use super::events::CombatEvent;
use super::providers::ActionProvider;
use crate::workers::Command;

/// Client-facing handle to a session worker.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    boss_id: Arc<str>,
    abilities: Arc<[CombatAction]>,
    command_tx: mpsc::Sender<Command>,
    events: broadcast::Sender<CombatEvent>,
}

impl SessionHandle {
    pub(crate) fn new(
        boss_id: Arc<str>,
        abilities: Arc<[CombatAction]>,
        command_tx: mpsc::Sender<Command>,
        events: broadcast::Sender<CombatEvent>,
    ) -> Self {
        Self {
            boss_id,
            abilities,
            command_tx,
            events,
        }
    }

    pub fn boss_id(&self) -> &str {
        &self.boss_id
    }

    /// Abilities the player may submit in this encounter.
    pub fn abilities(&self) -> &[CombatAction] {
        &self.abilities
    }

    /// Roll initiative. Ignored outside the initiative phase.
    pub async fn roll_initiative(&self) -> Result<Transition> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RollInitiative { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit a player ability by id.
    ///
    /// Returns [`Transition::Ignored`] when it is not the player's turn or an
    /// animation is still running.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownAbility`] if the id is not offered in this
    /// encounter; [`RuntimeError::Resolve`] if the ability cannot be resolved,
    /// after which the session is aborted.
    pub async fn submit_action(&self, ability_id: impl Into<String>) -> Result<Transition> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::SubmitAction {
            ability_id: ability_id.into(),
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Read-only copy of the current session.
    pub async fn snapshot(&self) -> Result<CombatSession> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// End the session, cancelling any pending timers.
    ///
    /// Every clone of this handle fails with
    /// [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn end(&self) -> Result<SessionSummary> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::End { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CombatEvent> {
        self.events.subscribe()
    }

    /// Drive the battle to a terminal phase, asking `provider` for every
    /// player turn, then end the session.
    ///
    /// The boss acts on its own timers; this only waits for them.
    pub async fn run_to_completion(&self, provider: &dyn ActionProvider) -> Result<SessionSummary> {
        let mut events = self.subscribe();
        loop {
            let session = self.snapshot().await?;
            match session.phase() {
                phase if phase.is_terminal() => return self.end().await,
                Phase::Initiative => {
                    self.roll_initiative().await?;
                    continue;
                }
                Phase::PlayerTurn if !session.is_animating() => {
                    let ability_id = provider.choose_action(&session, &self.abilities).await?;
                    self.submit_action(ability_id).await?;
                    continue;
                }
                _ => {}
            }

            match events.recv().await {
                Ok(event) if event.is_final() => {
                    debug!(boss = %self.boss_id, ?event, "session closed while waiting");
                    return Err(RuntimeError::CommandChannelClosed);
                }
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return Err(RuntimeError::EventChannelClosed),
            }
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
