//! Session worker that owns the authoritative [`CombatSession`].
//!
//! Receives commands from [`crate::SessionHandle`], feeds them to
//! [`CombatEngine`], and publishes the resulting [`CombatEvent`]s. Delayed
//! work (the animation window and the boss auto-turn) runs as spawned timers
//! that report back through the same command channel.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    CatalogOracle, ClockOracle, CombatAction, CombatConfig, CombatEngine, CombatEnv, CombatError,
    CombatSession, Env, LogEntryId, Phase, ResolveError, RngOracle, SessionSummary, Side,
    Transition,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::{CombatEvent, Result, RuntimeError};
use crate::runtime::RuntimeConfig;

/// Commands that can be sent to the session worker.
pub enum Command {
    /// Roll initiative (only meaningful in the initiative phase).
    RollInitiative { reply: oneshot::Sender<Transition> },
    /// Resolve a player ability by id.
    SubmitAction {
        ability_id: String,
        reply: oneshot::Sender<Result<Transition>>,
    },
    /// Read-only copy of the session.
    Snapshot {
        reply: oneshot::Sender<CombatSession>,
    },
    /// Discard the session and stop the worker.
    End {
        reply: oneshot::Sender<SessionSummary>,
    },
    /// Timer: the animation window elapsed.
    ClearAnimation,
    /// Timer: the boss turn delay elapsed.
    BossTurn,
}

/// Read-only inputs shared by every session of a runtime.
#[derive(Clone)]
pub struct Oracles {
    pub catalog: Arc<dyn CatalogOracle>,
    pub rng: Arc<dyn RngOracle>,
    pub clock: Arc<dyn ClockOracle>,
    pub config: Arc<CombatConfig>,
}

impl Oracles {
    pub fn env(&self) -> CombatEnv<'_> {
        let catalog: &dyn CatalogOracle = self.catalog.as_ref();
        let rng: &dyn RngOracle = self.rng.as_ref();
        let clock: &dyn ClockOracle = self.clock.as_ref();
        Env::new(catalog, rng, clock, self.config.as_ref())
    }
}

/// Background task that processes commands for a single session.
pub struct SessionWorker {
    session: CombatSession,
    oracles: Oracles,
    abilities: Arc<[CombatAction]>,
    timings: RuntimeConfig,
    command_rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::WeakSender<Command>,
    events: broadcast::Sender<CombatEvent>,
    cancel: CancellationToken,
    pending_boss_turn: Option<CancellationToken>,
    last_published: Option<LogEntryId>,
}

impl SessionWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: CombatSession,
        oracles: Oracles,
        abilities: Arc<[CombatAction]>,
        timings: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        timer_tx: mpsc::WeakSender<Command>,
        events: broadcast::Sender<CombatEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let last_published = session.log().last().map(|entry| entry.id);
        Self {
            session,
            oracles,
            abilities,
            timings,
            command_rx,
            timer_tx,
            events,
            cancel,
            pending_boss_turn: None,
            last_published,
        }
    }

    /// Main worker loop.
    ///
    /// Exits when the session is ended, the token is cancelled, or every
    /// handle has been dropped. Pending timers are cancelled on exit.
    pub async fn run(mut self) {
        info!(
            target: "combat_runtime::worker",
            boss = %self.session.boss_id(),
            seed = self.session.seed(),
            "session worker started"
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.command_rx.recv() => {
                    let Some(command) = command else { break };
                    if self.handle_command(command).is_break() {
                        break;
                    }
                }
            }
        }

        self.cancel.cancel();
        debug!(target: "combat_runtime::worker", boss = %self.session.boss_id(), "session worker stopped");
    }

    fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::RollInitiative { reply } => {
                let transition =
                    CombatEngine::new(&mut self.session).resolve_initiative(self.oracles.env());
                self.after_transition(&transition, None);
                if reply.send(transition).is_err() {
                    debug!("RollInitiative reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAction { ability_id, reply } => {
                let result = self.submit_action(&ability_id);
                let fatal = matches!(result, Err(RuntimeError::Resolve(_)));
                if reply.send(result).is_err() {
                    debug!("SubmitAction reply channel closed (caller dropped)");
                }
                if fatal {
                    return ControlFlow::Break(());
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.session.clone()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::End { reply } => {
                let summary = CombatEngine::end_session(self.session.clone());
                info!(
                    target: "combat_runtime::worker",
                    boss = %summary.boss_id,
                    phase = %summary.phase,
                    rounds = summary.rounds,
                    "session ended"
                );
                self.publish(CombatEvent::SessionEnded(summary.clone()));
                if reply.send(summary).is_err() {
                    debug!("End reply channel closed (caller dropped)");
                }
                return ControlFlow::Break(());
            }
            Command::ClearAnimation => {
                let transition = CombatEngine::new(&mut self.session).clear_animation();
                if transition.is_applied() {
                    self.publish(CombatEvent::AnimationCleared);
                }
                self.sync_boss_timer();
            }
            Command::BossTurn => {
                self.pending_boss_turn = None;
                let result = CombatEngine::new(&mut self.session).advance_boss_turn(self.oracles.env());
                match result {
                    Ok(transition) => self.after_transition(&transition, Some(Side::Boss)),
                    Err(err) => {
                        self.abort(&err);
                        return ControlFlow::Break(());
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn submit_action(&mut self, ability_id: &str) -> Result<Transition> {
        let action = self
            .abilities
            .iter()
            .find(|ability| ability.id == ability_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownAbility {
                boss_id: self.session.boss_id().to_string(),
                ability_id: ability_id.to_string(),
            })?;

        let result =
            CombatEngine::new(&mut self.session).submit_player_action(self.oracles.env(), &action);
        match result {
            Ok(transition) => {
                self.after_transition(&transition, Some(Side::Player));
                Ok(transition)
            }
            Err(err) => {
                self.abort(&err);
                Err(err.into())
            }
        }
    }

    /// Publishes the effects of an applied transition and arms timers.
    fn after_transition(&mut self, transition: &Transition, actor: Option<Side>) {
        let Transition::Applied { from, to, outcome } = transition else {
            return;
        };

        if let (Some(actor), Some(outcome)) = (actor, outcome) {
            self.publish(CombatEvent::ActionResolved {
                actor,
                outcome: outcome.clone(),
            });
        }
        self.publish_log();
        if from != to {
            self.publish(CombatEvent::PhaseChanged {
                from: *from,
                to: *to,
                round: self.session.round(),
            });
        }

        let animation = match actor {
            Some(Side::Player) => Some(self.timings.player_animation),
            Some(Side::Boss) => Some(self.timings.boss_animation),
            None => None,
        };
        if let Some(delay) = animation {
            self.schedule(delay, Command::ClearAnimation);
        }
        self.sync_boss_timer();
    }

    /// Keeps exactly one boss timer armed while the boss may act.
    fn sync_boss_timer(&mut self) {
        let boss_ready = self.session.phase() == Phase::BossTurn && !self.session.is_animating();
        match (boss_ready, self.pending_boss_turn.is_some()) {
            (true, false) => {
                let token = self.schedule(self.timings.boss_turn_delay, Command::BossTurn);
                self.pending_boss_turn = Some(token);
            }
            (false, true) => {
                if let Some(token) = self.pending_boss_turn.take() {
                    token.cancel();
                }
            }
            _ => {}
        }
    }

    /// Spawns a timer that delivers `command` after `delay` unless the session
    /// token (or the returned child token) is cancelled first.
    fn schedule(&self, delay: Duration, command: Command) -> CancellationToken {
        let token = self.cancel.child_token();
        let guard = token.clone();
        let timer_tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Worker already gone: nothing left to update.
                    if let Some(tx) = timer_tx.upgrade() {
                        if tx.send(command).await.is_err() {
                            debug!(target: "combat_runtime::worker", "timer fired after worker exit");
                        }
                    }
                }
            }
        });
        token
    }

    fn publish_log(&mut self) {
        let fresh: Vec<_> = self.session.log().since(self.last_published).to_vec();
        if let Some(last) = fresh.last() {
            self.last_published = Some(last.id);
        }
        for entry in fresh {
            self.publish(CombatEvent::LogAppended(entry));
        }
    }

    fn publish(&self, event: CombatEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn abort(&mut self, err: &ResolveError) {
        error!(
            target: "combat_runtime::worker",
            boss = %self.session.boss_id(),
            code = err.error_code(),
            severity = err.severity().as_str(),
            error = %err,
            "session aborted"
        );
        self.publish(CombatEvent::Aborted {
            code: err.error_code().to_string(),
            message: err.to_string(),
        });
    }
}
