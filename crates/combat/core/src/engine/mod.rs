//! Session state machine.
//!
//! The [`CombatEngine`] is the only writer of a [`CombatSession`]. It drives
//! the lifecycle `Initiative -> {PlayerTurn <-> BossTurn} -> {Victory | Defeat}`
//! and reports every call as a [`Transition`]: either the input was applied,
//! or it arrived in the wrong phase (or while animating) and was ignored
//! without touching the session.
//!
//! Timing is not the engine's concern. Callers decide when to call
//! [`CombatEngine::advance_boss_turn`] and [`CombatEngine::clear_animation`];
//! `combat-runtime` schedules both with the configured delays.

mod errors;

pub use errors::SessionError;

use crate::action::{ActionOutcome, CombatAction, ResolveError, resolve_action};
use crate::dice::DiceExpr;
use crate::env::{CombatEnv, RollContext};
use crate::state::{
    CombatLog, CombatSession, CombatStats, Combatant, LogCategory, Phase, RollState, Side,
};

/// Why an input did not change the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    /// The session is not in the phase the input requires.
    WrongPhase { expected: Phase, actual: Phase },
    /// A previous action is still animating.
    Animating,
    /// `clear_animation` was called with nothing to clear.
    NotAnimating,
}

/// Result of feeding one input to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    Applied {
        from: Phase,
        to: Phase,
        /// Present when an ability was resolved.
        outcome: Option<ActionOutcome>,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied { .. })
    }

    pub fn outcome(&self) -> Option<&ActionOutcome> {
        match self {
            Transition::Applied { outcome, .. } => outcome.as_ref(),
            Transition::Ignored { .. } => None,
        }
    }
}

/// Final state of a session, produced when it is ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSummary {
    pub boss_id: String,
    pub boss_name: String,
    pub phase: Phase,
    pub rounds: u32,
    pub player_hp: u32,
    pub boss_hp: u32,
    /// Sigil earned; only set on victory.
    pub sigil: Option<String>,
    /// Victory narration; only set on victory.
    pub victory_text: Option<String>,
    pub log_entries: usize,
}

impl SessionSummary {
    pub fn is_victory(&self) -> bool {
        self.phase == Phase::Victory
    }
}

/// Combat engine that applies inputs to a borrowed session.
pub struct CombatEngine<'a> {
    session: &'a mut CombatSession,
}

impl<'a> CombatEngine<'a> {
    /// Creates an engine operating on `session`.
    pub fn new(session: &'a mut CombatSession) -> Self {
        Self { session }
    }

    /// Builds a fresh session in the `Initiative` phase.
    ///
    /// Every dice expression of the encounter is validated here so that a
    /// broken catalog fails before the first turn.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the boss is unknown, has no abilities, or
    /// references malformed dice.
    pub fn start_session(
        env: CombatEnv<'_>,
        boss_id: &str,
        seed: u64,
    ) -> Result<CombatSession, SessionError> {
        let boss = env
            .catalog()
            .boss(boss_id)
            .ok_or_else(|| SessionError::unknown_boss(boss_id))?;
        if boss.abilities.is_empty() {
            return Err(SessionError::NoBossAbilities {
                boss_id: boss.id.clone(),
            });
        }

        let player_abilities = env.catalog().player_abilities(boss_id);
        for ability in boss.abilities.iter().chain(player_abilities) {
            ability
                .validate_dice()
                .map_err(|source| SessionError::MalformedDice {
                    boss_id: boss.id.clone(),
                    ability: ability.id.clone(),
                    source,
                })?;
        }

        let config = env.config();
        let player = Combatant::new(
            config.player.id.clone(),
            config.player.name.clone(),
            CombatStats::at_max(config.player.max_hp, config.player.defense),
            true,
        );
        let opponent = Combatant::new(
            boss.id.clone(),
            boss.name.clone(),
            CombatStats::at_max(boss.max_hp, boss.defense.unwrap_or(config.boss_defense)),
            false,
        );

        let now = env.clock().now_millis();
        let mut log = CombatLog::new();
        log.push(now, LogCategory::Turn, "Combat begins!", None, None);
        log.push(now, LogCategory::Initiative, "Rolling initiative...", None, None);

        tracing::debug!(boss = %boss.id, seed, "combat session started");

        Ok(CombatSession {
            phase: Phase::Initiative,
            current_turn: Side::Player,
            round: 1,
            player,
            boss: opponent,
            log,
            animating: false,
            encounter: boss.clone(),
            rolls: RollState::new(seed),
        })
    }

    /// Discards a session, returning its final state.
    pub fn end_session(session: CombatSession) -> SessionSummary {
        let victory = session.phase == Phase::Victory;
        tracing::debug!(
            boss = %session.encounter.id,
            phase = %session.phase,
            rounds = session.round,
            "combat session ended"
        );
        SessionSummary {
            boss_id: session.encounter.id,
            boss_name: session.encounter.name,
            phase: session.phase,
            rounds: session.round,
            player_hp: session.player.hp(),
            boss_hp: session.boss.hp(),
            sigil: victory.then_some(session.encounter.sigil_reward),
            victory_text: victory.then_some(session.encounter.victory_text),
            log_entries: session.log.len(),
        }
    }

    /// Read access to the session being driven.
    pub fn session(&self) -> &CombatSession {
        self.session
    }

    /// Rolls initiative for both sides. Ties go to the player.
    pub fn resolve_initiative(&mut self, env: CombatEnv<'_>) -> Transition {
        if let Some(reason) = self.gate(Phase::Initiative, false) {
            return self.ignored("resolve_initiative", reason);
        }

        let config = env.config();
        let dice = config.initiative_dice();
        let player_roll =
            self.roll_initiative(env, Side::Player, dice) + config.player_initiative_bonus;
        let boss_roll =
            self.roll_initiative(env, Side::Boss, dice) + config.boss_initiative_bonus;
        let player_first = player_roll >= boss_roll;

        let session = &mut *self.session;
        session.player.stats.initiative = player_roll;
        session.boss.stats.initiative = boss_roll;

        let now = env.clock().now_millis();
        let player_id = session.player.id.clone();
        let boss_id = session.boss.id.clone();
        session.log.push(
            now,
            LogCategory::Initiative,
            format!("{} rolled {}", session.player.name, player_roll),
            Some(&player_id),
            None,
        );
        session.log.push(
            now,
            LogCategory::Initiative,
            format!("{} rolled {}", session.boss.name, boss_roll),
            Some(&boss_id),
            None,
        );
        let first = if player_first {
            &session.player.name
        } else {
            &session.boss.name
        };
        let message = format!("{first} acts first!");
        session
            .log
            .push(now, LogCategory::Initiative, message, None, None);

        let (to, turn) = if player_first {
            (Phase::PlayerTurn, Side::Player)
        } else {
            (Phase::BossTurn, Side::Boss)
        };
        self.transition(to, turn, None)
    }

    /// Resolves the player's chosen ability against the boss.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the ability's dice are malformed.
    pub fn submit_player_action(
        &mut self,
        env: CombatEnv<'_>,
        action: &CombatAction,
    ) -> Result<Transition, ResolveError> {
        if let Some(reason) = self.gate(Phase::PlayerTurn, true) {
            return Ok(self.ignored("submit_player_action", reason));
        }

        let outcome = resolve_action(self.session, Side::Player, action, env.rng(), env.clock())?;
        self.session.animating = true;

        Ok(if self.session.boss.is_defeated() {
            self.transition(Phase::Victory, Side::Player, Some(outcome))
        } else {
            self.transition(Phase::BossTurn, Side::Boss, Some(outcome))
        })
    }

    /// Resolves one boss ability, picked uniformly at random, then ticks
    /// every status effect on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the picked ability's dice are malformed.
    pub fn advance_boss_turn(&mut self, env: CombatEnv<'_>) -> Result<Transition, ResolveError> {
        if let Some(reason) = self.gate(Phase::BossTurn, true) {
            return Ok(self.ignored("advance_boss_turn", reason));
        }

        let action = self.pick_boss_action(env)?;
        let outcome = resolve_action(self.session, Side::Boss, &action, env.rng(), env.clock())?;

        let session = &mut *self.session;
        for effect in session
            .player
            .status_effects
            .tick()
            .into_iter()
            .chain(session.boss.status_effects.tick())
        {
            tracing::trace!(effect = %effect.name, id = %effect.id, "status effect expired");
        }
        session.animating = true;

        if session.player.is_defeated() {
            return Ok(self.transition(Phase::Defeat, Side::Boss, Some(outcome)));
        }

        session.round += 1;
        let message = format!("--- Round {} ---", session.round);
        session
            .log
            .push(env.clock().now_millis(), LogCategory::Turn, message, None, None);
        Ok(self.transition(Phase::PlayerTurn, Side::Player, Some(outcome)))
    }

    /// Clears the animation flag.
    pub fn clear_animation(&mut self) -> Transition {
        if !self.session.animating {
            return self.ignored("clear_animation", IgnoreReason::NotAnimating);
        }
        self.session.animating = false;
        let phase = self.session.phase;
        Transition::Applied {
            from: phase,
            to: phase,
            outcome: None,
        }
    }

    fn gate(&self, expected: Phase, respect_animation: bool) -> Option<IgnoreReason> {
        let actual = self.session.phase;
        if actual != expected {
            Some(IgnoreReason::WrongPhase { expected, actual })
        } else if respect_animation && self.session.animating {
            Some(IgnoreReason::Animating)
        } else {
            None
        }
    }

    fn ignored(&self, input: &'static str, reason: IgnoreReason) -> Transition {
        tracing::debug!(input, ?reason, phase = %self.session.phase, "input ignored");
        Transition::Ignored { reason }
    }

    fn transition(&mut self, to: Phase, turn: Side, outcome: Option<ActionOutcome>) -> Transition {
        let from = self.session.phase;
        self.session.phase = to;
        self.session.current_turn = turn;
        Transition::Applied { from, to, outcome }
    }

    fn roll_initiative(&mut self, env: CombatEnv<'_>, side: Side, dice: DiceExpr) -> i32 {
        let rolls = &mut self.session.rolls;
        let rolled = dice.roll(env.rng(), || rolls.next_seed(side, RollContext::Initiative));
        tracing::trace!(%side, rolled, "initiative roll");
        rolled as i32
    }

    fn pick_boss_action(&mut self, env: CombatEnv<'_>) -> Result<CombatAction, ResolveError> {
        let abilities = &self.session.encounter.abilities;
        let last = abilities
            .len()
            .checked_sub(1)
            .ok_or_else(|| ResolveError::NoBossAbilities {
                boss: self.session.encounter.id.clone(),
            })?;
        let seed = self
            .session
            .rolls
            .next_seed(Side::Boss, RollContext::AbilityChoice);
        let index = env.rng().range(seed, 0, last as u32) as usize;
        Ok(abilities[index.min(last)].clone())
    }
}
