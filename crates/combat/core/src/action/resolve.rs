//! Applies a single ability to a session.
//!
//! Resolution order for one ability:
//!
//! 1. Every dice expression on the ability is parsed up front, so a malformed
//!    one aborts before anything is mutated.
//! 2. The primary effect runs according to [`ActionKind`]: damage, healing,
//!    or nothing (buffs).
//! 3. Secondary healing on attacks, then the status effect template.
//! 4. Flavor text, quoted, as the last entry for the ability.

use crate::dice::DiceExpr;
use crate::env::{ClockOracle, RngOracle, RollContext};
use crate::state::{CombatSession, EffectId, LogCategory, Side};

use super::error::ResolveError;
use super::types::{ActionKind, CombatAction, DamageSpec};

/// What resolving one ability did to the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub ability_id: String,
    /// Final damage dealt to the opponent after reduction.
    pub damage: Option<u32>,
    /// HP actually restored to the actor.
    pub healed: Option<u32>,
    /// The heal was suppressed by a regeneration-prevention effect.
    pub heal_blocked: bool,
    /// Status effect instantiated by the ability, and who received it.
    pub applied_effect: Option<(EffectId, Side)>,
}

/// Floors `base * (1 - reduction)` at zero.
pub fn reduce_damage(base: u32, reduction: f64) -> u32 {
    ((base as f64) * (1.0 - reduction)).floor().max(0.0) as u32
}

/// Resolves `action` performed by `actor` against the opposing side.
///
/// # Errors
///
/// Returns [`ResolveError::Dice`] when the ability's dice notation is
/// malformed; the session is left unchanged in that case.
pub fn resolve_action<R, C>(
    session: &mut CombatSession,
    actor: Side,
    action: &CombatAction,
    rng: &R,
    clock: &C,
) -> Result<ActionOutcome, ResolveError>
where
    R: RngOracle + ?Sized,
    C: ClockOracle + ?Sized,
{
    let damage = parse(action, action.damage.as_ref())?;
    let healing = parse(action, action.secondary_healing())?;

    let mut resolver = Resolver {
        session,
        actor,
        action,
        rng,
        now: clock.now_millis(),
        outcome: ActionOutcome {
            ability_id: action.id.clone(),
            ..ActionOutcome::default()
        },
    };

    let base = damage.map(|(spec, expr)| resolver.roll(spec, expr, RollContext::Damage));

    match action.kind {
        ActionKind::Attack => {
            resolver.strike(base.unwrap_or(0), true);
            if let Some((spec, expr)) = healing {
                let amount = resolver.roll(spec, expr, RollContext::Healing);
                resolver.secondary_heal(amount);
            }
        }
        ActionKind::Heal => resolver.heal(base.unwrap_or(0)),
        ActionKind::Buff => {}
        ActionKind::Special => {
            if let Some(amount) = base {
                resolver.strike(amount, false);
            }
        }
    }

    resolver.apply_status();
    resolver.flavor();

    Ok(resolver.outcome)
}

fn parse<'a>(
    action: &CombatAction,
    spec: Option<&'a DamageSpec>,
) -> Result<Option<(&'a DamageSpec, DiceExpr)>, ResolveError> {
    spec.map(|spec| {
        spec.expr()
            .map(|expr| (spec, expr))
            .map_err(|source| ResolveError::dice(&action.id, source))
    })
    .transpose()
}

struct Resolver<'s, 'a, R: ?Sized> {
    session: &'s mut CombatSession,
    actor: Side,
    action: &'a CombatAction,
    rng: &'a R,
    now: u64,
    outcome: ActionOutcome,
}

impl<R: RngOracle + ?Sized> Resolver<'_, '_, R> {
    fn roll(&mut self, spec: &DamageSpec, expr: DiceExpr, context: RollContext) -> u32 {
        let rolls = &mut self.session.rolls;
        let actor = self.actor;
        let rolled = expr.roll(self.rng, || rolls.next_seed(actor, context));
        tracing::trace!(
            ability = %self.action.id,
            dice = %expr,
            rolled,
            modifier = spec.modifier,
            "rolled dice"
        );
        spec.total(rolled)
    }

    fn log(&mut self, category: LogCategory, message: String, target: Option<&str>) {
        let actor_id = self.session.combatant(self.actor).id.clone();
        self.session
            .log
            .push(self.now, category, message, Some(&actor_id), target);
    }

    /// Deals damage to the opponent. Only attacks honor damage reduction.
    fn strike(&mut self, base: u32, reducible: bool) {
        let (_, defender) = self.session.sides_mut(self.actor);
        let amount = match defender.status_effects.first_damage_reduction() {
            Some((_, reduction)) if reducible => reduce_damage(base, reduction),
            _ => base,
        };
        defender.take_damage(amount);
        let defender_id = defender.id.clone();
        let defender_name = defender.name.clone();

        self.outcome.damage = Some(amount);
        self.log(
            LogCategory::Damage,
            format!(
                "{} hits {} for {} damage!",
                self.action.name, defender_name, amount
            ),
            Some(&defender_id),
        );
    }

    fn heal(&mut self, amount: u32) {
        let (healer, _) = self.session.sides_mut(self.actor);
        // Only the boss is subject to regeneration blocks; the player's own
        // shield carries the same modifier and must not stop player heals.
        if !healer.is_player {
            if let Some(blocker) = healer.status_effects.regeneration_blocker() {
                let message = format!(
                    "{} fails - regeneration blocked by {}!",
                    self.action.name, blocker.name
                );
                self.outcome.heal_blocked = true;
                self.log(LogCategory::Effect, message, None);
                return;
            }
        }

        let restored = healer.heal(amount);
        let healer_id = healer.id.clone();
        let message = if healer.is_player {
            format!("{} restores {} HP!", self.action.name, restored)
        } else {
            format!(
                "{} restores {} HP to {}!",
                self.action.name, restored, healer.name
            )
        };

        self.outcome.healed = Some(restored);
        self.log(LogCategory::Heal, message, Some(&healer_id));
    }

    fn secondary_heal(&mut self, amount: u32) {
        let (healer, _) = self.session.sides_mut(self.actor);
        let restored = healer.heal(amount);
        let healer_id = healer.id.clone();

        self.outcome.healed = Some(restored);
        self.log(
            LogCategory::Heal,
            format!("{} also restores {} HP!", self.action.name, restored),
            Some(&healer_id),
        );
    }

    fn apply_status(&mut self) {
        let Some(template) = self.action.status_template() else {
            return;
        };
        let recipient = if self.action.targets_self() {
            self.actor
        } else {
            self.actor.opponent()
        };

        let id = self.session.rolls.allocate_effect_id();
        let effect = template.instantiate(id);
        let (actor, opponent) = self.session.sides_mut(self.actor);
        let message = if recipient != self.actor {
            let article = if opponent.is_player { "the " } else { "" };
            format!(
                "{} affects {}{}! {}",
                self.action.name, article, opponent.name, effect.description
            )
        } else if !actor.is_player {
            format!(
                "{} empowers {}! {}",
                self.action.name, actor.name, effect.description
            )
        } else if self.action.kind == ActionKind::Attack {
            format!(
                "{} also activates {}! {}",
                self.action.name, effect.name, effect.description
            )
        } else {
            format!("{} activated! {}", self.action.name, effect.description)
        };

        let receiver = if recipient == self.actor { actor } else { opponent };
        let receiver_id = receiver.id.clone();
        receiver.status_effects.push(effect);

        self.outcome.applied_effect = Some((id, recipient));
        self.log(LogCategory::Effect, message, Some(&receiver_id));
    }

    fn flavor(&mut self) {
        if self.action.flavor_text.is_empty() {
            return;
        }
        let message = format!("\"{}\"", self.action.flavor_text);
        self.log(LogCategory::Action, message, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_floors_the_result() {
        assert_eq!(reduce_damage(15, 0.5), 7);
        assert_eq!(reduce_damage(20, 0.25), 15);
        assert_eq!(reduce_damage(7, 0.3), 4);
        assert_eq!(reduce_damage(10, 1.5), 0);
        assert_eq!(reduce_damage(10, 0.0), 10);
        assert_eq!(reduce_damage(10, -0.5), 15);
    }
}
