//! Campaign progress for one player.
//!
//! Passed explicitly to whatever needs it; there is no global game store.

use combat_core::{BossDefinition, SessionSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameContext {
    pub character: String,
    completed: Vec<String>,
    sigils: Vec<String>,
}

impl GameContext {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            ..Self::default()
        }
    }

    /// Records a finished battle. Only victories advance the campaign.
    pub fn record(&mut self, summary: &SessionSummary) -> bool {
        let Some(sigil) = summary.sigil.as_ref().filter(|_| summary.is_victory()) else {
            return false;
        };
        if self.is_completed(&summary.boss_id) {
            return false;
        }
        self.completed.push(summary.boss_id.clone());
        self.sigils.push(sigil.clone());
        true
    }

    pub fn is_completed(&self, boss_id: &str) -> bool {
        self.completed.iter().any(|id| id == boss_id)
    }

    pub fn sigils(&self) -> &[String] {
        &self.sigils
    }

    /// Realms not yet conquered, keeping campaign order.
    pub fn remaining<'a>(&self, bosses: &'a [BossDefinition]) -> Vec<&'a BossDefinition> {
        bosses
            .iter()
            .filter(|boss| !self.is_completed(&boss.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::Phase;

    fn summary(boss_id: &str, phase: Phase) -> SessionSummary {
        let victory = phase == Phase::Victory;
        SessionSummary {
            boss_id: boss_id.to_string(),
            boss_name: boss_id.to_string(),
            phase,
            rounds: 3,
            player_hp: if victory { 40 } else { 0 },
            boss_hp: if victory { 0 } else { 10 },
            sigil: victory.then(|| format!("Sigil of {boss_id}")),
            victory_text: None,
            log_entries: 12,
        }
    }

    fn boss(id: &str) -> BossDefinition {
        BossDefinition {
            id: id.to_string(),
            name: id.to_string(),
            max_hp: 10,
            defense: None,
            abilities: Vec::new(),
            victory_text: String::new(),
            sigil_reward: String::new(),
        }
    }

    #[test]
    fn victories_award_sigils_once() {
        let mut context = GameContext::new("Paladin");
        assert!(context.record(&summary("gremlin", Phase::Victory)));
        assert!(!context.record(&summary("gremlin", Phase::Victory)));
        assert_eq!(context.sigils(), ["Sigil of gremlin"]);
    }

    #[test]
    fn defeats_do_not_advance() {
        let mut context = GameContext::new("Paladin");
        assert!(!context.record(&summary("gremlin", Phase::Defeat)));
        assert!(!context.is_completed("gremlin"));
    }

    #[test]
    fn remaining_keeps_campaign_order() {
        let bosses = [boss("a"), boss("b"), boss("c")];
        let mut context = GameContext::new("Paladin");
        context.record(&summary("b", Phase::Victory));

        let remaining: Vec<_> = context.remaining(&bosses).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(remaining, ["a", "c"]);

        context.record(&summary("a", Phase::Victory));
        context.record(&summary("c", Phase::Victory));
        assert!(context.remaining(&bosses).is_empty());
    }
}
