//! Line-based player input.
//!
//! The player picks an ability by its menu number or by its id. Anything else
//! re-prompts; end of input aborts the battle.

use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession};
use combat_runtime::{ActionProvider, Result, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads ability choices from standard input.
pub struct StdinProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionProvider for StdinProvider {
    async fn choose_action(
        &self,
        session: &CombatSession,
        abilities: &[CombatAction],
    ) -> Result<String> {
        println!(
            "\n{} {}/{} HP  vs  {} {}/{} HP",
            session.player().name,
            session.player().hp(),
            session.player().max_hp(),
            session.boss().name,
            session.boss().hp(),
            session.boss().max_hp(),
        );
        for (index, ability) in abilities.iter().enumerate() {
            println!("  [{}] {} - {}", index + 1, ability.name, ability.description);
        }

        let mut lines = self.lines.lock().await;
        loop {
            println!("Choose an ability:");
            let line = lines
                .next_line()
                .await
                .map_err(|err| {
                    tracing::warn!(error = %err, "failed to read player input");
                    RuntimeError::ProviderInputClosed
                })?
                .ok_or(RuntimeError::ProviderInputClosed)?;

            match parse_choice(line.trim(), abilities) {
                Some(ability) => return Ok(ability.id.clone()),
                None => println!("Unknown ability '{}'.", line.trim()),
            }
        }
    }
}

/// Resolves a 1-based menu number or an ability id.
pub fn parse_choice<'a>(input: &str, abilities: &'a [CombatAction]) -> Option<&'a CombatAction> {
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| abilities.get(index));
    }
    abilities
        .iter()
        .find(|ability| ability.id.eq_ignore_ascii_case(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::ActionKind;

    fn abilities() -> Vec<CombatAction> {
        vec![
            CombatAction::new("judgment-strike", "Judgment Strike", ActionKind::Attack),
            CombatAction::new("lay-on-hands", "Lay on Hands", ActionKind::Heal),
        ]
    }

    #[test]
    fn picks_by_menu_number() {
        let abilities = abilities();
        assert_eq!(parse_choice("2", &abilities).unwrap().id, "lay-on-hands");
        assert!(parse_choice("0", &abilities).is_none());
        assert!(parse_choice("3", &abilities).is_none());
    }

    #[test]
    fn picks_by_id_ignoring_case() {
        let abilities = abilities();
        assert_eq!(
            parse_choice("Judgment-Strike", &abilities).unwrap().id,
            "judgment-strike"
        );
        assert!(parse_choice("fireball", &abilities).is_none());
    }
}
