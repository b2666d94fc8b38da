//! Rendering of session events to stdout.
use anyhow::Result;
use combat_core::{CombatLogEntry, LogCategory, SessionSummary};
use combat_runtime::CombatEvent;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    /// One JSON object per line.
    Json,
}

pub fn log_line(entry: &CombatLogEntry) -> String {
    match entry.category {
        LogCategory::Turn => format!("\n{}", entry.message),
        LogCategory::Initiative => format!("  ⚄ {}", entry.message),
        LogCategory::Damage => format!("  ⚔ {}", entry.message),
        LogCategory::Heal => format!("  ✚ {}", entry.message),
        LogCategory::Effect => format!("  ✦ {}", entry.message),
        LogCategory::Action => format!("    {}", entry.message),
    }
}

pub fn summary_lines(summary: &SessionSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.is_victory() {
        lines.push(format!("Victory over {}!", summary.boss_name));
        if let Some(text) = &summary.victory_text {
            lines.push(text.clone());
        }
        if let Some(sigil) = &summary.sigil {
            lines.push(format!("You earned the {sigil}."));
        }
    } else {
        lines.push(format!("Defeated by {}.", summary.boss_name));
    }
    lines.push(format!(
        "Rounds: {}  Player HP: {}  Boss HP: {}",
        summary.rounds, summary.player_hp, summary.boss_hp
    ));
    lines
}

pub fn print_entries(entries: &[CombatLogEntry], mode: OutputMode) -> Result<()> {
    for entry in entries {
        match mode {
            OutputMode::Text => println!("{}", log_line(entry)),
            OutputMode::Json => println!("{}", serde_json::to_string(entry)?),
        }
    }
    Ok(())
}

pub fn print_summary(summary: &SessionSummary, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Text => {
            println!();
            for line in summary_lines(summary) {
                println!("{line}");
            }
        }
        OutputMode::Json => println!("{}", serde_json::to_string(summary)?),
    }
    Ok(())
}

/// Prints events until the session ends or the channel closes.
pub async fn print_events(
    mut events: broadcast::Receiver<CombatEvent>,
    mode: OutputMode,
) -> Result<()> {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer fell behind");
                continue;
            }
            Err(RecvError::Closed) => return Ok(()),
        };

        match mode {
            OutputMode::Json => println!("{}", serde_json::to_string(&event)?),
            OutputMode::Text => {
                if let CombatEvent::LogAppended(entry) = &event {
                    println!("{}", log_line(entry));
                }
            }
        }
        if event.is_final() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{LogEntryId, Phase};

    #[test]
    fn turn_separators_get_a_blank_line() {
        let entry = CombatLogEntry {
            id: LogEntryId(4),
            timestamp: 0,
            message: "--- Round 2 ---".to_string(),
            category: LogCategory::Turn,
            actor: None,
            target: None,
        };
        assert_eq!(log_line(&entry), "\n--- Round 2 ---");
    }

    #[test]
    fn defeat_summary_has_no_sigil() {
        let summary = SessionSummary {
            boss_id: "shadowcloud".to_string(),
            boss_name: "The Shadowcloud".to_string(),
            phase: Phase::Defeat,
            rounds: 4,
            player_hp: 0,
            boss_hp: 12,
            sigil: None,
            victory_text: None,
            log_entries: 30,
        };
        assert_eq!(
            summary_lines(&summary),
            [
                "Defeated by The Shadowcloud.",
                "Rounds: 4  Player HP: 0  Boss HP: 12",
            ]
        );
    }
}
