//! Append-only narration of a combat session.

use core::fmt;

/// Sequential identifier of a log entry within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntryId(pub u64);

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a log entry narrates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogCategory {
    Initiative,
    Action,
    Damage,
    Heal,
    Effect,
    Turn,
}

/// A single narrated event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLogEntry {
    pub id: LogEntryId,
    /// Milliseconds since the Unix epoch, from the session's clock oracle.
    pub timestamp: u64,
    pub message: String,
    pub category: LogCategory,
    pub actor: Option<String>,
    pub target: Option<String>,
}

/// Append-only sequence of [`CombatLogEntry`].
///
/// Entries are never mutated or removed once pushed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
    next_id: u64,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its id.
    pub fn push(
        &mut self,
        timestamp: u64,
        category: LogCategory,
        message: impl Into<String>,
        actor: Option<&str>,
        target: Option<&str>,
    ) -> LogEntryId {
        let id = LogEntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(CombatLogEntry {
            id,
            timestamp,
            message: message.into(),
            category,
            actor: actor.map(str::to_owned),
            target: target.map(str::to_owned),
        });
        id
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&CombatLogEntry> {
        self.entries.last()
    }

    /// Entries appended after `id`, for incremental rendering.
    pub fn since(&self, id: Option<LogEntryId>) -> &[CombatLogEntry] {
        match id {
            None => &self.entries,
            Some(id) => {
                let start = self.entries.partition_point(|entry| entry.id <= id);
                &self.entries[start..]
            }
        }
    }

    pub fn count(&self, category: LogCategory) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut log = CombatLog::new();
        let first = log.push(10, LogCategory::Turn, "Combat begins!", None, None);
        let second = log.push(10, LogCategory::Initiative, "Rolling initiative...", None, None);
        assert_eq!(first, LogEntryId(0));
        assert_eq!(second, LogEntryId(1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn since_returns_entries_after_id() {
        let mut log = CombatLog::new();
        let first = log.push(0, LogCategory::Turn, "a", None, None);
        log.push(0, LogCategory::Damage, "b", Some("paladin"), Some("boss"));
        log.push(0, LogCategory::Action, "c", Some("paladin"), None);

        assert_eq!(log.since(None).len(), 3);
        let tail = log.since(Some(first));
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].message, "b");
        assert_eq!(tail[0].target.as_deref(), Some("boss"));
        assert_eq!(log.count(LogCategory::Damage), 1);
    }
}
