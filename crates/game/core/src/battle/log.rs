/// Append-only, human-readable record of an encounter.
///
/// Observers read it; only the battle manager writes to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleLog {
    entries: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(target: "battle_log", "{entry}");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries appended after the first `seen`.
    pub fn since(&self, seen: usize) -> &[String] {
        self.entries.get(seen..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.contains(needle))
    }
}
