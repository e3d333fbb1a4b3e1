use tracing::warn;

/// Append-only transcript of the current hand plus the reconciliation
/// cursor: the count of server log entries already merged. The server
/// always returns its log cumulative from the deal, so merging is a
/// suffix append. Only `merge` may advance the cursor.
#[derive(Clone, Debug, Default)]
pub struct TranscriptReconciler {
    entries: Vec<String>,
    cursor: usize,
    anomalies: u64,
}

impl TranscriptReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the server's cumulative log and return the newly appended
    /// suffix. A server log shorter than the cursor violates the
    /// cumulative contract; the cursor clamps to zero and the whole
    /// incoming log is treated as new rather than indexing out of range.
    pub fn merge(&mut self, server_log: &[String]) -> &[String] {
        if server_log.len() < self.cursor {
            warn!(
                cursor = self.cursor,
                server_len = server_log.len(),
                "server log shrank below cursor; replaying full log"
            );
            self.anomalies += 1;
            self.cursor = 0;
        }
        let start = self.entries.len();
        self.entries.extend_from_slice(&server_log[self.cursor..]);
        self.cursor = server_log.len();
        &self.entries[start..]
    }

    /// Append a local note (summary line, stack confirmation). Does not
    /// touch the cursor.
    pub fn append(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    /// Clear the transcript and zero the cursor. Called exactly when a
    /// new hand is dealt or the table is reset.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Count of cumulative-contract violations seen so far.
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }
}
