//! Append-only JSONL audit journal.
//!
//! Every pipeline event is written as one JSON line. The journal is the
//! replayable audit trail for a run; it is never read back by the pipeline
//! itself.

use anyhow::{Context, Result};
use otc_recon_core::events::ReconEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

pub struct EventJournal {
    writer: BufWriter<File>,
    path: String,
}

impl EventJournal {
    /// Opens (or creates) a journal file for appending.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open journal: {path}"))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_string(),
        })
    }

    /// Appends one event as a JSON line.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn append(&mut self, event: &ReconEvent) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(self.writer, "{line}")
            .with_context(|| format!("Failed to append to journal: {}", self.path))?;
        Ok(())
    }

    /// Flushes buffered lines to disk.
    ///
    /// # Errors
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn appends_one_json_line_per_event() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut journal = EventJournal::open(&path).unwrap();
        journal
            .append(&ReconEvent::MatchEvaluated {
                bank_trade_id: "B-1".to_string(),
                counterparty_trade_id: "C-1".to_string(),
                classification: "MATCHED".to_string(),
                match_score: dec!(0.92),
                timestamp: "2025-03-05T09:00:00Z".parse().unwrap(),
            })
            .unwrap();
        journal
            .append(&ReconEvent::ExceptionResolved {
                exception_id: uuid::Uuid::new_v4(),
                within_sla: true,
                timestamp: "2025-03-05T10:00:00Z".parse().unwrap(),
            })
            .unwrap();
        journal.flush().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("match_evaluated"));
        assert!(lines[1].contains("exception_resolved"));
    }
}
