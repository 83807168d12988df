//! Durable JSONL audit sink with one file per calendar day.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::{AuditEntry, AuditLogger};
use crate::{AppError, Result};

/// Appends audit entries as JSON lines under a log directory.
///
/// Each entry lands in `<log_dir>/approvals-YYYY-MM-DD.jsonl`, keyed by the
/// entry's own timestamp, so day rollover needs no writer state and a
/// backdated entry is filed with its day. Writes open the file in append
/// mode per entry; the OS serializes concurrent appends.
pub struct JsonlAuditWriter {
    log_dir: PathBuf,
}

impl JsonlAuditWriter {
    /// Construct a writer that stores logs in `log_dir`.
    ///
    /// Creates `log_dir` and all parent directories if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Audit`] if the directory cannot be created.
    pub fn new(log_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&log_dir).map_err(|err| {
            AppError::Audit(format!(
                "failed to create audit log directory {}: {err}",
                log_dir.display()
            ))
        })?;
        Ok(Self { log_dir })
    }

    fn path_for(&self, entry: &AuditEntry) -> PathBuf {
        self.log_dir
            .join(format!("approvals-{}.jsonl", entry.timestamp.date_naive()))
    }
}

impl AuditLogger for JsonlAuditWriter {
    fn log_entry(&self, entry: AuditEntry) -> Result<()> {
        let path = self.path_for(&entry);
        let line = serde_json::to_string(&entry)
            .map_err(|err| AppError::Audit(format!("failed to serialize audit entry: {err}")))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                AppError::Audit(format!("failed to open audit log {}: {err}", path.display()))
            })?;
        writeln!(file, "{line}")
            .map_err(|err| AppError::Audit(format!("audit write failed: {err}")))?;

        Ok(())
    }
}
