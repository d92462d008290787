//! Background writer for the offer ledger.
//!
//! Every append goes through a single worker task, so rows from concurrent
//! submissions are written one at a time and never interleave. Callers wait
//! for the worker's acknowledgement, which is sent after the row is flushed.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};

use super::model::LedgerRecord;
use super::LedgerError;

const CHANNEL_CAPACITY: usize = 64;

struct AppendCommand {
    record: LedgerRecord,
    ack: oneshot::Sender<Result<(), LedgerError>>,
}

/// Handle to the ledger worker. Cheap to clone.
#[derive(Clone)]
pub struct LedgerWriter {
    sender: mpsc::Sender<AppendCommand>,
}

impl LedgerWriter {
    /// Spawn the worker on the current Tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(start_ledger_worker(receiver, path));
        Self { sender }
    }

    /// Append one row and wait until it is on disk.
    pub async fn append(&self, record: LedgerRecord) -> Result<(), LedgerError> {
        let (ack, done) = oneshot::channel();
        self.sender
            .send(AppendCommand { record, ack })
            .await
            .map_err(|_| LedgerError::WorkerStopped)?;
        done.await.map_err(|_| LedgerError::WorkerStopped)?
    }
}

async fn start_ledger_worker(mut receiver: mpsc::Receiver<AppendCommand>, path: PathBuf) {
    log::info!("Ledger worker started ({})", path.display());

    while let Some(AppendCommand { record, ack }) = receiver.recv().await {
        let target = path.clone();
        let offer_id = record.offer_id.clone();
        let result = tokio::task::spawn_blocking(move || append_record(&target, &record))
            .await
            .unwrap_or_else(|e| Err(LedgerError::Task(e.to_string())));

        match &result {
            Ok(()) => log::info!("[{}] ledger row appended", offer_id),
            Err(e) => log::error!("[{}] failed to append ledger row: {}", offer_id, e),
        }

        if ack.send(result).is_err() {
            log::debug!("[{}] ledger caller went away before acknowledgement", offer_id);
        }
    }

    log::info!("Ledger worker stopped");
}

/// Append `record`, writing the header first when the file is new or empty.
pub fn append_record(path: &Path, record: &LedgerRecord) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}
