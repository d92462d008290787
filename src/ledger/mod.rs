//! Append-only CSV record of every processed offer.

pub mod model;
pub mod persistence;

pub use model::LedgerRecord;
pub use persistence::LedgerWriter;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("ledger write task failed: {0}")]
    Task(String),
    #[error("ledger worker is not running")]
    WorkerStopped,
}
