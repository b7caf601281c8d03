//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The durable, lossless, time-ordered append log for every ADD/CANCEL/MODIFY/MATCH audit event.
// Producers (one `Sender` clone per `OrderBook`) never block; a single dedicated thread drains
// the channel, serializes each event as a `KEY=VALUE` line, and flushes after every batch.
//
// | Name            | Description                                                             |
// |------------------|--------------------------------------------------------------------------|
// | AuditSinkError   | Fatal construction failures (the log file couldn't be opened).         |
// | AuditSink        | Owns the background writer thread and its handle.                      |
//--------------------------------------------------------------------------------------------------
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use thiserror::Error;
use tracing::{error, info};

use crate::domain::models::audit::AuditEvent;

#[derive(Debug, Error)]
pub enum AuditSinkError {
    #[error("failed to open audit log at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Background writer for the audit log. Construction is the only fallible step — once built,
/// every event handed to a cloned `Sender` is either written or counted as dropped, never lost
/// silently and never allowed to block the matching thread that produced it.
pub struct AuditSink {
    handle: Option<JoinHandle<()>>,
    dropped_writes: Arc<AtomicU64>,
}

impl AuditSink {
    /// Opens (creating/truncating) the audit log at `path` and starts its writer thread.
    /// Returns the sink plus a `Sender` producers clone one-per-book. The channel closes, and
    /// the writer thread exits, once every clone of that sender (and any the caller made) is
    /// dropped — `shutdown` assumes the caller has already stopped all producers.
    pub fn new(path: impl AsRef<Path>, flush_interval: Duration) -> Result<(Self, Sender<AuditEvent>), AuditSinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditSinkError::OpenFailed { path: path.clone(), source })?;

        let (tx, rx) = crossbeam_channel::unbounded();
        let dropped_writes = Arc::new(AtomicU64::new(0));
        let handle = std::thread::spawn({
            let dropped_writes = Arc::clone(&dropped_writes);
            move || run_writer(file, rx, flush_interval, dropped_writes)
        });

        info!(path = %path.display(), "audit sink opened");
        Ok((
            AuditSink {
                handle: Some(handle),
                dropped_writes,
            },
            tx,
        ))
    }

    /// Number of events whose serialization or write failed. Writes are never retried: a
    /// struggling disk logs and counts the failure but never blocks the caller.
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes.load(Ordering::Relaxed)
    }

    /// Waits for the writer thread to drain, flush, and exit. The caller is responsible for
    /// having already dropped every `Sender` clone handed out by `new` — otherwise this blocks
    /// forever, since the writer thread only stops once the channel disconnects.
    pub fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AuditSink {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_writer(file: File, rx: Receiver<AuditEvent>, flush_interval: Duration, dropped_writes: Arc<AtomicU64>) {
    let mut writer = BufWriter::new(file);
    loop {
        match rx.recv_timeout(flush_interval) {
            Ok(event) => {
                write_event(&mut writer, &event, &dropped_writes);
                while let Ok(event) = rx.try_recv() {
                    write_event(&mut writer, &event, &dropped_writes);
                }
                if let Err(err) = writer.flush() {
                    error!(error = %err, "audit log flush failed");
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Err(err) = writer.flush() {
                    error!(error = %err, "audit log flush failed");
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                while let Ok(event) = rx.try_recv() {
                    write_event(&mut writer, &event, &dropped_writes);
                }
                if let Err(err) = writer.flush() {
                    error!(error = %err, "audit log flush failed");
                }
                break;
            }
        }
    }
    info!("audit sink writer thread exiting");
}

fn write_event(writer: &mut BufWriter<File>, event: &AuditEvent, dropped_writes: &Arc<AtomicU64>) {
    if let Err(err) = writer.write_all(event.to_line().as_bytes()) {
        error!(error = %err, "audit log write failed, event dropped");
        dropped_writes.fetch_add(1, Ordering::Relaxed);
    }
}
