//! # Write Serializer
//!
//! Single-writer actor that owns every write to the JSON store file.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Write Serializer                                 │
//! │                                                                         │
//! │  caller A ── enqueue(doc A) ──┐                                        │
//! │  caller B ── enqueue(doc B) ──┼──► mpsc (FIFO) ──► worker task          │
//! │  caller C ── close() ─────────┘                      │                  │
//! │                                                      ▼                  │
//! │                                   1. write  <file>.tmp                  │
//! │                                   2. fsync  <file>.tmp                  │
//! │                                   3. rename <file>.tmp → <file>         │
//! │                                   4. ack via oneshot ──► caller         │
//! │                                                                         │
//! │  Write A completes durably before write B starts.                      │
//! │  close() is queued like a write, so it acks after everything before it.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};

/// Queue depth before `enqueue` starts applying backpressure.
const QUEUE_CAPACITY: usize = 64;

enum Command {
    Write {
        bytes: Vec<u8>,
        ack: oneshot::Sender<io::Result<()>>,
    },
    Close {
        ack: oneshot::Sender<()>,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Write { bytes, .. } => write!(f, "Write({} bytes)", bytes.len()),
            Command::Close { .. } => write!(f, "Close"),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for submitting writes to the serializer task.
#[derive(Debug, Clone)]
pub struct WriteSerializerHandle {
    tx: mpsc::Sender<Command>,
}

impl WriteSerializerHandle {
    /// Queues a full document write and waits until it is durable.
    pub async fn enqueue(&self, bytes: Vec<u8>) -> DbResult<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Command::Write { bytes, ack })
            .await
            .map_err(|_| DbError::Closed)?;

        done.await.map_err(|_| DbError::Closed)?.map_err(DbError::Io)
    }

    /// Stops accepting writes and waits for every queued write to finish.
    ///
    /// Calling it again after the worker has stopped is a no-op.
    pub async fn close(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Command::Close { ack }).await.is_ok() {
            let _ = done.await;
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Background task that performs the writes.
pub struct WriteSerializer {
    path: PathBuf,
    rx: mpsc::Receiver<Command>,
}

impl WriteSerializer {
    /// Spawns the worker for `path` and returns its handle.
    pub fn spawn(path: impl Into<PathBuf>) -> WriteSerializerHandle {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = WriteSerializer {
            path: path.into(),
            rx,
        };

        tokio::spawn(worker.run());

        WriteSerializerHandle { tx }
    }

    async fn run(mut self) {
        info!(path = %self.path.display(), "Write serializer starting");

        let mut writes: u64 = 0;
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Write { bytes, ack } => {
                    let result = write_atomic(&self.path, &bytes).await;
                    match &result {
                        Ok(()) => {
                            writes += 1;
                            debug!(bytes = bytes.len(), writes, "Store document written");
                        }
                        Err(e) => error!(?e, path = %self.path.display(), "Store write failed"),
                    }
                    // The caller may have given up waiting; the write still happened.
                    let _ = ack.send(result);
                }
                Command::Close { ack } => {
                    self.rx.close();
                    // Drain anything that raced in ahead of the close.
                    while let Ok(Command::Write { bytes, ack }) = self.rx.try_recv() {
                        let _ = ack.send(write_atomic(&self.path, &bytes).await);
                    }
                    let _ = ack.send(());
                    break;
                }
            }
        }

        info!(writes, "Write serializer stopped");
    }
}

/// Writes `bytes` to a sibling temp file, fsyncs it and renames it over
/// `path`, so readers never see a half-written document.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let tmp = temp_path(path);
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp, path).await
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_are_durable_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let writer = WriteSerializer::spawn(&path);

        let mut pending = Vec::new();
        for i in 0..20 {
            // Submit in order, await concurrently.
            let bytes = format!("{{\"n\":{i}}}").into_bytes();
            let (ack, done) = oneshot::channel();
            writer.tx.send(Command::Write { bytes, ack }).await.unwrap();
            pending.push(done);
        }
        for done in pending {
            done.await.unwrap().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"n\":19}");
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_close_flushes_then_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let writer = WriteSerializer::spawn(&path);

        writer.enqueue(b"first".to_vec()).await.unwrap();
        writer.close().await;

        assert_eq!(std::fs::read(&path).unwrap(), b"first");
        assert!(matches!(
            writer.enqueue(b"late".to_vec()).await,
            Err(DbError::Closed)
        ));
        // Second close is harmless.
        writer.close().await;
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("data/inventorypro-db.json"));
        assert_eq!(tmp, PathBuf::from("data/inventorypro-db.json.tmp"));
    }
}
