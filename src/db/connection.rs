use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

/// Waits this long for a lock held by another process sharing the history
/// file, e.g. `analyze` recording while `history` reads.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the analysis history database. All statements run on one
/// dedicated thread; clones share it.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create history directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("swingsage-history".into())
            .spawn(move || {
                let mut conn = match open_history(&db_path) {
                    Ok(conn) => {
                        let _ = ready_tx.send(Ok(()));
                        conn
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                info!("History database thread shutting down");
            })
            .context("failed to spawn history database thread")?;

        ready_rx
            .recv()
            .context("history database thread exited before signaling readiness")??;

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }
}

/// Opens the history file on the worker thread and brings its schema current.
fn open_history(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open history database {}", path.display()))?;

    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set history busy timeout")?;
    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        error!("Failed to enable WAL mode: {err}");
    }
    if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
        error!("Failed to enable foreign keys: {err}");
    }

    let upgrade = run_migrations(&mut conn).context("failed to migrate history database")?;
    let stored: i64 = conn
        .query_row("SELECT COUNT(*) FROM swing_analyses", [], |row| row.get(0))
        .context("failed to count stored analyses")?;

    if upgrade.applied() {
        info!(
            "History database {} migrated v{} -> v{}; {} analyses stored",
            path.display(),
            upgrade.from,
            upgrade.to,
            stored
        );
    } else {
        info!(
            "History database {} at schema v{}; {} analyses stored",
            path.display(),
            upgrade.to,
            stored
        );
    }

    Ok(conn)
}
