/*!
 * SQLite connection for the glossary.
 *
 * One connection is shared behind a mutex. Async callers hop onto tokio's
 * blocking pool so that store round trips never stall the runtime while
 * the translation tasks wait on the LLM.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::schema;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "glossary.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "glossator";

/// How long a writer waits for another process holding the file lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Path reported for in-memory databases
const MEMORY_PATH: &str = ":memory:";

/// Shared glossary connection
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("db_path", &self.db_path)
            .finish()
    }
}

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    connection
        .lock()
        .map_err(|e| anyhow!("Glossary database lock poisoned: {}", e))
}

impl DatabaseConnection {
    /// Open the glossary in the platform data directory
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open (or create) the glossary at `db_path`, creating parent directories
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        info!("Opening glossary database at: {:?}", db_path);

        let conn = Connection::open(&db_path).with_context(|| format!("Failed to open database: {:?}", db_path))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set database busy timeout")?;

        Self::from_connection(conn, db_path)
    }

    /// Private in-memory glossary, used by tests
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory glossary database");
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        Self::from_connection(conn, PathBuf::from(MEMORY_PATH))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/glossator/glossary.db`
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Database file path, `:memory:` for in-memory databases
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == MEMORY_PATH
    }

    /// Run `f` on the calling thread while holding the connection
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.connection)?;
        f(&conn)
    }

    /// Run `f` with the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |conn| f(&*conn)).await
    }

    /// Run `f` inside a transaction on the blocking pool.
    ///
    /// The transaction commits when `f` succeeds and rolls back otherwise.
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run_blocking(move |conn| {
            let tx = conn.transaction().context("Failed to begin transaction")?;
            let result = f(&tx)?;
            tx.commit().context("Failed to commit transaction")?;
            Ok(result)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&connection)?;
            f(&mut conn)
        })
        .await
        .context("Glossary database task failed")?
    }
}
