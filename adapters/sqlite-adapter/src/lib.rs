//! sqlite-adapter: SQLite implementation of the CommunityStore port.
//!
//! Purpose
//! - Mirror registry mutations into a local file so every run leaves a
//!   durable audit trail.
//! - Implements the `CommunityStore` trait from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - Request and bill ids are the registry's ids, stored verbatim. Registry
//!   counters restart on every launch, so each opened store starts a new
//!   session row and requests/bills are keyed by `(session_id, id)`.
//! - Nothing here is read back into the registry. The read helpers exist for
//!   inspection and tests.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use domain::{Bill, BillStatus, CommunityStore, CoreError, House, Request, RequestStatus, Service};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// SQLite-backed store. One instance is one session.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    session_id: i64,
}

/// A row of the `sessions` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRow {
    pub session_id: i64,
    pub community: String,
    pub started_at: DateTime<Utc>,
}

/// A row of the `houses` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredHouse {
    pub house_id: u32,
    pub owner: String,
    pub residents: Option<String>,
}

/// A row of the `requests` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRequest {
    pub request_id: u32,
    pub house_id: u32,
    pub service_id: u32,
    pub status: RequestStatus,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at the given path, ensure schema,
    /// and start a new session for `community`.
    pub fn new<P: AsRef<Path>>(path: P, community: &str) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(map_sqerr)?;
        Self::with_connection(conn, community)
    }

    /// Like [`SqliteStore::new`] but creates missing parent directories first.
    pub fn from_path<P: AsRef<Path>>(path: P, community: &str) -> Result<Self, CoreError> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CoreError::Repository(format!("create {}: {e}", dir.display())))?;
            }
        }
        Self::new(path, community)
    }

    /// Private in-memory database; gone when the store is dropped.
    pub fn in_memory(community: &str) -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqerr)?;
        Self::with_connection(conn, community)
    }

    fn with_connection(conn: Connection, community: &str) -> Result<Self, CoreError> {
        init_schema(&conn)?;
        conn.execute(
            "INSERT INTO sessions(community, started_at) VALUES (?1, ?2)",
            params![community, Utc::now()],
        )
        .map_err(map_sqerr)?;
        let session_id = conn.last_insert_rowid();
        debug!(session_id, community, "opened store session");
        Ok(Self {
            conn: Mutex::new(conn),
            session_id,
        })
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }

    /// All sessions recorded in this file, oldest first.
    pub fn sessions(&self) -> Result<Vec<SessionRow>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT session_id, community, started_at FROM sessions ORDER BY session_id")
            .map_err(map_sqerr)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SessionRow {
                    session_id: row.get(0)?,
                    community: row.get(1)?,
                    started_at: row.get(2)?,
                })
            })
            .map_err(map_sqerr)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(map_sqerr)
    }

    pub fn house(&self, house_id: u32) -> Result<Option<StoredHouse>, CoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT house_id, owner, residents FROM houses WHERE house_id = ?1",
            params![house_id],
            |row| {
                Ok(StoredHouse {
                    house_id: row.get(0)?,
                    owner: row.get(1)?,
                    residents: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(map_sqerr)
    }

    /// Bills written during this session, in id order.
    pub fn session_bills(&self) -> Result<Vec<Bill>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT bill_id, house_id, amount, status FROM bills WHERE session_id = ?1 ORDER BY bill_id")
            .map_err(map_sqerr)?;
        let mut rows = stmt.query(params![self.session_id]).map_err(map_sqerr)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqerr)? {
            let status: String = row.get(3).map_err(map_sqerr)?;
            let amount: i64 = row.get(2).map_err(map_sqerr)?;
            let amount = u64::try_from(amount)
                .map_err(|_| CoreError::Repository(format!("negative bill amount in db: {amount}")))?;
            out.push(Bill {
                id: row.get(0).map_err(map_sqerr)?,
                house_id: row.get(1).map_err(map_sqerr)?,
                amount,
                status: BillStatus::parse(&status)
                    .ok_or_else(|| CoreError::Repository(format!("bad bill status in db: {status}")))?,
            });
        }
        Ok(out)
    }

    /// Requests written during this session, in id order.
    pub fn session_requests(&self) -> Result<Vec<StoredRequest>, CoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT request_id, house_id, service_id, status FROM requests WHERE session_id = ?1 ORDER BY request_id")
            .map_err(map_sqerr)?;
        let mut rows = stmt.query(params![self.session_id]).map_err(map_sqerr)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqerr)? {
            let status: String = row.get(3).map_err(map_sqerr)?;
            out.push(StoredRequest {
                request_id: row.get(0).map_err(map_sqerr)?,
                house_id: row.get(1).map_err(map_sqerr)?,
                service_id: row.get(2).map_err(map_sqerr)?,
                status: RequestStatus::parse(&status)
                    .ok_or_else(|| CoreError::Repository(format!("bad request status in db: {status}")))?,
            });
        }
        Ok(out)
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS houses (
            house_id INTEGER PRIMARY KEY,
            owner TEXT NOT NULL,
            residents TEXT
        );
        CREATE TABLE IF NOT EXISTS services (
            service_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            provider TEXT,
            cost INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sessions (
            session_id INTEGER PRIMARY KEY AUTOINCREMENT,
            community TEXT NOT NULL,
            started_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS requests (
            session_id INTEGER NOT NULL,
            request_id INTEGER NOT NULL,
            house_id INTEGER NOT NULL,
            service_id INTEGER NOT NULL,
            status TEXT NOT NULL,
            PRIMARY KEY (session_id, request_id)
        );
        CREATE TABLE IF NOT EXISTS bills (
            session_id INTEGER NOT NULL,
            bill_id INTEGER NOT NULL,
            house_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            status TEXT NOT NULL,
            PRIMARY KEY (session_id, bill_id)
        );
        CREATE INDEX IF NOT EXISTS idx_bills_house ON bills(house_id);
        "#,
    )
    .map_err(map_sqerr)
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Repository(format!("sqlite error: {e}"))
}

impl CommunityStore for SqliteStore {
    fn insert_house(&self, house: &House) -> Result<(), CoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO houses(house_id, owner, residents) VALUES (?1, ?2, ?3)",
            params![house.id, house.owner, house.residents_joined()],
        )
        .map_err(map_sqerr)?;
        Ok(())
    }

    fn insert_service(&self, service: &Service) -> Result<(), CoreError> {
        let cost = sql_integer("service cost", service.cost)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO services(service_id, name, provider, cost) VALUES (?1, ?2, ?3, ?4)",
            params![service.id, service.name, service.provider, cost],
        )
        .map_err(map_sqerr)?;
        Ok(())
    }

    fn insert_request(&self, request: &Request) -> Result<(), CoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO requests(session_id, request_id, house_id, service_id, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.session_id,
                request.id,
                request.house_id,
                request.service_id,
                request.status.as_str(),
            ],
        )
        .map_err(map_sqerr)?;
        Ok(())
    }

    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError> {
        let amount = sql_integer("bill amount", bill.amount)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO bills(session_id, bill_id, house_id, amount, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.session_id,
                bill.id,
                bill.house_id,
                amount,
                bill.status.as_str(),
            ],
        )
        .map_err(map_sqerr)?;
        Ok(())
    }

    fn update_bill_status(&self, bill_id: u32, status: BillStatus) -> Result<(), CoreError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE bills SET status = ?1 WHERE session_id = ?2 AND bill_id = ?3",
                params![status.as_str(), self.session_id, bill_id],
            )
            .map_err(map_sqerr)?;
        if changed == 0 {
            debug!(bill_id, "bill status update matched no rows");
        }
        Ok(())
    }

    fn update_request_status(
        &self,
        request_id: u32,
        status: RequestStatus,
    ) -> Result<(), CoreError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE requests SET status = ?1 WHERE session_id = ?2 AND request_id = ?3",
                params![status.as_str(), self.session_id, request_id],
            )
            .map_err(map_sqerr)?;
        if changed == 0 {
            debug!(request_id, "request status update matched no rows");
        }
        Ok(())
    }
}

/// SQLite integers are signed; money above `i64::MAX` is rejected, not wrapped.
fn sql_integer(what: &str, value: u64) -> Result<i64, CoreError> {
    i64::try_from(value).map_err(|_| CoreError::InvalidInput(format!("{what} {value} exceeds storage range")))
}
