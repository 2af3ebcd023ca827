use async_trait::async_trait;
use curtail_core::store::Result;
use curtail_core::{LinkRecord, LinkStore, OwnerId, ShortCode, StoreError};
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the [`LinkStore`] contract.
///
/// `code` is the primary key; the unique-violation on insert is the
/// authoritative duplicate gate. Hit counts are incremented with a native
/// `hit_count = hit_count + 1` update so the read-modify-write never
/// happens in process. Timestamps are stored as unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Operation(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StoreError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn record_from_row(row: &MySqlRow) -> Result<LinkRecord> {
    let code: String = row.try_get("code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let owner_id: Option<String> = row.try_get("owner_id").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let hit_count: u64 = row.try_get("hit_count").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        code: ShortCode::new(code).map_err(|e| StoreError::InvalidData(e.to_string()))?,
        original_url,
        owner: owner_id.and_then(OwnerId::new),
        created_at: parse_created_at(created_at)?,
        hit_count,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl LinkStore for MySqlStore {
    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let found = sqlx::query(
            r#"
            SELECT 1
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(found)
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, original_url, owner_id, created_at, hit_count)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.original_url)
        .bind(record.owner.as_ref().map(OwnerId::as_str))
        .bind(record.created_at.as_second())
        .bind(record.hit_count)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::DuplicateCode(record.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT code, original_url, owner_id, created_at, hit_count
            FROM links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE links
            SET hit_count = hit_count + 1
            WHERE code = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<LinkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT code, original_url, owner_id, created_at, hit_count
            FROM links
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(record_from_row).collect()
    }
}
