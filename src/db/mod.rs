pub mod memory;
pub mod sheet_rows;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Cell;
use crate::models::sheet::HEADER_ROW;

pub use memory::MemorySheetStore;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    /// The backend cannot take requests at all, e.g. its pool was closed
    /// during shutdown.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(err) => write!(f, "Database error: {err}"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Append-only tabular store. Row 0 is the header row.
#[async_trait]
pub trait SheetStore: Send + Sync {
    fn kind(&self) -> &'static str;
    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError>;
    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, StoreError>;
    async fn is_empty(&self) -> Result<bool, StoreError>;
}

pub struct PgSheetStore {
    pool: PgPool,
}

impl PgSheetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> Result<&PgPool, StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Unavailable("connection pool is closed".to_string()));
        }
        Ok(&self.pool)
    }
}

#[async_trait]
impl SheetStore for PgSheetStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError> {
        let row_index = sheet_rows::append(self.pool()?, &cells).await?;
        tracing::debug!("Appended sheet row {row_index}");
        Ok(())
    }

    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        Ok(sheet_rows::list_all(self.pool()?).await?)
    }

    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(sheet_rows::count(self.pool()?).await? == 0)
    }
}

/// Write the header row into a store that has no rows yet.
/// Returns true if the header was written.
pub async fn provision_header(store: &dyn SheetStore) -> Result<bool, StoreError> {
    if !store.is_empty().await? {
        return Ok(false);
    }
    let header = HEADER_ROW.iter().map(|h| Cell::text(*h)).collect();
    store.append_row(header).await?;
    Ok(true)
}
