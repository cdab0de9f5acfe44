use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::Cell;

use super::{SheetStore, StoreError};

/// Process-local sheet, for development and tests.
#[derive(Default)]
pub struct MemorySheetStore {
    rows: RwLock<Vec<Vec<Cell>>>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn append_row(&self, cells: Vec<Cell>) -> Result<(), StoreError> {
        self.rows.write().await.push(cells);
        Ok(())
    }

    async fn read_rows(&self) -> Result<Vec<Vec<Cell>>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.rows.read().await.is_empty())
    }
}
