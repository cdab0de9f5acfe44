use sqlx::PgPool;
use sqlx::types::Json;

use crate::models::Cell;

pub async fn append(pool: &PgPool, cells: &[Cell]) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO sheet_rows (cells) VALUES ($1) RETURNING row_index",
    )
    .bind(Json(cells))
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Vec<Cell>>, sqlx::Error> {
    let rows: Vec<(Json<Vec<Cell>>,)> =
        sqlx::query_as("SELECT cells FROM sheet_rows ORDER BY row_index ASC")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(cells,)| cells.0).collect())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sheet_rows")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
