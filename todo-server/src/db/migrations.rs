//! Schema for the todos table

use sqlx::PgPool;

/// Create the `todos` table and its priority index if they don't exist.
///
/// Safe to run on every startup.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running todo migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            priority TEXT NOT NULL,
            created_at TIMESTAMP,
            updated_at TIMESTAMP,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_priority ON todos(priority)")
        .execute(pool)
        .await?;

    tracing::info!("Todo migrations complete");
    Ok(())
}
