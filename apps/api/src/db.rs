use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the feedback table if it does not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedback (
            id UUID PRIMARY KEY,
            student_name VARCHAR(100) NOT NULL,
            communication INTEGER NOT NULL,
            teamwork INTEGER NOT NULL,
            creativity INTEGER NOT NULL,
            critical_thinking INTEGER NOT NULL,
            presentation INTEGER NOT NULL,
            feedback_text TEXT NOT NULL,
            model_used VARCHAR(50) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
