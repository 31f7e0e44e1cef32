/// Database layer for Budgetal
///
/// - `pool`: Postgres connection pool and health check
/// - `migrations`: Embedded schema migrations
///
/// Row models live in [`crate::models`].
///
/// ```no_run
/// use budgetal_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
