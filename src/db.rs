//! Postgres pool setup. Grounded on the contract implied by `tests/db.rs`:
//! `create_pool` reads `DATABASE_URL` and panics if it's unset or unreachable.

use sqlx::postgres::{PgPool, PgPoolOptions};

const MAX_CONNECTIONS: u32 = 10;

pub async fn create_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&database_url)
        .await
        .expect("failed to connect to DATABASE_URL")
}
