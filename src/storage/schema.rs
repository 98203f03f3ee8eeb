//! Idempotent schema bootstrap, applied once at startup.
//!
//! References between tables are deliberately soft (no FOREIGN KEY clauses):
//! the services validate category references at write time and orchestrate
//! image cleanup themselves, matching the documented consistency model.

use sqlx::PgPool;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id              UUID PRIMARY KEY,
        username        TEXT NOT NULL UNIQUE,
        email           TEXT NOT NULL UNIQUE,
        password_hash   TEXT NOT NULL,
        role            TEXT NOT NULL DEFAULT 'user',
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id              UUID PRIMARY KEY,
        name            TEXT NOT NULL UNIQUE,
        slug            TEXT NOT NULL UNIQUE,
        description     TEXT,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS images (
        id                  UUID PRIMARY KEY,
        image_url           TEXT NOT NULL,
        external_asset_id   TEXT NOT NULL,
        uploaded_by         UUID NOT NULL,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id              UUID PRIMARY KEY,
        title           TEXT NOT NULL,
        author          TEXT NOT NULL,
        year            INTEGER NOT NULL,
        category_id     UUID,
        image_id        UUID,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS books_category_id_idx ON books (category_id)",
    "CREATE INDEX IF NOT EXISTS books_created_at_idx ON books (created_at DESC)",
];

pub async fn apply_schema(pool: &PgPool) -> anyhow::Result<()> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("schema applied ({} statements)", DDL.len());
    Ok(())
}
