use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            phone       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id            TEXT PRIMARY KEY,
            user_id       TEXT NOT NULL REFERENCES users(id),
            name          TEXT NOT NULL,
            phone         TEXT NOT NULL,
            relationship  TEXT NOT NULL DEFAULT '',
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_user
            ON contacts(user_id);

        CREATE TABLE IF NOT EXISTS safety_zones (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL REFERENCES users(id),
            name         TEXT NOT NULL,
            latitude     REAL NOT NULL,
            longitude    REAL NOT NULL,
            radius       REAL NOT NULL,
            description  TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_zones_user
            ON safety_zones(user_id);

        CREATE TABLE IF NOT EXISTS emergency_history (
            id             TEXT PRIMARY KEY,
            user_id        TEXT NOT NULL REFERENCES users(id),
            latitude       REAL NOT NULL,
            longitude      REAL NOT NULL,
            location_name  TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'active',
            description    TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_emergency_user
            ON emergency_history(user_id, created_at);

        CREATE TABLE IF NOT EXISTS locations (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            address     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
