/// SQL for the local snapshot database.
pub struct Queries;

impl Queries {
    pub const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            key TEXT PRIMARY KEY,
            data JSON NOT NULL,
            saved_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    "#;

    pub const UPSERT_SNAPSHOT: &'static str = r#"
        INSERT INTO snapshots (key, data, saved_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            data = excluded.data,
            saved_at = excluded.saved_at
    "#;

    pub const GET_SNAPSHOT: &'static str = "SELECT data FROM snapshots WHERE key = ?1";
}
