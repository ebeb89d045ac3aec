use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (channels, schedules, posts)");
        conn.execute_batch(
            "
            CREATE TABLE channels (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE content_schedules (
                id                   TEXT PRIMARY KEY,
                channel_id           TEXT REFERENCES channels(id) ON DELETE SET NULL,
                name                 TEXT NOT NULL,
                type                 TEXT NOT NULL CHECK (type IN ('daily', 'weekly', 'monthly')),
                posts_per_timeframe  INTEGER NOT NULL DEFAULT 1,
                preferred_days       TEXT,
                preferred_times      TEXT,
                emoji                TEXT,
                color                TEXT,
                created_at           TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_content_schedules_channel
                ON content_schedules(channel_id);

            CREATE TABLE schedule_channels (
                schedule_id  TEXT NOT NULL REFERENCES content_schedules(id) ON DELETE CASCADE,
                channel_id   TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
                sort_order   INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (schedule_id, channel_id)
            );

            CREATE INDEX idx_schedule_channels_channel
                ON schedule_channels(channel_id);

            -- date columns hold epoch milliseconds (UTC)
            CREATE TABLE posts (
                id           TEXT PRIMARY KEY,
                schedule_id  TEXT REFERENCES content_schedules(id) ON DELETE SET NULL,
                channel_id   TEXT NOT NULL REFERENCES channels(id),
                date         INTEGER NOT NULL,
                status       TEXT NOT NULL DEFAULT 'draft',
                caption      TEXT NOT NULL DEFAULT '',
                created_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_posts_schedule_channel
                ON posts(schedule_id, channel_id, date);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (skipped schedule slots)");
        conn.execute_batch(
            "
            CREATE TABLE skipped_schedule_slots (
                id           TEXT PRIMARY KEY,
                schedule_id  TEXT NOT NULL REFERENCES content_schedules(id) ON DELETE CASCADE,
                date         INTEGER NOT NULL,
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(schedule_id, date)
            );

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
