pub(crate) const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS participants (
        row_index BIGSERIAL PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL,
        agent_embedding BYTEA,
        auth_token TEXT UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS actions (
        row_index BIGSERIAL PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS logs (
        row_index BIGSERIAL PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL,
        data JSONB NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS participants_data_gin_idx ON participants USING GIN(data)",
    "CREATE INDEX IF NOT EXISTS actions_data_gin_idx ON actions USING GIN(data)",
    "CREATE INDEX IF NOT EXISTS logs_data_gin_idx ON logs USING GIN(data)",
];
