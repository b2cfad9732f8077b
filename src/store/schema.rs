//! Table name constants and DDL, consolidated in one module the way the
//! source keeps its own table constants (`ABSTRACTION`, `BLUEPRINT`, ...)
//! next to the SQL that references them.

pub const ROOMS: &str = "rooms";
pub const PLAYERS: &str = "players";
pub const ROUNDS: &str = "rounds";
pub const PAIRS: &str = "pairs";
pub const ACTIONS: &str = "actions";
pub const MESSAGES: &str = "messages";
pub const INDICATORS: &str = "indicators";

const DDL: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ", "rooms", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "code            TEXT NOT NULL UNIQUE, ",
    "status          TEXT NOT NULL, ",
    "current_round   INTEGER NOT NULL DEFAULT 0, ",
    "state_version   BIGINT NOT NULL DEFAULT 1, ",
    "created_at      TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "updated_at      TIMESTAMPTZ NOT NULL DEFAULT now() ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "players", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "room_id         BIGINT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE, ",
    "nickname        TEXT NOT NULL, ",
    "is_host         BOOLEAN NOT NULL DEFAULT false, ",
    "joined_at       TIMESTAMPTZ NOT NULL DEFAULT now() ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "rounds", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "room_id         BIGINT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE, ",
    "round_number    INTEGER NOT NULL, ",
    "phase           TEXT NOT NULL, ",
    "status          TEXT NOT NULL, ",
    "skipped         BOOLEAN NOT NULL DEFAULT false, ",
    "started_at      TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "ended_at        TIMESTAMPTZ, ",
    "UNIQUE (room_id, round_number) ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "pairs", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "round_id        BIGINT NOT NULL REFERENCES rounds(id) ON DELETE CASCADE, ",
    "player1         BIGINT NOT NULL REFERENCES players(id), ",
    "player2         BIGINT NOT NULL REFERENCES players(id) ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "actions", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "round_id        BIGINT NOT NULL REFERENCES rounds(id) ON DELETE CASCADE, ",
    "player_id       BIGINT NOT NULL REFERENCES players(id), ",
    "choice          TEXT NOT NULL, ",
    "payoff          INTEGER, ",
    "created_at      TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "UNIQUE (round_id, player_id) ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "messages", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "round_id        BIGINT NOT NULL REFERENCES rounds(id) ON DELETE CASCADE, ",
    "sender_id       BIGINT NOT NULL REFERENCES players(id), ",
    "receiver_id     BIGINT NOT NULL REFERENCES players(id), ",
    "content         TEXT NOT NULL, ",
    "created_at      TIMESTAMPTZ NOT NULL DEFAULT now(), ",
    "UNIQUE (round_id, sender_id) ",
    "); ",
    "CREATE TABLE IF NOT EXISTS ", "indicators", " ( ",
    "id              BIGSERIAL PRIMARY KEY, ",
    "room_id         BIGINT NOT NULL REFERENCES rooms(id) ON DELETE CASCADE, ",
    "player_id       BIGINT NOT NULL REFERENCES players(id), ",
    "symbol          TEXT NOT NULL, ",
    "UNIQUE (room_id, player_id) ",
    ");"
);

/// Creates every table if it does not already exist. Safe to call on every boot.
pub async fn migrate(client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
    client.batch_execute(DDL).await
}
