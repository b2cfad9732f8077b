use super::Pool;
use super::Store;
use super::schema;
use crate::dto::RoundResultResponse;
use crate::engine::pairing;
use crate::engine::payoff;
use crate::engine::state_machine;
use crate::error::AppError;
use crate::error::AppResult;
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use std::time::SystemTime;
use tokio_postgres::Row;
use tokio_postgres::Transaction;

use crate::domain::Action;
use crate::domain::Choice;
use crate::domain::Id;
use crate::domain::Indicator;
use crate::domain::Message;
use crate::domain::Pair;
use crate::domain::Phase;
use crate::domain::Player;
use crate::domain::Room;
use crate::domain::RoomStatus;
use crate::domain::Round;
use crate::domain::RoundStatus;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn random_code() -> String {
    let mut rng = rand::rng();
    (0..6)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

fn row_to_room(row: &Row) -> Room {
    Room {
        id: row.get("id"),
        code: row.get("code"),
        status: RoomStatus::from_str(row.get("status")).expect("status column holds a valid enum value"),
        current_round: row.get("current_round"),
        state_version: row.get("state_version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_player(row: &Row) -> Player {
    Player {
        id: row.get("id"),
        room_id: row.get("room_id"),
        nickname: row.get("nickname"),
        is_host: row.get("is_host"),
        joined_at: row.get("joined_at"),
    }
}

fn row_to_round(row: &Row) -> Round {
    Round {
        id: row.get("id"),
        room_id: row.get("room_id"),
        round_number: row.get("round_number"),
        phase: Phase::from_str(row.get("phase")).expect("phase column holds a valid enum value"),
        status: RoundStatus::from_str(row.get("status")).expect("status column holds a valid enum value"),
        skipped: row.get("skipped"),
        started_at: row.get("started_at"),
        ended_at: row.get("ended_at"),
    }
}

fn row_to_pair(row: &Row) -> Pair {
    Pair {
        id: row.get("id"),
        round_id: row.get("round_id"),
        player1: row.get("player1"),
        player2: row.get("player2"),
    }
}

fn row_to_action(row: &Row) -> Action {
    Action {
        id: row.get("id"),
        round_id: row.get("round_id"),
        player_id: row.get("player_id"),
        choice: Choice::from_str(row.get("choice")).expect("choice column holds a valid enum value"),
        payoff: row.get("payoff"),
        created_at: row.get("created_at"),
    }
}

fn row_to_message(row: &Row) -> Message {
    Message {
        id: row.get("id"),
        round_id: row.get("round_id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

fn row_to_indicator(row: &Row) -> Indicator {
    Indicator {
        id: row.get("id"),
        room_id: row.get("room_id"),
        player_id: row.get("player_id"),
        symbol: row.get("symbol"),
    }
}

async fn bump_version(tx: &Transaction<'_>, room_id: Id) -> AppResult<i64> {
    let row = tx
        .query_one(
            const_format::concatcp!(
                "UPDATE ", schema::ROOMS, " ",
                "SET state_version = state_version + 1, updated_at = now() ",
                "WHERE id = $1 ",
                "RETURNING state_version"
            ),
            &[&room_id],
        )
        .await?;
    Ok(row.get(0))
}

async fn load_room(tx: &Transaction<'_>, room_id: Id) -> AppResult<Room> {
    tx.query_opt(
        const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE id = $1"),
        &[&room_id],
    )
    .await?
    .map(|r| row_to_room(&r))
    .ok_or_else(|| AppError::not_found("room not found"))
}

async fn load_room_locked(tx: &Transaction<'_>, room_id: Id) -> AppResult<Room> {
    tx.query_opt(
        const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE id = $1 FOR UPDATE"),
        &[&room_id],
    )
    .await?
    .map(|r| row_to_room(&r))
    .ok_or_else(|| AppError::not_found("room not found"))
}

async fn load_round(tx: &Transaction<'_>, room_id: Id, round_number: i32) -> AppResult<Round> {
    tx.query_opt(
        const_format::concatcp!(
            "SELECT * FROM ", schema::ROUNDS, " ",
            "WHERE room_id = $1 AND round_number = $2"
        ),
        &[&room_id, &round_number],
    )
    .await?
    .map(|r| row_to_round(&r))
    .ok_or_else(|| AppError::not_found("round not found"))
}

async fn load_round_locked(tx: &Transaction<'_>, room_id: Id, round_number: i32) -> AppResult<Round> {
    tx.query_opt(
        const_format::concatcp!(
            "SELECT * FROM ", schema::ROUNDS, " ",
            "WHERE room_id = $1 AND round_number = $2 FOR UPDATE"
        ),
        &[&room_id, &round_number],
    )
    .await?
    .map(|r| row_to_round(&r))
    .ok_or_else(|| AppError::not_found("round not found"))
}

async fn load_pairs(tx: &Transaction<'_>, round_id: Id) -> AppResult<Vec<Pair>> {
    Ok(tx
        .query(
            const_format::concatcp!("SELECT * FROM ", schema::PAIRS, " WHERE round_id = $1"),
            &[&round_id],
        )
        .await?
        .iter()
        .map(row_to_pair)
        .collect())
}

async fn load_actions(tx: &Transaction<'_>, round_id: Id) -> AppResult<HashMap<Id, Action>> {
    Ok(tx
        .query(
            const_format::concatcp!("SELECT * FROM ", schema::ACTIONS, " WHERE round_id = $1"),
            &[&round_id],
        )
        .await?
        .iter()
        .map(row_to_action)
        .map(|a| (a.player_id, a))
        .collect())
}

async fn non_host_player_ids(tx: &Transaction<'_>, room_id: Id) -> AppResult<Vec<Id>> {
    Ok(tx
        .query(
            const_format::concatcp!(
                "SELECT id FROM ", schema::PLAYERS, " ",
                "WHERE room_id = $1 AND is_host = false"
            ),
            &[&room_id],
        )
        .await?
        .iter()
        .map(|r| r.get(0))
        .collect())
}

/// Settles every pair in a waiting_actions round whose actions are all in and
/// transitions it to ready_to_publish, bumping the version once. A no-op if
/// the round has already moved on, so callers can invoke it unconditionally.
async fn try_finalize_locked(tx: &Transaction<'_>, room_id: Id, round: &Round) -> AppResult<()> {
    if round.status != RoundStatus::WaitingActions {
        return Ok(());
    }
    let pairs = load_pairs(tx, round.id).await?;
    let actions = load_actions(tx, round.id).await?;
    if pairs.is_empty() || actions.len() < pairs.len() * 2 {
        return Ok(());
    }
    for pair in &pairs {
        let a1 = actions.get(&pair.player1);
        let a2 = actions.get(&pair.player2);
        let (Some(a1), Some(a2)) = (a1, a2) else {
            return Ok(());
        };
        let (p1, p2) = payoff::resolve(a1.choice, a2.choice);
        tx.execute(
            const_format::concatcp!("UPDATE ", schema::ACTIONS, " SET payoff = $1 WHERE id = $2"),
            &[&p1, &a1.id],
        )
        .await?;
        tx.execute(
            const_format::concatcp!("UPDATE ", schema::ACTIONS, " SET payoff = $1 WHERE id = $2"),
            &[&p2, &a2.id],
        )
        .await?;
    }
    tx.execute(
        const_format::concatcp!(
            "UPDATE ", schema::ROUNDS, " SET status = 'ready_to_publish' WHERE id = $1"
        ),
        &[&round.id],
    )
    .await?;
    bump_version(tx, room_id).await?;
    Ok(())
}

async fn insert_round(
    tx: &Transaction<'_>,
    room_id: Id,
    round_number: i32,
    pairs: &[(Id, Id)],
) -> AppResult<Round> {
    let phase = Phase::base_for(round_number);
    let row = tx
        .query_one(
            const_format::concatcp!(
                "INSERT INTO ", schema::ROUNDS, " (room_id, round_number, phase, status) ",
                "VALUES ($1, $2, $3, 'waiting_actions') ",
                "RETURNING *"
            ),
            &[&room_id, &round_number, &phase.as_str()],
        )
        .await?;
    let round = row_to_round(&row);
    for (p1, p2) in pairs {
        tx.execute(
            const_format::concatcp!(
                "INSERT INTO ", schema::PAIRS, " (round_id, player1, player2) VALUES ($1, $2, $3)"
            ),
            &[&round.id, p1, p2],
        )
        .await?;
    }
    Ok(round)
}

/// Live Postgres implementation of [`Store`]. Every method opens (and
/// commits) exactly one transaction against a connection checked out from
/// the pool, so the whole method body is the atomic unit.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_room(&self) -> AppResult<(Room, Player)> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let code = loop {
            let candidate = random_code();
            let exists = tx
                .query_opt(
                    const_format::concatcp!("SELECT 1 FROM ", schema::ROOMS, " WHERE code = $1"),
                    &[&candidate],
                )
                .await?;
            if exists.is_none() {
                break candidate;
            }
        };
        let row = tx
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ", schema::ROOMS, " (code, status, current_round, state_version) ",
                    "VALUES ($1, 'WAITING', 0, 1) RETURNING *"
                ),
                &[&code],
            )
            .await?;
        let room = row_to_room(&row);
        let prow = tx
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ", schema::PLAYERS, " (room_id, nickname, is_host) ",
                    "VALUES ($1, 'Host', true) RETURNING *"
                ),
                &[&room.id],
            )
            .await?;
        let host = row_to_player(&prow);
        tx.commit().await?;
        log::info!("created room {} ({})", room.id, room.code);
        Ok((room, host))
    }

    async fn get_room_by_code(&self, code: &str) -> AppResult<Room> {
        let conn = self.pool.checkout().await;
        conn.query_opt(
            const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE code = $1"),
            &[&code],
        )
        .await?
        .map(|r| row_to_room(&r))
        .ok_or_else(|| AppError::not_found("no room with that code"))
    }

    async fn get_room(&self, room_id: Id) -> AppResult<Room> {
        let conn = self.pool.checkout().await;
        conn.query_opt(
            const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE id = $1"),
            &[&room_id],
        )
        .await?
        .map(|r| row_to_room(&r))
        .ok_or_else(|| AppError::not_found("room not found"))
    }

    async fn list_rooms(
        &self,
        status: Option<RoomStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Room>, i64)> {
        let conn = self.pool.checkout().await;
        let limit = limit.clamp(1, 200);
        let (rows, total) = match status {
            Some(s) => {
                let rows = conn
                    .query(
                        const_format::concatcp!(
                            "SELECT * FROM ", schema::ROOMS, " WHERE status = $1 ",
                            "ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                        ),
                        &[&s.as_str(), &limit, &offset],
                    )
                    .await?;
                let total: i64 = conn
                    .query_one(
                        const_format::concatcp!(
                            "SELECT COUNT(*) FROM ", schema::ROOMS, " WHERE status = $1"
                        ),
                        &[&s.as_str()],
                    )
                    .await?
                    .get(0);
                (rows, total)
            }
            None => {
                let rows = conn
                    .query(
                        const_format::concatcp!(
                            "SELECT * FROM ", schema::ROOMS, " ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                        ),
                        &[&limit, &offset],
                    )
                    .await?;
                let total: i64 = conn
                    .query_one(const_format::concatcp!("SELECT COUNT(*) FROM ", schema::ROOMS), &[])
                    .await?
                    .get(0);
                (rows, total)
            }
        };
        Ok((rows.iter().map(row_to_room).collect(), total))
    }

    async fn delete_room(&self, room_id: Id) -> AppResult<()> {
        let conn = self.pool.checkout().await;
        let affected = conn
            .execute(
                const_format::concatcp!("DELETE FROM ", schema::ROOMS, " WHERE id = $1"),
                &[&room_id],
            )
            .await?;
        if affected == 0 {
            return Err(AppError::not_found("room not found"));
        }
        log::info!("deleted room {room_id}");
        Ok(())
    }

    async fn join_room(&self, code: &str, nickname: &str) -> AppResult<Player> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = tx
            .query_opt(
                const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE code = $1 FOR UPDATE"),
                &[&code],
            )
            .await?
            .map(|r| row_to_room(&r))
            .ok_or_else(|| AppError::not_found("no room with that code"))?;
        let row = tx
            .query_one(
                const_format::concatcp!(
                    "INSERT INTO ", schema::PLAYERS, " (room_id, nickname, is_host) ",
                    "VALUES ($1, $2, false) RETURNING *"
                ),
                &[&room.id, &nickname],
            )
            .await?;
        let player = row_to_player(&row);
        bump_version(&tx, room.id).await?;
        tx.commit().await?;
        Ok(player)
    }

    async fn list_players(&self, room_id: Id) -> AppResult<Vec<Player>> {
        let conn = self.pool.checkout().await;
        Ok(conn
            .query(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::PLAYERS, " WHERE room_id = $1 ORDER BY joined_at"
                ),
                &[&room_id],
            )
            .await?
            .iter()
            .map(row_to_player)
            .collect())
    }

    async fn start_game(&self, room_id: Id) -> AppResult<Round> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = load_room_locked(&tx, room_id).await?;
        state_machine::validate_room_transition(room.status, RoomStatus::Playing)?;
        let players = non_host_player_ids(&tx, room_id).await?;
        let pairs = pairing::build_initial_pairs(players)?;
        let round = insert_round(&tx, room_id, 1, &pairs).await?;
        tx.execute(
            const_format::concatcp!(
                "UPDATE ", schema::ROOMS, " SET status = 'PLAYING', current_round = 1 WHERE id = $1"
            ),
            &[&room_id],
        )
        .await?;
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        log::info!("room {room_id} started");
        Ok(round)
    }

    async fn next_round(&self, room_id: Id) -> AppResult<Round> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = load_room_locked(&tx, room_id).await?;
        if room.status != RoomStatus::Playing {
            return Err(AppError::invalid_state("room is not playing"));
        }
        let next_number = room.current_round + 1;
        if next_number > crate::TOTAL_ROUNDS {
            return Err(AppError::invalid_state("already played the final round"));
        }
        if let Ok(existing) = load_round(&tx, room_id, next_number).await {
            tx.commit().await?;
            return Ok(existing);
        }
        let current = load_round(&tx, room_id, room.current_round).await?;
        if current.status != RoundStatus::Completed {
            return Err(AppError::invalid_state("current round is not completed yet"));
        }
        let round_one = load_round(&tx, room_id, 1).await?;
        let round_one_pairs: Vec<(Id, Id)> = load_pairs(&tx, round_one.id)
            .await?
            .iter()
            .map(|p| (p.player1, p.player2))
            .collect();
        let pairs = pairing::replicate_pairs(&round_one_pairs);
        let round = insert_round(&tx, room_id, next_number, &pairs).await?;
        tx.execute(
            const_format::concatcp!("UPDATE ", schema::ROOMS, " SET current_round = $1 WHERE id = $2"),
            &[&next_number, &room_id],
        )
        .await?;
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        Ok(round)
    }

    async fn end_game(&self, room_id: Id) -> AppResult<()> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = load_room_locked(&tx, room_id).await?;
        state_machine::validate_room_transition(room.status, RoomStatus::Finished)?;
        tx.execute(
            const_format::concatcp!("UPDATE ", schema::ROOMS, " SET status = 'FINISHED' WHERE id = $1"),
            &[&room_id],
        )
        .await?;
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        log::info!("room {room_id} finished");
        Ok(())
    }

    async fn current_round(&self, room_id: Id) -> AppResult<Option<Round>> {
        let conn = self.pool.checkout().await;
        let room = conn
            .query_opt(
                const_format::concatcp!("SELECT * FROM ", schema::ROOMS, " WHERE id = $1"),
                &[&room_id],
            )
            .await?
            .map(|r| row_to_room(&r))
            .ok_or_else(|| AppError::not_found("room not found"))?;
        if room.current_round == 0 {
            return Ok(None);
        }
        Ok(conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &room.current_round],
            )
            .await?
            .map(|r| row_to_round(&r)))
    }

    async fn get_round(&self, room_id: Id, round_number: i32) -> AppResult<Round> {
        let conn = self.pool.checkout().await;
        conn.query_opt(
            const_format::concatcp!(
                "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
            ),
            &[&room_id, &round_number],
        )
        .await?
        .map(|r| row_to_round(&r))
        .ok_or_else(|| AppError::not_found("round not found"))
    }

    async fn list_rounds(&self, room_id: Id) -> AppResult<Vec<Round>> {
        let conn = self.pool.checkout().await;
        Ok(conn
            .query(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 ORDER BY round_number"
                ),
                &[&room_id],
            )
            .await?
            .iter()
            .map(row_to_round)
            .collect())
    }

    async fn get_pair_for(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<Pair> {
        let conn = self.pool.checkout().await;
        let round = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &round_number],
            )
            .await?
            .map(|r| row_to_round(&r))
            .ok_or_else(|| AppError::not_found("round not found"))?;
        conn.query_opt(
            const_format::concatcp!(
                "SELECT * FROM ", schema::PAIRS, " WHERE round_id = $1 AND (player1 = $2 OR player2 = $2)"
            ),
            &[&round.id, &player_id],
        )
        .await?
        .map(|r| row_to_pair(&r))
        .ok_or_else(|| AppError::not_found("no opponent for this player in this round"))
    }

    async fn list_pairs(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Pair>> {
        let conn = self.pool.checkout().await;
        let round = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &round_number],
            )
            .await?
            .map(|r| row_to_round(&r))
            .ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(conn
            .query(
                const_format::concatcp!("SELECT * FROM ", schema::PAIRS, " WHERE round_id = $1"),
                &[&round.id],
            )
            .await?
            .iter()
            .map(row_to_pair)
            .collect())
    }

    async fn submit_action(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
        choice: Choice,
    ) -> AppResult<()> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = load_room(&tx, room_id).await?;
        if room.status != RoomStatus::Playing {
            return Err(AppError::invalid_state("room is not playing"));
        }
        let round = load_round_locked(&tx, room_id, round_number).await?;
        if !matches!(
            round.status,
            RoundStatus::WaitingActions | RoundStatus::ReadyToPublish
        ) {
            return Err(AppError::invalid_state("round is not accepting actions"));
        }
        let player = tx
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::PLAYERS, " WHERE id = $1 AND room_id = $2"
                ),
                &[&player_id, &room_id],
            )
            .await?
            .map(|r| row_to_player(&r))
            .ok_or_else(|| AppError::not_found("player not found"))?;
        if player.is_host {
            return Err(AppError::invalid_input("host does not submit actions"));
        }
        tx.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ", schema::PAIRS, " WHERE round_id = $1 AND (player1 = $2 OR player2 = $2)"
            ),
            &[&round.id, &player_id],
        )
        .await?
        .ok_or_else(|| AppError::not_found("player is not paired in this round"))?;

        if tx
            .query_opt(
                const_format::concatcp!(
                    "SELECT 1 FROM ", schema::ACTIONS, " WHERE round_id = $1 AND player_id = $2"
                ),
                &[&round.id, &player_id],
            )
            .await?
            .is_some()
        {
            // idempotent retry: the stored choice wins regardless of what came in now
            tx.commit().await?;
            return Ok(());
        }

        tx.execute(
            const_format::concatcp!(
                "INSERT INTO ", schema::ACTIONS, " (round_id, player_id, choice) VALUES ($1, $2, $3)"
            ),
            &[&round.id, &player_id, &choice.as_str()],
        )
        .await?;
        bump_version(&tx, room_id).await?;

        let submitted: i64 = tx
            .query_one(
                const_format::concatcp!("SELECT COUNT(*) FROM ", schema::ACTIONS, " WHERE round_id = $1"),
                &[&round.id],
            )
            .await?
            .get(0);
        let participants: i64 = tx
            .query_one(
                const_format::concatcp!(
                    "SELECT COUNT(*) FROM ", schema::PLAYERS, " WHERE room_id = $1 AND is_host = false"
                ),
                &[&room_id],
            )
            .await?
            .get(0);
        if submitted == participants {
            try_finalize_locked(&tx, room_id, &round).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn publish_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let round = load_round_locked(&tx, room_id, round_number).await?;
        match round.status {
            RoundStatus::Completed => {
                tx.commit().await?;
                Ok(())
            }
            RoundStatus::WaitingActions => {
                Err(AppError::invalid_state("round is not ready to publish"))
            }
            RoundStatus::ReadyToPublish => {
                state_machine::validate_round_transition(round.status, RoundStatus::Completed)?;
                tx.execute(
                    const_format::concatcp!(
                        "UPDATE ", schema::ROUNDS, " SET status = 'completed', ended_at = now() WHERE id = $1"
                    ),
                    &[&round.id],
                )
                .await?;
                bump_version(&tx, room_id).await?;
                tx.commit().await?;
                Ok(())
            }
        }
    }

    async fn skip_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let round = load_round_locked(&tx, room_id, round_number).await?;
        if round.status == RoundStatus::Completed {
            tx.commit().await?;
            return Ok(());
        }
        let participants = non_host_player_ids(&tx, room_id).await?;
        let pairs = load_pairs(&tx, round.id).await?;
        let mut actions = load_actions(&tx, round.id).await?;
        for pid in &participants {
            if !actions.contains_key(pid) {
                let row = tx
                    .query_one(
                        const_format::concatcp!(
                            "INSERT INTO ", schema::ACTIONS, " (round_id, player_id, choice) ",
                            "VALUES ($1, $2, 'TURN') RETURNING *"
                        ),
                        &[&round.id, pid],
                    )
                    .await?;
                let action = row_to_action(&row);
                actions.insert(action.player_id, action);
            }
        }
        if round.status == RoundStatus::WaitingActions {
            for pair in &pairs {
                let (Some(a1), Some(a2)) = (actions.get(&pair.player1), actions.get(&pair.player2)) else {
                    continue;
                };
                let (p1, p2) = payoff::resolve(a1.choice, a2.choice);
                tx.execute(
                    const_format::concatcp!("UPDATE ", schema::ACTIONS, " SET payoff = $1 WHERE id = $2"),
                    &[&p1, &a1.id],
                )
                .await?;
                tx.execute(
                    const_format::concatcp!("UPDATE ", schema::ACTIONS, " SET payoff = $1 WHERE id = $2"),
                    &[&p2, &a2.id],
                )
                .await?;
            }
        }
        tx.execute(
            const_format::concatcp!(
                "UPDATE ", schema::ROUNDS, " ",
                "SET status = 'completed', ended_at = now(), skipped = true WHERE id = $1"
            ),
            &[&round.id],
        )
        .await?;
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        log::info!("round {round_number} of room {room_id} skipped");
        Ok(())
    }

    async fn list_round_actions(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Action>> {
        let conn = self.pool.checkout().await;
        let round = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &round_number],
            )
            .await?
            .map(|r| row_to_round(&r))
            .ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(conn
            .query(
                const_format::concatcp!("SELECT * FROM ", schema::ACTIONS, " WHERE round_id = $1"),
                &[&round.id],
            )
            .await?
            .iter()
            .map(row_to_action)
            .collect())
    }

    async fn get_result(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
    ) -> AppResult<RoundResultResponse> {
        let conn = self.pool.checkout().await;
        let round = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &round_number],
            )
            .await?
            .map(|r| row_to_round(&r))
            .ok_or_else(|| AppError::not_found("round not found"))?;
        if round.status != RoundStatus::Completed {
            return Err(AppError::not_found("round has no result yet"));
        }
        let pair = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::PAIRS, " WHERE round_id = $1 AND (player1 = $2 OR player2 = $2)"
                ),
                &[&round.id, &player_id],
            )
            .await?
            .map(|r| row_to_pair(&r))
            .ok_or_else(|| AppError::not_found("no opponent for this player in this round"))?;
        let opponent_id = pair
            .opponent_of(player_id)
            .expect("player was matched by the WHERE clause above");
        let mine = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ACTIONS, " WHERE round_id = $1 AND player_id = $2"
                ),
                &[&round.id, &player_id],
            )
            .await?
            .map(|r| row_to_action(&r))
            .ok_or_else(|| AppError::not_found("no action recorded for this player"))?;
        let theirs = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ACTIONS, " WHERE round_id = $1 AND player_id = $2"
                ),
                &[&round.id, &opponent_id],
            )
            .await?
            .map(|r| row_to_action(&r))
            .ok_or_else(|| AppError::not_found("no action recorded for the opponent"))?;
        let opponent = conn
            .query_one(
                const_format::concatcp!("SELECT * FROM ", schema::PLAYERS, " WHERE id = $1"),
                &[&opponent_id],
            )
            .await?;
        let opponent = row_to_player(&opponent);
        Ok(RoundResultResponse {
            opponent_display_name: opponent.display_name().to_string(),
            your_choice: mine.choice,
            opponent_choice: theirs.choice,
            your_payoff: mine.payoff.unwrap_or_default(),
            opponent_payoff: theirs.payoff.unwrap_or_default(),
        })
    }

    async fn send_message(
        &self,
        room_id: Id,
        round_number: i32,
        sender_id: Id,
        content: &str,
    ) -> AppResult<()> {
        if !crate::MESSAGE_ROUNDS.contains(&round_number) {
            return Err(AppError::invalid_input("not_allowed: messages only allowed in rounds 5-6"));
        }
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let round = load_round(&tx, room_id, round_number).await?;
        let pair = tx
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::PAIRS, " WHERE round_id = $1 AND (player1 = $2 OR player2 = $2)"
                ),
                &[&round.id, &sender_id],
            )
            .await?
            .map(|r| row_to_pair(&r))
            .ok_or_else(|| AppError::not_found("sender is not paired in this round"))?;
        let receiver_id = pair
            .opponent_of(sender_id)
            .expect("sender was matched by the WHERE clause above");
        let already = tx
            .query_opt(
                const_format::concatcp!(
                    "SELECT 1 FROM ", schema::MESSAGES, " WHERE round_id = $1 AND sender_id = $2"
                ),
                &[&round.id, &sender_id],
            )
            .await?;
        if already.is_some() {
            return Err(AppError::conflict("already_sent"));
        }
        tx.execute(
            const_format::concatcp!(
                "INSERT INTO ", schema::MESSAGES, " (round_id, sender_id, receiver_id, content) ",
                "VALUES ($1, $2, $3, $4)"
            ),
            &[&round.id, &sender_id, &receiver_id, &content],
        )
        .await?;
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_message_for(
        &self,
        room_id: Id,
        round_number: i32,
        player_id: Id,
    ) -> AppResult<Option<Message>> {
        let conn = self.pool.checkout().await;
        let round = conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::ROUNDS, " WHERE room_id = $1 AND round_number = $2"
                ),
                &[&room_id, &round_number],
            )
            .await?
            .map(|r| row_to_round(&r))
            .ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(conn
            .query_opt(
                const_format::concatcp!(
                    "SELECT * FROM ", schema::MESSAGES, " ",
                    "WHERE round_id = $1 AND receiver_id = $2 ORDER BY created_at DESC LIMIT 1"
                ),
                &[&round.id, &player_id],
            )
            .await?
            .map(|r| row_to_message(&r)))
    }

    async fn assign_indicators(&self, room_id: Id) -> AppResult<()> {
        let mut conn = self.pool.checkout().await;
        let tx = conn.transaction().await?;
        let room = load_room_locked(&tx, room_id).await?;
        if room.current_round < crate::MIN_INDICATOR_ROUND {
            return Err(AppError::invalid_state("too early to assign indicators"));
        }
        let already = tx
            .query_opt(
                const_format::concatcp!("SELECT 1 FROM ", schema::INDICATORS, " WHERE room_id = $1"),
                &[&room_id],
            )
            .await?;
        if already.is_some() {
            return Err(AppError::conflict("already_assigned"));
        }
        let mut players = non_host_player_ids(&tx, room_id).await?;
        {
            use rand::seq::SliceRandom;
            players.shuffle(&mut rand::rng());
        }
        let whitelist = crate::domain::INDICATOR_WHITELIST;
        for (i, player_id) in players.iter().enumerate() {
            let symbol = whitelist[i % whitelist.len()];
            tx.execute(
                const_format::concatcp!(
                    "INSERT INTO ", schema::INDICATORS, " (room_id, player_id, symbol) VALUES ($1, $2, $3)"
                ),
                &[&room_id, player_id, &symbol],
            )
            .await?;
        }
        bump_version(&tx, room_id).await?;
        tx.commit().await?;
        log::info!("assigned indicators for room {room_id}");
        Ok(())
    }

    async fn get_indicator(&self, room_id: Id, player_id: Id) -> AppResult<Indicator> {
        let conn = self.pool.checkout().await;
        conn.query_opt(
            const_format::concatcp!(
                "SELECT * FROM ", schema::INDICATORS, " WHERE room_id = $1 AND player_id = $2"
            ),
            &[&room_id, &player_id],
        )
        .await?
        .map(|r| row_to_indicator(&r))
        .ok_or_else(|| AppError::not_found("no indicator assigned to this player"))
    }

    async fn indicators_assigned(&self, room_id: Id) -> AppResult<bool> {
        let conn = self.pool.checkout().await;
        Ok(conn
            .query_opt(
                const_format::concatcp!("SELECT 1 FROM ", schema::INDICATORS, " WHERE room_id = $1"),
                &[&room_id],
            )
            .await?
            .is_some())
    }

    async fn list_indicators(&self, room_id: Id) -> AppResult<Vec<Indicator>> {
        let conn = self.pool.checkout().await;
        Ok(conn
            .query(
                const_format::concatcp!("SELECT * FROM ", schema::INDICATORS, " WHERE room_id = $1"),
                &[&room_id],
            )
            .await?
            .iter()
            .map(row_to_indicator)
            .collect())
    }

    async fn sweep_stale_rooms(&self, finished_ttl: Duration, idle_ttl: Duration) -> AppResult<usize> {
        let conn = self.pool.checkout().await;
        let finished_cutoff = SystemTime::now() - finished_ttl;
        let idle_cutoff = SystemTime::now() - idle_ttl;
        let affected = conn
            .execute(
                const_format::concatcp!(
                    "DELETE FROM ", schema::ROOMS, " ",
                    "WHERE (status = 'FINISHED' AND updated_at < $1) ",
                    "OR (status IN ('WAITING', 'PLAYING') AND updated_at < $2)"
                ),
                &[&finished_cutoff, &idle_cutoff],
            )
            .await?;
        Ok(affected as usize)
    }
}
