//! In-memory [`Store`] used only by tests. The source tests pure game-tree
//! logic directly against real Postgres glue; this backend's core logic is
//! defined in terms of the `Store` trait's transactional contract, so
//! exercising RoomManager/RoundManager/MessageService/IndicatorService needs
//! a fake that honors the same atomicity and locking guarantees without a
//! live database.

use super::Store;
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
use crate::dto::RoundResultResponse;
use crate::engine::pairing;
use crate::engine::payoff;
use crate::engine::state_machine;
use crate::error::AppError;
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use std::time::SystemTime;
use tokio::sync::Mutex;

#[derive(Default)]
struct World {
    next_id: Id,
    rooms: HashMap<Id, Room>,
    players: HashMap<Id, Player>,
    rounds: HashMap<Id, Round>,
    pairs: HashMap<Id, Pair>,
    actions: HashMap<Id, Action>,
    messages: HashMap<Id, Message>,
    indicators: HashMap<Id, Indicator>,
}

impl World {
    fn fresh_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn bump(&mut self, room_id: Id) -> AppResult<()> {
        let room = self.rooms.get_mut(&room_id).ok_or_else(|| AppError::not_found("room not found"))?;
        room.state_version += 1;
        room.updated_at = SystemTime::now();
        Ok(())
    }

    fn round_by_number(&self, room_id: Id, round_number: i32) -> Option<&Round> {
        self.rounds
            .values()
            .find(|r| r.room_id == room_id && r.round_number == round_number)
    }

    fn pairs_of(&self, round_id: Id) -> Vec<Pair> {
        self.pairs.values().filter(|p| p.round_id == round_id).copied().collect()
    }

    fn actions_of(&self, round_id: Id) -> HashMap<Id, Action> {
        self.actions
            .values()
            .filter(|a| a.round_id == round_id)
            .map(|a| (a.player_id, a.clone()))
            .collect()
    }

    fn non_host_ids(&self, room_id: Id) -> Vec<Id> {
        self.players
            .values()
            .filter(|p| p.room_id == room_id && !p.is_host)
            .map(|p| p.id)
            .collect()
    }

    fn try_finalize(&mut self, room_id: Id, round_id: Id) -> AppResult<()> {
        let status = self.rounds.get(&round_id).map(|r| r.status);
        if status != Some(RoundStatus::WaitingActions) {
            return Ok(());
        }
        let pairs = self.pairs_of(round_id);
        let actions = self.actions_of(round_id);
        if pairs.is_empty() || actions.len() < pairs.len() * 2 {
            return Ok(());
        }
        for pair in &pairs {
            let (Some(a1), Some(a2)) = (actions.get(&pair.player1), actions.get(&pair.player2)) else {
                return Ok(());
            };
            let (p1, p2) = payoff::resolve(a1.choice, a2.choice);
            self.actions.get_mut(&a1.id).unwrap().payoff = Some(p1);
            self.actions.get_mut(&a2.id).unwrap().payoff = Some(p2);
        }
        self.rounds.get_mut(&round_id).unwrap().status = RoundStatus::ReadyToPublish;
        self.bump(room_id)?;
        Ok(())
    }

    fn insert_round(&mut self, room_id: Id, round_number: i32, pairs: &[(Id, Id)]) -> Round {
        let id = self.fresh_id();
        let round = Round {
            id,
            room_id,
            round_number,
            phase: Phase::base_for(round_number),
            status: RoundStatus::WaitingActions,
            skipped: false,
            started_at: SystemTime::now(),
            ended_at: None,
        };
        self.rounds.insert(id, round.clone());
        for (p1, p2) in pairs {
            let pid = self.fresh_id();
            self.pairs.insert(
                pid,
                Pair {
                    id: pid,
                    round_id: id,
                    player1: *p1,
                    player2: *p2,
                },
            );
        }
        round
    }
}

/// Thread-safe, process-local fake of [`Store`]. One `tokio::sync::Mutex`
/// around the whole world stands in for per-row Postgres locks: every
/// mutating method holds the lock for its whole body, which is at least as
/// strict as the real row-level locking it replaces.
#[derive(Default)]
pub struct MemStore {
    world: Mutex<World>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_room(&self) -> AppResult<(Room, Player)> {
        let mut w = self.world.lock().await;
        let code: String = {
            use rand::Rng;
            let mut rng = rand::rng();
            (0..6)
                .map(|_| (b'A' + rng.random_range(0..26)) as char)
                .collect()
        };
        let room_id = w.fresh_id();
        let now = SystemTime::now();
        let room = Room {
            id: room_id,
            code,
            status: RoomStatus::Waiting,
            current_round: 0,
            state_version: 1,
            created_at: now,
            updated_at: now,
        };
        w.rooms.insert(room_id, room.clone());
        let host_id = w.fresh_id();
        let host = Player {
            id: host_id,
            room_id,
            nickname: "Host".to_string(),
            is_host: true,
            joined_at: now,
        };
        w.players.insert(host_id, host.clone());
        Ok((room, host))
    }

    async fn get_room_by_code(&self, code: &str) -> AppResult<Room> {
        let w = self.world.lock().await;
        w.rooms
            .values()
            .find(|r| r.code == code)
            .cloned()
            .ok_or_else(|| AppError::not_found("no room with that code"))
    }

    async fn get_room(&self, room_id: Id) -> AppResult<Room> {
        let w = self.world.lock().await;
        w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))
    }

    async fn list_rooms(
        &self,
        status: Option<RoomStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Room>, i64)> {
        let w = self.world.lock().await;
        let mut rooms: Vec<Room> = w
            .rooms
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        rooms.sort_by_key(|r| std::cmp::Reverse(r.id));
        let total = rooms.len() as i64;
        let page = rooms
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.clamp(1, 200) as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete_room(&self, room_id: Id) -> AppResult<()> {
        let mut w = self.world.lock().await;
        if w.rooms.remove(&room_id).is_none() {
            return Err(AppError::not_found("room not found"));
        }
        w.players.retain(|_, p| p.room_id != room_id);
        let dead_rounds: Vec<Id> = w.rounds.values().filter(|r| r.room_id == room_id).map(|r| r.id).collect();
        w.rounds.retain(|_, r| r.room_id != room_id);
        w.pairs.retain(|_, p| !dead_rounds.contains(&p.round_id));
        w.actions.retain(|_, a| !dead_rounds.contains(&a.round_id));
        w.messages.retain(|_, m| !dead_rounds.contains(&m.round_id));
        w.indicators.retain(|_, i| i.room_id != room_id);
        Ok(())
    }

    async fn join_room(&self, code: &str, nickname: &str) -> AppResult<Player> {
        let mut w = self.world.lock().await;
        let room_id = w
            .rooms
            .values()
            .find(|r| r.code == code)
            .map(|r| r.id)
            .ok_or_else(|| AppError::not_found("no room with that code"))?;
        let id = w.fresh_id();
        let player = Player {
            id,
            room_id,
            nickname: nickname.to_string(),
            is_host: false,
            joined_at: SystemTime::now(),
        };
        w.players.insert(id, player.clone());
        w.bump(room_id)?;
        Ok(player)
    }

    async fn list_players(&self, room_id: Id) -> AppResult<Vec<Player>> {
        let w = self.world.lock().await;
        Ok(w.players.values().filter(|p| p.room_id == room_id).cloned().collect())
    }

    async fn start_game(&self, room_id: Id) -> AppResult<Round> {
        let mut w = self.world.lock().await;
        let room = w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))?;
        state_machine::validate_room_transition(room.status, RoomStatus::Playing)?;
        let players = w.non_host_ids(room_id);
        let pairs = pairing::build_initial_pairs(players)?;
        let round = w.insert_round(room_id, 1, &pairs);
        let room = w.rooms.get_mut(&room_id).unwrap();
        room.status = RoomStatus::Playing;
        room.current_round = 1;
        w.bump(room_id)?;
        Ok(round)
    }

    async fn next_round(&self, room_id: Id) -> AppResult<Round> {
        let mut w = self.world.lock().await;
        let room = w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))?;
        if room.status != RoomStatus::Playing {
            return Err(AppError::invalid_state("room is not playing"));
        }
        let next_number = room.current_round + 1;
        if next_number > crate::TOTAL_ROUNDS {
            return Err(AppError::invalid_state("already played the final round"));
        }
        if let Some(existing) = w.round_by_number(room_id, next_number).cloned() {
            return Ok(existing);
        }
        let current = w
            .round_by_number(room_id, room.current_round)
            .cloned()
            .ok_or_else(|| AppError::not_found("current round not found"))?;
        if current.status != RoundStatus::Completed {
            return Err(AppError::invalid_state("current round is not completed yet"));
        }
        let round_one = w.round_by_number(room_id, 1).cloned().ok_or_else(|| AppError::not_found("round 1 missing"))?;
        let round_one_pairs: Vec<(Id, Id)> = w.pairs_of(round_one.id).iter().map(|p| (p.player1, p.player2)).collect();
        let pairs = pairing::replicate_pairs(&round_one_pairs);
        let round = w.insert_round(room_id, next_number, &pairs);
        w.rooms.get_mut(&room_id).unwrap().current_round = next_number;
        w.bump(room_id)?;
        Ok(round)
    }

    async fn end_game(&self, room_id: Id) -> AppResult<()> {
        let mut w = self.world.lock().await;
        let room = w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))?;
        state_machine::validate_room_transition(room.status, RoomStatus::Finished)?;
        w.rooms.get_mut(&room_id).unwrap().status = RoomStatus::Finished;
        w.bump(room_id)?;
        Ok(())
    }

    async fn current_round(&self, room_id: Id) -> AppResult<Option<Round>> {
        let w = self.world.lock().await;
        let room = w.rooms.get(&room_id).ok_or_else(|| AppError::not_found("room not found"))?;
        if room.current_round == 0 {
            return Ok(None);
        }
        Ok(w.round_by_number(room_id, room.current_round).cloned())
    }

    async fn get_round(&self, room_id: Id, round_number: i32) -> AppResult<Round> {
        let w = self.world.lock().await;
        w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))
    }

    async fn list_rounds(&self, room_id: Id) -> AppResult<Vec<Round>> {
        let w = self.world.lock().await;
        let mut rounds: Vec<Round> = w.rounds.values().filter(|r| r.room_id == room_id).cloned().collect();
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }

    async fn get_pair_for(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<Pair> {
        let w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).ok_or_else(|| AppError::not_found("round not found"))?;
        w.pairs_of(round.id)
            .into_iter()
            .find(|p| p.contains(player_id))
            .ok_or_else(|| AppError::not_found("no opponent for this player in this round"))
    }

    async fn list_pairs(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Pair>> {
        let w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(w.pairs_of(round.id))
    }

    async fn submit_action(&self, room_id: Id, round_number: i32, player_id: Id, choice: Choice) -> AppResult<()> {
        let mut w = self.world.lock().await;
        let room = w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))?;
        if room.status != RoomStatus::Playing {
            return Err(AppError::invalid_state("room is not playing"));
        }
        let round = w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))?;
        if !matches!(round.status, RoundStatus::WaitingActions | RoundStatus::ReadyToPublish) {
            return Err(AppError::invalid_state("round is not accepting actions"));
        }
        let player = w.players.get(&player_id).cloned().ok_or_else(|| AppError::not_found("player not found"))?;
        if player.room_id != room_id {
            return Err(AppError::not_found("player not found"));
        }
        if player.is_host {
            return Err(AppError::invalid_input("host does not submit actions"));
        }
        if !w.pairs_of(round.id).iter().any(|p| p.contains(player_id)) {
            return Err(AppError::not_found("player is not paired in this round"));
        }
        if w.actions_of(round.id).contains_key(&player_id) {
            return Ok(());
        }
        let id = w.fresh_id();
        w.actions.insert(
            id,
            Action {
                id,
                round_id: round.id,
                player_id,
                choice,
                payoff: None,
                created_at: SystemTime::now(),
            },
        );
        w.bump(room_id)?;
        let submitted = w.actions_of(round.id).len();
        let participants = w.non_host_ids(room_id).len();
        if submitted == participants {
            w.try_finalize(room_id, round.id)?;
        }
        Ok(())
    }

    async fn publish_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        let mut w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))?;
        match round.status {
            RoundStatus::Completed => Ok(()),
            RoundStatus::WaitingActions => Err(AppError::invalid_state("round is not ready to publish")),
            RoundStatus::ReadyToPublish => {
                let r = w.rounds.get_mut(&round.id).unwrap();
                r.status = RoundStatus::Completed;
                r.ended_at = Some(SystemTime::now());
                w.bump(room_id)?;
                Ok(())
            }
        }
    }

    async fn skip_round(&self, room_id: Id, round_number: i32) -> AppResult<()> {
        let mut w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))?;
        if round.status == RoundStatus::Completed {
            return Ok(());
        }
        let participants = w.non_host_ids(room_id);
        let pairs = w.pairs_of(round.id);
        let was_waiting = round.status == RoundStatus::WaitingActions;
        for pid in participants {
            if !w.actions_of(round.id).contains_key(&pid) {
                let id = w.fresh_id();
                w.actions.insert(
                    id,
                    Action {
                        id,
                        round_id: round.id,
                        player_id: pid,
                        choice: Choice::Turn,
                        payoff: None,
                        created_at: SystemTime::now(),
                    },
                );
            }
        }
        if was_waiting {
            let actions = w.actions_of(round.id);
            for pair in &pairs {
                if let (Some(a1), Some(a2)) = (actions.get(&pair.player1), actions.get(&pair.player2)) {
                    let (p1, p2) = payoff::resolve(a1.choice, a2.choice);
                    w.actions.get_mut(&a1.id).unwrap().payoff = Some(p1);
                    w.actions.get_mut(&a2.id).unwrap().payoff = Some(p2);
                }
            }
        }
        let r = w.rounds.get_mut(&round.id).unwrap();
        r.status = RoundStatus::Completed;
        r.ended_at = Some(SystemTime::now());
        r.skipped = true;
        w.bump(room_id)?;
        Ok(())
    }

    async fn list_round_actions(&self, room_id: Id, round_number: i32) -> AppResult<Vec<Action>> {
        let w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(w.actions_of(round.id).into_values().collect())
    }

    async fn get_result(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<RoundResultResponse> {
        let w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))?;
        if round.status != RoundStatus::Completed {
            return Err(AppError::not_found("round has no result yet"));
        }
        let pair = w
            .pairs_of(round.id)
            .into_iter()
            .find(|p| p.contains(player_id))
            .ok_or_else(|| AppError::not_found("no opponent for this player in this round"))?;
        let opponent_id = pair.opponent_of(player_id).expect("player matched above");
        let actions = w.actions_of(round.id);
        let mine = actions.get(&player_id).ok_or_else(|| AppError::not_found("no action recorded for this player"))?;
        let theirs = actions.get(&opponent_id).ok_or_else(|| AppError::not_found("no action recorded for the opponent"))?;
        let opponent = w.players.get(&opponent_id).ok_or_else(|| AppError::not_found("opponent not found"))?;
        Ok(RoundResultResponse {
            opponent_display_name: opponent.display_name().to_string(),
            your_choice: mine.choice,
            opponent_choice: theirs.choice,
            your_payoff: mine.payoff.unwrap_or_default(),
            opponent_payoff: theirs.payoff.unwrap_or_default(),
        })
    }

    async fn send_message(&self, room_id: Id, round_number: i32, sender_id: Id, content: &str) -> AppResult<()> {
        if !crate::MESSAGE_ROUNDS.contains(&round_number) {
            return Err(AppError::invalid_input("not_allowed: messages only allowed in rounds 5-6"));
        }
        let mut w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).cloned().ok_or_else(|| AppError::not_found("round not found"))?;
        let pair = w
            .pairs_of(round.id)
            .into_iter()
            .find(|p| p.contains(sender_id))
            .ok_or_else(|| AppError::not_found("sender is not paired in this round"))?;
        let receiver_id = pair.opponent_of(sender_id).expect("sender matched above");
        if w.messages.values().any(|m| m.round_id == round.id && m.sender_id == sender_id) {
            return Err(AppError::conflict("already_sent"));
        }
        let id = w.fresh_id();
        w.messages.insert(
            id,
            Message {
                id,
                round_id: round.id,
                sender_id,
                receiver_id,
                content: content.to_string(),
                created_at: SystemTime::now(),
            },
        );
        w.bump(room_id)?;
        Ok(())
    }

    async fn get_message_for(&self, room_id: Id, round_number: i32, player_id: Id) -> AppResult<Option<Message>> {
        let w = self.world.lock().await;
        let round = w.round_by_number(room_id, round_number).ok_or_else(|| AppError::not_found("round not found"))?;
        Ok(w.messages
            .values()
            .filter(|m| m.round_id == round.id && m.receiver_id == player_id)
            .max_by_key(|m| m.created_at)
            .cloned())
    }

    async fn assign_indicators(&self, room_id: Id) -> AppResult<()> {
        let mut w = self.world.lock().await;
        let room = w.rooms.get(&room_id).cloned().ok_or_else(|| AppError::not_found("room not found"))?;
        if room.current_round < crate::MIN_INDICATOR_ROUND {
            return Err(AppError::invalid_state("too early to assign indicators"));
        }
        if w.indicators.values().any(|i| i.room_id == room_id) {
            return Err(AppError::conflict("already_assigned"));
        }
        let mut players = w.non_host_ids(room_id);
        {
            use rand::seq::SliceRandom;
            players.shuffle(&mut rand::rng());
        }
        let whitelist = crate::domain::INDICATOR_WHITELIST;
        for (i, player_id) in players.into_iter().enumerate() {
            let id = w.fresh_id();
            w.indicators.insert(
                id,
                Indicator {
                    id,
                    room_id,
                    player_id,
                    symbol: whitelist[i % whitelist.len()].to_string(),
                },
            );
        }
        w.bump(room_id)?;
        Ok(())
    }

    async fn get_indicator(&self, room_id: Id, player_id: Id) -> AppResult<Indicator> {
        let w = self.world.lock().await;
        w.indicators
            .values()
            .find(|i| i.room_id == room_id && i.player_id == player_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("no indicator assigned to this player"))
    }

    async fn indicators_assigned(&self, room_id: Id) -> AppResult<bool> {
        let w = self.world.lock().await;
        Ok(w.indicators.values().any(|i| i.room_id == room_id))
    }

    async fn list_indicators(&self, room_id: Id) -> AppResult<Vec<Indicator>> {
        let w = self.world.lock().await;
        Ok(w.indicators.values().filter(|i| i.room_id == room_id).cloned().collect())
    }

    async fn sweep_stale_rooms(&self, finished_ttl: Duration, idle_ttl: Duration) -> AppResult<usize> {
        let mut w = self.world.lock().await;
        let now = SystemTime::now();
        let stale: Vec<Id> = w
            .rooms
            .values()
            .filter(|r| {
                let age = now.duration_since(r.updated_at).unwrap_or_default();
                match r.status {
                    RoomStatus::Finished => age > finished_ttl,
                    RoomStatus::Waiting | RoomStatus::Playing => age > idle_ttl,
                }
            })
            .map(|r| r.id)
            .collect();
        for id in &stale {
            w.rooms.remove(id);
        }
        Ok(stale.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn two_player_room() -> (MemStore, Id, Id, Id) {
        let store = MemStore::new();
        let (room, _host) = store.create_room().await.unwrap();
        let alice = store.join_room(&room.code, "Alice").await.unwrap();
        let bob = store.join_room(&room.code, "Bob").await.unwrap();
        store.start_game(room.id).await.unwrap();
        (store, room.id, alice.id, bob.id)
    }

    #[tokio::test]
    async fn happy_round_produces_symmetric_payoffs() {
        let (store, room_id, alice, bob) = two_player_room().await;
        store.submit_action(room_id, 1, alice, Choice::Accelerate).await.unwrap();
        store.submit_action(room_id, 1, bob, Choice::Turn).await.unwrap();
        let round = store.get_round(room_id, 1).await.unwrap();
        assert_eq!(round.status, RoundStatus::ReadyToPublish);
        store.publish_round(room_id, 1).await.unwrap();
        let result = store.get_result(room_id, 1, alice).await.unwrap();
        assert_eq!(result.your_choice, Choice::Accelerate);
        assert_eq!(result.opponent_choice, Choice::Turn);
        assert_eq!(result.your_payoff, 10);
        assert_eq!(result.opponent_payoff, -3);
    }

    #[tokio::test]
    async fn duplicate_submission_is_idempotent() {
        let (store, room_id, alice, bob) = two_player_room().await;
        store.submit_action(room_id, 1, alice, Choice::Turn).await.unwrap();
        let before = store.get_room(room_id).await.unwrap().state_version;
        store.submit_action(room_id, 1, alice, Choice::Turn).await.unwrap();
        let after = store.get_room(room_id).await.unwrap().state_version;
        assert_eq!(before, after);
        store.submit_action(room_id, 1, bob, Choice::Turn).await.unwrap();
    }

    #[tokio::test]
    async fn publish_twice_is_a_no_op() {
        let (store, room_id, alice, bob) = two_player_room().await;
        store.submit_action(room_id, 1, alice, Choice::Turn).await.unwrap();
        store.submit_action(room_id, 1, bob, Choice::Turn).await.unwrap();
        store.publish_round(room_id, 1).await.unwrap();
        store.publish_round(room_id, 1).await.unwrap();
        let round = store.get_round(room_id, 1).await.unwrap();
        assert_eq!(round.status, RoundStatus::Completed);
    }

    #[tokio::test]
    async fn skip_fills_missing_action_with_turn() {
        let (store, room_id, alice, bob) = two_player_room().await;
        store.submit_action(room_id, 1, alice, Choice::Turn).await.unwrap();
        store.skip_round(room_id, 1).await.unwrap();
        let result = store.get_result(room_id, 1, bob).await.unwrap();
        assert_eq!(result.your_choice, Choice::Turn);
        assert_eq!(result.opponent_choice, Choice::Turn);
        assert_eq!(result.your_payoff, 3);
        let round = store.get_round(room_id, 1).await.unwrap();
        assert!(round.skipped);
    }

    #[tokio::test]
    async fn message_allowed_only_in_rounds_five_and_six() {
        let store = MemStore::new();
        let (room, _host) = store.create_room().await.unwrap();
        let alice = store.join_room(&room.code, "Alice").await.unwrap();
        let _bob = store.join_room(&room.code, "Bob").await.unwrap();
        store.start_game(room.id).await.unwrap();
        let err = store.send_message(room.id, 1, alice.id, "hi").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn indicators_assigned_once_and_cover_every_player() {
        let store = MemStore::new();
        let (room, _host) = store.create_room().await.unwrap();
        let mut ids = vec![];
        for name in ["A", "B", "C", "D"] {
            ids.push(store.join_room(&room.code, name).await.unwrap().id);
        }
        store.start_game(room.id).await.unwrap();
        {
            let mut w = store.world.lock().await;
            w.rooms.get_mut(&room.id).unwrap().current_round = crate::MIN_INDICATOR_ROUND;
        }
        store.assign_indicators(room.id).await.unwrap();
        for id in &ids {
            store.get_indicator(room.id, *id).await.unwrap();
        }
        assert!(matches!(
            store.assign_indicators(room.id).await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }
}
