//! Assembles the personalized `/state` poll payload and the read-only
//! `/summary` debrief report. Grounded in the source's `analysis::response`
//! style of turning persisted rows into a single read-only DTO: neither
//! builder here writes anything or bumps `state_version`.
use crate::domain::Choice;
use crate::domain::Id;
use crate::domain::RoundStatus;
use crate::dto::MessageResponse;
use crate::dto::PlayerSummary;
use crate::dto::PlayerView;
use crate::dto::RoundView;
use crate::dto::SnapshotData;
use crate::dto::SnapshotResponse;
use crate::dto::SummaryResponse;
use crate::error::AppResult;
use crate::store::Store;
use std::sync::Arc;

pub struct SnapshotBuilder {
    store: Arc<dyn Store>,
}

impl SnapshotBuilder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Builds `/state`. Returns `has_update: false` without touching
    /// anything beyond the room's own `state_version` when the caller is
    /// already current.
    pub async fn build(
        &self,
        room_id: Id,
        client_version: i64,
        player_id: Option<Id>,
    ) -> AppResult<SnapshotResponse> {
        let room = self.store.get_room(room_id).await?;
        if room.state_version <= client_version {
            return Ok(SnapshotResponse {
                version: room.state_version,
                has_update: false,
                data: None,
            });
        }

        let players: Vec<PlayerView> = self
            .store
            .list_players(room_id)
            .await?
            .into_iter()
            .map(|p| PlayerView {
                id: p.id,
                nickname: p.nickname,
                is_host: p.is_host,
            })
            .collect();

        let indicators_assigned = self.store.indicators_assigned(room_id).await?;

        let round = match self.store.current_round(room_id).await? {
            None => None,
            Some(round) => {
                let mut view = RoundView {
                    round_number: round.round_number,
                    phase: crate::domain::Phase::display_for(round.round_number, indicators_assigned),
                    status: round.status,
                    skipped: round.skipped,
                    your_choice: None,
                    opponent_choice: None,
                    opponent_display_name: None,
                    your_payoff: None,
                    opponent_payoff: None,
                };
                if let Some(player_id) = player_id {
                    if let Ok(pair) = self.store.get_pair_for(room_id, round.round_number, player_id).await {
                        let opponent_id = pair.opponent_of(player_id);
                        let actions = self.store.list_round_actions(room_id, round.round_number).await?;
                        let mine = actions.iter().find(|a| a.player_id == player_id);
                        let theirs = opponent_id.and_then(|oid| actions.iter().find(|a| a.player_id == oid));
                        view.your_choice = mine.map(|a| a.choice);
                        if round.status == RoundStatus::Completed {
                            view.opponent_choice = theirs.map(|a| a.choice);
                            if let Some(oid) = opponent_id {
                                view.opponent_display_name =
                                    players.iter().find(|p| p.id == oid).map(|p| p.nickname.clone());
                            }
                            view.your_payoff = mine.and_then(|a| a.payoff);
                            view.opponent_payoff = theirs.and_then(|a| a.payoff);
                        }
                    }
                }
                Some(view)
            }
        };

        let message = match (player_id, &round) {
            (Some(player_id), Some(round)) if round.phase == crate::domain::Phase::Message => self
                .store
                .get_message_for(room_id, round.round_number, player_id)
                .await?
                .map(|m| MessageResponse {
                    content: m.content,
                    from_opponent: true,
                }),
            _ => None,
        };

        let indicator_symbol = match player_id {
            Some(player_id) if indicators_assigned => {
                self.store.get_indicator(room_id, player_id).await.ok().map(|i| i.symbol)
            }
            _ => None,
        };

        Ok(SnapshotResponse {
            version: room.state_version,
            has_update: true,
            data: Some(SnapshotData {
                room,
                players,
                round,
                message,
                indicator_symbol,
                indicators_assigned,
            }),
        })
    }
}

pub struct SummaryBuilder {
    store: Arc<dyn Store>,
}

impl SummaryBuilder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn build(&self, room_id: Id) -> AppResult<SummaryResponse> {
        let players = self.store.list_players(room_id).await?;
        let rounds = self.store.list_rounds(room_id).await?;
        let indicators_assigned = self.store.indicators_assigned(room_id).await?;

        let mut per_player: std::collections::HashMap<Id, PlayerSummary> = players
            .iter()
            .filter(|p| !p.is_host)
            .map(|p| {
                (
                    p.id,
                    PlayerSummary {
                        player_id: p.id,
                        nickname: p.nickname.clone(),
                        total_payoff: 0,
                        choices: Vec::new(),
                        indicator_symbol: None,
                    },
                )
            })
            .collect();

        let mut rounds_completed = 0;
        let mut mutual_turn = 0;
        let mut mutual_accelerate = 0;
        let mut split = 0;

        for round in &rounds {
            let actions = self.store.list_round_actions(room_id, round.round_number).await?;
            if round.status != RoundStatus::Completed {
                for summary in per_player.values_mut() {
                    summary.choices.push(actions.iter().find(|a| a.player_id == summary.player_id).map(|a| a.choice));
                }
                continue;
            }
            rounds_completed += 1;
            for pair in self.store.list_pairs(room_id, round.round_number).await? {
                let a1 = actions.iter().find(|a| a.player_id == pair.player1);
                let a2 = actions.iter().find(|a| a.player_id == pair.player2);
                if let (Some(a1), Some(a2)) = (a1, a2) {
                    match (a1.choice, a2.choice) {
                        (Choice::Turn, Choice::Turn) => mutual_turn += 1,
                        (Choice::Accelerate, Choice::Accelerate) => mutual_accelerate += 1,
                        _ => split += 1,
                    }
                }
            }
            for summary in per_player.values_mut() {
                let action = actions.iter().find(|a| a.player_id == summary.player_id);
                summary.choices.push(action.map(|a| a.choice));
                summary.total_payoff += action.and_then(|a| a.payoff).unwrap_or(0);
            }
        }

        if indicators_assigned {
            for indicator in self.store.list_indicators(room_id).await? {
                if let Some(summary) = per_player.get_mut(&indicator.player_id) {
                    summary.indicator_symbol = Some(indicator.symbol);
                }
            }
        }

        let mut players: Vec<PlayerSummary> = per_player.into_values().collect();
        players.sort_by_key(|p| p.player_id);

        Ok(SummaryResponse {
            room_id,
            rounds_completed,
            mutual_turn,
            mutual_accelerate,
            split,
            players,
        })
    }
}
