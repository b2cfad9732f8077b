use crate::domain::Id;
use crate::error::AppError;
use crate::error::AppResult;
use rand::seq::SliceRandom;

/// Builds the Round-1 pairing from the room's non-host players.
///
/// Uniformly shuffles the players, then pairs consecutive elements. Rejects
/// with `invalid_player_count` if there are fewer than two players or an odd
/// number of them — every non-host player must end up in exactly one pair.
pub fn build_initial_pairs(mut players: Vec<Id>) -> AppResult<Vec<(Id, Id)>> {
    if players.len() < 2 || players.len() % 2 != 0 {
        return Err(AppError::invalid_input(format!(
            "invalid_player_count: {} non-host players, need an even number >= 2",
            players.len()
        )));
    }
    players.shuffle(&mut rand::rng());
    Ok(players.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Rounds 2-10 keep the same opponents as Round 1 so reputation (messages,
/// indicators) carries across the game. This is an identity function over
/// the stored pairing — it exists so callers never reshuffle by accident.
pub fn replicate_pairs(round_one_pairs: &[(Id, Id)]) -> Vec<(Id, Id)> {
    round_one_pairs.to_vec()
}
