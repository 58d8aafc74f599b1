use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::participant_repo;
use crate::error::CoreError;
use crate::models::StandingRow;

const TOP_N: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub rank: i64,
    pub participant_id: String,
    pub display_name: String,
    pub balance: i64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardPage {
    pub page: i64,
    pub page_size: i64,
    pub total_participants: i64,
    pub entries: Vec<RankedEntry>,
    pub top_3: Vec<RankedEntry>,
    pub requester_rank: Option<i64>,
}

// Standard competition ("1224") ranking over a list already sorted by
// balance descending. Ties share a rank and consume the positions after
// them: [100, 80, 80, 50] ranks as [1, 2, 2, 4].
fn assign_ranks(standings: &[StandingRow]) -> Vec<i64> {
    let mut ranks = Vec::with_capacity(standings.len());
    let mut current_rank = 1i64;
    for (idx, row) in standings.iter().enumerate() {
        if idx > 0 && standings[idx - 1].total_points != row.total_points {
            current_rank = idx as i64 + 1;
        }
        ranks.push(current_rank);
    }
    ranks
}

/// Rank all active participants and cut out the requested window.
///
/// The podium (top 3) and the requester's own rank are computed over the
/// full ranking, independent of which page was asked for. `page` is 1-based.
pub async fn rank_leaderboard(
    pool: &SqlitePool,
    page: i64,
    page_size: i64,
    requesting_participant_id: Option<&str>,
) -> Result<LeaderboardPage, CoreError> {
    let standings = participant_repo::list_active_standings(pool).await?;
    let ranks = assign_ranks(&standings);

    let ranked: Vec<RankedEntry> = standings
        .into_iter()
        .zip(ranks)
        .map(|(row, rank)| RankedEntry {
            rank,
            participant_id: row.participant_id,
            display_name: row.display_name,
            balance: row.total_points,
        })
        .collect();

    let requester_rank = requesting_participant_id.and_then(|id| {
        ranked
            .iter()
            .find(|entry| entry.participant_id == id)
            .map(|entry| entry.rank)
    });

    let top_3: Vec<RankedEntry> = ranked.iter().take(TOP_N).cloned().collect();

    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    // Saturate: an absurd page number is an empty window, not an overflow.
    let start = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let entries: Vec<RankedEntry> = ranked
        .iter()
        .skip(start)
        .take(usize::try_from(page_size).unwrap_or(0))
        .cloned()
        .collect();

    Ok(LeaderboardPage {
        page,
        page_size,
        total_participants: ranked.len() as i64,
        entries,
        top_3,
        requester_rank,
    })
}
