//! Day-bucketed history reconstruction.

use chrono::{DateTime, Duration, Utc};

use crate::ledger::TASK_REWARD_COINS;
use crate::planner::{day_end, day_start};
use crate::storage::PlannerDb;

/// Default lookback window for the task-completion series.
pub const TASK_HISTORY_DAYS: usize = 7;

/// Default lookback window for the coin-balance series.
pub const COIN_HISTORY_DAYS: usize = 14;

/// Tasks completed per UTC calendar day over the last `days` days,
/// oldest first. The last element is today's count.
pub fn tasks_completed_per_day(
    db: &PlannerDb,
    now: DateTime<Utc>,
    days: usize,
) -> Result<Vec<u32>, rusqlite::Error> {
    let mut counts = Vec::with_capacity(days);
    for i in 0..days {
        let day = now - Duration::days(i as i64);
        counts.push(db.completed_tasks_in(day_start(day), day_end(day))?);
    }
    counts.reverse();
    Ok(counts)
}

/// Approximate end-of-day coin balances over the last `days` days, oldest
/// first. The last element is the live balance.
///
/// The series is reconstructed backward from the live balance by subtracting
/// each older day's net movement (game sessions plus task rewards); it is an
/// approximation, not a ledger replay, and can diverge from true historical
/// balances when movements are edited or backdated. Displayed values are
/// clamped at zero. A store without a profile yields all zeros.
pub fn coin_history(
    db: &PlannerDb,
    now: DateTime<Utc>,
    days: usize,
) -> Result<Vec<i64>, rusqlite::Error> {
    let Some(profile) = db.profile()? else {
        return Ok(vec![0; days]);
    };

    let mut running = profile.coin_balance;
    let mut balances = Vec::with_capacity(days);
    for i in 0..days {
        if i == 0 {
            balances.push(running);
            continue;
        }
        let day = now - Duration::days(i as i64);
        let start = day_start(day);
        let end = day_end(day);

        let game_coins = db.game_net_coins_in(start, end)?;
        let task_coins = i64::from(db.completed_tasks_in(start, end)?) * TASK_REWARD_COINS;

        running -= game_coins + task_coins;
        balances.push(running.max(0));
    }
    balances.reverse();
    Ok(balances)
}
