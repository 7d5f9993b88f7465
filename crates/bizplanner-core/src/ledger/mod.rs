//! Coin and streak bookkeeping over the entity store.
//!
//! [`Ledger`] is the only writer of the profile's coin balance and streak
//! fields. It is constructed over a borrowed [`PlannerDb`] and buffers an
//! [`Event`] per mutation; consumers drain the buffer with
//! [`Ledger::take_events`] instead of observing store fields.

pub mod streak;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreError;
use crate::events::Event;
use crate::planner::{GameSession, Task};
use crate::storage::PlannerDb;
use streak::{Outcome, StreakState};

/// Fixed coin reward for completing a task.
pub const TASK_REWARD_COINS: i64 = 10;

/// Coin balance and streak engine.
pub struct Ledger<'a> {
    db: &'a PlannerDb,
    events: Vec<Event>,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a PlannerDb) -> Self {
        Self {
            db,
            events: Vec::new(),
        }
    }

    /// Current coin balance.
    pub fn balance(&self) -> Result<i64, CoreError> {
        Ok(self.db.require_profile()?.coin_balance)
    }

    /// Current streak length in days.
    pub fn streak(&self) -> Result<u32, CoreError> {
        Ok(self.db.require_profile()?.streak_count)
    }

    /// Unconditionally add `amount` to the balance. Returns the new balance.
    pub fn award_coins(&mut self, amount: i64) -> Result<i64, CoreError> {
        let mut profile = self.db.require_profile()?;
        profile.coin_balance += amount;
        self.db.update_profile(&profile)?;
        self.events.push(Event::CoinsAwarded {
            amount,
            balance: profile.coin_balance,
            at: Utc::now(),
        });
        Ok(profile.coin_balance)
    }

    /// Subtract `amount` from the balance if it is covered.
    ///
    /// Returns `Ok(false)` and leaves the balance untouched when the balance
    /// cannot cover the spend. This is the only guarded mutation.
    pub fn spend_coins(&mut self, amount: i64) -> Result<bool, CoreError> {
        let mut profile = self.db.require_profile()?;
        if profile.coin_balance < amount {
            self.events.push(Event::SpendRejected {
                amount,
                balance: profile.coin_balance,
                at: Utc::now(),
            });
            return Ok(false);
        }
        profile.coin_balance -= amount;
        self.db.update_profile(&profile)?;
        self.events.push(Event::CoinsSpent {
            amount,
            balance: profile.coin_balance,
            at: Utc::now(),
        });
        Ok(true)
    }

    /// Flip a task's completion flag.
    ///
    /// Completing awards the fixed reward and advances the streak. Re-opening
    /// only clears the completion timestamp; the earlier reward stays.
    pub fn toggle_task_completion(&mut self, task_id: &str) -> Result<Task, CoreError> {
        self.toggle_task_completion_at(task_id, Utc::now())
    }

    /// [`Ledger::toggle_task_completion`] with an explicit clock, for tests
    /// and replays.
    pub fn toggle_task_completion_at(
        &mut self,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Task, CoreError> {
        let mut task = self.db.get_task(task_id)?.ok_or(CoreError::NotFound {
            entity: "Task",
            id: task_id.to_string(),
        })?;

        task.completed = !task.completed;
        if task.completed {
            task.completed_at = Some(now);
            self.db.update_task(&task)?;
            self.award_coins(TASK_REWARD_COINS)?;
            self.events.push(Event::TaskCompleted {
                task_id: task.id.clone(),
                reward: TASK_REWARD_COINS,
                at: now,
            });
            self.advance_streak_at(now)?;
        } else {
            task.completed_at = None;
            self.db.update_task(&task)?;
            self.events.push(Event::TaskReopened {
                task_id: task.id.clone(),
                at: now,
            });
        }
        Ok(task)
    }

    /// Record one mini-game play: guard and apply the stake, credit the
    /// winnings, and store the immutable audit row.
    ///
    /// Returns `Ok(None)` without any effect when the balance cannot cover
    /// `coins_spent`.
    pub fn record_game_session(
        &mut self,
        coins_spent: i64,
        coins_earned: i64,
    ) -> Result<Option<GameSession>, CoreError> {
        if coins_spent > 0 && !self.spend_coins(coins_spent)? {
            return Ok(None);
        }
        if coins_earned > 0 {
            self.award_coins(coins_earned)?;
        }

        let profile = self.db.require_profile()?;
        let session = GameSession {
            id: Uuid::new_v4().to_string(),
            coins_spent,
            coins_earned,
            profile_id: profile.id,
            created_at: Utc::now(),
        };
        self.db.create_game_session(&session)?;
        self.events.push(Event::GameRecorded {
            session_id: session.id.clone(),
            coins_spent,
            coins_earned,
            at: session.created_at,
        });
        Ok(Some(session))
    }

    /// Drain the buffered events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn advance_streak_at(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        let mut profile = self.db.require_profile()?;
        let before = StreakState::new(profile.streak_count, profile.streak_last_at);
        let (after, outcome) = streak::advance(before, now);
        if outcome == Outcome::SameDay {
            return Ok(());
        }
        profile.streak_count = after.count;
        profile.streak_last_at = after.last_at;
        self.db.update_profile(&profile)?;
        self.events.push(Event::StreakChanged {
            count: after.count,
            outcome,
            at: now,
        });
        Ok(())
    }
}
