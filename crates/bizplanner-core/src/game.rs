//! Scoring rules for the reaction mini-game, plus a deterministic headless
//! simulation of one session.
//!
//! Rendering and input belong to a shell; the arithmetic lives here so the
//! coin rewards are identical everywhere the game runs.

use rand::Rng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Session length driven by the countdown timer.
pub const SESSION_SECS: u64 = 30;

/// How long a target stays on screen before it expires as a miss.
pub const TARGET_LIFETIME_SECS: f64 = 2.0;

/// Cap on simultaneously active targets.
pub const MAX_ACTIVE_TARGETS: usize = 3;

/// Target diameters the spawner picks from.
pub const TARGET_SIZES: [u32; 3] = [40, 50, 60];

/// Points for tapping a target: a speed bonus (faster is better, floor of 1)
/// doubled for small targets.
pub fn tap_points(reaction_secs: f64, target_size: u32) -> u32 {
    let speed_bonus = ((TARGET_LIFETIME_SECS - reaction_secs) * 10.0) as i64;
    let speed_bonus = speed_bonus.max(1) as u32;
    let size_bonus = if target_size < 45 { 2 } else { 1 };
    speed_bonus * size_bonus
}

/// Coins earned for a finished session: one per five points, a five-coin
/// bonus for beating the best score, and at least one coin for playing.
pub fn coins_for_score(score: u32, best_score: u32) -> u32 {
    let base = score / 5;
    let bonus = if score > best_score { 5 } else { 0 };
    (base + bonus).max(1)
}

/// Result of one headless session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub score: u32,
    pub taps: u32,
    pub misses: u32,
    /// Fastest reaction across the session, if anything was tapped.
    pub best_reaction_ms: Option<u64>,
}

/// Run one session without a screen: targets spawn once per second up to the
/// cap, expire after their lifetime, and a simulated player taps the oldest
/// target most of the time. The same seed always produces the same outcome.
pub fn simulate(seed: u64) -> SessionOutcome {
    let mut rng = Mcg128Xsl64::new(u128::from(seed) << 1 | 1);

    // (spawn_tick, size) per live target
    let mut active: Vec<(u64, u32)> = Vec::new();
    let mut outcome = SessionOutcome {
        score: 0,
        taps: 0,
        misses: 0,
        best_reaction_ms: None,
    };

    for tick in 0..SESSION_SECS {
        // Expire anything past its lifetime.
        let before = active.len();
        active.retain(|(spawned, _)| (tick - spawned) as f64 <= TARGET_LIFETIME_SECS);
        outcome.misses += (before - active.len()) as u32;

        if active.len() < MAX_ACTIVE_TARGETS {
            let size = TARGET_SIZES[rng.gen_range(0..TARGET_SIZES.len())];
            active.push((tick, size));
        }

        if !active.is_empty() && rng.gen_bool(0.6) {
            let (_, size) = active.remove(0);
            let reaction = rng.gen_range(0.2..TARGET_LIFETIME_SECS);
            outcome.score += tap_points(reaction, size);
            outcome.taps += 1;
            let reaction_ms = (reaction * 1000.0) as u64;
            outcome.best_reaction_ms = Some(match outcome.best_reaction_ms {
                Some(best) => best.min(reaction_ms),
                None => reaction_ms,
            });
        }
    }
    outcome.misses += active.len() as u32;

    outcome
}
