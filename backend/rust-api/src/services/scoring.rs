//! Reward-point calculation for graded answers.
//!
//! The numbers here are client-observable and must stay reproducible,
//! including the truncation after each multiplier and the fixed
//! speed-then-difficulty order.

use crate::models::question::Difficulty;

/// Points for a correct answer before bonuses.
const BASE_CORRECT: u32 = 10;
/// Participation credit for a wrong answer.
const BASE_INCORRECT: u32 = 2;
/// Answers faster than this many seconds earn the speed multiplier.
const SPEED_THRESHOLD_SECS: u32 = 10;
const SPEED_MULTIPLIER: f64 = 1.2;
const HARD_MULTIPLIER: f64 = 1.5;

/// Computes the points awarded for one graded answer.
///
/// Incorrect answers always earn the flat participation credit. Correct
/// answers start at the base and apply the speed bonus first, then the
/// difficulty bonus, truncating toward zero after each step. Any
/// difficulty other than `hard` earns no difficulty bonus.
pub fn score(difficulty: Difficulty, is_correct: bool, time_spent: u32, prior_streak: u32) -> u32 {
    if !is_correct {
        return BASE_INCORRECT;
    }

    let mut points = BASE_CORRECT;
    if time_spent < SPEED_THRESHOLD_SECS {
        points = (points as f64 * SPEED_MULTIPLIER) as u32;
    }
    if difficulty == Difficulty::Hard {
        points = (points as f64 * HARD_MULTIPLIER) as u32;
    }

    points + streak_bonus(prior_streak)
}

/// Streak milestone rewards are tracked in the data model but no formula
/// has been agreed on yet, so this always awards nothing.
fn streak_bonus(_prior_streak: u32) -> u32 {
    0
}
