//! Low-emission week streak calculator.
//!
//! A week counts toward a streak when its total is strictly below the
//! threshold. Weeks are walked most-recent-first over the weeks that have
//! data; a week with no activity is skipped entirely, it neither extends
//! nor breaks a streak.

use std::collections::HashMap;

/// Current and longest streak lengths, in weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    /// Run of qualifying weeks starting at the most recent week with data
    pub current: u32,
    /// Longest run of qualifying weeks anywhere in the history
    pub longest: u32,
}

/// Derive streaks from per-week totals (already filtered to one year).
pub fn streak(weekly_totals: &HashMap<u32, f64>, threshold: f64) -> Streak {
    let mut weeks: Vec<u32> = weekly_totals.keys().copied().collect();
    weeks.sort_unstable_by(|a, b| b.cmp(a));

    let mut current = 0;
    let mut longest = 0;
    let mut run = 0;
    let mut leading = true;

    for week in weeks {
        if weekly_totals[&week] < threshold {
            run += 1;
            if leading {
                current = run;
            }
        } else {
            leading = false;
            longest = longest.max(run);
            run = 0;
        }
    }
    longest = longest.max(run);

    Streak { current, longest }
}
