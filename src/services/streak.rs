// SPDX-License-Identifier: MIT

//! Personal record and best-streak computation over a step history.

use crate::models::{StepEntry, StreakResult};
use chrono::NaiveDate;

/// Compute the best single day and the longest consecutive-day streak.
///
/// Entries may arrive in any order. Only the presence of a dated entry
/// matters for streaks, so a zero-step day still extends a run. Repeated
/// dates collapse to one day for the streak but every entry is considered
/// for the record.
pub fn compute_streak_and_record(entries: &[StepEntry]) -> StreakResult {
    let record = entries.iter().map(|e| e.steps).max().unwrap_or(0);

    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort_unstable();
    dates.dedup();

    StreakResult {
        record,
        best_streak: longest_run(&dates),
    }
}

/// Length of the longest run of consecutive days in sorted, deduplicated dates.
fn longest_run(dates: &[NaiveDate]) -> u32 {
    let mut best = 0;
    let mut current = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in dates {
        current = match prev {
            Some(p) if date.signed_duration_since(p).num_days() == 1 => current + 1,
            _ => 1,
        };
        best = best.max(current);
        prev = Some(date);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(date: &str, steps: u32) -> StepEntry {
        StepEntry::new(
            Uuid::nil(),
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            steps,
        )
    }

    #[test]
    fn test_empty_history() {
        let result = compute_streak_and_record(&[]);
        assert_eq!(result, StreakResult { record: 0, best_streak: 0 });
    }

    #[test]
    fn test_single_entry() {
        let result = compute_streak_and_record(&[entry("2024-05-01", 4321)]);
        assert_eq!(result, StreakResult { record: 4321, best_streak: 1 });
    }

    #[test]
    fn test_gap_breaks_streak() {
        let entries = vec![
            entry("2024-01-01", 500),
            entry("2024-01-02", 700),
            entry("2024-01-04", 300),
        ];
        let result = compute_streak_and_record(&entries);
        assert_eq!(result, StreakResult { record: 700, best_streak: 2 });
    }

    #[test]
    fn test_order_independence() {
        let mut entries = vec![
            entry("2024-03-01", 100),
            entry("2024-03-02", 200),
            entry("2024-03-03", 300),
            entry("2024-03-04", 400),
            entry("2024-03-05", 500),
        ];
        let expected = StreakResult { record: 500, best_streak: 5 };
        assert_eq!(compute_streak_and_record(&entries), expected);

        // Store order (date descending)
        entries.reverse();
        assert_eq!(compute_streak_and_record(&entries), expected);

        entries.swap(0, 3);
        entries.swap(1, 4);
        assert_eq!(compute_streak_and_record(&entries), expected);
    }

    #[test]
    fn test_zero_step_day_counts_toward_streak() {
        let entries = vec![
            entry("2024-02-10", 9000),
            entry("2024-02-11", 0),
            entry("2024-02-12", 1200),
        ];
        let result = compute_streak_and_record(&entries);
        assert_eq!(result.best_streak, 3);
        assert_eq!(result.record, 9000);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        let entries = vec![
            entry("2024-02-10", 100),
            entry("2024-02-10", 8000),
            entry("2024-02-11", 50),
        ];
        let result = compute_streak_and_record(&entries);
        assert_eq!(result, StreakResult { record: 8000, best_streak: 2 });
    }

    #[test]
    fn test_longest_run_wins_over_latest_run() {
        let entries = vec![
            entry("2024-01-01", 1),
            entry("2024-01-02", 1),
            entry("2024-01-03", 1),
            entry("2024-01-10", 1),
            entry("2024-01-11", 1),
        ];
        assert_eq!(compute_streak_and_record(&entries).best_streak, 3);
    }

    #[test]
    fn test_streak_across_month_and_leap_day() {
        let entries = vec![
            entry("2024-02-28", 10),
            entry("2024-02-29", 20),
            entry("2024-03-01", 30),
        ];
        assert_eq!(compute_streak_and_record(&entries).best_streak, 3);
    }
}
