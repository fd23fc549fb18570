//! Win-rate math over newest-first match sequences.

use super::matches::{MatchRecord, SharedMatch};

/// Win rate over the first `limit` matches of a newest-first feed.
///
/// Returns `(percentage, considered)`. `(0.0, 0)` when `limit` is not
/// positive or the feed is empty.
#[must_use]
pub fn win_rate(matches: &[MatchRecord], limit: i64) -> (f64, usize) {
    if limit <= 0 {
        return (0.0, 0);
    }
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    percentage(matches.iter().take(take).map(MatchRecord::won))
}

/// Win rate over every match of a matches-with result.
#[must_use]
pub fn shared_win_rate(matches: &[SharedMatch]) -> (f64, usize) {
    percentage(matches.iter().map(SharedMatch::won))
}

fn percentage(outcomes: impl Iterator<Item = bool>) -> (f64, usize) {
    let (wins, total) = outcomes.fold((0usize, 0usize), |(wins, total), won| {
        (wins + usize::from(won), total + 1)
    });
    if total == 0 {
        return (0.0, 0);
    }
    (wins as f64 * 100.0 / total as f64, total)
}
