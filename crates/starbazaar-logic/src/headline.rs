//! News headlines and their effect on production.
//!
//! Headlines are catalog strings of the form `Sentiment.Text`
//! (e.g. `Good.Trade boom sweeps the local markets`). Each outpost rolls
//! a fresh headline weekly; the sentiment nudges its production rate.

use serde::{Deserialize, Serialize};

/// Sentiment of a headline, parsed from its `Good.`/`Bad.`/`Neutral.`
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Good,
    Bad,
    Neutral,
}

/// Parse a headline's sentiment prefix. Unknown prefixes read as
/// neutral rather than failing the tick.
pub fn sentiment(headline: &str) -> Sentiment {
    match headline.split('.').next() {
        Some("Good") => Sentiment::Good,
        Some("Bad") => Sentiment::Bad,
        _ => Sentiment::Neutral,
    }
}

/// Display text of a headline (the part after the sentiment prefix).
pub fn text(headline: &str) -> &str {
    match headline.split_once('.') {
        Some((_, rest)) => rest,
        None => headline,
    }
}

/// Adjust an outpost's production rate for this week's headline.
///
/// Good news raises the rate (capped at `2 * size`), bad news lowers it
/// (floored at 0), neutral news drifts one step back toward `size`.
pub fn adjust_production_rate(rate: u32, sentiment: Sentiment, size: u32) -> u32 {
    match sentiment {
        Sentiment::Good => (rate + 1).min(size * 2),
        Sentiment::Bad => rate.saturating_sub(1),
        Sentiment::Neutral => {
            if rate < size {
                rate + 1
            } else if rate > size {
                rate - 1
            } else {
                rate
            }
        }
    }
}
