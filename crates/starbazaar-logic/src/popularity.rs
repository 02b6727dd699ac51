//! Popularity multiplier: exponential demand signal per item category.
//!
//! Each outpost keeps a signed popularity score per category: raised by
//! consumer demand, lowered when the outpost satisfies demand from its
//! own stock. The multiplier scales AI bid prices.

/// Price multiplier for a popularity score: `1.1^score` when positive,
/// `0.9^|score|` when negative, `1.0` at zero.
pub fn multiplier(score: i32) -> f64 {
    if score > 0 {
        1.1f64.powi(score)
    } else if score < 0 {
        0.9f64.powi(-score)
    } else {
        1.0
    }
}

/// Multiplier floored at 1.0, used for speculative outpost bids, which
/// never bid below the suggested value.
pub fn bid_multiplier(score: i32) -> f64 {
    multiplier(score).max(1.0)
}
