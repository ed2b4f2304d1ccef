//! Composite harmony score from category balance and streak magnitude.
//!
//! The score combines a balance term driven by the weakest category's
//! current streak (a user neglecting one category scores low no matter
//! how strong the others are) with a magnitude term driven by total
//! streak days, both saturating. Two properties are the contract and
//! are covered by property tests:
//!
//! - increasing any single category's streak never decreases the score
//! - worsening balance while holding total activity fixed never
//!   increases it
//!
//! The exact coefficients are tunable via [`HarmonyWeights`].

use serde::{Deserialize, Serialize};

/// Tunable weighting for the harmony score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonyWeights {
    /// Points attributed to the balance (weakest-category) term
    pub balance_weight: u32,
    /// Points attributed to the magnitude (total-days) term
    pub magnitude_weight: u32,
    /// Streak length at which a single category's contribution saturates
    pub saturation_days: u32,
}

impl Default for HarmonyWeights {
    fn default() -> Self {
        Self {
            balance_weight: 60,
            magnitude_weight: 40,
            saturation_days: 30,
        }
    }
}

/// Compute the harmony score from the three category current streaks.
///
/// Always in `0..=100`. Integer arithmetic throughout so the score is
/// stable across platforms.
pub fn compute_harmony_score(mind: u32, body: u32, soul: u32, weights: &HarmonyWeights) -> u8 {
    let saturation = weights.saturation_days.max(1);

    let weakest = mind.min(body).min(soul);
    let balance = weights.balance_weight * weakest.min(saturation) / saturation;

    let total = mind.saturating_add(body).saturating_add(soul);
    let magnitude_cap = saturation * 3;
    let magnitude = weights.magnitude_weight * total.min(magnitude_cap) / magnitude_cap;

    balance.saturating_add(magnitude).min(100) as u8
}
