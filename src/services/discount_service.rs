use chrono::{DateTime, Utc};

use crate::models::pricing::{EarlyBirdOutcome, EarlyBookingPolicy};

pub struct DiscountService;

impl DiscountService {
    /// Whether the early-bird window is open at `now`. A missing or unparsable
    /// end date keeps the window closed.
    pub fn is_early_bird_open(policy: &EarlyBookingPolicy, now: DateTime<Utc>) -> bool {
        policy.allow_early_booking
            && policy.discount_percentage > 0.0
            && policy
                .end_date_inclusive
                .is_some_and(|end_date| now < end_date)
    }

    pub fn apply_early_bird(
        base_price: f64,
        policy: &EarlyBookingPolicy,
        now: DateTime<Utc>,
    ) -> EarlyBirdOutcome {
        if !Self::is_early_bird_open(policy, now) {
            return EarlyBirdOutcome {
                applicable: false,
                final_price: base_price,
                discount_amount: 0.0,
            };
        }

        let percentage = policy.discount_percentage.min(100.0);
        let final_price = base_price * (1.0 - percentage / 100.0);

        EarlyBirdOutcome {
            applicable: true,
            final_price,
            discount_amount: base_price - final_price,
        }
    }
}
