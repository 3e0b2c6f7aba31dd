use crate::models::pricing::{LineItem, PriceBreakdown, PricingConfig};

pub struct PricingService;

impl PricingService {
    /// Sum of a category's line items
    pub fn calculate_items_cost(items: &[LineItem]) -> f64 {
        items.iter().map(|item| item.cost.max(0.0)).sum()
    }

    /// Accommodation + transportation + activities + visa/registration fee + custom field
    pub fn calculate_subtotal(pricing: &PricingConfig) -> f64 {
        Self::calculate_items_cost(&pricing.accommodation_items)
            + Self::calculate_items_cost(&pricing.transportation_items)
            + Self::calculate_items_cost(&pricing.activity_items)
            + pricing.visa_reg_fee
            + pricing.custom_field
    }

    pub fn percentage_of(amount: f64, percentage: f64) -> f64 {
        amount * percentage / 100.0
    }

    /// Full breakdown of the trip price. A positive `total_price` is taken as-is
    /// and the itemised fields are ignored.
    pub fn calculate_breakdown(pricing: &PricingConfig) -> PriceBreakdown {
        if let Some(total_price) = pricing.total_price.filter(|price| *price > 0.0) {
            return PriceBreakdown {
                total: total_price,
                overridden: true,
                ..PriceBreakdown::default()
            };
        }

        let subtotal = Self::calculate_subtotal(pricing);
        let buffer_amount = Self::percentage_of(subtotal, pricing.buffer_percentage);
        let commission_amount = Self::percentage_of(subtotal, pricing.commission);
        let pg_charges_amount = Self::percentage_of(subtotal, pricing.pg_charges);

        let total =
            subtotal + buffer_amount + pricing.your_fee + commission_amount + pg_charges_amount;

        PriceBreakdown {
            subtotal,
            buffer_amount,
            commission_amount,
            pg_charges_amount,
            your_fee: pricing.your_fee,
            total,
            overridden: false,
        }
    }

    /// Final trip price, unrounded
    pub fn compute_total(pricing: &PricingConfig) -> f64 {
        Self::calculate_breakdown(pricing).total
    }
}
