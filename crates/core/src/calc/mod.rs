//! Per-service cost calculators and the aggregation law they share.
//!
//! All arithmetic is checked: a result outside the decimal range becomes
//! [`EstimateError::OutOfRange`] instead of a panic.

pub mod gravel;
pub mod mowing;
pub mod mulch;
pub mod sod;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::estimate::{AssumptionKey, Assumptions, Estimate, LineItem};
use crate::errors::EstimateError;
use crate::pricing::PricingConfig;

pub const DELIVERY_LABEL: &str = "Delivery";
pub const TRIP_LABEL: &str = "Trip / setup";
pub const LABOR_LABEL: &str = "Labor";
pub const LABOR_UNIT: &str = "hr (crew total)";

pub(crate) const INCHES_PER_FOOT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
/// Square feet × inches in one cubic yard (12 × 27).
pub(crate) const SQ_FT_INCHES_PER_CUBIC_YARD: Decimal = Decimal::from_parts(324, 0, 0, false, 0);

/// Half-away-from-zero rounding to `dp` places.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents and always carries two decimal places, so `45` is `45.00`.
pub fn money(value: Decimal) -> Decimal {
    let mut cents = round_to(value, 2);
    cents.rescale(2);
    cents
}

pub(crate) trait CheckedMath: Sized {
    fn times(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError>;
    fn over(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError>;
    fn plus(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError>;
}

impl CheckedMath for Decimal {
    fn times(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError> {
        self.checked_mul(rhs).ok_or(EstimateError::OutOfRange { stage })
    }

    /// Division by zero is reported as out of range.
    fn over(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError> {
        self.checked_div(rhs).ok_or(EstimateError::OutOfRange { stage })
    }

    fn plus(self, rhs: Decimal, stage: &'static str) -> Result<Decimal, EstimateError> {
        self.checked_add(rhs).ok_or(EstimateError::OutOfRange { stage })
    }
}

pub(crate) fn sum(values: &[Decimal], stage: &'static str) -> Result<Decimal, EstimateError> {
    values.iter().try_fold(Decimal::ZERO, |total, value| total.plus(*value, stage))
}

pub(crate) fn nonzero(value: Decimal, field: &'static str) -> Result<Decimal, EstimateError> {
    if value.is_zero() {
        return Err(EstimateError::ZeroQuantity { field });
    }
    Ok(value)
}

/// `1 + waste`, applied to material quantities only.
pub(crate) fn waste_factor(pricing: &PricingConfig) -> Result<Decimal, EstimateError> {
    Decimal::ONE.plus(pricing.waste, "waste factor")
}

/// Unrounded markup, tax and total for an unrounded subtotal. Tax is charged
/// on the marked-up subtotal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub markup: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn aggregate(subtotal: Decimal, pricing: &PricingConfig) -> Result<Totals, EstimateError> {
    let markup = subtotal.times(pricing.markup, "markup")?;
    let with_markup = subtotal.plus(markup, "markup")?;
    let tax = with_markup.times(pricing.tax_rate, "tax")?;
    let total = with_markup.plus(tax, "total")?;

    Ok(Totals { subtotal, markup, tax, total })
}

/// Labor line plus the wall-clock duration it implies for the configured crew.
pub(crate) struct Labor {
    pub crew_hours: Decimal,
    pub wall_clock_hours: Decimal,
    pub cost: Decimal,
}

pub(crate) fn labor(crew_hours: Decimal, pricing: &PricingConfig) -> Result<Labor, EstimateError> {
    Ok(Labor {
        crew_hours,
        wall_clock_hours: crew_hours.over(pricing.crew_size, "crew duration")?,
        cost: crew_hours.times(pricing.labor_hourly, "labor cost")?,
    })
}

impl Labor {
    pub fn line_item(&self, pricing: &PricingConfig) -> LineItem {
        LineItem::metered(
            LABOR_LABEL,
            round_to(self.crew_hours, 1),
            LABOR_UNIT,
            pricing.labor_hourly,
            money(self.cost),
        )
    }

    pub fn record(&self, assumptions: Assumptions, pricing: &PricingConfig) -> Assumptions {
        assumptions
            .number(AssumptionKey::CrewSize, pricing.crew_size)
            .number(AssumptionKey::CrewHours, round_to(self.crew_hours, 1))
            .number(AssumptionKey::WallClockHours, round_to(self.wall_clock_hours, 1))
    }
}

/// Rounds every aggregate to cents and records the rates that produced them.
pub(crate) fn finish(
    items: Vec<LineItem>,
    subtotal: Decimal,
    pricing: &PricingConfig,
    assumptions: Assumptions,
) -> Result<Estimate, EstimateError> {
    let totals = aggregate(subtotal, pricing)?;

    Ok(Estimate {
        items,
        subtotal: money(totals.subtotal),
        markup: money(totals.markup),
        tax: money(totals.tax),
        total: money(totals.total),
        assumptions: assumptions
            .number(AssumptionKey::MarkupRate, pricing.markup)
            .number(AssumptionKey::TaxRate, pricing.tax_rate),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{aggregate, money, round_to, sum, CheckedMath};
    use crate::errors::EstimateError;
    use crate::pricing::PricingConfig;

    #[test]
    fn money_rounds_half_away_from_zero() {
        assert_eq!(money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(money(Decimal::new(12344, 3)), Decimal::new(1234, 2));
        assert_eq!(round_to(Decimal::new(375, 3), 1), Decimal::new(4, 1));
    }

    #[test]
    fn money_always_carries_cents() {
        assert_eq!(money(Decimal::new(45, 0)).to_string(), "45.00");
        assert_eq!(money(Decimal::new(450, 1)).to_string(), "45.00");
        assert_eq!(money(Decimal::new(927_499, 4)).to_string(), "92.75");
    }

    #[test]
    fn tax_is_charged_on_the_marked_up_subtotal() {
        let totals = aggregate(Decimal::new(100, 0), &PricingConfig::default()).expect("in range");

        assert_eq!(totals.markup, Decimal::new(18, 0));
        assert_eq!(totals.tax, Decimal::new(97350, 4));
        assert_eq!(totals.total, Decimal::new(1277350, 4));
    }

    #[test]
    fn zero_rates_leave_total_equal_to_subtotal() {
        let pricing =
            PricingConfig { markup: Decimal::ZERO, tax_rate: Decimal::ZERO, ..PricingConfig::default() };
        let totals = aggregate(Decimal::new(92750, 2), &pricing).expect("in range");

        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn overflow_and_zero_division_become_out_of_range() {
        assert_eq!(
            Decimal::MAX.times(Decimal::new(2, 0), "test"),
            Err(EstimateError::OutOfRange { stage: "test" })
        );
        assert_eq!(
            Decimal::ONE.over(Decimal::ZERO, "test"),
            Err(EstimateError::OutOfRange { stage: "test" })
        );
        assert!(sum(&[Decimal::MAX, Decimal::MAX], "test").is_err());
    }
}
