use rust_decimal::Decimal;

use crate::calc::{finish, labor, money, nonzero, round_to, CheckedMath};
use crate::domain::estimate::{AssumptionKey, Assumptions, Estimate, LineItem};
use crate::domain::job::MowingQuantities;
use crate::errors::EstimateError;
use crate::pricing::PricingConfig;

pub const LABEL: &str = "Mowing visit";
pub const UNIT: &str = "× (per 1,000 sq ft)";

const SQ_FT_PER_BLOCK: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Flat visit price: whole 1,000 sq ft blocks at the access-adjusted rate,
/// never below the minimum charge. Trimming and blowing are included.
///
/// Crew time is estimated for scheduling only and is not billed.
pub fn estimate(job: MowingQuantities, pricing: &PricingConfig) -> Result<Estimate, EstimateError> {
    let area = nonzero(job.area_sq_ft, "areaSqFt")?;

    let per_block = pricing.mowing_per_k_sq_ft.times(job.access.rate_multiplier(), "mowing rate")?;
    let blocks = area.over(SQ_FT_PER_BLOCK, "mowing blocks")?.ceil();
    let block_price = blocks.times(per_block, "mowing price")?;

    let visit_price = block_price.max(pricing.mowing_min);
    let min_applied = visit_price == pricing.mowing_min;

    let crew = labor(area.over(job.access.crew_sq_ft_per_hour(), "mowing crew time")?, pricing)?;

    let items = vec![LineItem::metered(LABEL, blocks, UNIT, per_block, money(block_price))];

    let assumptions = Assumptions::new()
        .number(AssumptionKey::AreaSqFt, area)
        .access(job.access)
        .number(AssumptionKey::UnitBlocks, blocks)
        .number(AssumptionKey::PerK, round_to(per_block, 4))
        .flag(AssumptionKey::MinApplied, min_applied);
    let assumptions = crew.record(assumptions, pricing);

    finish(items, visit_price, pricing, assumptions)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::estimate;
    use crate::domain::estimate::{AssumptionKey, AssumptionValue};
    use crate::domain::job::{Access, MowingQuantities};
    use crate::pricing::PricingConfig;

    fn mow(area: i64, access: Access) -> MowingQuantities {
        MowingQuantities { area_sq_ft: Decimal::new(area, 0), access }
    }

    #[test]
    fn small_lawns_pay_the_minimum_visit_charge() {
        let pricing = PricingConfig::default();
        let estimate = estimate(mow(2500, Access::Normal), &pricing).expect("estimate");

        // 3 blocks × $7.50 = $22.50 < $45
        assert_eq!(estimate.item("Mowing visit").map(|item| item.cost), Some(Decimal::new(2250, 2)));
        assert_eq!(estimate.subtotal, pricing.mowing_min);
        assert_eq!(estimate.assumptions.get_flag(AssumptionKey::MinApplied), Some(true));
    }

    #[test]
    fn block_price_equal_to_the_minimum_counts_as_minimum_applied() {
        let pricing = PricingConfig::default();
        let estimate = estimate(mow(6000, Access::Normal), &pricing).expect("estimate");

        // 6 blocks × $7.50 = $45, exactly the minimum
        assert_eq!(estimate.item("Mowing visit").map(|item| item.cost), Some(Decimal::new(4500, 2)));
        assert_eq!(estimate.subtotal, pricing.mowing_min);
        assert_eq!(estimate.assumptions.get_flag(AssumptionKey::MinApplied), Some(true));
    }

    #[test]
    fn tight_access_raises_the_block_rate() {
        let estimate = estimate(mow(6000, Access::Tight), &PricingConfig::default()).expect("estimate");

        let visit = estimate.item("Mowing visit").expect("visit line");
        assert_eq!(visit.qty, Some(Decimal::new(6, 0)));
        assert_eq!(visit.unit_price, Some(Decimal::new(9375, 3)));
        assert_eq!(visit.cost, Decimal::new(5625, 2));
        assert_eq!(estimate.subtotal, Decimal::new(5625, 2));
        assert_eq!(estimate.assumptions.get_flag(AssumptionKey::MinApplied), Some(false));
        assert_eq!(
            estimate.assumptions.get(AssumptionKey::Access),
            Some(&AssumptionValue::Access(Access::Tight))
        );
        // 6,000 / 3,500 crew-hours over a crew of two
        assert_eq!(
            estimate.assumptions.get_number(AssumptionKey::WallClockHours),
            Some(Decimal::new(9, 1))
        );
    }

    #[test]
    fn partial_blocks_round_up() {
        let estimate = estimate(mow(10_001, Access::Easy), &PricingConfig::default()).expect("estimate");

        assert_eq!(estimate.assumptions.get_number(AssumptionKey::UnitBlocks), Some(Decimal::new(11, 0)));
        // 11 × 7.50 × 0.9
        assert_eq!(estimate.subtotal, Decimal::new(7425, 2));
    }

    #[test]
    fn mowing_bills_no_delivery_trip_or_labor_lines() {
        let estimate = estimate(mow(20_000, Access::Normal), &PricingConfig::default()).expect("estimate");

        assert_eq!(estimate.items.len(), 1);
        assert!(estimate.item("Labor").is_none());
        assert!(estimate.total > estimate.subtotal);
    }
}
