use rust_decimal::Decimal;

use crate::calc::{
    finish, labor, money, nonzero, round_to, sum, waste_factor, CheckedMath, DELIVERY_LABEL,
    SQ_FT_INCHES_PER_CUBIC_YARD, TRIP_LABEL,
};
use crate::domain::estimate::{AssumptionKey, Assumptions, Estimate, LineItem, DISPOSAL_LABEL};
use crate::domain::job::SodQuantities;
use crate::errors::EstimateError;
use crate::pricing::PricingConfig;

pub const LABEL: &str = "Sod";

const INSTALL_SQ_FT_PER_CREW_HOUR: Decimal = Decimal::from_parts(200, 0, 0, false, 0);
const REMOVAL_SQ_FT_PER_CREW_HOUR: Decimal = Decimal::from_parts(180, 0, 0, false, 0);
/// Old turf is hauled away one inch deep.
const REMOVAL_DEPTH_INCHES: Decimal = Decimal::ONE;

pub fn estimate(job: SodQuantities, pricing: &PricingConfig) -> Result<Estimate, EstimateError> {
    let area = nonzero(job.area_sq_ft, "areaSqFt")?;

    let sod_cost = area
        .times(waste_factor(pricing)?, "sod material")?
        .times(pricing.sod_per_sq_ft, "sod material")?;

    let install_hours = area.over(INSTALL_SQ_FT_PER_CREW_HOUR, "sod labor")?;
    let (removal_hours, disposal_yards) = if job.remove_old_turf {
        (
            area.over(REMOVAL_SQ_FT_PER_CREW_HOUR, "sod labor")?,
            area.times(REMOVAL_DEPTH_INCHES, "disposal volume")?
                .over(SQ_FT_INCHES_PER_CUBIC_YARD, "disposal volume")?,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let crew = labor(install_hours.plus(removal_hours, "sod labor")?, pricing)?;
    let disposal_cost = disposal_yards.times(pricing.disposal_per_yd, "disposal cost")?;

    let subtotal = sum(
        &[sod_cost, pricing.delivery_fee, pricing.trip_fee, crew.cost, disposal_cost],
        "sod subtotal",
    )?;

    let disposal = if job.remove_old_turf {
        LineItem::metered(
            DISPOSAL_LABEL,
            round_to(disposal_yards, 2),
            "yd³",
            pricing.disposal_per_yd,
            money(disposal_cost),
        )
    } else {
        LineItem::flat(DISPOSAL_LABEL, Decimal::ZERO)
    };

    // The sod line quotes the measured area; waste is folded into its cost.
    let items = vec![
        LineItem::metered(LABEL, area, "sq ft", pricing.sod_per_sq_ft, money(sod_cost)),
        LineItem::flat(DELIVERY_LABEL, money(pricing.delivery_fee)),
        disposal,
        LineItem::flat(TRIP_LABEL, money(pricing.trip_fee)),
        crew.line_item(pricing),
    ];

    let assumptions = Assumptions::new()
        .number(AssumptionKey::AreaSqFt, area)
        .flag(AssumptionKey::RemoveOldTurf, job.remove_old_turf)
        .number(AssumptionKey::DisposalYards, round_to(disposal_yards, 2))
        .number(AssumptionKey::Waste, pricing.waste);
    let assumptions = crew.record(assumptions, pricing);

    finish(items, subtotal, pricing, assumptions)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::estimate;
    use crate::domain::estimate::{AssumptionKey, Estimate};
    use crate::domain::job::SodQuantities;
    use crate::errors::EstimateError;
    use crate::pricing::PricingConfig;

    fn sod(area: i64, remove_old_turf: bool) -> SodQuantities {
        SodQuantities { area_sq_ft: Decimal::new(area, 0), remove_old_turf }
    }

    #[test]
    fn plain_install_keeps_a_zero_disposal_line() {
        let estimate = estimate(sod(1200, false), &PricingConfig::default()).expect("estimate");

        let disposal = estimate.item("Disposal").expect("disposal line retained");
        assert_eq!(disposal.cost, Decimal::ZERO);
        assert_eq!(disposal.qty, None);
        assert!(!disposal.is_displayed());
        assert_eq!(
            estimate.assumptions.get_number(AssumptionKey::DisposalYards),
            Some(Decimal::ZERO)
        );

        // 1,200 × 1.08 × 0.65
        assert_eq!(estimate.item("Sod").map(|item| item.cost), Some(Decimal::new(84240, 2)));
        // 1,200 / 200 crew-hours × $55
        assert_eq!(estimate.item("Labor").map(|item| item.cost), Some(Decimal::new(330, 0)));
        assert_eq!(estimate.subtotal, Decimal::new(128240, 2));
    }

    #[test]
    fn removal_adds_labor_and_disposal() {
        let estimate = estimate(sod(1200, true), &PricingConfig::default()).expect("estimate");

        let disposal = estimate.item("Disposal").expect("disposal line");
        assert_eq!(disposal.qty, Some(Decimal::new(370, 2)));
        assert_eq!(disposal.cost, Decimal::new(9259, 2));
        assert!(disposal.is_displayed());

        let labor = estimate.item("Labor").expect("labor line");
        assert_eq!(labor.qty, Some(Decimal::new(127, 1)));
        assert_eq!(labor.cost, Decimal::new(69667, 2));

        assert_eq!(estimate.assumptions.get_flag(AssumptionKey::RemoveOldTurf), Some(true));
        assert_eq!(estimate.subtotal, Decimal::new(174166, 2));
    }

    #[test]
    fn line_items_keep_a_stable_order() {
        let estimate = estimate(sod(500, true), &PricingConfig::default()).expect("estimate");
        let labels: Vec<&str> = estimate.items.iter().map(|item| item.label.as_str()).collect();

        assert_eq!(labels, vec!["Sod", "Delivery", "Disposal", "Trip / setup", "Labor"]);
    }

    #[test]
    fn larger_area_costs_more_sod() {
        let pricing = PricingConfig::default();
        for remove_old_turf in [false, true] {
            let small = estimate(sod(400, remove_old_turf), &pricing).expect("estimate");
            let large = estimate(sod(401, remove_old_turf), &pricing).expect("estimate");

            let sod_line = |e: &Estimate| e.item("Sod").map(|item| (item.qty, item.cost));
            let (small_qty, small_cost) = sod_line(&small).expect("sod line");
            let (large_qty, large_cost) = sod_line(&large).expect("sod line");
            assert!(large_qty > small_qty);
            assert!(large_cost > small_cost);
        }
    }

    #[test]
    fn zero_area_is_rejected() {
        assert_eq!(
            estimate(sod(0, true), &PricingConfig::default()),
            Err(EstimateError::ZeroQuantity { field: "areaSqFt" })
        );
    }
}
