use rust_decimal::Decimal;

use crate::calc::{
    finish, labor, money, nonzero, round_to, sum, waste_factor, CheckedMath, DELIVERY_LABEL,
    INCHES_PER_FOOT, TRIP_LABEL,
};
use crate::domain::estimate::{AssumptionKey, Assumptions, Estimate, LineItem};
use crate::domain::job::Dimensions;
use crate::errors::EstimateError;
use crate::pricing::PricingConfig;

pub const LABEL: &str = "Gravel";
pub const UNIT: &str = "tons";

const POUNDS_PER_TON: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);
/// Rough wheelbarrow/tractor handling rate.
const TONS_PER_CREW_HOUR: Decimal = Decimal::ONE;

/// Tons = area × depth(ft) × density(lb/ft³) / 2000, plus waste.
pub fn estimate(dimensions: Dimensions, pricing: &PricingConfig) -> Result<Estimate, EstimateError> {
    let area = nonzero(dimensions.area_sq_ft, "areaSqFt")?;
    let depth = nonzero(dimensions.depth_inches, "depthInches")?;

    let stage = "gravel weight";
    let pounds_times_twelve = area
        .times(depth, stage)?
        .times(pricing.gravel_density_lb_per_ft3, stage)?;
    let divisor = INCHES_PER_FOOT.times(POUNDS_PER_TON, stage)?;
    let tons = pounds_times_twelve.over(divisor, stage)?;
    let tons_with_waste =
        pounds_times_twelve.times(waste_factor(pricing)?, stage)?.over(divisor, stage)?;

    let crew = labor(tons_with_waste.over(TONS_PER_CREW_HOUR, "gravel labor")?, pricing)?;
    let material = tons_with_waste.times(pricing.gravel_per_ton, "gravel material")?;
    let subtotal =
        sum(&[material, pricing.delivery_fee, pricing.trip_fee, crew.cost], "gravel subtotal")?;

    let items = vec![
        LineItem::metered(LABEL, round_to(tons_with_waste, 2), UNIT, pricing.gravel_per_ton, money(material)),
        LineItem::flat(DELIVERY_LABEL, money(pricing.delivery_fee)),
        LineItem::flat(TRIP_LABEL, money(pricing.trip_fee)),
        crew.line_item(pricing),
    ];

    let assumptions = Assumptions::new()
        .number(AssumptionKey::AreaSqFt, area)
        .number(AssumptionKey::DepthInches, depth)
        .number(AssumptionKey::Tons, round_to(tons, 4))
        .number(AssumptionKey::TonsWithWaste, round_to(tons_with_waste, 2))
        .number(AssumptionKey::Waste, pricing.waste);
    let assumptions = crew.record(assumptions, pricing);

    finish(items, subtotal, pricing, assumptions)
}
