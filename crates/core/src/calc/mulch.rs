use rust_decimal::Decimal;

use crate::calc::{
    finish, labor, money, nonzero, round_to, sum, waste_factor, CheckedMath, DELIVERY_LABEL,
    SQ_FT_INCHES_PER_CUBIC_YARD, TRIP_LABEL,
};
use crate::domain::estimate::{AssumptionKey, Assumptions, Estimate, LineItem};
use crate::domain::job::Dimensions;
use crate::errors::EstimateError;
use crate::pricing::PricingConfig;

pub const LABEL: &str = "Mulch";
pub const UNIT: &str = "yd³";

/// Cubic yards spread per crew-hour.
const YARDS_PER_CREW_HOUR: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Cubic yards = area × depth(ft) / 27, plus waste. Labor scales with the
/// yards actually handled.
pub fn estimate(dimensions: Dimensions, pricing: &PricingConfig) -> Result<Estimate, EstimateError> {
    let area = nonzero(dimensions.area_sq_ft, "areaSqFt")?;
    let depth = nonzero(dimensions.depth_inches, "depthInches")?;

    // Multiply before dividing so whole-yard jobs stay exact.
    let stage = "mulch volume";
    let sq_ft_inches = area.times(depth, stage)?;
    let yards = sq_ft_inches.over(SQ_FT_INCHES_PER_CUBIC_YARD, stage)?;
    let yards_with_waste =
        sq_ft_inches.times(waste_factor(pricing)?, stage)?.over(SQ_FT_INCHES_PER_CUBIC_YARD, stage)?;

    let crew = labor(yards_with_waste.over(YARDS_PER_CREW_HOUR, "mulch labor")?, pricing)?;
    let material = yards_with_waste.times(pricing.mulch_per_yd, "mulch material")?;
    let subtotal =
        sum(&[material, pricing.delivery_fee, pricing.trip_fee, crew.cost], "mulch subtotal")?;

    let items = vec![
        LineItem::metered(LABEL, round_to(yards_with_waste, 2), UNIT, pricing.mulch_per_yd, money(material)),
        LineItem::flat(DELIVERY_LABEL, money(pricing.delivery_fee)),
        LineItem::flat(TRIP_LABEL, money(pricing.trip_fee)),
        crew.line_item(pricing),
    ];

    let assumptions = Assumptions::new()
        .number(AssumptionKey::AreaSqFt, area)
        .number(AssumptionKey::DepthInches, depth)
        .number(AssumptionKey::Yards, round_to(yards, 4))
        .number(AssumptionKey::YardsWithWaste, round_to(yards_with_waste, 2))
        .number(AssumptionKey::Waste, pricing.waste);
    let assumptions = crew.record(assumptions, pricing);

    finish(items, subtotal, pricing, assumptions)
}
