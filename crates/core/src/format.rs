//! Plain-text rendering of an [`Estimate`].

use rust_decimal::Decimal;

use crate::calc::{money, round_to};
use crate::domain::estimate::{AssumptionKey, AssumptionValue, Estimate, LineItem};

const BULLET: &str = "•";

enum Style {
    Number { dp: u32, suffix: &'static str },
    Percent,
    Currency,
    YesNo,
    Text,
}

fn describe(key: AssumptionKey) -> (&'static str, Style) {
    use AssumptionKey::*;

    match key {
        AreaSqFt => ("Area", Style::Number { dp: 2, suffix: " sq ft" }),
        DepthInches => ("Depth", Style::Number { dp: 2, suffix: " in" }),
        Yards => ("Volume", Style::Number { dp: 4, suffix: " yd³" }),
        YardsWithWaste => ("Volume with waste", Style::Number { dp: 2, suffix: " yd³" }),
        Tons => ("Weight", Style::Number { dp: 4, suffix: " tons" }),
        TonsWithWaste => ("Weight with waste", Style::Number { dp: 2, suffix: " tons" }),
        RemoveOldTurf => ("Remove old turf", Style::YesNo),
        DisposalYards => ("Disposal volume", Style::Number { dp: 2, suffix: " yd³" }),
        Access => ("Access", Style::Text),
        UnitBlocks => ("Billed 1,000 sq ft blocks", Style::Number { dp: 0, suffix: "" }),
        PerK => ("Rate per 1,000 sq ft", Style::Currency),
        MinApplied => ("Minimum charge applied", Style::YesNo),
        Waste => ("Waste allowance", Style::Percent),
        CrewSize => ("Crew size", Style::Number { dp: 2, suffix: "" }),
        CrewHours => ("Crew-hours", Style::Number { dp: 1, suffix: "" }),
        WallClockHours => ("On-site time", Style::Number { dp: 1, suffix: " hr" }),
        MarkupRate => ("Markup rate", Style::Percent),
        TaxRate => ("Tax rate", Style::Percent),
    }
}

/// Renders the reply text for an estimate. Output depends only on the
/// arguments.
pub fn render(title: &str, estimate: &Estimate) -> String {
    let mut lines = vec![title.to_string()];

    lines.extend(estimate.displayed_items().map(item_line));
    lines.push(format!("Subtotal: {}", format_money(estimate.subtotal)));
    lines.push(format!("Markup: {}", format_money(estimate.markup)));
    lines.push(format!("Tax: {}", format_money(estimate.tax)));
    lines.push(format!("Total: {}", format_money(estimate.total)));

    if !estimate.assumptions.is_empty() {
        lines.push(String::new());
        lines.push("Assumptions:".to_string());
        lines.extend(
            estimate
                .assumptions
                .iter()
                .map(|(key, value)| assumption_line(key, value)),
        );
    }

    lines.join("\n")
}

fn item_line(item: &LineItem) -> String {
    let mut detail = Vec::new();
    if let Some(qty) = item.qty {
        detail.push(format_number(qty, 2));
    }
    if let Some(unit) = &item.unit {
        detail.push(unit.clone());
    }
    if let Some(unit_price) = item.unit_price {
        detail.push(format!("@ {}", format_money(unit_price)));
    }

    if detail.is_empty() {
        format!("{BULLET} {}: {}", item.label, format_money(item.cost))
    } else {
        format!("{BULLET} {} – {}: {}", item.label, detail.join(" "), format_money(item.cost))
    }
}

fn assumption_line(key: AssumptionKey, value: &AssumptionValue) -> String {
    let (label, style) = describe(key);
    let rendered = match (value, style) {
        (AssumptionValue::Access(access), _) => access.as_str().to_string(),
        (AssumptionValue::Flag(flag), _) => yes_no(*flag).to_string(),
        (AssumptionValue::Number(number), Style::Percent) => format_percent(*number),
        (AssumptionValue::Number(number), Style::Currency) => format_money(*number),
        (AssumptionValue::Number(number), Style::YesNo) => yes_no(!number.is_zero()).to_string(),
        (AssumptionValue::Number(number), Style::Text) => format_number(*number, 4),
        (AssumptionValue::Number(number), Style::Number { dp, suffix }) => {
            format!("{}{suffix}", format_number(*number, dp))
        }
    };

    format!("{BULLET} {label}: {rendered}")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// `$1,234.56`; negative amounts render as `-$1,234.56`.
pub fn format_money(value: Decimal) -> String {
    let cents = money(value.abs());
    let sign = if value.is_sign_negative() && !cents.is_zero() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&cents.to_string()))
}

/// Rounds to at most `dp` places, trims trailing zeros and groups thousands.
pub fn format_number(value: Decimal, dp: u32) -> String {
    let rounded = round_to(value, dp).normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{}", group_thousands(&rounded.abs().to_string()))
}

/// A fraction as a percentage: `0.0825` renders as `8.25%`.
pub fn format_percent(fraction: Decimal) -> String {
    match fraction.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{}%", format_number(percent, 2)),
        None => format_number(fraction, 4),
    }
}

fn group_thousands(plain: &str) -> String {
    let (integer, fraction) = match plain.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (plain, None),
    };

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_money, format_number, format_percent, render};
    use crate::calc::{mulch, sod};
    use crate::domain::job::{Dimensions, SodQuantities};
    use crate::pricing::PricingConfig;

    #[test]
    fn golden_mulch_reply() {
        let estimate = mulch::estimate(
            Dimensions { area_sq_ft: Decimal::new(900, 0), depth_inches: Decimal::new(3, 0) },
            &PricingConfig::default(),
        )
        .expect("estimate");

        let expected = "\
Ballpark mulch estimate:
• Mulch – 9 yd³ @ $45.00: $405.00
• Delivery: $75.00
• Trip / setup: $35.00
• Labor – 7.5 hr (crew total) @ $55.00: $412.50
Subtotal: $927.50
Markup: $166.95
Tax: $90.29
Total: $1,184.74

Assumptions:
• Area: 900 sq ft
• Depth: 3 in
• Volume: 8.3333 yd³
• Volume with waste: 9 yd³
• Waste allowance: 8%
• Crew size: 2
• Crew-hours: 7.5
• On-site time: 3.8 hr
• Markup rate: 18%
• Tax rate: 8.25%";

        assert_eq!(render("Ballpark mulch estimate:", &estimate), expected);
    }

    #[test]
    fn zero_cost_disposal_is_not_rendered() {
        let estimate = sod::estimate(
            SodQuantities { area_sq_ft: Decimal::new(1200, 0), remove_old_turf: false },
            &PricingConfig::default(),
        )
        .expect("estimate");
        let text = render("Ballpark sod estimate:", &estimate);

        assert!(!text.contains("• Disposal:"));
        assert!(text.contains("• Disposal volume: 0 yd³"));
        assert!(text.contains("• Remove old turf: No"));
        assert!(text.contains("• Sod – 1,200 sq ft @ $0.65: $842.40"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let estimate = sod::estimate(
            SodQuantities { area_sq_ft: Decimal::new(1200, 0), remove_old_turf: true },
            &PricingConfig::default(),
        )
        .expect("estimate");

        assert_eq!(render("t", &estimate), render("t", &estimate));
        assert!(render("t", &estimate).contains("• Disposal – 3.7 yd³ @ $25.00: $92.59"));
    }

    #[test]
    fn numbers_group_thousands_and_trim_zeros() {
        assert_eq!(format_money(Decimal::new(118474, 2)), "$1,184.74");
        assert_eq!(format_money(Decimal::new(45, 0)), "$45.00");
        assert_eq!(format_money(Decimal::new(-123456789, 2)), "-$1,234,567.89");
        assert_eq!(format_number(Decimal::new(12000, 0), 2), "12,000");
        assert_eq!(format_number(Decimal::new(83333333, 7), 4), "8.3333");
        assert_eq!(format_number(Decimal::new(900, 2), 2), "9");
        assert_eq!(format_percent(Decimal::new(825, 4)), "8.25%");
        assert_eq!(format_percent(Decimal::new(18, 2)), "18%");
    }
}
