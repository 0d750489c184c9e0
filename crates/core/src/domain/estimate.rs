use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::job::Access;

pub const DISPOSAL_LABEL: &str = "Disposal";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    pub cost: Decimal,
}

impl LineItem {
    /// A fee with no quantity breakdown.
    pub fn flat(label: impl Into<String>, cost: Decimal) -> Self {
        Self { label: label.into(), qty: None, unit: None, unit_price: None, cost }
    }

    pub fn metered(
        label: impl Into<String>,
        qty: Decimal,
        unit: impl Into<String>,
        unit_price: Decimal,
        cost: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            qty: Some(qty),
            unit: Some(unit.into()),
            unit_price: Some(unit_price),
            cost,
        }
    }

    /// A zero-cost disposal line is kept in the estimate but not shown.
    pub fn is_displayed(&self) -> bool {
        !(self.label == DISPOSAL_LABEL && self.cost.is_zero())
    }
}

/// Derived quantities recorded for auditability. Declaration order is the
/// order they are listed in a rendered reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssumptionKey {
    AreaSqFt,
    DepthInches,
    Yards,
    YardsWithWaste,
    Tons,
    TonsWithWaste,
    RemoveOldTurf,
    DisposalYards,
    Access,
    UnitBlocks,
    PerK,
    MinApplied,
    Waste,
    CrewSize,
    CrewHours,
    WallClockHours,
    MarkupRate,
    TaxRate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AssumptionValue {
    Flag(bool),
    Number(Decimal),
    Access(Access),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Assumptions {
    entries: BTreeMap<AssumptionKey, AssumptionValue>,
}

impl Assumptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, key: AssumptionKey, value: Decimal) -> Self {
        self.entries.insert(key, AssumptionValue::Number(value));
        self
    }

    pub fn flag(mut self, key: AssumptionKey, value: bool) -> Self {
        self.entries.insert(key, AssumptionValue::Flag(value));
        self
    }

    pub fn access(mut self, value: Access) -> Self {
        self.entries.insert(AssumptionKey::Access, AssumptionValue::Access(value));
        self
    }

    pub fn get(&self, key: AssumptionKey) -> Option<&AssumptionValue> {
        self.entries.get(&key)
    }

    pub fn get_number(&self, key: AssumptionKey) -> Option<Decimal> {
        match self.entries.get(&key) {
            Some(AssumptionValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_flag(&self, key: AssumptionKey) -> Option<bool> {
        match self.entries.get(&key) {
            Some(AssumptionValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssumptionKey, &AssumptionValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub markup: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub assumptions: Assumptions,
}

impl Estimate {
    pub fn item(&self, label: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.label == label)
    }

    pub fn displayed_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(|item| item.is_displayed())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{AssumptionKey, AssumptionValue, Assumptions, LineItem};

    #[test]
    fn zero_cost_disposal_is_hidden_but_other_zero_lines_are_not() {
        assert!(!LineItem::flat("Disposal", Decimal::ZERO).is_displayed());
        assert!(LineItem::flat("Delivery", Decimal::ZERO).is_displayed());
        assert!(LineItem::flat("Disposal", Decimal::new(1250, 2)).is_displayed());
    }

    #[test]
    fn assumptions_iterate_in_display_order() {
        let assumptions = Assumptions::new()
            .number(AssumptionKey::CrewSize, Decimal::new(2, 0))
            .number(AssumptionKey::AreaSqFt, Decimal::new(900, 0))
            .flag(AssumptionKey::MinApplied, false);

        let keys: Vec<AssumptionKey> = assumptions.iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![AssumptionKey::AreaSqFt, AssumptionKey::MinApplied, AssumptionKey::CrewSize]
        );
        assert_eq!(assumptions.get(AssumptionKey::MinApplied), Some(&AssumptionValue::Flag(false)));
        assert_eq!(assumptions.get_flag(AssumptionKey::AreaSqFt), None);
    }

    #[test]
    fn assumptions_serialize_with_override_style_keys() {
        let assumptions = Assumptions::new()
            .number(AssumptionKey::WallClockHours, Decimal::new(38, 1))
            .flag(AssumptionKey::RemoveOldTurf, true);

        let json = serde_json::to_value(&assumptions).expect("serializable");
        assert_eq!(json["removeOldTurf"], serde_json::Value::Bool(true));
        assert!(json.get("wallClockHours").is_some());
    }

    #[test]
    fn metered_line_items_skip_absent_segments_when_serialized() {
        let json = serde_json::to_value(LineItem::flat("Delivery", Decimal::new(75, 0)))
            .expect("serializable");

        assert!(json.get("qty").is_none());
        assert!(json.get("unitPrice").is_none());
    }
}
