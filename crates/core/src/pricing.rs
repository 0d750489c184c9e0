use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Every tunable pricing knob, keyed by the name boundary layers send in an
/// override mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PricingField {
    DeliveryFee,
    TripFee,
    LaborHourly,
    CrewSize,
    TaxRate,
    Markup,
    Waste,
    MulchPerYd,
    SodPerSqFt,
    DisposalPerYd,
    GravelDensityLbPerFt3,
    GravelPerTon,
    MowingPerKSqFt,
    MowingMin,
}

impl PricingField {
    pub const ALL: [PricingField; 14] = [
        PricingField::DeliveryFee,
        PricingField::TripFee,
        PricingField::LaborHourly,
        PricingField::CrewSize,
        PricingField::TaxRate,
        PricingField::Markup,
        PricingField::Waste,
        PricingField::MulchPerYd,
        PricingField::SodPerSqFt,
        PricingField::DisposalPerYd,
        PricingField::GravelDensityLbPerFt3,
        PricingField::GravelPerTon,
        PricingField::MowingPerKSqFt,
        PricingField::MowingMin,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PricingField::DeliveryFee => "deliveryFee",
            PricingField::TripFee => "tripFee",
            PricingField::LaborHourly => "laborHourly",
            PricingField::CrewSize => "crewSize",
            PricingField::TaxRate => "taxRate",
            PricingField::Markup => "markup",
            PricingField::Waste => "waste",
            PricingField::MulchPerYd => "mulchPerYd",
            PricingField::SodPerSqFt => "sodPerSqFt",
            PricingField::DisposalPerYd => "disposalPerYd",
            PricingField::GravelDensityLbPerFt3 => "gravelDensityLbPerFt3",
            PricingField::GravelPerTon => "gravelPerTon",
            PricingField::MowingPerKSqFt => "mowingPerKSqFt",
            PricingField::MowingMin => "mowingMin",
        }
    }

    /// Environment variable consulted by the config loader for this field.
    pub fn env_key(self) -> &'static str {
        match self {
            PricingField::DeliveryFee => "LANDSCAPE_PRICING_DELIVERY_FEE",
            PricingField::TripFee => "LANDSCAPE_PRICING_TRIP_FEE",
            PricingField::LaborHourly => "LANDSCAPE_PRICING_LABOR_HOURLY",
            PricingField::CrewSize => "LANDSCAPE_PRICING_CREW_SIZE",
            PricingField::TaxRate => "LANDSCAPE_PRICING_TAX_RATE",
            PricingField::Markup => "LANDSCAPE_PRICING_MARKUP",
            PricingField::Waste => "LANDSCAPE_PRICING_WASTE",
            PricingField::MulchPerYd => "LANDSCAPE_PRICING_MULCH_PER_YD",
            PricingField::SodPerSqFt => "LANDSCAPE_PRICING_SOD_PER_SQ_FT",
            PricingField::DisposalPerYd => "LANDSCAPE_PRICING_DISPOSAL_PER_YD",
            PricingField::GravelDensityLbPerFt3 => "LANDSCAPE_PRICING_GRAVEL_DENSITY_LB_PER_FT3",
            PricingField::GravelPerTon => "LANDSCAPE_PRICING_GRAVEL_PER_TON",
            PricingField::MowingPerKSqFt => "LANDSCAPE_PRICING_MOWING_PER_K_SQ_FT",
            PricingField::MowingMin => "LANDSCAPE_PRICING_MOWING_MIN",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for PricingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Rates, fees and percentages for one estimate. Percentages are fractions
/// (`0.0825` is 8.25%).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub delivery_fee: Decimal,
    pub trip_fee: Decimal,
    /// Per person, per hour.
    pub labor_hourly: Decimal,
    pub crew_size: Decimal,
    pub tax_rate: Decimal,
    pub markup: Decimal,
    pub waste: Decimal,
    pub mulch_per_yd: Decimal,
    pub sod_per_sq_ft: Decimal,
    pub disposal_per_yd: Decimal,
    pub gravel_density_lb_per_ft3: Decimal,
    pub gravel_per_ton: Decimal,
    /// Baseline per 1,000 sq ft for small residential lawns.
    pub mowing_per_k_sq_ft: Decimal,
    pub mowing_min: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee: Decimal::new(75, 0),
            trip_fee: Decimal::new(35, 0),
            labor_hourly: Decimal::new(55, 0),
            crew_size: Decimal::new(2, 0),
            tax_rate: Decimal::new(825, 4),
            markup: Decimal::new(18, 2),
            waste: Decimal::new(8, 2),
            mulch_per_yd: Decimal::new(45, 0),
            sod_per_sq_ft: Decimal::new(65, 2),
            disposal_per_yd: Decimal::new(25, 0),
            gravel_density_lb_per_ft3: Decimal::new(100, 0),
            gravel_per_ton: Decimal::new(38, 0),
            mowing_per_k_sq_ft: Decimal::new(75, 1),
            mowing_min: Decimal::new(45, 0),
        }
    }
}

impl PricingConfig {
    pub fn get(&self, field: PricingField) -> Decimal {
        match field {
            PricingField::DeliveryFee => self.delivery_fee,
            PricingField::TripFee => self.trip_fee,
            PricingField::LaborHourly => self.labor_hourly,
            PricingField::CrewSize => self.crew_size,
            PricingField::TaxRate => self.tax_rate,
            PricingField::Markup => self.markup,
            PricingField::Waste => self.waste,
            PricingField::MulchPerYd => self.mulch_per_yd,
            PricingField::SodPerSqFt => self.sod_per_sq_ft,
            PricingField::DisposalPerYd => self.disposal_per_yd,
            PricingField::GravelDensityLbPerFt3 => self.gravel_density_lb_per_ft3,
            PricingField::GravelPerTon => self.gravel_per_ton,
            PricingField::MowingPerKSqFt => self.mowing_per_k_sq_ft,
            PricingField::MowingMin => self.mowing_min,
        }
    }

    pub fn set(&mut self, field: PricingField, value: Decimal) {
        let slot = match field {
            PricingField::DeliveryFee => &mut self.delivery_fee,
            PricingField::TripFee => &mut self.trip_fee,
            PricingField::LaborHourly => &mut self.labor_hourly,
            PricingField::CrewSize => &mut self.crew_size,
            PricingField::TaxRate => &mut self.tax_rate,
            PricingField::Markup => &mut self.markup,
            PricingField::Waste => &mut self.waste,
            PricingField::MulchPerYd => &mut self.mulch_per_yd,
            PricingField::SodPerSqFt => &mut self.sod_per_sq_ft,
            PricingField::DisposalPerYd => &mut self.disposal_per_yd,
            PricingField::GravelDensityLbPerFt3 => &mut self.gravel_density_lb_per_ft3,
            PricingField::GravelPerTon => &mut self.gravel_per_ton,
            PricingField::MowingPerKSqFt => &mut self.mowing_per_k_sq_ft,
            PricingField::MowingMin => &mut self.mowing_min,
        };
        *slot = value;
    }

    /// Merges `overrides` field-by-field over `self`. Values are taken as
    /// given except a crew smaller than one person, which is raised to one.
    pub fn with_overrides(&self, overrides: &PricingOverrides) -> Self {
        let mut merged = self.clone();
        for (field, value) in overrides.iter() {
            merged.set(field, value);
        }

        if merged.crew_size < Decimal::ONE {
            warn!(
                event_name = "pricing.override.clamped",
                field = PricingField::CrewSize.key(),
                requested = %merged.crew_size,
                "crew size below one person raised to one"
            );
            merged.crew_size = Decimal::ONE;
        }

        merged
    }
}

/// Caller-supplied replacements for individual pricing fields.
///
/// Decoding is lenient: unknown keys are dropped and values that are not
/// numbers (or numeric strings) are skipped. Numeric values are not range
/// checked here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PricingOverrides {
    values: BTreeMap<PricingField, Decimal>,
}

impl PricingOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: PricingField, value: Decimal) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn get(&self, field: PricingField) -> Option<Decimal> {
        self.values.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PricingField, Decimal)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }

    /// Decodes a JSON object such as a request body's `pricing` member.
    /// Anything other than an object yields no overrides.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut overrides = Self::new();
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                warn!(
                    event_name = "pricing.override.ignored",
                    reason = "not_an_object",
                    "pricing overrides must be a key/value object"
                );
            }
            return overrides;
        };

        for (key, raw) in object {
            let parsed = match raw {
                serde_json::Value::Number(number) => parse_decimal(&number.to_string()),
                serde_json::Value::String(text) => parse_decimal(text),
                _ => None,
            };
            overrides.accept(key, parsed, &raw.to_string());
        }

        overrides
    }

    /// Decodes `key=value` pairs as typed on a command line.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut overrides = Self::new();
        for (key, raw) in pairs {
            overrides.accept(key, parse_decimal(raw), raw);
        }
        overrides
    }

    fn accept(&mut self, key: &str, parsed: Option<Decimal>, raw: &str) {
        let Some(field) = PricingField::from_key(key) else {
            debug!(
                event_name = "pricing.override.ignored",
                reason = "unknown_key",
                key = key,
                "unknown pricing override key ignored"
            );
            return;
        };

        match parsed {
            Some(value) => {
                self.values.insert(field, value);
            }
            None => warn!(
                event_name = "pricing.override.ignored",
                reason = "not_numeric",
                key = key,
                value = raw,
                "non-numeric pricing override ignored"
            ),
        }
    }
}

/// A config-file pricing value: an integer, a float or a numeric string.
pub(crate) fn toml_decimal(value: &toml::Value) -> Option<Decimal> {
    match value {
        toml::Value::Integer(number) => Some(Decimal::from(*number)),
        toml::Value::Float(number) => parse_decimal(&number.to_string()),
        toml::Value::String(text) => parse_decimal(text),
        _ => None,
    }
}

/// Accepts plain and scientific notation, with surrounding whitespace.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Decimal>().ok().or_else(|| Decimal::from_scientific(trimmed).ok())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::{toml_decimal, PricingConfig, PricingField, PricingOverrides};

    #[test]
    fn defaults_match_published_rate_card() {
        let pricing = PricingConfig::default();

        assert_eq!(pricing.delivery_fee, Decimal::new(75, 0));
        assert_eq!(pricing.trip_fee, Decimal::new(35, 0));
        assert_eq!(pricing.crew_size, Decimal::new(2, 0));
        assert_eq!(pricing.tax_rate, Decimal::new(825, 4));
        assert_eq!(pricing.mowing_per_k_sq_ft, Decimal::new(75, 1));
    }

    #[test]
    fn field_keys_round_trip_through_lookup() {
        for field in PricingField::ALL {
            assert_eq!(PricingField::from_key(field.key()), Some(field));
            assert!(field.env_key().starts_with("LANDSCAPE_PRICING_"));
        }
        assert_eq!(PricingField::from_key("colour"), None);
    }

    #[test]
    fn json_overrides_merge_field_by_field() {
        let overrides = PricingOverrides::from_json(&json!({
            "deliveryFee": 90,
            "taxRate": "0.07",
            "mulchPerYd": 52.5,
        }));
        let pricing = PricingConfig::default().with_overrides(&overrides);

        assert_eq!(pricing.delivery_fee, Decimal::new(90, 0));
        assert_eq!(pricing.tax_rate, Decimal::new(7, 2));
        assert_eq!(pricing.mulch_per_yd, Decimal::new(525, 1));
        assert_eq!(pricing.trip_fee, Decimal::new(35, 0), "untouched fields keep defaults");
    }

    #[test]
    fn unknown_and_non_numeric_overrides_are_ignored() {
        let overrides = PricingOverrides::from_json(&json!({
            "fencePerLf": 28,
            "markup": "lots",
            "waste": true,
            "tripFee": null,
        }));

        assert!(overrides.is_empty());
        assert_eq!(PricingConfig::default().with_overrides(&overrides), PricingConfig::default());
    }

    #[test]
    fn non_object_json_yields_no_overrides() {
        assert!(PricingOverrides::from_json(&json!([1, 2, 3])).is_empty());
        assert!(PricingOverrides::from_json(&serde_json::Value::Null).is_empty());
    }

    #[test]
    fn toml_values_decode_integers_floats_and_strings() {
        let table: toml::Table = toml::from_str(
            r#"
laborHourly = 60
waste = 0.1
gravelPerTon = "41.25"
markup = true
"#,
        )
        .expect("valid toml");

        assert_eq!(toml_decimal(&table["laborHourly"]), Some(Decimal::new(60, 0)));
        assert_eq!(toml_decimal(&table["waste"]), Some(Decimal::new(1, 1)));
        assert_eq!(toml_decimal(&table["gravelPerTon"]), Some(Decimal::new(4125, 2)));
        assert_eq!(toml_decimal(&table["markup"]), None);
    }

    #[test]
    fn pairs_accept_scientific_notation() {
        let overrides = PricingOverrides::from_pairs([("mowingMin", "5e1"), ("tripFee", "x")]);

        assert_eq!(overrides.get(PricingField::MowingMin), Some(Decimal::new(50, 0)));
        assert_eq!(overrides.get(PricingField::TripFee), None);
    }

    #[test]
    fn negative_values_flow_through_unvalidated() {
        let overrides = PricingOverrides::new().with(PricingField::DeliveryFee, Decimal::new(-5, 0));
        let pricing = PricingConfig::default().with_overrides(&overrides);

        assert_eq!(pricing.delivery_fee, Decimal::new(-5, 0));
    }

    #[test]
    fn crew_smaller_than_one_person_is_raised_to_one() {
        let overrides = PricingOverrides::new().with(PricingField::CrewSize, Decimal::ZERO);
        let pricing = PricingConfig::default().with_overrides(&overrides);

        assert_eq!(pricing.crew_size, Decimal::ONE);
    }
}
