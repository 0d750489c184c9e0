use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How hard the lawn is to work; scales the mowing rate and crew speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Easy,
    #[default]
    Normal,
    Tight,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Easy => "easy",
            Access::Normal => "normal",
            Access::Tight => "tight",
        }
    }

    /// Multiplier applied to the per-1,000 sq ft mowing rate.
    pub fn rate_multiplier(self) -> Decimal {
        match self {
            Access::Easy => Decimal::new(9, 1),
            Access::Normal => Decimal::ONE,
            Access::Tight => Decimal::new(125, 2),
        }
    }

    /// Square feet a whole crew mows per hour.
    pub fn crew_sq_ft_per_hour(self) -> Decimal {
        match self {
            Access::Easy => Decimal::new(6000, 0),
            Access::Normal => Decimal::new(5000, 0),
            Access::Tight => Decimal::new(3500, 0),
        }
    }
}

/// Area and depth for volume-priced materials (mulch, gravel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionJob {
    pub area_sq_ft: Option<Decimal>,
    pub depth_inches: Option<Decimal>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SodJob {
    pub area_sq_ft: Option<Decimal>,
    pub remove_old_turf: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MowingJob {
    pub area_sq_ft: Option<Decimal>,
    pub access: Access,
}

/// Quantities extracted from a job description, one variant per service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ParsedJob {
    Mowing(MowingJob),
    Mulch(DimensionJob),
    Sod(SodJob),
    Gravel(DimensionJob),
}

/// Confirmed area and depth handed to a volume calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub area_sq_ft: Decimal,
    pub depth_inches: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SodQuantities {
    pub area_sq_ft: Decimal,
    pub remove_old_turf: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MowingQuantities {
    pub area_sq_ft: Decimal,
    pub access: Access,
}

impl DimensionJob {
    /// Both fields present and nonzero.
    pub fn require(&self) -> Option<Dimensions> {
        let area_sq_ft = self.area_sq_ft.filter(|value| !value.is_zero())?;
        let depth_inches = self.depth_inches.filter(|value| !value.is_zero())?;
        Some(Dimensions { area_sq_ft, depth_inches })
    }
}

impl SodJob {
    pub fn require(&self) -> Option<SodQuantities> {
        let area_sq_ft = self.area_sq_ft.filter(|value| !value.is_zero())?;
        Some(SodQuantities { area_sq_ft, remove_old_turf: self.remove_old_turf })
    }
}

impl MowingJob {
    pub fn require(&self) -> Option<MowingQuantities> {
        let area_sq_ft = self.area_sq_ft.filter(|value| !value.is_zero())?;
        Some(MowingQuantities { area_sq_ft, access: self.access })
    }
}
