pub mod calc;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod format;
pub mod parse;
pub mod pricing;
pub mod registry;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
pub use domain::estimate::{AssumptionKey, AssumptionValue, Assumptions, Estimate, LineItem};
pub use domain::job::{Access, ParsedJob};
pub use engine::{
    compute_estimate, DeterministicEstimateEngine, EstimateEngine, EstimateOutcome, EstimateReply,
    Guidance, GuidanceReason,
};
pub use errors::EstimateError;
pub use pricing::{PricingConfig, PricingField, PricingOverrides};
pub use registry::{route, Route, ServiceKind};
