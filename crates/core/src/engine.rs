use serde::Serialize;
use tracing::{debug, info};

use crate::calc::{gravel, mowing, mulch, sod};
use crate::domain::estimate::Estimate;
use crate::domain::job::ParsedJob;
use crate::errors::EstimateError;
use crate::format;
use crate::parse::parse_job;
use crate::pricing::{PricingConfig, PricingOverrides};
use crate::registry::{route, Route, ServiceKind, HELP_MESSAGE, HELP_TITLE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "service", rename_all = "snake_case")]
pub enum GuidanceReason {
    /// A required quantity was absent or zero.
    MissingInput(ServiceKind),
    UnroutableText,
    OutOfRange(ServiceKind),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Guidance {
    pub reason: GuidanceReason,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EstimateOutcome {
    Estimate(Estimate),
    Guidance(Guidance),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EstimateReply {
    pub title: String,
    pub result: EstimateOutcome,
}

impl EstimateReply {
    fn guidance(title: &str, reason: GuidanceReason, message: &str) -> Self {
        Self {
            title: title.to_string(),
            result: EstimateOutcome::Guidance(Guidance { reason, message: message.to_string() }),
        }
    }

    pub fn estimate(&self) -> Option<&Estimate> {
        match &self.result {
            EstimateOutcome::Estimate(estimate) => Some(estimate),
            EstimateOutcome::Guidance(_) => None,
        }
    }

    pub fn guidance_message(&self) -> Option<&str> {
        match &self.result {
            EstimateOutcome::Estimate(_) => None,
            EstimateOutcome::Guidance(guidance) => Some(guidance.message.as_str()),
        }
    }

    /// Title line followed by the itemized estimate or the guidance text.
    pub fn render(&self) -> String {
        match &self.result {
            EstimateOutcome::Estimate(estimate) => format::render(&self.title, estimate),
            EstimateOutcome::Guidance(guidance) => format!("{}\n{}", self.title, guidance.message),
        }
    }
}

pub trait EstimateEngine: Send + Sync {
    fn estimate(&self, text: &str, overrides: &PricingOverrides) -> EstimateReply;
}

/// Routes, parses and prices against a fixed base configuration.
#[derive(Clone, Debug, Default)]
pub struct DeterministicEstimateEngine {
    base: PricingConfig,
}

impl DeterministicEstimateEngine {
    pub fn new(base: PricingConfig) -> Self {
        Self { base }
    }

    pub fn base_pricing(&self) -> &PricingConfig {
        &self.base
    }
}

impl EstimateEngine for DeterministicEstimateEngine {
    fn estimate(&self, text: &str, overrides: &PricingOverrides) -> EstimateReply {
        let pricing = self.base.with_overrides(overrides);
        estimate_with_pricing(text, &pricing)
    }
}

/// Estimates `text` against the default price book plus `overrides`.
pub fn compute_estimate(text: &str, overrides: &PricingOverrides) -> EstimateReply {
    DeterministicEstimateEngine::default().estimate(text, overrides)
}

pub fn estimate_with_pricing(text: &str, pricing: &PricingConfig) -> EstimateReply {
    let resolved = route(text);
    debug!(event_name = "estimate.route.resolved", route = ?resolved, "route resolved");

    match resolved {
        Route::Keyword(kind) | Route::NumericFallback(kind) => run_service(kind, text, pricing),
        Route::Unroutable => {
            info!(event_name = "estimate.guidance.returned", reason = "unroutable", "no service matched");
            EstimateReply::guidance(HELP_TITLE, GuidanceReason::UnroutableText, HELP_MESSAGE)
        }
    }
}

/// parse → require → calculate for a single service.
pub fn run_service(kind: ServiceKind, text: &str, pricing: &PricingConfig) -> EstimateReply {
    let job = parse_job(kind, text);

    let calculated = match job {
        ParsedJob::Mowing(job) => job.require().map(|job| mowing::estimate(job, pricing)),
        ParsedJob::Mulch(job) => job.require().map(|dims| mulch::estimate(dims, pricing)),
        ParsedJob::Sod(job) => job.require().map(|job| sod::estimate(job, pricing)),
        ParsedJob::Gravel(job) => job.require().map(|dims| gravel::estimate(dims, pricing)),
    };

    match calculated {
        Some(Ok(estimate)) => {
            info!(
                event_name = "estimate.computed",
                service = %kind,
                items = estimate.items.len(),
                total = %estimate.total,
                "estimate computed"
            );
            EstimateReply { title: kind.title().to_string(), result: EstimateOutcome::Estimate(estimate) }
        }
        None | Some(Err(EstimateError::ZeroQuantity { .. })) => {
            info!(
                event_name = "estimate.guidance.returned",
                service = %kind,
                reason = "missing_input",
                "required quantity missing"
            );
            EstimateReply::guidance(kind.title(), GuidanceReason::MissingInput(kind), kind.guidance())
        }
        Some(Err(error @ EstimateError::OutOfRange { .. })) => {
            info!(
                event_name = "estimate.guidance.returned",
                service = %kind,
                reason = "out_of_range",
                error = %error,
                "estimate out of range"
            );
            EstimateReply::guidance(kind.title(), GuidanceReason::OutOfRange(kind), error.user_message())
        }
    }
}
