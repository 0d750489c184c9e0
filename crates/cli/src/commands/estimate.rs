use std::path::PathBuf;

use anyhow::{bail, Result};
use landscape_core::config::{AppConfig, LoadOptions};
use landscape_core::engine::{DeterministicEstimateEngine, EstimateEngine, EstimateReply};
use landscape_core::pricing::PricingOverrides;
use serde::Serialize;

use crate::commands::CommandResult;

pub const DISCLAIMER: &str =
    "This is a ballpark estimate. A site visit is required for a firm quote.";

#[derive(Debug, Clone, Default)]
pub struct EstimateArgs {
    pub text: String,
    /// Raw `key=value` pricing overrides.
    pub set: Vec<String>,
    pub json: bool,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EstimatePayload<'a> {
    command: &'static str,
    status: &'static str,
    reply: &'a EstimateReply,
    rendered: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    disclaimer: Option<&'static str>,
}

pub fn run(args: EstimateArgs) -> CommandResult {
    let overrides = match parse_overrides(&args.set) {
        Ok(overrides) => overrides,
        Err(error) => {
            return CommandResult::failure("estimate", "invalid_override", error.to_string(), 2)
        }
    };

    let config = match AppConfig::load(LoadOptions {
        config_path: args.config_path.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("estimate", "config_validation", error.to_string(), 2)
        }
    };

    let engine = DeterministicEstimateEngine::new(config.pricing);
    let reply = engine.estimate(&args.text, &overrides);
    let disclaimer = reply.estimate().map(|_| DISCLAIMER);

    if args.json {
        let payload = EstimatePayload {
            command: "estimate",
            status: "ok",
            reply: &reply,
            rendered: reply.render(),
            disclaimer,
        };
        return match serde_json::to_string_pretty(&payload) {
            Ok(output) => CommandResult::text(output),
            Err(error) => CommandResult::failure("estimate", "serialization", error.to_string(), 1),
        };
    }

    let mut output = reply.render();
    if let Some(disclaimer) = disclaimer {
        output.push_str("\n\n");
        output.push_str(disclaimer);
    }
    CommandResult::text(output)
}

/// Splits `key=value` arguments. Values are decoded leniently; a pair
/// without `=` is a usage error.
pub fn parse_overrides(raw: &[String]) -> Result<PricingOverrides> {
    let mut pairs = Vec::with_capacity(raw.len());
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("pricing override `{entry}` must look like key=value (e.g. mulchPerYd=50)");
        };
        pairs.push((key.trim(), value.trim()));
    }

    Ok(PricingOverrides::from_pairs(pairs))
}
