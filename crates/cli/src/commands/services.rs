use landscape_core::registry::{ServiceKind, HELP_MESSAGE, PRIORITY};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ServiceEntry {
    priority: usize,
    service: ServiceKind,
    title: &'static str,
    guidance: &'static str,
    examples: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct ServiceCatalog {
    services: Vec<ServiceEntry>,
    help: &'static str,
}

fn catalog() -> ServiceCatalog {
    let services = PRIORITY
        .into_iter()
        .enumerate()
        .map(|(index, kind)| ServiceEntry {
            priority: index + 1,
            service: kind,
            title: kind.title(),
            guidance: kind.guidance(),
            examples: kind.examples(),
        })
        .collect();

    ServiceCatalog { services, help: HELP_MESSAGE }
}

pub fn run(json_output: bool) -> CommandResult {
    let catalog = catalog();

    if json_output {
        return match serde_json::to_string_pretty(&catalog) {
            Ok(output) => CommandResult::text(output),
            Err(error) => CommandResult::failure("services", "serialization", error.to_string(), 1),
        };
    }

    CommandResult::text(render_human(&catalog))
}

fn render_human(catalog: &ServiceCatalog) -> String {
    let mut lines = vec!["services (first keyword match wins, in this order):".to_string()];
    for entry in &catalog.services {
        lines.push(format!("{}. {} ({})", entry.priority, entry.service, entry.title));
        for example in entry.examples {
            lines.push(format!("   e.g. {example}"));
        }
    }
    lines.push(String::new());
    lines.push(
        "Text with no keyword is read by its numbers: two or more go to mulch, one goes to mowing."
            .to_string(),
    );
    lines.join("\n")
}
