//! The closed set of estimable services and how free text is routed to one.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parse::count_numeric_tokens;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Mowing,
    Mulch,
    Sod,
    Gravel,
}

/// Keyword matching order. The first service whose keywords appear in the
/// text wins, however specific a later match would be.
pub const PRIORITY: [ServiceKind; 4] =
    [ServiceKind::Mowing, ServiceKind::Mulch, ServiceKind::Sod, ServiceKind::Gravel];

pub const HELP_TITLE: &str = "Help";

pub const HELP_MESSAGE: &str = "Tell me what to estimate (e.g., 'Mowing 6,000 sq ft', 'Mulch 900 sq ft at 3 inches', 'Sod 1,200 sq ft remove old turf', 'Gravel 800 sq ft 2 inches').";

impl ServiceKind {
    pub fn key(self) -> &'static str {
        match self {
            ServiceKind::Mowing => "mowing",
            ServiceKind::Mulch => "mulch",
            ServiceKind::Sod => "sod",
            ServiceKind::Gravel => "gravel",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ServiceKind::Mowing => "Ballpark mowing estimate:",
            ServiceKind::Mulch => "Ballpark mulch estimate:",
            ServiceKind::Sod => "Ballpark sod estimate:",
            ServiceKind::Gravel => "Ballpark gravel estimate:",
        }
    }

    /// What to ask for when the description is missing a required quantity.
    pub fn guidance(self) -> &'static str {
        match self {
            ServiceKind::Mowing => {
                "For mowing, tell me the lawn area in sq ft. Example: 'Mowing 6,000 sq ft (tight access)'."
            }
            ServiceKind::Mulch => {
                "For mulch, send area (sq ft) and depth (inches). Example: 'Mulch 900 sq ft at 3 inches'."
            }
            ServiceKind::Sod => {
                "For sod, tell me the area in sq ft. Example: 'Sod 1,200 sq ft remove old turf'."
            }
            ServiceKind::Gravel => {
                "For gravel, send area (sq ft) and depth (in). Example: 'Gravel 800 sq ft at 3 inches'."
            }
        }
    }

    pub fn examples(self) -> &'static [&'static str] {
        match self {
            ServiceKind::Mowing => &["Mowing 6,000 sq ft (tight access)", "Mow 12,000 sq ft easy access"],
            ServiceKind::Mulch => &["Mulch 900 sq ft at 3 inches", "Mulch 12x20 beds 2 in"],
            ServiceKind::Sod => &["Sod 1,200 sq ft remove old turf", "Sod 650 sq ft"],
            ServiceKind::Gravel => &["Gravel 800 sq ft 2 inches", "River rock 10 x 30 at 3 in"],
        }
    }

    pub fn matches(self, text: &str) -> bool {
        keyword_pattern(self).is_match(text)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

static MOWING_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mow|mowing|grass|lawn").expect("mowing keyword regex"));
static MULCH_KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)mulch").expect("mulch keyword regex"));
static SOD_KEYWORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)sod").expect("sod keyword regex"));
static GRAVEL_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)gravel|rock|stone").expect("gravel keyword regex"));

fn keyword_pattern(kind: ServiceKind) -> &'static Regex {
    match kind {
        ServiceKind::Mowing => &MOWING_KEYWORDS,
        ServiceKind::Mulch => &MULCH_KEYWORDS,
        ServiceKind::Sod => &SOD_KEYWORDS,
        ServiceKind::Gravel => &GRAVEL_KEYWORDS,
    }
}

/// How a description was matched to a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "via", content = "service", rename_all = "snake_case")]
pub enum Route {
    Keyword(ServiceKind),
    /// No keyword; the count of numbers in the text picked the service.
    NumericFallback(ServiceKind),
    Unroutable,
}

impl Route {
    pub fn service(self) -> Option<ServiceKind> {
        match self {
            Route::Keyword(kind) | Route::NumericFallback(kind) => Some(kind),
            Route::Unroutable => None,
        }
    }
}

/// Two or more numbers read as area and depth (mulch); a single number reads
/// as a lawn area (mowing).
pub fn route(text: &str) -> Route {
    if let Some(kind) = PRIORITY.into_iter().find(|kind| kind.matches(text)) {
        return Route::Keyword(kind);
    }

    match count_numeric_tokens(text) {
        0 => Route::Unroutable,
        1 => Route::NumericFallback(ServiceKind::Mowing),
        _ => Route::NumericFallback(ServiceKind::Mulch),
    }
}

#[cfg(test)]
mod tests {
    use super::{route, Route, ServiceKind, PRIORITY};

    #[test]
    fn priority_order_is_mowing_mulch_sod_gravel() {
        assert_eq!(
            PRIORITY,
            [ServiceKind::Mowing, ServiceKind::Mulch, ServiceKind::Sod, ServiceKind::Gravel]
        );
    }

    #[test]
    fn keywords_route_case_insensitively() {
        assert_eq!(route("MULCH 900 sq ft"), Route::Keyword(ServiceKind::Mulch));
        assert_eq!(route("Lawn 5000"), Route::Keyword(ServiceKind::Mowing));
        assert_eq!(route("sod the yard"), Route::Keyword(ServiceKind::Sod));
        assert_eq!(route("River Rock 200 2"), Route::Keyword(ServiceKind::Gravel));
    }

    #[test]
    fn first_match_wins_over_specificity() {
        assert_eq!(route("mow then mulch 900 3"), Route::Keyword(ServiceKind::Mowing));
        assert_eq!(route("mulch around the stone wall 90 2"), Route::Keyword(ServiceKind::Mulch));
        assert_eq!(route("sod a new lawn 800"), Route::Keyword(ServiceKind::Mowing));
    }

    #[test]
    fn number_count_decides_when_no_keyword_matches() {
        assert_eq!(route("500 900"), Route::NumericFallback(ServiceKind::Mulch));
        assert_eq!(route("front yard 4,000"), Route::NumericFallback(ServiceKind::Mowing));
        assert_eq!(route("what do you charge?"), Route::Unroutable);
        assert_eq!(route("what do you charge?").service(), None);
    }

    #[test]
    fn every_service_has_title_guidance_and_examples() {
        for kind in PRIORITY {
            assert!(kind.title().starts_with("Ballpark "));
            assert!(kind.guidance().contains("Example:"));
            assert!(kind.examples().iter().all(|example| route(example).service() == Some(kind)));
        }
    }
}
