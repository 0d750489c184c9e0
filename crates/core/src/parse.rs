//! Heuristic quantity extraction from short job descriptions.
//!
//! Parsers never fail. A field that could not be found is `None`; a field
//! that was written as `0` is `Some(0)` and left for the calculator to reject.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::job::{Access, DimensionJob, MowingJob, ParsedJob, SodJob};
use crate::registry::ServiceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericToken {
    pub value: Decimal,
    /// Byte offset of the token in the text it was read from.
    pub start: usize,
}

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,.]*").expect("number regex"));
static AREA_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d[\d,.]*)\s*(?:sq\.?\s*ft|sqft|square\s+feet|sf\b|ft²)").expect("area unit regex")
});
static RECTANGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d[\d,.]*)\s*(?:ft|')?\s*[x×]\s*(\d[\d,.]*)").expect("rectangle regex")
});
static DEPTH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\d[\d,.]*)\s*(?:(?:inches|inch|in)\b|")"#).expect("depth unit regex")
});
static TURF_REMOVAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)remove|tear ?out|rip ?out|haul|old\s*turf").expect("turf removal regex")
});
static EASY_ACCESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)easy").expect("easy access regex"));
static TIGHT_ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tight|gate|stairs|steep|obstacle").expect("tight access regex"));

/// Reads a raw token such as `1,200` or `3.5.` as a number. Commas are
/// thousands separators; anything after the first `digits[.digits]` run is
/// dropped.
pub fn token_value(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|ch| *ch != ',').collect();
    let integer_end = cleaned.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(cleaned.len());
    if integer_end == 0 {
        return None;
    }

    let mut end = integer_end;
    if let Some(fraction) = cleaned[integer_end..].strip_prefix('.') {
        let digits = fraction.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(fraction.len());
        if digits > 0 {
            end = integer_end + 1 + digits;
        }
    }

    cleaned[..end].parse::<Decimal>().ok()
}

/// Every numeric token in reading order. Tokens too large to represent are
/// skipped.
pub fn numeric_tokens(text: &str) -> Vec<NumericToken> {
    NUMBER
        .find_iter(text)
        .filter_map(|found| {
            token_value(found.as_str()).map(|value| NumericToken { value, start: found.start() })
        })
        .collect()
}

/// Counts numeric-looking runs, whether or not they are representable.
pub fn count_numeric_tokens(text: &str) -> usize {
    NUMBER.find_iter(text).count()
}

pub fn parse_job(kind: ServiceKind, text: &str) -> ParsedJob {
    match kind {
        ServiceKind::Mowing => ParsedJob::Mowing(parse_mowing(text)),
        ServiceKind::Mulch => ParsedJob::Mulch(parse_dimensions(text)),
        ServiceKind::Sod => ParsedJob::Sod(parse_sod(text)),
        ServiceKind::Gravel => ParsedJob::Gravel(parse_dimensions(text)),
    }
}

/// Area and depth for mulch and gravel.
///
/// Area prefers a number tagged with an area unit, then an `L x W`
/// rectangle, then the first number. Depth is the first number tagged with
/// an inch unit, whether or not the area also read it; without one, it is
/// the first number the area did not use.
pub fn parse_dimensions(text: &str) -> DimensionJob {
    let lowered = text.to_lowercase();
    let tokens = numeric_tokens(&lowered);

    let Some((area, consumed)) = area_with_unit(&lowered)
        .or_else(|| area_from_rectangle(&lowered))
        .or_else(|| tokens.first().map(|token| (token.value, vec![token.start])))
    else {
        return DimensionJob::default();
    };

    let depth = if tokens.len() < 2 {
        None
    } else {
        depth_with_unit(&lowered).or_else(|| {
            tokens.iter().find(|token| !consumed.contains(&token.start)).map(|token| token.value)
        })
    };

    DimensionJob { area_sq_ft: Some(area), depth_inches: depth }
}

fn area_with_unit(text: &str) -> Option<(Decimal, Vec<usize>)> {
    let captures = AREA_UNIT.captures(text)?;
    let number = captures.get(1)?;
    let value = token_value(number.as_str())?;
    Some((value, vec![number.start()]))
}

fn area_from_rectangle(text: &str) -> Option<(Decimal, Vec<usize>)> {
    let captures = RECTANGLE.captures(text)?;
    let length = captures.get(1)?;
    let width = captures.get(2)?;
    let area = token_value(length.as_str())?.checked_mul(token_value(width.as_str())?)?;
    Some((area, vec![length.start(), width.start()]))
}

fn depth_with_unit(text: &str) -> Option<Decimal> {
    DEPTH_UNIT
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .find_map(|number| token_value(number.as_str()))
}

pub fn parse_sod(text: &str) -> SodJob {
    SodJob {
        area_sq_ft: numeric_tokens(text).first().map(|token| token.value),
        remove_old_turf: TURF_REMOVAL.is_match(text),
    }
}

pub fn parse_mowing(text: &str) -> MowingJob {
    let mut access = Access::Normal;
    if EASY_ACCESS.is_match(text) {
        access = Access::Easy;
    }
    if TIGHT_ACCESS.is_match(text) {
        access = Access::Tight;
    }

    MowingJob { area_sq_ft: numeric_tokens(text).first().map(|token| token.value), access }
}
