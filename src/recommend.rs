//! Rule-based advisory text.
//!
//! Each rule is a pure predicate over the digest and the news snapshot.
//! Rules are independent and emitted in declaration order; when none fires
//! a single default advisory is returned.

use crate::models::{DigestResult, NewsSnapshot, Sentiment};

pub const ENERGY_CAUTION: &str =
    "Energy looks weak: consider tighter stop-losses on energy names.";
pub const RATE_CAUTION: &str =
    "Rates: keep a prudent profile; avoid adding leverage until the yield picture improves.";
pub const NO_URGENT_ACTION: &str = "No urgent action. Keep a conservative stance.";

type Rule = fn(&DigestResult, &NewsSnapshot) -> Option<&'static str>;

const RULES: [Rule; 2] = [energy_weakness, rate_policy];

fn energy_weakness(digest: &DigestResult, _news: &NewsSnapshot) -> Option<&'static str> {
    digest
        .items
        .iter()
        .any(|i| i.sentiment == Some(Sentiment::Negative) && i.topics.iter().any(|t| t == "energy"))
        .then_some(ENERGY_CAUTION)
}

fn rate_policy(_digest: &DigestResult, news: &NewsSnapshot) -> Option<&'static str> {
    news.items
        .iter()
        .any(|i| i.tags.iter().any(|t| t == "fed"))
        .then_some(RATE_CAUTION)
}

pub fn recommend(digest: &DigestResult, news: &NewsSnapshot) -> Vec<String> {
    let mut recs: Vec<String> = RULES
        .iter()
        .filter_map(|rule| rule(digest, news))
        .map(str::to_string)
        .collect();
    if recs.is_empty() {
        recs.push(NO_URGENT_ACTION.to_string());
    }
    recs
}
