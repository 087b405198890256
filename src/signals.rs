//! Topic and sentiment tagging for digest records.
//!
//! A deliberately small keyword model: topics come from fixed keyword
//! buckets, sentiment from a signed lexicon with a short negation window.
//! Only the title and summary of successful records are scored.

use crate::models::{ArticleRecord, Sentiment};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    [
        // English
        ("gain", 1),
        ("gains", 1),
        ("rally", 2),
        ("rallies", 2),
        ("growth", 1),
        ("record", 1),
        ("strong", 1),
        ("beat", 1),
        ("upgrade", 2),
        ("green", 1),
        ("recovery", 1),
        ("loss", -1),
        ("losses", -1),
        ("weak", -1),
        ("weakness", -1),
        ("fall", -1),
        ("falls", -1),
        ("drop", -1),
        ("drops", -1),
        ("plunge", -2),
        ("crash", -2),
        ("selloff", -2),
        ("downgrade", -2),
        ("recession", -2),
        ("crisis", -2),
        ("risk", -1),
        // Italian
        ("rialzo", 1),
        ("crescita", 1),
        ("guadagni", 1),
        ("ripresa", 1),
        ("forte", 1),
        ("ribasso", -1),
        ("calo", -1),
        ("perdite", -1),
        ("debole", -1),
        ("crollo", -2),
        ("crisi", -2),
        ("recessione", -2),
        ("rischio", -1),
    ]
    .into_iter()
    .collect()
});

static TOPICS: &[(&str, &[&str])] = &[
    (
        "energy",
        &["energy", "energia", "oil", "petrolio", "gas", "opec", "brent", "crude", "greggio"],
    ),
    (
        "rates",
        &["fed", "bce", "ecb", "rates", "tassi", "yield", "yields", "rendimenti", "bond", "obbligazioni"],
    ),
    (
        "equities",
        &["stocks", "equities", "azioni", "borsa", "nasdaq", "dow", "ftse", "dividend", "dividendi"],
    ),
    ("tech", &["tech", "tecnologia", "ai", "semiconductor", "chip", "software"]),
    ("crypto", &["bitcoin", "crypto", "cripto", "ethereum", "blockchain"]),
    (
        "macro",
        &["inflation", "inflazione", "gdp", "pil", "unemployment", "disoccupazione", "recession", "recessione"],
    ),
];

/// Lower-cased alphanumeric tokens.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn is_negator(tok: &str) -> bool {
    matches!(tok, "not" | "no" | "never" | "without" | "non" | "senza" | "mai")
}

/// Lexicon score of `text`. A negator within the previous three tokens
/// flips the sign of a scored word.
pub fn score_text(text: &str) -> i32 {
    let tokens: Vec<String> = tokenize(text).collect();
    let mut score = 0;
    for (i, tok) in tokens.iter().enumerate() {
        let base = LEXICON.get(tok.as_str()).copied().unwrap_or(0);
        if base == 0 {
            continue;
        }
        let negated = (1..=3).any(|k| i >= k && is_negator(&tokens[i - k]));
        score += if negated { -base } else { base };
    }
    score
}

pub fn sentiment_of(text: &str) -> Sentiment {
    match score_text(text) {
        s if s < 0 => Sentiment::Negative,
        s if s > 0 => Sentiment::Positive,
        _ => Sentiment::Neutral,
    }
}

/// Topic buckets whose keywords appear in `text`, in bucket order.
pub fn topics_of(text: &str) -> Vec<String> {
    let tokens: Vec<String> = tokenize(text).collect();
    TOPICS
        .iter()
        .filter(|(_, keywords)| tokens.iter().any(|t| keywords.contains(&t.as_str())))
        .map(|(topic, _)| (*topic).to_string())
        .collect()
}

/// Attach sentiment and topics to a successful record. Failed records are
/// left untouched.
pub fn annotate(record: &mut ArticleRecord) {
    if !record.ok {
        return;
    }
    let text = format!("{} {}", record.title, record.summary);
    record.sentiment = Some(sentiment_of(&text));
    record.topics = topics_of(&text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleFields, FetchOutcome};

    #[test]
    fn test_sentiment_polarity() {
        assert_eq!(sentiment_of("Oil prices plunge on weak demand"), Sentiment::Negative);
        assert_eq!(sentiment_of("Borsa in rialzo, forte crescita"), Sentiment::Positive);
        assert_eq!(sentiment_of("Meeting scheduled for Tuesday"), Sentiment::Neutral);
    }

    #[test]
    fn test_negation_flips_sign() {
        assert_eq!(score_text("no recession"), 2);
        assert_eq!(score_text("not a strong quarter"), -1);
        assert_eq!(score_text("strong"), 1);
    }

    #[test]
    fn test_topics_in_bucket_order() {
        assert_eq!(
            topics_of("Fed holds rates while oil slides and Nasdaq rallies"),
            vec!["energy", "rates", "equities"]
        );
        assert!(topics_of("Lezione introduttiva").is_empty());
    }

    #[test]
    fn test_annotate_success_only() {
        let fields = ArticleFields {
            title: "Petrolio, crollo dei prezzi".into(),
            body: String::new(),
            summary: "Settore energia debole.".into(),
        };
        let mut ok = ArticleRecord::extracted("u", "u", &fields);
        annotate(&mut ok);
        assert_eq!(ok.sentiment, Some(Sentiment::Negative));
        assert_eq!(ok.topics, vec!["energy"]);

        let mut failed = ArticleRecord::failed("u", &FetchOutcome::transport("u", "dns"));
        annotate(&mut failed);
        assert_eq!(failed.sentiment, None);
        assert!(failed.topics.is_empty());
    }
}
