//! Heuristic article field extraction.
//!
//! Pure functions over raw markup; no I/O. The selector order is a contract
//! with downstream consumers and must not change:
//!
//! | Field   | Source                                                         |
//! |---------|----------------------------------------------------------------|
//! | title   | first `h1` (if non-empty), else `title`, else `""`             |
//! | body    | `p` inside first `article`, else `main p`, else every `p`      |
//! | summary | first four `.`-separated segments of the body                  |

use crate::models::ArticleFields;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Maximum number of sentences kept in a summary.
pub const SUMMARY_SENTENCES: usize = 4;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("static selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("static selector"));
static ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article").expect("static selector"));
static MAIN_P: Lazy<Selector> = Lazy::new(|| Selector::parse("main p").expect("static selector"));
static P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

/// Extract title, body and summary from a full HTML document.
///
/// Absence of any matching structure yields empty fields, never an error.
///
/// # Examples
///
/// ```ignore
/// let f = extract("<h1>Title</h1><article><p>Sentence one.</p><p>Sentence two.</p></article>");
/// assert_eq!(f.title, "Title");
/// assert_eq!(f.body, "Sentence one.\nSentence two.");
/// assert_eq!(f.summary, "Sentence one. Sentence two.");
/// ```
pub fn extract(markup: &str) -> ArticleFields {
    let document = Html::parse_document(markup);
    let title = title_of(&document);
    let body = body_of(&document);
    let summary = summarize(&body);
    ArticleFields {
        title,
        body,
        summary,
    }
}

/// Text of the `<title>` element only, used to confirm a gated page loaded.
pub fn page_title(markup: &str) -> String {
    let document = Html::parse_document(markup);
    first_text(&document, &TITLE)
}

/// First four sentence-like segments of `body`, rejoined with `". "` and a
/// trailing period. Empty body gives an empty summary.
pub fn summarize(body: &str) -> String {
    let sentences: Vec<&str> = body
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(SUMMARY_SENTENCES)
        .collect();
    if sentences.is_empty() {
        String::new()
    } else {
        format!("{}.", sentences.join(". "))
    }
}

fn title_of(document: &Html) -> String {
    let h1 = first_text(document, &H1);
    if !h1.is_empty() {
        return h1;
    }
    first_text(document, &TITLE)
}

fn body_of(document: &Html) -> String {
    let from_article = document
        .select(&ARTICLE)
        .next()
        .map(|article| paragraphs(article.select(&P)))
        .unwrap_or_default();

    let texts = if !from_article.is_empty() {
        from_article
    } else {
        let from_main = paragraphs(document.select(&MAIN_P));
        if !from_main.is_empty() {
            from_main
        } else {
            paragraphs(document.select(&P))
        }
    };
    texts.join("\n")
}

fn paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Visible text of an element: text nodes trimmed, blanks dropped, joined by
/// a single space.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
