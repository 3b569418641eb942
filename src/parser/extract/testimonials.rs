use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::blocks::ContentBlock;
use crate::parser::sections::{locate_section, SectionRule, StopRule};

static TESTIMONIALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#+\s*Testimonials?").unwrap());
static MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==([^=]+)==").unwrap());
static HIGHLIGHT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<highlight[^>]*>(.*?)</highlight>").unwrap());
static QUOTE_AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^[">]?\s*["“”]?(.+?)["“”]?\s*[—–-]\s*(.+)$"#).unwrap());
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^>\s*(.+)").unwrap());
static LEAD_QUOTE_MARKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^[>"\s]+"#).unwrap());
static LEAD_QUOTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^["\s]+"#).unwrap());
static TRAIL_QUOTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["\s]+$"#).unwrap());
static LEAD_GLYPHS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^["“”']+"#).unwrap());
static TRAIL_GLYPHS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["“”']+$"#).unwrap());
static AUTHOR_DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[—–-]\s*").unwrap());

const LONG_TEXT_CHARS: usize = 50;
const MIN_QUOTE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub highlights: Vec<String>,
}

impl Testimonial {
    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// How one text block inside the section was read.
#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    QuoteWithAuthor { quote: String, name: String },
    Quote(String),
    /// Looked like a quote but too short to keep.
    Dropped,
    /// Candidate author line for the previous quote.
    Author(String),
    Nothing,
}

/// Quotes under a "Testimonial(s)" heading, with optional author and the
/// `==marked==` / `<highlight>` spans they contain.
pub fn extract(blocks: &[ContentBlock]) -> Vec<Testimonial> {
    let rule = SectionRule {
        start: &TESTIMONIALS_RE,
        stop: StopRule::MajorHeading,
    };

    let mut testimonials: Vec<Testimonial> = Vec::new();

    for block in locate_section(blocks, &rule) {
        let Some(markdown) = block.markdown() else {
            continue;
        };
        let text = markdown.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let (text, highlights) = take_highlights(text);

        match parse_block(&text) {
            Parsed::QuoteWithAuthor { quote, name } => testimonials.push(Testimonial {
                quote,
                name: Some(name),
                highlights,
            }),
            Parsed::Quote(quote) => testimonials.push(Testimonial {
                quote,
                name: None,
                highlights,
            }),
            Parsed::Author(name) => {
                if let Some(last) = testimonials.last_mut().filter(|t| !t.has_name()) {
                    last.name = Some(name);
                }
            }
            Parsed::Dropped | Parsed::Nothing => {}
        }
    }

    testimonials
}

/// Collects highlighted spans and strips their markers, keeping the words.
fn take_highlights(text: &str) -> (String, Vec<String>) {
    let mut highlights: Vec<String> = MARK_RE
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .collect();
    let text = MARK_RE.replace_all(text, "$1");

    highlights.extend(
        HIGHLIGHT_TAG_RE
            .captures_iter(&text)
            .map(|c| c[1].trim().to_string()),
    );
    let text = HIGHLIGHT_TAG_RE.replace_all(&text, "$1").into_owned();

    (text, highlights)
}

/// Tries quote-with-author, blockquote, plain quote, then author line.
fn parse_block(text: &str) -> Parsed {
    if let Some(caps) = QUOTE_AUTHOR_RE.captures(text) {
        let quote = LEAD_QUOTE_MARKS_RE.replace(&caps[1], "");
        let quote = TRAIL_QUOTES_RE.replace(&quote, "");
        return Parsed::QuoteWithAuthor {
            quote: quote.trim().to_string(),
            name: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = BLOCKQUOTE_RE.captures(text) {
        let quote = LEAD_QUOTES_RE.replace(&caps[1], "");
        let quote = TRAIL_QUOTES_RE.replace(&quote, "");
        return Parsed::Quote(quote.trim().to_string());
    }

    let len = text.chars().count();
    if text.starts_with('"') || text.starts_with('“') || len > LONG_TEXT_CHARS {
        let clean = LEAD_GLYPHS_RE.replace(text, "");
        let clean = TRAIL_GLYPHS_RE.replace(&clean, "");
        let clean = clean.trim();
        if clean.chars().count() > MIN_QUOTE_CHARS {
            return Parsed::Quote(clean.to_string());
        }
        return Parsed::Dropped;
    }

    if AUTHOR_DASH_RE.is_match(text) || (len < LONG_TEXT_CHARS && !text.contains(" — ")) {
        return Parsed::Author(AUTHOR_DASH_RE.replace(text, "").trim().to_string());
    }

    Parsed::Nothing
}

// ── Tests ──
