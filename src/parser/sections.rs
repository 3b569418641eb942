use std::sync::LazyLock;

use regex::Regex;

use super::blocks::ContentBlock;

static TOP_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#\s").unwrap());
static MAJOR_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,2}\s+[^#]").unwrap());
static MAJOR_HEADING_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,2}\s+(.*)").unwrap());

/// When an open section ends.
#[derive(Debug, Clone, Copy)]
pub enum StopRule {
    /// The next `# ` heading.
    NextTopHeading,
    /// A `#`/`##` heading whose line does not mention the given word.
    MajorHeadingWithout(&'static str),
    /// A `#`/`##` heading followed by text.
    MajorHeading,
}

impl StopRule {
    fn stops_at(self, markdown: &str) -> bool {
        match self {
            StopRule::NextTopHeading => TOP_HEADING_RE.is_match(markdown),
            StopRule::MajorHeadingWithout(word) => MAJOR_HEADING_LINE_RE
                .captures(markdown)
                .is_some_and(|caps| !caps[1].to_lowercase().contains(word)),
            StopRule::MajorHeading => MAJOR_HEADING_RE.is_match(markdown),
        }
    }
}

/// A named region of the document: where it starts and when it ends.
#[derive(Debug, Clone, Copy)]
pub struct SectionRule<'a> {
    pub start: &'a Regex,
    pub stop: StopRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionState {
    Outside,
    InSection,
    Done,
}

enum Step {
    Skip,
    Emit,
}

fn transition(state: SectionState, block: &ContentBlock, rule: &SectionRule) -> (SectionState, Step) {
    let markdown = block.markdown();
    let is_start = markdown.is_some_and(|md| rule.start.is_match(md));

    match state {
        SectionState::Outside if is_start => (SectionState::InSection, Step::Skip),
        SectionState::Outside => (SectionState::Outside, Step::Skip),
        // Repeated start headings are consumed, never emitted
        SectionState::InSection if is_start => (SectionState::InSection, Step::Skip),
        SectionState::InSection if markdown.is_some_and(|md| rule.stop.stops_at(md)) => {
            (SectionState::Done, Step::Skip)
        }
        SectionState::InSection => (SectionState::InSection, Step::Emit),
        SectionState::Done => (SectionState::Done, Step::Skip),
    }
}

/// Blocks between the first heading matching `rule.start` and the block that
/// triggers `rule.stop`, or the end of the document. Empty when the heading
/// never appears.
pub fn locate_section<'b>(blocks: &'b [ContentBlock], rule: &SectionRule) -> Vec<&'b ContentBlock> {
    let mut state = SectionState::Outside;
    let mut section = Vec::new();

    for block in blocks {
        let (next, step) = transition(state, block, rule);
        state = next;
        if matches!(step, Step::Emit) {
            section.push(block);
        }
        if state == SectionState::Done {
            break;
        }
    }

    section
}

/// Whether any text block matches the heading pattern.
pub fn has_heading(blocks: &[ContentBlock], start: &Regex) -> bool {
    blocks
        .iter()
        .filter_map(ContentBlock::markdown)
        .any(|md| start.is_match(md))
}

// ── Tests ──
