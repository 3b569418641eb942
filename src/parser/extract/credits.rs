use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::blocks::{CellValue, ContentBlock, TableRow};
use crate::parser::sections::{locate_section, SectionRule, StopRule};

static CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#+\s*(Other\s*)?Credits").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|?\s*[-:]+\s*\|").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+").unwrap());
static LINK_CELL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());
static NAME_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static HTTP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credit {
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Credit {
    fn new(name: String, role: String, link: Option<String>) -> Self {
        // Only absolute http(s) links are kept
        let link = link.filter(|l| HTTP_RE.is_match(l));
        Credit { name, role, link }
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    name: Option<usize>,
    role: Option<usize>,
    link: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Self {
        let find = |keys: &[&str]| headers.iter().position(|h| keys.iter().any(|k| h.contains(k)));
        Columns {
            name: find(&["name"]),
            role: find(&["role"]),
            link: find(&["link", "portfolio", "social"]),
        }
    }

    fn name_idx(&self) -> usize {
        self.name.unwrap_or(0)
    }

    fn role_idx(&self) -> usize {
        self.role.unwrap_or(1)
    }

    fn link_idx(&self) -> usize {
        self.link.unwrap_or(2)
    }
}

/// Header state shared by every table in the credits section.
#[derive(Default)]
struct TableState {
    headers: Vec<String>,
}

impl TableState {
    fn columns(&self) -> Columns {
        Columns::from_headers(&self.headers)
    }
}

/// Credits rows from native tables and markdown pipe tables under the
/// "Credits" / "Other Credits" heading.
pub fn extract(blocks: &[ContentBlock]) -> Vec<Credit> {
    let rule = SectionRule {
        start: &CREDITS_RE,
        stop: StopRule::MajorHeadingWithout("credit"),
    };

    let mut state = TableState::default();
    let mut credits = Vec::new();

    for block in locate_section(blocks, &rule) {
        if let Some(rows) = block.table_rows() {
            credits.extend(parse_table(rows, &mut state));
        } else if let Some(markdown) = block.markdown() {
            credits.extend(parse_markdown_table(markdown, &mut state));
        }
    }

    credits
}

fn parse_table(rows: &[TableRow], state: &mut TableState) -> Vec<Credit> {
    let mut credits = Vec::new();
    let Some((header, body)) = rows.split_first() else {
        return credits;
    };

    state.headers = header.cells().iter().map(|c| c.header_text().to_lowercase()).collect();
    let cols = state.columns();

    for row in body {
        let cells = row.cells();
        let text_at = |idx: usize| cells.get(idx).map(CellValue::text).unwrap_or_default();

        let name = text_at(cols.name_idx());
        let role = text_at(cols.role_idx());
        let link = cells
            .get(cols.link_idx())
            .and_then(CellValue::link)
            .map(str::to_string)
            .or_else(|| cols.link.map(text_at).filter(|t| !t.is_empty()));

        if name.is_empty() || name.to_lowercase() == "name" {
            continue;
        }
        credits.push(Credit::new(name, role, link));
    }

    credits
}

fn parse_markdown_table(markdown: &str, state: &mut TableState) -> Vec<Credit> {
    let mut credits = Vec::new();

    for line in markdown.split('\n').filter(|l| !l.trim().is_empty()) {
        if SEPARATOR_RE.is_match(line) || HEADING_RE.is_match(line) || !line.contains('|') {
            continue;
        }

        let cells: Vec<&str> = line.split('|').map(str::trim).filter(|c| !c.is_empty()).collect();
        if cells.len() < 2 {
            continue;
        }

        if state.headers.is_empty() {
            state.headers = cells
                .iter()
                .map(|h| h.replace("**", "").to_lowercase().trim().to_string())
                .collect();
            continue;
        }

        if let Some(credit) = parse_markdown_row(&cells, state.columns()) {
            credits.push(credit);
        }
    }

    credits
}

fn parse_markdown_row(cells: &[&str], cols: Columns) -> Option<Credit> {
    let mut name = cells.get(cols.name_idx()).copied().unwrap_or_default().to_string();
    let role = cells.get(cols.role_idx()).copied().unwrap_or_default().to_string();
    let link_cell = cols.link.and_then(|idx| cells.get(idx)).copied().unwrap_or_default();

    let mut link = if let Some(caps) = LINK_CELL_RE.captures(link_cell) {
        Some(caps[2].to_string())
    } else if HTTP_RE.is_match(link_cell) {
        Some(link_cell.to_string())
    } else {
        None
    };

    if let Some(caps) = NAME_LINK_RE.captures(&name) {
        if link.is_none() {
            link = Some(caps[2].to_string());
        }
        name = caps[1].to_string();
    }

    // Header-repeat guard
    if name.is_empty() || name.to_lowercase().contains("name") {
        return None;
    }
    Some(Credit::new(name, role, link))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blocks(value: serde_json::Value) -> Vec<ContentBlock> {
        serde_json::from_value(value).unwrap()
    }

    fn credit(name: &str, role: &str, link: Option<&str>) -> Credit {
        Credit {
            name: name.into(),
            role: role.into(),
            link: link.map(Into::into),
        }
    }

    #[test]
    fn markdown_pipe_table() {
        let b = vec![
            ContentBlock::text("# Credits"),
            ContentBlock::text("| Name | Role | Link |\n|---|---|---|\n| Jane Doe | Colorist | https://jane.example |"),
        ];
        assert_eq!(
            extract(&b),
            vec![credit("Jane Doe", "Colorist", Some("https://jane.example"))]
        );
    }

    #[test]
    fn markdown_links_in_cells() {
        let b = vec![
            ContentBlock::text("## Other Credits"),
            ContentBlock::text(
                "| **Role** | **Name** | **Portfolio** |\n\
                 | --- | --- | --- |\n\
                 | Director | [Sam Lee](https://sam.example) | |\n\
                 | Sound | Ana Ruiz | [site](https://ana.example) |\n\
                 | Grip | [Bo](https://bo.example) | [ig](https://instagram.com/bo) |",
            ),
        ];
        assert_eq!(
            extract(&b),
            vec![
                credit("Sam Lee", "Director", Some("https://sam.example")),
                credit("Ana Ruiz", "Sound", Some("https://ana.example")),
                credit("Bo", "Grip", Some("https://instagram.com/bo")),
            ]
        );
    }

    #[test]
    fn markdown_without_link_column() {
        let b = vec![
            ContentBlock::text("# Credits"),
            ContentBlock::text("| Person | Job |\n| A. Smith | Gaffer |"),
        ];
        // No "name"/"role" headers: positional columns
        assert_eq!(extract(&b), vec![credit("A. Smith", "Gaffer", None)]);
    }

    #[test]
    fn markdown_skips_headings_and_repeated_headers() {
        let b = vec![
            ContentBlock::text("# Credits"),
            ContentBlock::text("### Crew\n| Name | Role |\n| Jo | Editor |"),
            ContentBlock::text("| Name | Role |\n| Kim | Colorist |"),
        ];
        assert_eq!(
            extract(&b),
            vec![credit("Jo", "Editor", None), credit("Kim", "Colorist", None)]
        );
    }

    #[test]
    fn relative_links_are_dropped() {
        let b = vec![
            ContentBlock::text("# Credits"),
            ContentBlock::text("| Name | Role | Link |\n| Jo | Editor | [x](/people/jo) |"),
        ];
        assert_eq!(extract(&b), vec![credit("Jo", "Editor", None)]);
    }

    #[test]
    fn native_table() {
        let b = blocks(json!([
            {"type": "text", "markdown": "# Other Credits"},
            {"type": "table", "rows": [
                {"cells": [{"value": "Name"}, {"value": "Role"}, {"value": "Social"}]},
                {"cells": [{"value": "Jane"}, {"value": "Producer"}, {"value": "ig", "url": "https://instagram.com/jane"}]},
                {"cells": [{"text": "Max"}, "Editor", "https://max.example"]},
                {"cells": ["", "Nobody", ""]},
                {"cells": ["name", "role", "link"]},
                {"cells": [{"markdown": "Lu"}, "Runner", "not a url"]},
            ]},
        ]));
        assert_eq!(
            extract(&b),
            vec![
                credit("Jane", "Producer", Some("https://instagram.com/jane")),
                credit("Max", "Editor", Some("https://max.example")),
                credit("Lu", "Runner", None),
            ]
        );
    }

    #[test]
    fn native_table_positional_defaults() {
        let b = blocks(json!([
            {"type": "text", "markdown": "# Credits"},
            {"type": "table", "rows": [
                ["Who", "What", "Where"],
                ["Ana", "DP", {"text": "site", "link": "https://ana.example"}],
                ["Ben", "AC", "https://ben.example"],
            ]},
        ]));
        // Link text fallback only applies to a recognised link column
        assert_eq!(
            extract(&b),
            vec![
                credit("Ana", "DP", Some("https://ana.example")),
                credit("Ben", "AC", None),
            ]
        );
    }

    #[test]
    fn markdown_only_header_cells_are_unlabelled() {
        let b = blocks(json!([
            {"type": "text", "markdown": "# Credits"},
            {"type": "table", "rows": [
                [{"markdown": "Role"}, {"markdown": "Name"}],
                ["Ana", "DP"],
            ]},
        ]));
        assert_eq!(extract(&b), vec![credit("Ana", "DP", None)]);
    }

    #[test]
    fn section_ends_at_unrelated_heading() {
        let b = vec![
            ContentBlock::text("# Credits"),
            ContentBlock::text("| Name | Role |\n| Jo | Editor |"),
            ContentBlock::text("# Testimonials"),
            ContentBlock::text("| Name | Role |\n| Not | Credited |"),
        ];
        assert_eq!(extract(&b), vec![credit("Jo", "Editor", None)]);
    }

    #[test]
    fn no_section_no_credits() {
        let b = vec![ContentBlock::text("| Name | Role |\n| Jo | Editor |")];
        assert!(extract(&b).is_empty());
    }
}
