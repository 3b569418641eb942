use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::WorkItem;
use crate::parser::extract::media::{self, HeroMedia};
use crate::parser::extract::WorkDetail;

/// One row of the landing/works listing.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSummary {
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub roles: Vec<String>,
    pub cover_image: Option<String>,
}

impl From<&WorkItem> for WorkSummary {
    fn from(work: &WorkItem) -> Self {
        WorkSummary {
            id: work.id.clone(),
            title: work.display_title().to_string(),
            year: work.properties.year_of_release(),
            roles: work.properties.roles(),
            cover_image: media::cover_image(work),
        }
    }
}

/// Where derived views end up.
pub trait RenderTarget {
    fn listing(&mut self, heading: &str, works: &[WorkSummary]) -> Result<()>;
    fn roles(&mut self, roles: &[String]) -> Result<()>;
    fn detail(&mut self, detail: &WorkDetail) -> Result<()>;
    fn not_found(&mut self, id: Option<&str>) -> Result<()>;
}

/// Plain text for a terminal.
pub struct TextTarget<W: Write> {
    out: W,
}

impl<W: Write> TextTarget<W> {
    pub fn new(out: W) -> Self {
        TextTarget { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn section(&mut self, label: &str, body: &str) -> Result<()> {
        if !body.is_empty() {
            writeln!(self.out, "\n{}\n{}\n{}", label, "-".repeat(label.len()), body)?;
        }
        Ok(())
    }
}

impl<W: Write> RenderTarget for TextTarget<W> {
    fn listing(&mut self, heading: &str, works: &[WorkSummary]) -> Result<()> {
        if works.is_empty() {
            writeln!(self.out, "No works found.")?;
            return Ok(());
        }
        writeln!(self.out, "{}", heading)?;
        writeln!(self.out, "{:<24} | {:<32} | {:<4} | {}", "ID", "Title", "Year", "Roles")?;
        writeln!(self.out, "{}", "-".repeat(80))?;
        for w in works {
            writeln!(
                self.out,
                "{:<24} | {:<32} | {:<4} | {}",
                truncate(&w.id, 24),
                truncate(&w.title, 32),
                w.year.as_deref().unwrap_or("-"),
                w.roles.join(", ")
            )?;
        }
        writeln!(self.out, "\n{} works", works.len())?;
        Ok(())
    }

    fn roles(&mut self, roles: &[String]) -> Result<()> {
        writeln!(self.out, "all")?;
        for role in roles {
            writeln!(self.out, "{}", role)?;
        }
        Ok(())
    }

    fn detail(&mut self, d: &WorkDetail) -> Result<()> {
        writeln!(self.out, "{}", d.title)?;
        writeln!(self.out, "{}", "=".repeat(d.title.chars().count()))?;

        let mut meta = Vec::new();
        if let Some(year) = &d.year {
            meta.push(format!("Year: {}", year));
        }
        if let Some(client) = &d.client {
            meta.push(format!("Client: {}", client));
        }
        if !d.genres.is_empty() {
            meta.push(format!("Genre: {}", d.genres.join(", ")));
        }
        if !meta.is_empty() {
            writeln!(self.out, "{}", meta.join(" | "))?;
        }
        if !d.roles.is_empty() {
            writeln!(self.out, "Roles: {}", d.roles.join(", "))?;
        }
        match &d.hero {
            Some(HeroMedia::Video(url)) => writeln!(self.out, "Video: {}", url)?,
            Some(HeroMedia::Image(url)) => writeln!(self.out, "Image: {}", url)?,
            None => {}
        }

        self.section("About", &d.description)?;
        self.section("Challenge", &d.challenge)?;
        self.section("Result", &d.result)?;

        if let Some(blog) = &d.blog_url {
            self.section("Blog", blog)?;
        }

        let credits = d
            .credits
            .iter()
            .map(|c| match &c.link {
                Some(link) => format!("{} ({}) <{}>", c.name, c.role, link),
                None => format!("{} ({})", c.name, c.role),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.section("Credits", &credits)?;

        let testimonials = d
            .testimonials
            .iter()
            .map(|t| match &t.name {
                Some(name) => format!("\"{}\"\n  — {}", t.quote, name),
                None => format!("\"{}\"", t.quote),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.section("Testimonials", &testimonials)?;

        self.section("Gallery", &d.gallery.join("\n"))?;
        Ok(())
    }

    fn not_found(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => writeln!(self.out, "Work not found: {}", id)?,
            None => writeln!(self.out, "Unable to load work: no id given")?,
        }
        Ok(())
    }
}

/// Pretty JSON, one document per call.
pub struct JsonTarget<W: Write> {
    out: W,
}

impl<W: Write> JsonTarget<W> {
    pub fn new(out: W) -> Self {
        JsonTarget { out }
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> RenderTarget for JsonTarget<W> {
    fn listing(&mut self, _heading: &str, works: &[WorkSummary]) -> Result<()> {
        self.emit(works)
    }

    fn roles(&mut self, roles: &[String]) -> Result<()> {
        self.emit(roles)
    }

    fn detail(&mut self, detail: &WorkDetail) -> Result<()> {
        self.emit(detail)
    }

    fn not_found(&mut self, id: Option<&str>) -> Result<()> {
        self.emit(&serde_json::json!({ "error": "not_found", "id": id }))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}
