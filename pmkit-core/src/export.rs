//! Document export: Markdown, or HTML saved with a `.doc` extension.

use serde::{Deserialize, Serialize};

use crate::models::{DocumentRecord, FlatDocument};
use crate::validation::is_blank;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Doc,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Markdown => "markdown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "doc" | "word" => Some(Self::Doc),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Doc => "application/msword",
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: String,
    pub body: String,
}

pub fn export_document<T: FlatDocument>(
    record: &DocumentRecord<T>,
    format: ExportFormat,
) -> ExportedDocument {
    let heading = record.body.heading();
    let body = match format {
        ExportFormat::Doc => render_html(&heading, &record.body),
        ExportFormat::Markdown => render_markdown(&heading, &record.body),
    };

    ExportedDocument {
        filename: format!("{}.{}", slugify(&heading), format.extension()),
        content_type: format.content_type().to_string(),
        body,
    }
}

/// Labelled sections for every non-empty field, in declared order.
fn sections<T: FlatDocument>(body: &T) -> Vec<(&'static str, String)> {
    T::FIELDS
        .iter()
        .zip(body.values())
        .filter(|(_, value)| !is_blank(value))
        .map(|(field, value)| (field.label, value))
        .collect()
}

pub fn render_markdown<T: FlatDocument>(heading: &str, body: &T) -> String {
    let mut out = format!("# {}\n\n_{}_\n", heading, T::TITLE);
    for (label, value) in sections(body) {
        out.push_str(&format!("\n## {}\n\n{}\n", label, value.trim()));
    }
    out
}

pub fn render_html<T: FlatDocument>(heading: &str, body: &T) -> String {
    let mut out = String::from(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\">\n<head><meta charset=\"utf-8\">",
    );
    out.push_str(&format!("<title>{}</title></head>\n<body>\n", escape_html(heading)));
    out.push_str(&format!("<h1>{}</h1>\n<p><em>{}</em></p>\n", escape_html(heading), T::TITLE));
    for (label, value) in sections(body) {
        let paragraphs: Vec<String> = value
            .trim()
            .lines()
            .map(|line| format!("<p>{}</p>", escape_html(line)))
            .collect();
        out.push_str(&format!("<h2>{}</h2>\n{}\n", escape_html(label), paragraphs.join("\n")));
    }
    out.push_str("</body>\n</html>\n");
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn slugify(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    }
}
