//! Rendering of lookup results for the command line.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

use crate::cache::Snapshot;
use crate::cli::OutputFormat;
use crate::model::{Color, Variant};
use crate::resolve::{LegacyCode, ResolvedColor, VariantColors};

pub trait TextLine {
    fn text_line(&self) -> String;
}

impl<T: TextLine + ?Sized> TextLine for &T {
    fn text_line(&self) -> String {
        (**self).text_line()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    #[serde(flatten)]
    pub variant: Variant,
    pub resolved_colors: VariantColors,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionView {
    pub variant: String,
    pub number: String,
    pub producer: String,
    pub color: ResolvedColor,
}

pub fn variant_views(snapshot: &Snapshot, variants: &[&Variant]) -> Vec<VariantView> {
    let resolver = snapshot.resolver();
    variants
        .iter()
        .map(|v| VariantView {
            variant: (*v).clone(),
            resolved_colors: resolver.resolve_variant_colors(v),
        })
        .collect()
}

/// One entry per variant numbered `number`; variants that do not list the
/// color are skipped unless none of them do.
pub fn resolutions(snapshot: &Snapshot, number: &str, color_id: &str) -> Vec<ResolutionView> {
    let candidates = snapshot.variants.get_by_number(number);
    let referencing: Vec<&Variant> = candidates
        .iter()
        .copied()
        .filter(|v| v.references_color(color_id))
        .collect();
    let chosen = if referencing.is_empty() {
        candidates
    } else {
        referencing
    };

    let resolver = snapshot.resolver();
    chosen
        .into_iter()
        .map(|v| ResolutionView {
            variant: v.name.clone(),
            number: v.number.to_string(),
            producer: v.producer_name.clone(),
            color: resolver.resolve(v, color_id),
        })
        .collect()
}

pub fn render<T: Serialize + TextLine>(items: &[T], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(items)?,
        OutputFormat::Text => {
            let mut out = String::new();
            for item in items {
                out.push_str(&item.text_line());
                out.push('\n');
            }
            out
        }
    })
}

pub fn write_output(content: &str) {
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
}

impl TextLine for Color {
    fn text_line(&self) -> String {
        let mut line = format!("{}\t{}\t{}", self.id, self.name, self.producer_name);
        if let Some(code) = &self.company_id {
            let _ = write!(line, "\tcode={code}");
        }
        if !self.pre1925_id.is_empty() {
            let _ = write!(line, "\tpre1925={}", self.pre1925_id.join(","));
        }
        if let Some(years) = year_span(self.year_introduced, self.year_last_used) {
            let _ = write!(line, "\tyears={years}");
        }
        line
    }
}

impl TextLine for VariantView {
    fn text_line(&self) -> String {
        let v = &self.variant;
        let mut line = format!("{}\t{}\t{}", v.number, v.name, v.producer_name);
        if let Some(years) = year_span(v.year_introduced, v.year_last_mfg) {
            let _ = write!(line, "\tyears={years}");
        }
        for color in &self.resolved_colors.standard {
            let _ = write!(line, "\n  {}", resolved_text(color));
        }
        for color in &self.resolved_colors.rare {
            let _ = write!(line, "\n  {} (rare)", resolved_text(color));
        }
        if let Some(notes) = &v.notes {
            let _ = write!(line, "\n  note: {notes}");
        }
        line
    }
}

impl TextLine for ResolutionView {
    fn text_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.number,
            self.variant,
            self.producer,
            resolved_text(&self.color)
        )
    }
}

fn resolved_text(color: &ResolvedColor) -> String {
    let mut text = match color.derived_code {
        Some(code) => format!("{code} {}", color.name),
        None => color.name.clone(),
    };
    match &color.legacy_code {
        Some(LegacyCode::Variant(code)) => {
            let _ = write!(text, " [pre-1925 {code}]");
        }
        Some(LegacyCode::Color(codes)) => {
            let _ = write!(text, " [pre-1925 {}]", codes.join(","));
        }
        None => {}
    }
    text
}

fn year_span(from: Option<i32>, to: Option<i32>) -> Option<String> {
    match (from, to) {
        (None, None) => None,
        (Some(a), Some(b)) => Some(format!("{a}-{b}")),
        (Some(a), None) => Some(format!("{a}-?")),
        (None, Some(b)) => Some(format!("?-{b}")),
    }
}
