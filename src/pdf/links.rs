//! Contact-line rendering with clickable runs.
//!
//! A contact line is a single bullet-separated string ("jane@x.dev • ...").
//! Each part becomes its own span so emails and URLs can carry individual
//! link annotations while plain parts stay inert text.

use crate::classify::{BULLET_SEPARATOR, LINK_DOMAIN_FRAGMENTS};
use crate::fonts::FontVariant;

use super::sink::{DocumentSink, TextSpan};
use super::{COLOR_LINK, COLOR_MUTED, PageFlow};

const PART_SPACING_PT: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LinkKind {
    Email,
    Url,
    PlainText,
}

pub(crate) struct LinkRun {
    pub(crate) text: String,
    pub(crate) kind: LinkKind,
    pub(crate) url: Option<String>,
}

/// Split a contact line on the bullet separator and classify each trimmed
/// non-empty part.
pub(crate) fn split_runs(text: &str) -> Vec<LinkRun> {
    text.split(BULLET_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(classify_run)
        .collect()
}

fn classify_run(part: &str) -> LinkRun {
    if part.contains('@') && !part.starts_with("http") {
        return LinkRun {
            text: part.to_string(),
            kind: LinkKind::Email,
            url: Some(format!("mailto:{part}")),
        };
    }
    if part.starts_with("http") {
        return LinkRun {
            text: part.to_string(),
            kind: LinkKind::Url,
            url: Some(part.to_string()),
        };
    }
    if LINK_DOMAIN_FRAGMENTS.iter().any(|frag| part.contains(frag)) {
        return LinkRun {
            text: part.to_string(),
            kind: LinkKind::Url,
            url: Some(format!("https://{part}")),
        };
    }
    LinkRun {
        text: part.to_string(),
        kind: LinkKind::PlainText,
        url: None,
    }
}

impl<S: DocumentSink> PageFlow<'_, S> {
    /// One centered line of contact parts with bullet glyphs between them.
    /// The whole line is placed as-is; contact lines do not wrap.
    pub(crate) fn render_contact_line(&mut self, text: &str) {
        let font_pt = self.mode.small_font_pt;
        let line_h = self.mode.line_height_for(font_pt);
        if !self.ensure_room(line_h) {
            return;
        }

        let entry = self.fonts.entry(FontVariant::Regular);
        let runs = split_runs(text);
        if runs.is_empty() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                let width = entry.text_width(trimmed, font_pt);
                let x = self.mode.margin_pt
                    + (self.mode.content_width(0.0) - width).max(0.0) / 2.0;
                self.sink.draw_text(TextSpan {
                    x,
                    y: self.cursor.y,
                    width,
                    text: trimmed.to_string(),
                    font_pt,
                    variant: FontVariant::Regular,
                    color: COLOR_MUTED,
                    link: None,
                });
            }
            self.cursor.y += line_h;
            return;
        }

        let widths: Vec<f32> = runs
            .iter()
            .map(|run| entry.text_width(&run.text, font_pt))
            .collect();
        let total: f32 =
            widths.iter().sum::<f32>() + PART_SPACING_PT * (runs.len() - 1) as f32;
        let mut x =
            self.mode.margin_pt + (self.mode.content_width(0.0) - total).max(0.0) / 2.0;

        let bullet = BULLET_SEPARATOR.to_string();
        let bullet_w = entry.text_width(&bullet, font_pt);

        for (i, run) in runs.iter().enumerate() {
            let color = match run.kind {
                LinkKind::Email | LinkKind::Url => COLOR_LINK,
                LinkKind::PlainText => COLOR_MUTED,
            };
            self.sink.draw_text(TextSpan {
                x,
                y: self.cursor.y,
                width: widths[i],
                text: run.text.clone(),
                font_pt,
                variant: FontVariant::Regular,
                color,
                link: run.url.clone(),
            });
            x += widths[i];
            if i + 1 < runs.len() {
                self.sink.draw_text(TextSpan {
                    x: x + (PART_SPACING_PT - bullet_w).max(0.0) / 2.0,
                    y: self.cursor.y,
                    width: bullet_w,
                    text: bullet.clone(),
                    font_pt,
                    variant: FontVariant::Regular,
                    color: COLOR_MUTED,
                    link: None,
                });
                x += PART_SPACING_PT;
            }
        }
        self.cursor.y += line_h;
    }
}
