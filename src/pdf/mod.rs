//! Page flow control and document assembly.
//!
//! One render pass owns one [`Cursor`] and walks the content tree depth-first
//! in insertion order, classifying each node and laying it out through a
//! [`DocumentSink`]. In Standard mode overflowing content starts a new page;
//! in Dense mode the first overflow latches the `Overflowed` state, remaining
//! nodes are skipped, and everything already drawn is kept and finalized.

mod layout;
mod links;
mod sink;

use std::sync::Arc;

pub use sink::{LayoutTrace, TracePage, TraceRule, TraceSpan};

use crate::classify::{Role, classify};
use crate::error::Error;
use crate::fonts::{FontSet, FontVariant};
use crate::model::{Align, ColorClass, ContentNode, LayoutMode};
use sink::{DocumentSink, PdfSink, TextSpan, TraceSink};

pub(crate) const COLOR_TEXT: [u8; 3] = [0, 0, 0];
pub(crate) const COLOR_MUTED: [u8; 3] = [102, 102, 102];
pub(crate) const COLOR_LINK: [u8; 3] = [37, 99, 235];
const COLOR_RULE: [u8; 3] = [51, 51, 51];

const NAME_GAP_PT: f32 = 4.0;
const SECTION_GAP_BEFORE_PT: f32 = 8.0;
const SECTION_RULE_GAP_PT: f32 = 5.0;
const ENTRY_GAP_PT: f32 = 1.5;
const BULLET_INDENT_PT: f32 = 14.0;
const BULLET_GLYPH_INSET_PT: f32 = 4.0;
const BULLET_ITEM_GAP_PT: f32 = 2.0;
const LIST_GAP_PT: f32 = 5.0;

const BULLET_GLYPH: &str = "\u{2022}";
const SECTION_RULE_THICKNESS_PT: f32 = 0.7;

/// Mutable render position. One per render call, owned by the flow
/// controller; never shared across renders.
pub(crate) struct Cursor {
    /// Distance from the top edge to the top of the next line.
    pub(crate) y: f32,
    pub(crate) page_index: usize,
}

enum FlowState {
    LayingOut,
    Overflowed,
    Complete,
}

pub(crate) struct PageFlow<'a, S: DocumentSink> {
    sink: &'a mut S,
    mode: &'a LayoutMode,
    fonts: &'a FontSet,
    cursor: Cursor,
    state: FlowState,
    skipped: usize,
}

impl<'a, S: DocumentSink> PageFlow<'a, S> {
    pub(crate) fn new(sink: &'a mut S, mode: &'a LayoutMode, fonts: &'a FontSet) -> Self {
        Self {
            sink,
            mode,
            fonts,
            cursor: Cursor {
                y: mode.margin_pt,
                page_index: 0,
            },
            state: FlowState::LayingOut,
            skipped: 0,
        }
    }

    /// Process the whole tree. Returns true when Dense-mode content
    /// overflowed the single page.
    pub(crate) fn run(mut self, root: &ContentNode) -> bool {
        self.sink.begin_page();
        self.render_node(root);
        match self.state {
            FlowState::Overflowed => {
                if self.skipped > 0 {
                    log::debug!("overflow skipped {} remaining node(s)", self.skipped);
                }
                true
            }
            _ => {
                self.state = FlowState::Complete;
                false
            }
        }
    }

    fn render_node(&mut self, node: &ContentNode) {
        if !matches!(self.state, FlowState::LayingOut) {
            self.skipped += 1;
            return;
        }

        match classify(node) {
            Role::NameHeader => {
                self.layout_text(
                    &node.rendered_text(),
                    self.mode.name_font_pt,
                    FontVariant::Bold,
                    COLOR_TEXT,
                    0.0,
                    Align::Center,
                    None,
                );
                self.advance_gap(NAME_GAP_PT);
            }
            Role::ContactLine => {
                self.render_contact_line(&node.rendered_text());
            }
            Role::SectionHeader => self.render_section_header(node),
            Role::EntryTitle => {
                self.layout_text(
                    &node.rendered_text(),
                    self.mode.title_font_pt,
                    FontVariant::Bold,
                    COLOR_TEXT,
                    0.0,
                    Align::Left,
                    None,
                );
            }
            Role::DateRange => {
                self.layout_text(
                    &node.rendered_text(),
                    self.mode.small_font_pt,
                    FontVariant::Regular,
                    COLOR_MUTED,
                    0.0,
                    Align::Left,
                    None,
                );
                self.advance_gap(ENTRY_GAP_PT);
            }
            Role::BulletList => self.render_bullet_list(node),
            Role::LabeledRow => self.render_labeled_row(node),
            Role::BodyText => {
                let color = match node.hints.color {
                    ColorClass::Muted => COLOR_MUTED,
                    ColorClass::Default => COLOR_TEXT,
                };
                self.layout_text(
                    &node.rendered_text(),
                    self.mode.font_pt(node.hints.size),
                    if node.hints.bold {
                        FontVariant::Bold
                    } else {
                        FontVariant::Regular
                    },
                    color,
                    0.0,
                    node.hints.align,
                    None,
                );
            }
            Role::Generic => {
                // Containers contribute no vertical advance of their own.
                for child in &node.children {
                    self.render_node(child);
                }
            }
        }
    }

    /// Wrap and place a run of text. Returns false only in Dense mode when a
    /// line would not fit; lines emitted before the overflow stay placed.
    pub(crate) fn layout_text(
        &mut self,
        text: &str,
        font_pt: f32,
        variant: FontVariant,
        color: [u8; 3],
        indent_pt: f32,
        align: Align,
        lead_glyph: Option<&str>,
    ) -> bool {
        let entry = self.fonts.entry(variant);
        let max_width = self.mode.content_width(indent_pt);
        let lines = layout::wrap_lines(text, entry, font_pt, max_width);
        let line_h = self.mode.line_height_for(font_pt);

        for (i, line) in lines.iter().enumerate() {
            if !self.ensure_room(line_h) {
                return false;
            }
            let x = match align {
                Align::Left => self.mode.margin_pt + indent_pt,
                Align::Center => {
                    self.mode.margin_pt + indent_pt + (max_width - line.width).max(0.0) / 2.0
                }
            };
            if let (0, Some(glyph)) = (i, lead_glyph) {
                let glyph_entry = self.fonts.entry(FontVariant::Regular);
                self.sink.draw_text(TextSpan {
                    x: self.mode.margin_pt + BULLET_GLYPH_INSET_PT,
                    y: self.cursor.y,
                    width: glyph_entry.text_width(glyph, font_pt),
                    text: glyph.to_string(),
                    font_pt,
                    variant: FontVariant::Regular,
                    color,
                    link: None,
                });
            }
            self.sink.draw_text(TextSpan {
                x,
                y: self.cursor.y,
                width: line.width,
                text: line.text.clone(),
                font_pt,
                variant,
                color,
                link: None,
            });
            self.cursor.y += line_h;
        }
        true
    }

    /// Make room for one more line, starting a new page when the mode allows
    /// it. In Dense mode the first failure latches the overflow state.
    fn ensure_room(&mut self, line_h: f32) -> bool {
        if self.cursor.y + line_h <= self.mode.page_height_pt - self.mode.margin_pt {
            return true;
        }
        if self.mode.allow_multiple_pages {
            self.sink.begin_page();
            self.cursor.y = self.mode.margin_pt;
            self.cursor.page_index += 1;
            log::debug!("page full, continuing on page {}", self.cursor.page_index + 1);
            return true;
        }
        if !matches!(self.state, FlowState::Overflowed) {
            self.state = FlowState::Overflowed;
            log::warn!(
                "content exceeds the single dense page; remaining items are omitted"
            );
        }
        false
    }

    /// Advance the cursor by an inter-block gap. Gaps never trigger page
    /// breaks on their own; a break at the next line resets the position
    /// anyway.
    fn advance_gap(&mut self, gap_pt: f32) {
        let limit = self.mode.page_height_pt - self.mode.margin_pt;
        self.cursor.y = (self.cursor.y + gap_pt).min(limit);
    }

    fn render_section_header(&mut self, node: &ContentNode) {
        if self.cursor.y > self.mode.margin_pt {
            self.advance_gap(SECTION_GAP_BEFORE_PT);
        }
        if !self.layout_text(
            &node.rendered_text(),
            self.mode.section_font_pt,
            FontVariant::Bold,
            COLOR_TEXT,
            0.0,
            Align::Left,
            None,
        ) {
            return;
        }
        self.sink.draw_rule(
            self.mode.margin_pt,
            self.cursor.y + 1.0,
            self.mode.content_width(0.0),
            SECTION_RULE_THICKNESS_PT,
            COLOR_RULE,
        );
        self.advance_gap(SECTION_RULE_GAP_PT);
    }

    fn render_bullet_list(&mut self, node: &ContentNode) {
        for item in &node.children {
            if item.is_empty() {
                continue;
            }
            let ok = self.layout_text(
                &item.rendered_text(),
                self.mode.font_pt(item.hints.size),
                FontVariant::Regular,
                COLOR_TEXT,
                BULLET_INDENT_PT,
                Align::Left,
                Some(BULLET_GLYPH),
            );
            if !ok {
                return;
            }
            self.advance_gap(BULLET_ITEM_GAP_PT);
        }
        self.advance_gap(LIST_GAP_PT);
    }

    /// All inline-span children on exactly one left-aligned line: bold label
    /// spans and plain value spans concatenated, with a single space before
    /// non-bold spans after the first.
    fn render_labeled_row(&mut self, node: &ContentNode) {
        let font_pt = self.mode.body_font_pt;
        let line_h = self.mode.line_height_for(font_pt);
        if !self.ensure_room(line_h) {
            return;
        }

        let mut x = self.mode.margin_pt;
        let mut placed = 0usize;
        for span in &node.children {
            let text = span.rendered_text();
            if text.trim().is_empty() {
                continue;
            }
            let variant = if span.hints.bold {
                FontVariant::Bold
            } else {
                FontVariant::Regular
            };
            let entry = self.fonts.entry(variant);
            if placed > 0 && !span.hints.bold {
                x += entry.space_width(font_pt);
            }
            let width = entry.text_width(&text, font_pt);
            self.sink.draw_text(TextSpan {
                x,
                y: self.cursor.y,
                width,
                text,
                font_pt,
                variant,
                color: COLOR_TEXT,
                link: None,
            });
            x += width;
            placed += 1;
        }
        self.cursor.y += line_h;
        self.advance_gap(ENTRY_GAP_PT);
    }
}

/// Finalized render output. The caller owns it outright; the renderer keeps
/// no reference once it returns.
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Dense mode only: true when content was cut at the page boundary.
    pub overflowed: bool,
}

impl RenderedDocument {
    /// Write the document to disk.
    pub fn save(&self, path: &std::path::Path) -> Result<(), Error> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

// Summarize the byte buffer instead of dumping it.
impl std::fmt::Debug for RenderedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedDocument")
            .field("byte_len", &self.bytes.len())
            .field("page_count", &self.page_count)
            .field("overflowed", &self.overflowed)
            .finish()
    }
}

pub(crate) fn render_document(
    root: &ContentNode,
    mode: &LayoutMode,
    fonts: Arc<FontSet>,
) -> Result<RenderedDocument, Error> {
    let mut sink = PdfSink::new(*mode, Arc::clone(&fonts));
    let overflowed = PageFlow::new(&mut sink, mode, fonts.as_ref()).run(root);
    let (bytes, page_count) = sink.finish()?;
    Ok(RenderedDocument {
        bytes,
        page_count,
        overflowed,
    })
}

pub(crate) fn trace_document(root: &ContentNode, mode: &LayoutMode, fonts: &FontSet) -> LayoutTrace {
    let mut sink = TraceSink::default();
    let overflowed = PageFlow::new(&mut sink, mode, fonts).run(root);
    let mut trace = sink.trace;
    trace.overflowed = overflowed;
    trace
}
