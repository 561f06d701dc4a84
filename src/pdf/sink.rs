//! Output strategies behind the page flow controller.
//!
//! [`PdfSink`] is the production strategy: text-run PDF pages via
//! `pdf-writer`, with clickable link annotations and flate-compressed content
//! streams. [`TraceSink`] records every placed span instead, which is what the
//! layout properties are asserted against.
//!
//! Spans arrive in page-relative coordinates with `y` measured down from the
//! top edge; `PdfSink` converts to PDF's bottom-up space when drawing.

use std::sync::Arc;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontSet, FontVariant, RegisteredFont, register_font_set};
use crate::model::LayoutMode;

/// One run of text placed by the flow controller.
pub(crate) struct TextSpan {
    pub(crate) x: f32,
    /// Top of the line, measured from the top of the page.
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) text: String,
    pub(crate) font_pt: f32,
    pub(crate) variant: FontVariant,
    pub(crate) color: [u8; 3],
    pub(crate) link: Option<String>,
}

pub(crate) trait DocumentSink {
    /// Open a fresh page. The first call opens page one.
    fn begin_page(&mut self);
    fn draw_text(&mut self, span: TextSpan);
    /// Filled horizontal rule; `y` is the rule's top edge from the page top.
    fn draw_rule(&mut self, x: f32, y: f32, width: f32, thickness: f32, color: [u8; 3]);
}

struct LinkAnnotation {
    rect: Rect,
    url: String,
}

pub(crate) struct PdfSink {
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_tree_id: Ref,
    mode: LayoutMode,
    fonts: Arc<FontSet>,
    registered: [RegisteredFont; 2],
    closed_pages: Vec<(Content, Vec<LinkAnnotation>)>,
    content: Content,
    links: Vec<LinkAnnotation>,
    page_open: bool,
    // Graphics state trackers, reset per content stream.
    cur_color: Option<[u8; 3]>,
    cur_font: Option<(FontVariant, f32)>,
}

impl PdfSink {
    pub(crate) fn new(mode: LayoutMode, fonts: Arc<FontSet>) -> Self {
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };
        let catalog_id = alloc();
        let pages_tree_id = alloc();
        let registered = register_font_set(&mut pdf, &mut alloc, &fonts);
        Self {
            pdf,
            next_id,
            catalog_id,
            pages_tree_id,
            mode,
            fonts,
            registered,
            closed_pages: Vec::new(),
            content: Content::new(),
            links: Vec::new(),
            page_open: false,
            cur_color: None,
            cur_font: None,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn close_page(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        let links = std::mem::take(&mut self.links);
        self.closed_pages.push((content, links));
    }

    fn pdf_name(&self, variant: FontVariant) -> &str {
        match variant {
            FontVariant::Regular => &self.registered[0].pdf_name,
            FontVariant::Bold => &self.registered[1].pdf_name,
        }
    }

    /// Finalize the document: compress content streams, attach link
    /// annotations, and write the page tree.
    pub(crate) fn finish(mut self) -> Result<(Vec<u8>, usize), Error> {
        if self.page_open {
            self.close_page();
        }
        let pages = std::mem::take(&mut self.closed_pages);
        let n = pages.len();

        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();

        let mut page_annot_refs: Vec<Vec<Ref>> = Vec::with_capacity(n);
        for (_, links) in &pages {
            let mut refs = Vec::with_capacity(links.len());
            for link in links {
                let annot_ref = Ref::new(self.next_id);
                self.next_id += 1;
                let mut annot = self.pdf.annotation(annot_ref);
                annot
                    .subtype(pdf_writer::types::AnnotationType::Link)
                    .rect(link.rect)
                    .border(0.0, 0.0, 0.0, None);
                annot
                    .action()
                    .action_type(pdf_writer::types::ActionType::Uri)
                    .uri(Str(link.url.as_bytes()));
                refs.push(annot_ref);
            }
            page_annot_refs.push(refs);
        }

        for (i, (content, _)) in pages.into_iter().enumerate() {
            let raw = content.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            self.pdf
                .stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_tree_id);
        self.pdf
            .pages(self.pages_tree_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(Rect::new(
                0.0,
                0.0,
                self.mode.page_width_pt,
                self.mode.page_height_pt,
            ))
            .parent(self.pages_tree_id)
            .contents(content_ids[i]);
            if !page_annot_refs[i].is_empty() {
                page.annotations(page_annot_refs[i].iter().copied());
            }
            let mut resources = page.resources();
            let mut font_dict = resources.fonts();
            for reg in &self.registered {
                font_dict.pair(Name(reg.pdf_name.as_bytes()), reg.font_ref);
            }
        }

        Ok((self.pdf.finish(), n))
    }
}

impl DocumentSink for PdfSink {
    fn begin_page(&mut self) {
        if self.page_open {
            self.close_page();
        }
        self.page_open = true;
        self.cur_color = None;
        self.cur_font = None;
    }

    fn draw_text(&mut self, span: TextSpan) {
        let entry = self.fonts.entry(span.variant);
        let baseline = self.mode.page_height_pt - span.y - span.font_pt * entry.ascender_ratio;

        if self.cur_color != Some(span.color) {
            let [r, g, b] = span.color;
            if span.color == [0, 0, 0] {
                self.content.set_fill_gray(0.0);
            } else {
                self.content.set_fill_rgb(
                    r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                );
            }
            self.cur_color = Some(span.color);
        }

        self.content.begin_text();
        if self.cur_font != Some((span.variant, span.font_pt)) {
            let name = self.pdf_name(span.variant).to_string();
            self.content.set_font(Name(name.as_bytes()), span.font_pt);
            self.cur_font = Some((span.variant, span.font_pt));
        }
        self.content.next_line(span.x, baseline);
        self.content.show(Str(&entry.encode(&span.text)));
        self.content.end_text();

        if let Some(url) = &span.link {
            self.links.push(LinkAnnotation {
                rect: Rect::new(
                    span.x,
                    baseline - span.font_pt * 0.2,
                    span.x + span.width,
                    baseline + span.font_pt * 0.8,
                ),
                url: url.clone(),
            });
        }
    }

    fn draw_rule(&mut self, x: f32, y: f32, width: f32, thickness: f32, color: [u8; 3]) {
        let pdf_y = self.mode.page_height_pt - y - thickness;
        let [r, g, b] = color;
        self.content.save_state();
        self.content
            .set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        self.content.rect(x, pdf_y, width, thickness);
        self.content.fill_nonzero();
        self.content.restore_state();
    }
}

/// A span as recorded by the trace strategy. Coordinates match what the flow
/// controller computed: `x` from the left edge, `y` from the top edge.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceSpan {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub text: String,
    pub font_pt: f32,
    pub bold: bool,
    pub color: [u8; 3],
    pub link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceRule {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub thickness: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TracePage {
    pub spans: Vec<TraceSpan>,
    pub rules: Vec<TraceRule>,
}

/// Recorded layout of one render pass: every placed span and rule, per page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutTrace {
    pub pages: Vec<TracePage>,
    pub overflowed: bool,
}

impl LayoutTrace {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All spans across all pages, in placement order.
    pub fn spans(&self) -> impl Iterator<Item = &TraceSpan> {
        self.pages.iter().flat_map(|p| p.spans.iter())
    }
}

#[derive(Default)]
pub(crate) struct TraceSink {
    pub(crate) trace: LayoutTrace,
}

impl DocumentSink for TraceSink {
    fn begin_page(&mut self) {
        self.trace.pages.push(TracePage::default());
    }

    fn draw_text(&mut self, span: TextSpan) {
        if let Some(page) = self.trace.pages.last_mut() {
            page.spans.push(TraceSpan {
                x: span.x,
                y: span.y,
                width: span.width,
                text: span.text,
                font_pt: span.font_pt,
                bold: span.variant == FontVariant::Bold,
                color: span.color,
                link: span.link,
            });
        }
    }

    fn draw_rule(&mut self, x: f32, y: f32, width: f32, thickness: f32, _color: [u8; 3]) {
        if let Some(page) = self.trace.pages.last_mut() {
            page.rules.push(TraceRule {
                x,
                y,
                width,
                thickness,
            });
        }
    }
}
