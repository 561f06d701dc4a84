//! Resume preview-tree to PDF renderer.
//!
//! Input is a styled content tree (built from resume data by
//! [`resume::master_preview_tree`] or [`resume::tailored_preview_tree`], or
//! constructed directly). Each node's presentational hints are classified into
//! a semantic role, then a single flow pass lays the tree out and draws it
//! through `pdf-writer`. Two layout modes exist: [`LayoutMode::standard`]
//! flows across as many pages as needed, [`LayoutMode::dense`] compresses
//! everything onto one page and drops what does not fit.

pub mod classify;
mod error;
pub mod fonts;
pub mod model;
mod pdf;
pub mod resume;

pub use classify::{Role, classify};
pub use error::Error;
pub use fonts::{FontLoader, FontSource, LoadState};
pub use model::{Align, ColorClass, ContentNode, FontSizeClass, LayoutMode, StyleHints, Tag};
pub use pdf::{LayoutTrace, RenderedDocument, TracePage, TraceRule, TraceSpan};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Render a preview tree with the built-in Helvetica metrics.
pub fn render(root: &ContentNode, mode: &LayoutMode) -> Result<RenderedDocument, Error> {
    render_with_fonts(root, mode, FontLoader::shared(), &FontSource::Builtin)
}

/// Render a preview tree with fonts resolved through `loader`. Fails with
/// [`Error::DependencyUnavailable`] before any layout work when the font
/// resources cannot be loaded.
pub fn render_with_fonts(
    root: &ContentNode,
    mode: &LayoutMode,
    loader: &FontLoader,
    source: &FontSource,
) -> Result<RenderedDocument, Error> {
    let t0 = Instant::now();

    let fonts = loader.get(source)?;
    let t_fonts = t0.elapsed();

    let doc = pdf::render_document(root, mode, Arc::clone(&fonts))?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: fonts={:.1}ms, render={:.1}ms, total={:.1}ms ({} page(s), {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_total - t_fonts).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.page_count,
        doc.bytes.len(),
    );

    Ok(doc)
}

/// Render a preview tree and write the PDF to `output`.
pub fn render_to_file(
    root: &ContentNode,
    mode: &LayoutMode,
    output: &Path,
) -> Result<RenderedDocument, Error> {
    let doc = render(root, mode)?;
    doc.save(output)?;
    Ok(doc)
}

/// Run the layout pass without producing PDF bytes, recording every placed
/// span and rule. Uses the built-in metrics, so it cannot fail.
pub fn layout_trace(root: &ContentNode, mode: &LayoutMode) -> LayoutTrace {
    pdf::trace_document(root, mode, &fonts::builtin_set())
}
