//! Font metrics, WinAnsi encoding, and the font resource loader.
//!
//! The default path uses the base-14 Helvetica family with built-in AFM width
//! tables, so rendering needs no font files at all. Callers can instead point
//! [`FontSource::Files`] at TrueType faces, which are parsed with `ttf-parser`
//! and embedded as Identity-H composite fonts.
//!
//! Loading is performed by an explicit [`FontLoader`] service: one load per
//! source key, memoized, with an observable lifecycle. A failed load latches
//! and surfaces as [`Error::DependencyUnavailable`] on every subsequent
//! request for that key.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

use crate::error::Error;

/// Fallback ascent fraction when no face metrics are available.
pub(crate) const ASCENDER_FALLBACK: f32 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FontVariant {
    Regular,
    Bold,
}

/// Everything needed to embed one TrueType face, captured at load time so
/// registration into a `Pdf` never re-parses the file.
pub(crate) struct EmbedInfo {
    pub(crate) data: Arc<Vec<u8>>,
    pub(crate) ps_name: String,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) cap_height: f32,
    pub(crate) bbox: [f32; 4],
    pub(crate) gid_widths: Vec<(u16, f32)>,
}

/// Width and encoding data for one face of the document font.
pub(crate) struct FontEntry {
    /// Widths in 1000-units for WinAnsi bytes 32..=255.
    pub(crate) widths_1000: Vec<f32>,
    /// Present only for embedded faces; maps chars to glyph ids.
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
    pub(crate) ascender_ratio: f32,
    pub(crate) embed: Option<EmbedInfo>,
}

impl FontEntry {
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    /// Rendered width of a string at a font size, in points.
    pub(crate) fn text_width(&self, text: &str, font_pt: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_pt / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_pt: f32) -> f32 {
        self.char_width_1000(' ') * font_pt / 1000.0
    }

    /// Bytes for a PDF `Str` in this font's encoding.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => {
                let mut out = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = map.get(&ch).copied().unwrap_or(0);
                    out.push((gid >> 8) as u8);
                    out.push((gid & 0xFF) as u8);
                }
                out
            }
            None => to_winansi_bytes(text),
        }
    }
}

/// The regular/bold pair one render pass draws with.
pub(crate) struct FontSet {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl FontSet {
    pub(crate) fn entry(&self, variant: FontVariant) -> &FontEntry {
        match variant {
            FontVariant::Regular => &self.regular,
            FontVariant::Bold => &self.bold,
        }
    }
}

/// Identifies a loadable font resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// Base-14 Helvetica with built-in metrics. Never fails to load.
    Builtin,
    /// TrueType faces to parse and embed.
    Files { regular: PathBuf, bold: PathBuf },
}

/// Observable lifecycle of a font resource within a loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Ready,
    Failed,
}

type LoadCell = Arc<OnceLock<Result<Arc<FontSet>, String>>>;

/// Memoizing font resource loader. Each source key is loaded at most once;
/// concurrent requests for the same key block on the single in-flight load
/// instead of duplicating it.
#[derive(Default)]
pub struct FontLoader {
    cells: Mutex<HashMap<FontSource, LoadCell>>,
}

impl FontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide loader used by the convenience render entry points.
    pub fn shared() -> &'static FontLoader {
        static SHARED: OnceLock<FontLoader> = OnceLock::new();
        SHARED.get_or_init(FontLoader::new)
    }

    fn cell(&self, source: &FontSource) -> LoadCell {
        let mut cells = self.cells.lock().expect("font loader poisoned");
        cells.entry(source.clone()).or_default().clone()
    }

    /// Current lifecycle state of a source key.
    pub fn state(&self, source: &FontSource) -> LoadState {
        let cells = self.cells.lock().expect("font loader poisoned");
        match cells.get(source) {
            None => LoadState::NotLoaded,
            Some(cell) => match cell.get() {
                None => LoadState::Loading,
                Some(Ok(_)) => LoadState::Ready,
                Some(Err(_)) => LoadState::Failed,
            },
        }
    }

    pub(crate) fn get(&self, source: &FontSource) -> Result<Arc<FontSet>, Error> {
        let cell = self.cell(source);
        let result = cell.get_or_init(|| load_source(source).map(Arc::new));
        match result {
            Ok(set) => Ok(Arc::clone(set)),
            Err(msg) => Err(Error::DependencyUnavailable(msg.clone())),
        }
    }
}

/// The no-file Helvetica pair. Infallible, so callers that only need layout
/// measurement can skip the loader entirely.
pub(crate) fn builtin_set() -> FontSet {
    FontSet {
        regular: builtin_entry(FontVariant::Regular),
        bold: builtin_entry(FontVariant::Bold),
    }
}

fn load_source(source: &FontSource) -> Result<FontSet, String> {
    match source {
        FontSource::Builtin => Ok(builtin_set()),
        FontSource::Files { regular, bold } => {
            let t0 = std::time::Instant::now();
            let set = FontSet {
                regular: load_truetype(regular)?,
                bold: load_truetype(bold)?,
            };
            log::info!(
                "Loaded font files in {:.1}ms: {} + {}",
                t0.elapsed().as_secs_f64() * 1000.0,
                regular.display(),
                bold.display(),
            );
            Ok(set)
        }
    }
}

fn builtin_entry(variant: FontVariant) -> FontEntry {
    FontEntry {
        widths_1000: builtin_widths(variant),
        char_to_gid: None,
        ascender_ratio: ASCENDER_FALLBACK,
        embed: None,
    }
}

fn load_truetype(path: &PathBuf) -> Result<FontEntry, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open font file {}: {e}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|e| format!("cannot map font file {}: {e}", path.display()))?;
    let face = Face::parse(&mmap, 0)
        .map_err(|e| format!("cannot parse font file {}: {e}", path.display()))?;

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;

    let widths_1000: Vec<f32> = (32u8..=255u8)
        .map(|byte| {
            face.glyph_index(winansi_to_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0)
        })
        .collect();

    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for byte in 32u8..=255u8 {
        let ch = winansi_to_char(byte);
        if let Some(gid) = face.glyph_index(ch) {
            char_to_gid.insert(ch, gid.0);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0);
            gid_widths.push((gid.0, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let bb = face.global_bounding_box();
    let family = face
        .names()
        .into_iter()
        .find(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
        .and_then(|n| n.to_string())
        .unwrap_or_else(|| "Embedded".to_string());

    Ok(FontEntry {
        widths_1000,
        char_to_gid: Some(char_to_gid),
        ascender_ratio: face.ascender() as f32 / units,
        embed: Some(EmbedInfo {
            data: Arc::new(mmap.to_vec()),
            ps_name: family.replace(' ', ""),
            ascent: to_1000(face.ascender() as f32),
            descent: to_1000(face.descender() as f32),
            cap_height: face
                .capital_height()
                .map(|h| to_1000(h as f32))
                .unwrap_or(700.0),
            bbox: [
                to_1000(bb.x_min as f32),
                to_1000(bb.y_min as f32),
                to_1000(bb.x_max as f32),
                to_1000(bb.y_max as f32),
            ],
            gid_widths,
        }),
    })
}

/// A font variant registered into one `Pdf` instance.
pub(crate) struct RegisteredFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
}

/// Write both faces of a font set into the document and hand back their
/// resource names. Built-in faces become base-14 Type1 references; loaded
/// faces are embedded whole as Identity-H Type0 fonts.
pub(crate) fn register_font_set(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    set: &FontSet,
) -> [RegisteredFont; 2] {
    [
        register_one(pdf, alloc, &set.regular, "F1", "Helvetica"),
        register_one(pdf, alloc, &set.bold, "F2", "Helvetica-Bold"),
    ]
}

fn register_one(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    entry: &FontEntry,
    pdf_name: &str,
    base14: &str,
) -> RegisteredFont {
    let font_ref = alloc();
    match &entry.embed {
        None => {
            pdf.type1_font(font_ref)
                .base_font(Name(base14.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        Some(info) => embed_truetype(pdf, font_ref, info, entry, alloc),
    }
    RegisteredFont {
        pdf_name: pdf_name.to_string(),
        font_ref,
    }
}

/// Embed a loaded TrueType face as a Type0 composite font with Identity-H
/// encoding. The full font program is embedded; glyph ids in content streams
/// are the face's own.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    info: &EmbedInfo,
    entry: &FontEntry,
    alloc: &mut impl FnMut() -> Ref,
) {
    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = info.data.len() as i32;
    pdf.stream(data_ref, &info.data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(info.ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            info.bbox[0],
            info.bbox[1],
            info.bbox[2],
            info.bbox[3],
        ))
        .italic_angle(0.0)
        .ascent(info.ascent)
        .descent(info.descent)
        .cap_height(info.cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = pdf_writer::types::SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(info.ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !info.gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &info.gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{}-UTF16", info.ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        },
    );
    if let Some(map) = &entry.char_to_gid {
        for (&ch, &gid) in map {
            cmap.pair(gid, ch);
        }
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(info.ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);
}

/// Windows-1252 byte to Unicode char. Bytes 0x80-0x9F are remapped; all
/// others map directly to their codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF `Str`
/// encoding. Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Helvetica AFM advance widths for chars 32..=126, in 1000-units.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // 'A'..'P'
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'Q'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // 'a'..'p'
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'q'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold AFM advance widths for chars 32..=126, in 1000-units.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, // 'A'..'P'
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'Q'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, // 'a'..'p'
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'q'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Width table for WinAnsi bytes 32..=255 from the AFM data, with sensible
/// values for the handful of high-range chars the preview vocabulary uses.
fn builtin_widths(variant: FontVariant) -> Vec<f32> {
    let ascii: &[u16; 95] = match variant {
        FontVariant::Regular => &HELVETICA_WIDTHS,
        FontVariant::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    (32u8..=255u8)
        .map(|b| match b {
            32..=126 => ascii[(b - 32) as usize] as f32,
            0x95 => 350.0,  // bullet
            0x96 => 556.0,  // en dash
            0x97 => 1000.0, // em dash
            _ => 556.0,
        })
        .collect()
}
