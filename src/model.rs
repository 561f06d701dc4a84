//! Input tree for the renderer: styled content nodes plus the page geometry
//! value object. The tree is built once from application state (see
//! [`crate::resume`]) and never mutated by a render pass.

/// Semantic kind of a content node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Block,
    List,
    ListItem,
    InlineSpan,
}

/// Font-size class emitted by the preview generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontSizeClass {
    Name,
    Section,
    Title,
    Meta,
    Body,
    Small,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorClass {
    #[default]
    Default,
    Muted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Presentational facts attached to a node. These are the only inputs the
/// classifier looks at; raw markup strings never reach the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StyleHints {
    pub size: Option<FontSizeClass>,
    pub bold: bool,
    pub color: ColorClass,
    pub align: Align,
    pub underline: bool,
}

/// A node in the styled preview tree. Children render in insertion order.
///
/// A node's rendered content is either its own `text` or the concatenation of
/// its children's content, never both: [`ContentNode::rendered_text`] resolves
/// the ambiguity by letting non-empty `text` win.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentNode {
    pub tag: Tag,
    pub hints: StyleHints,
    pub text: String,
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            hints: StyleHints::default(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn block() -> Self {
        Self::new(Tag::Block)
    }

    pub fn list() -> Self {
        Self::new(Tag::List)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(Tag::ListItem).with_text(text)
    }

    pub fn inline_span(text: impl Into<String>) -> Self {
        Self::new(Tag::InlineSpan).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_hints(mut self, hints: StyleHints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_size(mut self, size: FontSizeClass) -> Self {
        self.hints.size = Some(size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.hints.bold = true;
        self
    }

    pub fn muted(mut self) -> Self {
        self.hints.color = ColorClass::Muted;
        self
    }

    pub fn centered(mut self) -> Self {
        self.hints.align = Align::Center;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.hints.underline = true;
        self
    }

    pub fn with_child(mut self, child: ContentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Text this node renders: own `text` when present, otherwise the
    /// children's rendered text concatenated in order.
    pub fn rendered_text(&self) -> String {
        if !self.text.is_empty() {
            return self.text.clone();
        }
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.rendered_text());
        }
        out
    }

    /// True when the node carries no renderable content at all.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.children.iter().all(ContentNode::is_empty)
    }
}

/// Page geometry and type scale for one render pass. All lengths in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMode {
    pub margin_pt: f32,
    pub name_font_pt: f32,
    pub section_font_pt: f32,
    pub title_font_pt: f32,
    pub body_font_pt: f32,
    pub small_font_pt: f32,
    pub line_height: f32,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub allow_multiple_pages: bool,
}

// US Letter
const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;

impl LayoutMode {
    /// Multi-page layout for the master resume: 1" margins, full type scale.
    pub fn standard() -> Self {
        Self {
            margin_pt: 72.0,
            name_font_pt: 22.0,
            section_font_pt: 14.0,
            title_font_pt: 12.0,
            body_font_pt: 10.5,
            small_font_pt: 9.5,
            line_height: 1.35,
            page_width_pt: PAGE_WIDTH_PT,
            page_height_pt: PAGE_HEIGHT_PT,
            allow_multiple_pages: true,
        }
    }

    /// Compressed single-page layout for the job-tailored resume: 0.5"
    /// margins, fonts ~20% smaller, tighter leading. Content that does not
    /// fit is dropped with a warning rather than flowing onto a second page.
    pub fn dense() -> Self {
        Self {
            margin_pt: 36.0,
            name_font_pt: 17.5,
            section_font_pt: 11.0,
            title_font_pt: 9.5,
            body_font_pt: 8.5,
            small_font_pt: 7.5,
            line_height: 1.18,
            page_width_pt: PAGE_WIDTH_PT,
            page_height_pt: PAGE_HEIGHT_PT,
            allow_multiple_pages: false,
        }
    }

    /// Horizontal space available to text at a given indent.
    pub fn content_width(&self, indent_pt: f32) -> f32 {
        self.page_width_pt - 2.0 * self.margin_pt - indent_pt
    }

    /// Baseline-to-baseline advance for a font size.
    pub fn line_height_for(&self, font_pt: f32) -> f32 {
        font_pt * self.line_height
    }

    /// Font size for a size class, falling back to the body size.
    pub fn font_pt(&self, size: Option<FontSizeClass>) -> f32 {
        match size {
            Some(FontSizeClass::Name) => self.name_font_pt,
            Some(FontSizeClass::Section) => self.section_font_pt,
            Some(FontSizeClass::Title) => self.title_font_pt,
            Some(FontSizeClass::Meta) | Some(FontSizeClass::Small) => self.small_font_pt,
            Some(FontSizeClass::Body) | None => self.body_font_pt,
        }
    }
}
