//! Maps a content node's presentational hints to its semantic role.
//!
//! The rules form a priority list and the first match wins, which is also how
//! contradictory hint combinations are resolved: a node claiming both a name
//! header's size and a list tag classifies as whatever rule fires first, never
//! as an error.

use crate::model::{Align, ColorClass, ContentNode, FontSizeClass, Tag};

/// Semantic role of a content node, as rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    NameHeader,
    ContactLine,
    SectionHeader,
    EntryTitle,
    DateRange,
    BodyText,
    BulletList,
    LabeledRow,
    Generic,
}

/// Domain fragments that mark a muted line as a contact line rather than a
/// date range. Matches the fixed vocabulary the preview generator emits.
pub(crate) const LINK_DOMAIN_FRAGMENTS: &[&str] = &["linkedin.com", "github.com", "www."];

/// Separator between contact-line parts.
pub const BULLET_SEPARATOR: char = '\u{2022}';

/// True when a muted line's text reads as contact information.
fn looks_like_contact(text: &str) -> bool {
    text.contains('@')
        || text.contains("http")
        || text.contains(BULLET_SEPARATOR)
        || LINK_DOMAIN_FRAGMENTS.iter().any(|d| text.contains(d))
}

/// Classify a node. Pure; priority order mirrors the preview generator's
/// style vocabulary.
pub fn classify(node: &ContentNode) -> Role {
    let hints = &node.hints;

    if hints.size == Some(FontSizeClass::Name) && hints.align == Align::Center {
        return Role::NameHeader;
    }

    if hints.size == Some(FontSizeClass::Section) && hints.underline {
        return Role::SectionHeader;
    }

    if hints.size == Some(FontSizeClass::Title) && hints.bold {
        return Role::EntryTitle;
    }

    if hints.color == ColorClass::Muted {
        if looks_like_contact(&node.rendered_text()) {
            return Role::ContactLine;
        }
        return Role::DateRange;
    }

    if node.tag == Tag::List {
        return Role::BulletList;
    }

    if !node.children.is_empty()
        && node
            .children
            .iter()
            .all(|child| child.tag == Tag::InlineSpan)
    {
        return Role::LabeledRow;
    }

    if !node.text.trim().is_empty() {
        return Role::BodyText;
    }

    // Containers recurse through their children; truly empty nodes advance
    // the cursor by nothing.
    Role::Generic
}
