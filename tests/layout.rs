mod common;

use resume_pdf::resume::master_preview_tree;
use resume_pdf::{ContentNode, FontSizeClass, LayoutMode, LayoutTrace, layout_trace};

const BULLET: &str = "\u{2022}";

/// Every word drawn by a trace, in placement order, bullet glyphs excluded.
fn drawn_words(trace: &LayoutTrace) -> Vec<String> {
    trace
        .spans()
        .flat_map(|s| s.text.split_whitespace())
        .filter(|w| *w != BULLET)
        .map(str::to_string)
        .collect()
}

#[test]
fn standard_mode_never_drops_words() {
    let paragraph = "Developed and maintained a set of enterprise services for document \
                     ingestion, cleanup, and delivery, coordinating releases with four \
                     partner teams across two time zones";
    let tree = ContentNode::block()
        .with_child(ContentNode::block().with_text(paragraph))
        .with_child(ContentNode::block().with_text("Second paragraph follows the first"));

    let trace = layout_trace(&tree, &LayoutMode::standard());
    let expected: Vec<String> = format!("{paragraph} Second paragraph follows the first")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    assert_eq!(drawn_words(&trace), expected);
    assert!(!trace.overflowed);
}

#[test]
fn standard_mode_flows_onto_extra_pages() {
    let tree = master_preview_tree(&common::oversized_resume(25));
    let trace = layout_trace(&tree, &LayoutMode::standard());
    assert!(trace.page_count() > 1, "expected overflow onto page two");
    assert!(!trace.overflowed);
}

#[test]
fn dense_mode_stays_on_one_page_and_reports_overflow() {
    common::init_logging();
    let tree = master_preview_tree(&common::oversized_resume(25));
    let trace = layout_trace(&tree, &LayoutMode::dense());
    assert_eq!(trace.page_count(), 1);
    assert!(trace.overflowed);
}

#[test]
fn dense_overflow_cuts_at_a_word_boundary() {
    let tree = master_preview_tree(&common::oversized_resume(25));
    let full = drawn_words(&layout_trace(&tree, &LayoutMode::standard()));
    let cut = drawn_words(&layout_trace(&tree, &LayoutMode::dense()));
    assert!(cut.len() < full.len());
    assert_eq!(cut[..], full[..cut.len()], "dense output must be a prefix");
}

#[test]
fn dense_mode_without_overflow_is_clean() {
    let tree = master_preview_tree(&common::sample_resume());
    let trace = layout_trace(&tree, &LayoutMode::dense());
    assert_eq!(trace.page_count(), 1);
    assert!(!trace.overflowed);
}

#[test]
fn layout_is_deterministic() {
    let tree = master_preview_tree(&common::sample_resume());
    let mode = LayoutMode::standard();
    assert_eq!(layout_trace(&tree, &mode), layout_trace(&tree, &mode));
}

#[test]
fn spans_stay_inside_the_margins() {
    for mode in [LayoutMode::standard(), LayoutMode::dense()] {
        let tree = master_preview_tree(&common::sample_resume());
        let trace = layout_trace(&tree, &mode);
        for span in trace.spans() {
            assert!(span.x >= mode.margin_pt - 0.01, "{:?} left of margin", span.text);
            assert!(
                span.x + span.width <= mode.page_width_pt - mode.margin_pt + 0.5,
                "{:?} crosses the right margin",
                span.text
            );
            assert!(span.y >= mode.margin_pt - 0.01);
        }
    }
}

#[test]
fn contact_line_is_centered() {
    let mode = LayoutMode::standard();
    let tree = ContentNode::block().with_child(
        ContentNode::block()
            .with_text("jane@example.dev \u{2022} Buffalo, NY \u{2022} github.com/janedoe")
            .with_size(FontSizeClass::Small)
            .muted()
            .centered(),
    );
    let trace = layout_trace(&tree, &mode);
    let spans: Vec<_> = trace.spans().collect();
    assert!(spans.len() >= 3);

    let first = spans.first().unwrap();
    let last = spans.last().unwrap();
    let left_gap = first.x - mode.margin_pt;
    let right_gap = (mode.page_width_pt - mode.margin_pt) - (last.x + last.width);
    assert!(
        (left_gap - right_gap).abs() < 0.5,
        "uneven gaps: {left_gap} vs {right_gap}"
    );
}

#[test]
fn contact_parts_get_individual_links() {
    let tree = ContentNode::block().with_child(
        ContentNode::block()
            .with_text("jane@example.dev \u{2022} Buffalo, NY \u{2022} github.com/janedoe")
            .with_size(FontSizeClass::Small)
            .muted()
            .centered(),
    );
    let trace = layout_trace(&tree, &LayoutMode::standard());
    let links: Vec<_> = trace.spans().filter_map(|s| s.link.as_deref()).collect();
    assert_eq!(links, vec!["mailto:jane@example.dev", "https://github.com/janedoe"]);

    let plain = trace
        .spans()
        .find(|s| s.text == "Buffalo, NY")
        .expect("plain part drawn");
    assert!(plain.link.is_none());
}

#[test]
fn contact_parts_are_spaced_from_measured_widths() {
    let mode = LayoutMode::standard();
    let tree = ContentNode::block().with_child(
        ContentNode::block()
            .with_text("a@b.com \u{2022} 555-1234")
            .with_size(FontSizeClass::Small)
            .muted()
            .centered(),
    );
    let trace = layout_trace(&tree, &mode);
    let parts: Vec<_> = trace.spans().filter(|s| s.text != BULLET).collect();
    assert_eq!(parts.len(), 2);

    let (email, phone) = (parts[0], parts[1]);
    let spacing = phone.x - (email.x + email.width);
    assert!(spacing > 0.0);

    // Centered start x comes from the measured total width.
    let total = email.width + phone.width + spacing;
    let expected_x = (mode.page_width_pt - total) / 2.0;
    assert!((email.x - expected_x).abs() < 0.01);
}

#[test]
fn renders_a_complete_minimal_resume() {
    let tree = ContentNode::block()
        .with_child(
            ContentNode::block()
                .with_text("Jane Doe")
                .with_size(FontSizeClass::Name)
                .bold()
                .centered(),
        )
        .with_child(
            ContentNode::block()
                .with_text("jane@x.com \u{2022} 555-0100")
                .with_size(FontSizeClass::Small)
                .muted()
                .centered(),
        )
        .with_child(
            ContentNode::block()
                .with_text("Experience")
                .with_size(FontSizeClass::Section)
                .bold()
                .underlined(),
        )
        .with_child(
            ContentNode::block()
                .with_text("Engineer \u{2014} Acme")
                .with_size(FontSizeClass::Title)
                .bold(),
        )
        .with_child(
            ContentNode::list()
                .with_child(ContentNode::list_item("Built X"))
                .with_child(ContentNode::list_item("Shipped Y")),
        );

    let trace = layout_trace(&tree, &LayoutMode::standard());
    assert_eq!(trace.page_count(), 1);
    assert!(!trace.overflowed);

    let bullets: Vec<&str> = trace
        .spans()
        .filter(|s| s.text == "Built X" || s.text == "Shipped Y")
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(bullets, vec!["Built X", "Shipped Y"]);

    let email = trace.spans().find(|s| s.text == "jane@x.com").unwrap();
    assert_eq!(email.link.as_deref(), Some("mailto:jane@x.com"));
    let phone = trace.spans().find(|s| s.text == "555-0100").unwrap();
    assert!(phone.link.is_none());
}

#[test]
fn section_header_draws_a_rule() {
    let tree = ContentNode::block().with_child(
        ContentNode::block()
            .with_text("Education")
            .with_size(FontSizeClass::Section)
            .bold()
            .underlined(),
    );
    let mode = LayoutMode::standard();
    let trace = layout_trace(&tree, &mode);
    assert_eq!(trace.pages[0].rules.len(), 1);
    let rule = &trace.pages[0].rules[0];
    let header = trace.spans().next().unwrap();
    assert!(rule.y > header.y, "rule sits under the header text");
    assert!((rule.width - mode.content_width(0.0)).abs() < 0.01);
}

#[test]
fn empty_nodes_produce_no_output() {
    let bare = ContentNode::block().with_child(ContentNode::block().with_text("Body"));
    let padded = ContentNode::block()
        .with_child(ContentNode::block())
        .with_child(ContentNode::block().with_text("   "))
        .with_child(ContentNode::block().with_text("Body"));
    assert_eq!(
        layout_trace(&bare, &LayoutMode::standard()),
        layout_trace(&padded, &LayoutMode::standard())
    );
}

#[test]
fn bullet_items_are_indented() {
    let mode = LayoutMode::standard();
    let tree = ContentNode::block().with_child(
        ContentNode::list()
            .with_child(ContentNode::list_item("first item"))
            .with_child(ContentNode::list_item("second item")),
    );
    let trace = layout_trace(&tree, &mode);
    let texts: Vec<&str> = trace.spans().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec![BULLET, "first item", BULLET, "second item"]);
    for span in trace.spans().filter(|s| s.text != BULLET) {
        assert!(span.x > mode.margin_pt, "item text is inset from the margin");
    }
}
