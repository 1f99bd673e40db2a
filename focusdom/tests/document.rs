use focusdom::{Attachment, Document, EventType, ListenerId, Rect};

fn doc_with(markup: &str) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    doc.insert_markup(body, None, markup).unwrap();
    doc
}

// ============================================================================
// Tree
// ============================================================================

#[test]
fn test_new_document_has_body() {
    let doc = Document::new();
    assert_eq!(doc.tag(doc.root()), Some("html"));
    assert_eq!(doc.tag(doc.body()), Some("body"));
    assert_eq!(doc.parent(doc.body()), Some(doc.root()));
    assert!(doc.is_connected(doc.body()));
}

#[test]
fn test_insert_markup_position_counts_elements() {
    let mut doc = doc_with("<p>a</p> text <p>b</p>");
    let body = doc.body();
    let inserted = doc.insert_markup(body, Some(1), "<div>x</div>").unwrap();

    let elements = doc.element_children(body);
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[1], inserted[0]);
    assert_eq!(doc.text_content(elements[2]), "b");
}

#[test]
fn test_insert_markup_out_of_range_appends() {
    let mut doc = doc_with("<p>a</p>");
    let body = doc.body();
    let inserted = doc.insert_markup(body, Some(42), "<div></div>").unwrap();
    assert_eq!(doc.children(body).last(), Some(&inserted[0]));
}

#[test]
fn test_detach_keeps_subtree() {
    let mut doc = doc_with("<div class=\"outer\"><span>inner</span></div>");
    let outer = doc.query_all(".outer").unwrap()[0];
    doc.detach(outer);

    assert!(!doc.is_connected(outer));
    assert_eq!(doc.text_content(outer), "inner");
    assert!(doc.query_all(".outer").unwrap().is_empty());

    let body = doc.body();
    doc.append_child(body, outer);
    assert!(doc.is_connected(outer));
}

#[test]
fn test_insert_into_own_subtree_is_refused() {
    let mut doc = doc_with("<div id=\"a\"><div id=\"b\"></div></div>");
    let a = doc.query_all("#a").unwrap()[0];
    let b = doc.query_all("#b").unwrap()[0];
    doc.append_child(b, a);
    assert_eq!(doc.parent(b), Some(a));
    assert_eq!(doc.parent(a), Some(doc.body()));
}

#[test]
fn test_closest_with_class_is_inclusive() {
    let doc = doc_with("<div class=\"row\"><span class=\"cell\"><b>x</b></span></div>");
    let b = doc.query_all("b").unwrap()[0];
    let cell = doc.query_all(".cell").unwrap()[0];
    let row = doc.query_all(".row").unwrap()[0];

    assert_eq!(doc.closest_with_class(b, "row"), Some(row));
    assert_eq!(doc.closest_with_class(cell, "cell"), Some(cell));
    assert_eq!(doc.closest_with_class(b, "missing"), None);
}

#[test]
fn test_descendants_in_document_order() {
    let doc = doc_with("<ul><li>1</li><li>2</li></ul><p></p>");
    let tags: Vec<_> = doc
        .descendants(doc.body())
        .into_iter()
        .filter_map(|n| doc.tag(n).map(String::from))
        .collect();
    assert_eq!(tags, vec!["ul", "li", "li", "p"]);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_outer_html_round_trip_keeps_class_and_style() {
    let mut doc = doc_with("<div class=\"card\" data-hash=\"abc\">hi</div>");
    let card = doc.query_all(".card").unwrap()[0];
    doc.set_style(card, "left", "12px");
    doc.add_class(card, "selected");

    let html = doc.outer_html(card);
    assert_eq!(
        html,
        "<div class=\"card selected\" data-hash=\"abc\" style=\"left: 12px;\">hi</div>"
    );

    let mut other = Document::new();
    let body = other.body();
    let copy = other.insert_markup(body, None, &html).unwrap()[0];
    assert!(other.has_class(copy, "selected"));
    assert_eq!(other.offset_left(copy), 12.0);
    assert_eq!(other.data(copy, "hash"), Some("abc"));
}

#[test]
fn test_serialization_escapes() {
    let mut doc = Document::new();
    let body = doc.body();
    let div = doc.create_element("div");
    doc.append_child(body, div);
    doc.set_attr(div, "title", "a \"quoted\" <value>");
    doc.set_text(div, "1 < 2 & 3");
    assert_eq!(
        doc.outer_html(div),
        "<div title=\"a &quot;quoted&quot; &lt;value>\">1 &lt; 2 &amp; 3</div>"
    );
}

#[test]
fn test_void_elements_serialize_without_close() {
    let doc = doc_with("<img src=\"a.png\"><br>");
    let img = doc.query_all("img").unwrap()[0];
    assert_eq!(doc.outer_html(img), "<img src=\"a.png\">");
}

// ============================================================================
// Classes and style
// ============================================================================

#[test]
fn test_class_tokens() {
    let mut doc = doc_with("<div class=\"a  b\"></div>");
    let div = doc.query_all("div").unwrap()[0];
    doc.add_class(div, "b");
    doc.add_class(div, "c");
    assert_eq!(doc.classes(div), vec!["a", "b", "c"]);

    doc.remove_class(div, "a");
    assert!(!doc.has_class(div, "a"));
    assert!(doc.has_class(div, "c"));
}

#[test]
fn test_offsets_prefer_inline_style() {
    let mut doc = doc_with("<div></div>");
    let div = doc.query_all("div").unwrap()[0];
    doc.set_layout(div, Rect::new(5.0, 6.0, 100.0, 20.0));
    assert_eq!(doc.offset_width(div), 100.0);

    doc.set_style(div, "width", "40px");
    assert_eq!(doc.offset_width(div), 40.0);
    assert_eq!(doc.offset_left(div), 5.0);

    doc.set_style(div, "width", "");
    assert!(doc.attr(div, "style").is_none());
}

#[test]
fn test_position_in_area_sums_parents() {
    let mut doc = doc_with("<div id=\"area\"><div id=\"mid\"><div id=\"leaf\"></div></div></div>");
    let area = doc.query_all("#area").unwrap()[0];
    let mid = doc.query_all("#mid").unwrap()[0];
    let leaf = doc.query_all("#leaf").unwrap()[0];
    doc.set_layout(area, Rect::new(1000.0, 1000.0, 0.0, 0.0));
    doc.set_layout(mid, Rect::new(10.0, 100.0, 0.0, 0.0));
    doc.set_layout(leaf, Rect::new(3.0, 30.0, 0.0, 0.0));

    let offset = doc.position_in_area(leaf, area);
    assert_eq!(offset.left, 13.0);
    assert_eq!(offset.top, 130.0);
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_scroll_position_is_clamped() {
    let mut doc = doc_with("<div></div>");
    let div = doc.query_all("div").unwrap()[0];
    doc.set_scroll_extent(div, 100.0, 1000.0, 100.0, 200.0);

    assert!(doc.set_scroll_position(div, 5000.0, 0.0));
    assert_eq!(doc.scroll_top(div), 800.0);
    assert!(doc.scroll(div).at_bottom());

    assert!(!doc.set_scroll_position(div, 900.0, 0.0));
    assert!(doc.set_scroll_position(div, -10.0, 0.0));
    assert_eq!(doc.scroll_top(div), 0.0);
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_add_listener_ignores_duplicates() {
    let mut doc = Document::new();
    let body = doc.body();
    let click = Attachment::new(ListenerId(1), EventType::Click, false);

    assert!(doc.add_listener(body, click.clone()));
    assert!(!doc.add_listener(body, click.clone()));
    assert!(doc.add_listener(body, Attachment::new(ListenerId(1), EventType::Click, true)));
    assert_eq!(doc.attachments(body).len(), 2);

    doc.remove_listener_id(body, ListenerId(1));
    assert!(doc.attachments(body).is_empty());
}

#[test]
fn test_remove_listener_matches_event_and_phase() {
    let mut doc = Document::new();
    let body = doc.body();
    let bubble = Attachment::new(ListenerId(3), EventType::Click, false);
    let capture = Attachment::new(ListenerId(3), EventType::Click, true);
    doc.add_listener(body, bubble.clone());
    doc.add_listener(body, capture.clone());

    assert!(doc.remove_listener(body, &capture));
    assert!(!doc.remove_listener(body, &capture));
    assert_eq!(doc.attachments(body), &[bubble][..]);
}

#[test]
fn test_propagation_path_is_root_first() {
    let doc = doc_with("<div><span></span></div>");
    let span = doc.query_all("span").unwrap()[0];
    let div = doc.parent(span).unwrap();
    assert_eq!(
        doc.propagation_path(span),
        vec![doc.root(), doc.body(), div, span]
    );
}
