use focusdom::{parse_fragment, MarkupError, ParsedNode};

fn element(node: &ParsedNode) -> (&str, &[(String, String)], &[ParsedNode]) {
    match node {
        ParsedNode::Element {
            tag,
            attrs,
            children,
        } => (tag, attrs, children),
        ParsedNode::Text(text) => panic!("expected element, got text {text:?}"),
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attribute_forms() {
    let nodes = parse_fragment(r#"<input type = "text" value='a b' disabled data-x=1>"#).unwrap();
    let (tag, attrs, children) = element(&nodes[0]);
    assert_eq!(tag, "input");
    assert!(children.is_empty());
    assert_eq!(
        attrs,
        &[
            ("type".to_string(), "text".to_string()),
            ("value".to_string(), "a b".to_string()),
            ("disabled".to_string(), String::new()),
            ("data-x".to_string(), "1".to_string()),
        ]
    );
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let nodes = parse_fragment(r#"<div class="a" class="b"></div>"#).unwrap();
    let (_, attrs, _) = element(&nodes[0]);
    assert_eq!(attrs, &[("class".to_string(), "a".to_string())]);
}

#[test]
fn test_attribute_entities_decoded() {
    let nodes = parse_fragment(r#"<div title="a &amp; b"></div>"#).unwrap();
    let (_, attrs, _) = element(&nodes[0]);
    assert_eq!(attrs[0].1, "a & b");
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_nested_and_siblings() {
    let nodes = parse_fragment("<table><tr><td>1</td><td>2</td></tr></table><p>x</p>").unwrap();
    assert_eq!(nodes.len(), 2);
    let (_, _, rows) = element(&nodes[0]);
    let (_, _, cells) = element(&rows[0]);
    assert_eq!(cells.len(), 2);
}

#[test]
fn test_void_and_self_closing() {
    let nodes = parse_fragment("<img src=\"a\"><br/><span/>text").unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[3], ParsedNode::Text("text".into()));
}

#[test]
fn test_comments_skipped() {
    let nodes = parse_fragment("<!-- hi --><b>x</b><!---->").unwrap();
    assert_eq!(nodes.len(), 1);
}

#[test]
fn test_star_entity_in_text() {
    let nodes = parse_fragment("<span>&#9733;</span>").unwrap();
    let (_, _, children) = element(&nodes[0]);
    assert_eq!(children, &[ParsedNode::Text("★".into())]);
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_stray_closing_tag_dropped() {
    let nodes = parse_fragment("<div>a</span>b</div>").unwrap();
    let (_, _, children) = element(&nodes[0]);
    assert_eq!(children, &[ParsedNode::Text("ab".into())]);
}

#[test]
fn test_mismatched_close_closes_inner() {
    let nodes = parse_fragment("<div><span>a</div><p></p>").unwrap();
    assert_eq!(nodes.len(), 2);
    let (_, _, children) = element(&nodes[0]);
    let (tag, _, _) = element(&children[0]);
    assert_eq!(tag, "span");
}

#[test]
fn test_unclosed_elements_closed_at_end() {
    let nodes = parse_fragment("<div><span>open").unwrap();
    assert_eq!(nodes.len(), 1);
}

#[test]
fn test_errors() {
    assert_eq!(
        parse_fragment("<div class=\"x\""),
        Err(MarkupError::UnterminatedTag(0))
    );
    assert_eq!(
        parse_fragment("ok<!-- never"),
        Err(MarkupError::UnterminatedComment(2))
    );
    assert!(matches!(
        parse_fragment("<div title=\"oops>"),
        Err(MarkupError::UnterminatedAttribute(_))
    ));
}
