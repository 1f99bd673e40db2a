use focusdom::{Document, Selector, SelectorError};

fn sample() -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    doc.insert_markup(
        body,
        None,
        r#"<div id="main" class="slider">
             <div class="sliderAxis">
               <div class="mainCursor" data-hash="c1"></div>
             </div>
             <span class="sliderValue">0</span>
           </div>
           <div class="grid"><div class="gridItem selected" data-index="0"></div></div>"#,
    )
    .unwrap();
    doc
}

fn count(doc: &Document, selector: &str) -> usize {
    doc.query_all(selector).unwrap().len()
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_simple_selectors() {
    let doc = sample();
    assert_eq!(count(&doc, "div"), 5);
    assert_eq!(count(&doc, "#main"), 1);
    assert_eq!(count(&doc, ".gridItem"), 1);
    assert_eq!(count(&doc, ".gridItem.selected"), 1);
    assert_eq!(count(&doc, "span.sliderValue"), 1);
    assert_eq!(count(&doc, "*"), 2 + 6);
}

#[test]
fn test_attribute_selectors() {
    let doc = sample();
    assert_eq!(count(&doc, "[data-hash]"), 1);
    assert_eq!(count(&doc, "[data-hash=c1]"), 1);
    assert_eq!(count(&doc, "[data-hash=\"c1\"]"), 1);
    assert_eq!(count(&doc, "[data-hash='other']"), 0);
    assert_eq!(count(&doc, "div[data-index=\"0\"]"), 1);
}

#[test]
fn test_combinators() {
    let doc = sample();
    assert_eq!(count(&doc, ".slider .mainCursor"), 1);
    assert_eq!(count(&doc, ".slider > .mainCursor"), 0);
    assert_eq!(count(&doc, ".sliderAxis>.mainCursor"), 1);
    assert_eq!(count(&doc, "body > div"), 2);
    assert_eq!(count(&doc, ".grid .mainCursor"), 0);
}

#[test]
fn test_selector_list() {
    let doc = sample();
    assert_eq!(count(&doc, ".grid, .slider"), 2);
    assert_eq!(count(&doc, "#main , .gridItem"), 2);
}

#[test]
fn test_query_selector_is_scoped() {
    let doc = sample();
    let grid = doc.query_all(".grid").unwrap()[0];
    let selector = Selector::parse("div").unwrap();
    assert_eq!(doc.query_selector_all(grid, &selector).len(), 1);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_selectors() {
    assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
    assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
    assert_eq!(Selector::parse("div >"), Err(SelectorError::DanglingCombinator));
    assert!(matches!(
        Selector::parse("[data-x"),
        Err(SelectorError::UnterminatedAttribute(0))
    ));
    assert!(matches!(
        Selector::parse("div!"),
        Err(SelectorError::Unexpected { found: '!', .. })
    ));
    assert!(Selector::parse("a,,b").is_err());
    assert!(Selector::parse(".").is_err());
}
