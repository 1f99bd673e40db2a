use std::time::Duration;

use serde_json::json;

use focus::prelude::*;

fn setup(containers: usize) -> Runtime {
    let mut rt = Runtime::new();
    let body = rt.document().body();
    for _ in 0..containers {
        rt.document_mut()
            .insert_markup(body, None, "<div class=\"question\"></div>")
            .unwrap();
    }
    rt
}

fn root(rt: &Runtime, id: WidgetId) -> NodeId {
    rt.registry().find(&id).unwrap().node
}

fn select(rt: &Runtime, scope: NodeId, selector: &str) -> Vec<NodeId> {
    rt.document().select(scope, selector).unwrap()
}

// ============================================================================
// Button
// ============================================================================

#[test]
fn test_button_markup_and_text_change() {
    let mut rt = setup(2);
    let buttons = Button::new(
        &mut rt,
        Some(".question"),
        ButtonDescriptor {
            common: Common::default().with_class("big"),
            ..ButtonDescriptor::new("<b>Next</b>")
        },
        None,
    );
    let [a, b] = [buttons.ids()[0], buttons.ids()[1]];
    let node = root(&rt, a);
    assert!(rt.has_class(node, "big"));
    assert!(rt.has_class(node, "basic_button"));
    assert_eq!(rt.document().text_content(node), "Next");

    buttons.change_text(&mut rt, "Done", Some(a));
    assert_eq!(rt.document().text_content(root(&rt, a)), "Done");
    assert_eq!(rt.document().text_content(root(&rt, b)), "Next");

    buttons.change_text(&mut rt, "All", None);
    assert_eq!(rt.document().text_content(root(&rt, b)), "All");
}

#[test]
fn test_button_at_position() {
    let mut rt = setup(1);
    let container = rt.containers(Some(".question"))[0];
    Button::new(&mut rt, Some(".question"), ButtonDescriptor::new("second"), None);
    let first = Button::new(&mut rt, Some(".question"), ButtonDescriptor::new("first"), Some(0));

    assert_eq!(
        rt.document().element_children(container)[0],
        root(&rt, first.ids()[0])
    );
}

// ============================================================================
// Banner, accordion, image and text
// ============================================================================

#[test]
fn test_banner_between_two_shadows() {
    let mut rt = setup(1);
    let banner = Banner::new(&mut rt, Some(".question"), BannerDescriptor::default(), None);
    let id = banner.ids()[0];
    let wrapper = rt.widget_root(id).unwrap();
    let parts = rt.document().element_children(wrapper);

    assert_eq!(parts.len(), 3);
    assert!(rt.has_class(parts[0], "shadow-top"));
    assert_eq!(rt.document().style(parts[0]).px("height"), Some(4.0));
    assert_eq!(parts[1], root(&rt, id));
    assert!(rt.has_class(parts[1], "basic_banner"));
    assert!(rt.has_class(parts[2], "shadow-bottom"));
    assert_eq!(rt.document().style(parts[2]).px("height"), Some(15.0));

    let container = rt.containers(Some(".question"))[0];
    assert_eq!(rt.registry().find(&id).unwrap().container, Some(container));
}

#[test]
fn test_accordion_marks_last_cell() {
    let mut rt = setup(1);
    let accordion = Accordion::new(
        &mut rt,
        None,
        AccordionDescriptor {
            nb_cols: 3,
            placeholder_unactive: "+".into(),
            active_content: "<p>body</p>".into(),
            height: Some("300px".into()),
            ..AccordionDescriptor::default()
        },
        None,
    );
    let table = root(&rt, accordion.ids()[0]);
    let cells = select(&rt, table, ".accordionItem");

    assert_eq!(cells.len(), 3);
    assert!(!rt.has_class(cells[1], "last"));
    assert!(rt.has_class(cells[2], "last"));
    assert_eq!(select(&rt, table, ".accordionPlaceholder").len(), 3);
    assert_eq!(rt.document().style(table).px("height"), Some(300.0));
    match &rt.registry().find(&accordion.ids()[0]).unwrap().data {
        WidgetData::Accordion { items } => assert_eq!(items, &cells),
        other => panic!("unexpected record {}", other.kind()),
    }
}

#[test]
fn test_image_text_zone_order() {
    let mut rt = setup(1);
    let descriptor = ImageTextZoneDescriptor {
        url: "cat.png".into(),
        alt: "a cat".into(),
        image_width: "40px".into(),
        image_height: "30px".into(),
        text: "Meow".into(),
        ..ImageTextZoneDescriptor::default()
    };
    let before = ImageTextZone::new(&mut rt, None, descriptor.clone(), None);
    let after = ImageTextZone::new(
        &mut rt,
        None,
        ImageTextZoneDescriptor {
            image_after: true,
            ..descriptor
        },
        None,
    );

    let cells = select(&rt, root(&rt, before.ids()[0]), "td");
    assert!(rt.has_class(cells[0], "image"));
    assert!(rt.has_class(cells[1], "text"));
    let img = select(&rt, cells[0], "img.bli")[0];
    assert_eq!(rt.document().attr(img, "src"), Some("cat.png"));
    assert_eq!(rt.document().style(img).px("width"), Some(40.0));

    let cells = select(&rt, root(&rt, after.ids()[0]), "td");
    assert!(rt.has_class(cells[0], "text"));
    assert_eq!(rt.document().text_content(cells[0]), "Meow");
}

// ============================================================================
// Rate slider
// ============================================================================

fn colors(rt: &Runtime, id: WidgetId) -> Vec<String> {
    select(rt, root(rt, id), ".rateItem")
        .into_iter()
        .map(|item| rt.document().style(item).get("color").unwrap_or_default().to_string())
        .collect()
}

const ON: &str = "rgb(255, 221, 153)";
const OFF: &str = "rgb(190, 190, 190)";

#[test]
fn test_rate_slider_initial_fill() {
    let mut rt = setup(1);
    let rate = RateSlider::new(
        &mut rt,
        None,
        RateSliderDescriptor {
            initial_value: Some(2),
            ..RateSliderDescriptor::default()
        },
        None,
    );
    let id = rate.ids()[0];
    assert_eq!(colors(&rt, id), vec![ON, ON, OFF, OFF, OFF]);
    assert_eq!(rate.rate(&rt, id), Some(2));
    let star = select(&rt, root(&rt, id), ".rateItem")[0];
    assert_eq!(rt.document().text_content(star), "\u{2605}");
}

#[test]
fn test_rate_slider_hover_click_and_leave() {
    let mut rt = setup(1);
    let rate = RateSlider::new(&mut rt, None, RateSliderDescriptor::default(), None);
    let id = rate.ids()[0];
    let items = select(&rt, root(&rt, id), ".rateItem");

    rt.fire(EventType::MouseEnter, items[3]);
    assert_eq!(colors(&rt, id), vec![ON, ON, ON, ON, OFF]);
    assert_eq!(rate.rate(&rt, id), None);

    rt.fire(EventType::MouseOut, root(&rt, id));
    assert_eq!(colors(&rt, id), vec![OFF; 5]);

    rt.fire(EventType::Click, items[2]);
    assert_eq!(rate.rate(&rt, id), Some(3));
    assert_eq!(colors(&rt, id), vec![ON, ON, ON, OFF, OFF]);

    rt.fire(EventType::MouseEnter, items[0]);
    rt.fire(EventType::MouseOut, root(&rt, id));
    assert_eq!(colors(&rt, id), vec![ON, ON, ON, OFF, OFF]);
}

#[test]
fn test_read_only_rate_slider_ignores_pointer() {
    let mut rt = setup(1);
    let rate = RateSlider::new(
        &mut rt,
        None,
        RateSliderDescriptor {
            read_only: true,
            max_rate: 3,
            initial_value: Some(1),
            active_color: "gold".into(),
            ..RateSliderDescriptor::default()
        },
        None,
    );
    let id = rate.ids()[0];
    let items = select(&rt, root(&rt, id), ".rateItem");

    rt.fire(EventType::MouseEnter, items[2]);
    rt.fire(EventType::Click, items[2]);
    assert_eq!(rate.rate(&rt, id), Some(1));
    assert_eq!(colors(&rt, id), vec!["gold", OFF, OFF]);

    rate.set_value(&mut rt, 9, None);
    assert_eq!(rate.rate(&rt, id), Some(3));
    assert_eq!(colors(&rt, id), vec!["gold"; 3]);
}

// ============================================================================
// Label list
// ============================================================================

#[test]
fn test_label_list_title_and_labels() {
    let mut rt = setup(1);
    let list = LabelList::new(
        &mut rt,
        None,
        LabelListDescriptor {
            title: Some("Tags".into()),
            labels: vec!["rust".into(), "dom".into()],
            color: "white".into(),
            background_color: "navy".into(),
            ..LabelListDescriptor::default()
        },
        None,
    );
    let id = list.ids()[0];
    let node = root(&rt, id);
    let title = select(&rt, node, ".title")[0];
    assert_eq!(rt.document().text_content(title), "Tags: ");

    let labels = select(&rt, node, ".label");
    assert_eq!(labels.len(), 2);
    let style = rt.document().style(labels[0]);
    assert_eq!(style.get("background-color"), Some("navy"));
    assert_eq!(style.get("color"), Some("white"));
}

#[test]
fn test_label_text_is_not_parsed_as_markup() {
    let mut rt = setup(1);
    let list = LabelList::new(
        &mut rt,
        None,
        LabelListDescriptor {
            title: Some("a<i>b".into()),
            labels: vec!["<b>bold</b> & more".into()],
            ..LabelListDescriptor::default()
        },
        None,
    );
    let id = list.ids()[0];
    list.add(&mut rt, "x<br>y", None);

    let node = root(&rt, id);
    let title = select(&rt, node, ".title")[0];
    assert_eq!(rt.document().text_content(title), "a<i>b: ");
    let labels = select(&rt, node, ".label");
    assert_eq!(labels.len(), 2);
    for &label in &labels {
        assert!(rt.document().element_children(label).is_empty());
    }
    assert_eq!(rt.document().text_content(labels[0]), "<b>bold</b> & more");
    assert_eq!(rt.document().text_content(labels[1]), "x<br>y");
    assert!(select(&rt, node, "b, i, br").is_empty());

    list.remove(&mut rt, "x<br>y", None);
    assert_eq!(select(&rt, node, ".label").len(), 1);
}

#[test]
fn test_label_list_add_and_remove() {
    let mut rt = setup(1);
    let list = LabelList::new(
        &mut rt,
        None,
        LabelListDescriptor {
            labels: vec!["a".into(), "b".into(), "a".into()],
            color: "red".into(),
            ..LabelListDescriptor::default()
        },
        None,
    );
    let id = list.ids()[0];

    list.add(&mut rt, "c", None);
    let labels = select(&rt, root(&rt, id), ".label");
    assert_eq!(labels.len(), 4);
    assert_eq!(rt.document().style(labels[3]).get("color"), Some("red"));

    list.remove(&mut rt, "a", None);
    assert_eq!(list.labels(&rt, id).unwrap(), ["b", "a", "c"]);
    let texts: Vec<String> = select(&rt, root(&rt, id), ".label")
        .into_iter()
        .map(|l| rt.document().text_content(l))
        .collect();
    assert_eq!(texts, vec!["b", "a", "c"]);

    list.remove(&mut rt, "missing", None);
    assert_eq!(list.labels(&rt, id).unwrap().len(), 3);
}

// ============================================================================
// Scroller
// ============================================================================

/// A 200px high area with sections at 300px and 800px.
fn scroll_area(rt: &mut Runtime) -> NodeId {
    let body = rt.document().body();
    let area = rt
        .insert(
            "<div class=\"area\" style=\"height:200px\">\
             <div class=\"section\"></div><div class=\"section\"></div></div>",
            body,
            None,
        )
        .unwrap();
    let sections = select(rt, area, ".section");
    rt.document_mut().set_layout(sections[0], Rect::new(0.0, 300.0, 100.0, 100.0));
    rt.document_mut().set_layout(sections[1], Rect::new(0.0, 800.0, 100.0, 100.0));
    rt.document_mut().set_scroll_extent(area, 100.0, 1500.0, 100.0, 200.0);
    area
}

fn scroller(rt: &mut Runtime) -> (Scroller, WidgetId, NodeId) {
    let area = scroll_area(rt);
    let scroller = Scroller::new(
        rt,
        Some(".area"),
        ScrollerDescriptor {
            targets: vec![".section".into()],
            ..ScrollerDescriptor::default()
        },
    );
    let id = scroller.ids()[0];
    (scroller, id, area)
}

#[test]
fn test_scroller_is_first_child_near_bottom() {
    let mut rt = setup(0);
    let (s, id, area) = scroller(&mut rt);
    let arrow = root(&rt, id);

    assert_eq!(rt.document().element_children(area)[0], arrow);
    assert_eq!(rt.document().style(arrow).px("top"), Some(150.0));
    assert!(rt.has_class(arrow, "goingDown"));
    assert_eq!(s.direction(&rt, id), Some(Direction::Down));
    assert_eq!(s.target_positions(&rt, 0, false), vec![300.0, 800.0]);
}

#[test]
fn test_scroller_click_scrolls_to_next_target() {
    let mut rt = setup(0);
    let (s, id, area) = scroller(&mut rt);

    rt.fire(EventType::Click, root(&rt, id));
    rt.advance(Duration::from_millis(100));
    let first_tick = rt.document().scroll_top(area);
    assert!((first_tick - 90.0).abs() < 1e-9);

    rt.advance(Duration::from_secs(5));
    let top = rt.document().scroll_top(area);
    assert!((top - 300.0).abs() <= 1.0, "stopped at {top}");
    assert_eq!(s.direction(&rt, id), Some(Direction::Down));
    let arrow_top = rt.document().style(root(&rt, id)).px("top").unwrap();
    assert_eq!(arrow_top, 150.0 + top);
    assert_eq!(rt.scheduler().pending(), 0);
}

#[test]
fn test_scroller_turns_up_at_the_bottom() {
    let mut rt = setup(0);
    let (s, id, area) = scroller(&mut rt);

    rt.document_mut().set_scroll_position(area, 1300.0, 0.0);
    rt.fire(EventType::Scroll, area);
    assert_eq!(s.direction(&rt, id), Some(Direction::Up));
    let arrow = root(&rt, id);
    assert!(rt.has_class(arrow, "goingUp"));
    assert!(!rt.has_class(arrow, "goingDown"));

    assert_eq!(s.target_positions(&rt, 0, true), vec![-1000.0, -500.0]);
    rt.fire(EventType::Click, arrow);
    rt.advance(Duration::from_secs(5));
    let top = rt.document().scroll_top(area);
    assert!((top - 800.0).abs() <= 1.0, "stopped at {top}");
}

#[test]
fn test_scroller_targets_can_change() {
    let mut rt = setup(0);
    let (s, id, area) = scroller(&mut rt);
    s.remove_target(&mut rt, ".section");
    assert!(s.target_positions(&rt, 0, false).is_empty());

    rt.fire(EventType::Click, root(&rt, id));
    rt.advance(Duration::from_secs(1));
    assert_eq!(rt.document().scroll_top(area), 0.0);

    s.add_target(&mut rt, ".section");
    s.add_target(&mut rt, ".section");
    assert_eq!(s.target_positions(&rt, 0, false).len(), 2);
    assert!(s.target_positions(&rt, 3, false).is_empty());
}

#[test]
fn test_disposed_scroller_leaves_no_listener_on_its_container() {
    let mut rt = setup(0);
    let area = scroll_area(&mut rt);
    let handlers = rt.handler_count();
    let logged = rt.logged_listeners();
    let attached = rt.document().attachments(area).len();

    let scroller = Scroller::new(
        &mut rt,
        Some(".area"),
        ScrollerDescriptor {
            targets: vec![".section".into()],
            ..ScrollerDescriptor::default()
        },
    );
    let id = scroller.ids()[0];
    assert_eq!(rt.document().attachments(area).len(), attached + 1);

    assert!(rt.dispose(id));
    assert_eq!(rt.handler_count(), handlers);
    assert_eq!(rt.logged_listeners(), logged);
    assert_eq!(rt.document().attachments(area).len(), attached);

    rt.document_mut().set_scroll_position(area, 1300.0, 0.0);
    rt.fire(EventType::Scroll, area);
    assert!(rt.registry().find(&id).is_none());
}

#[test]
fn test_smooth_scroll_stops_at_the_edge() {
    let mut rt = setup(0);
    let area = scroll_area(&mut rt);
    focus::widgets::scroller::smooth_scroll_by(&mut rt, area, 5000.0, 0.0);
    rt.advance(Duration::from_secs(10));
    assert_eq!(rt.document().scroll_top(area), 1300.0);
    assert_eq!(rt.scheduler().pending(), 0);
}

// ============================================================================
// Descriptors from JSON
// ============================================================================

#[test]
fn test_malformed_fields_fall_back_to_defaults() {
    let descriptor: SliderDescriptor = serde_json::from_value(json!({
        "class": "not-a-list",
        "subSliders": 5,
        "min": 2,
        "max": 8,
        "label": "Score"
    }))
    .unwrap();
    assert!(descriptor.common.classes.is_empty());
    assert!(descriptor.sub_sliders.is_empty());
    assert_eq!((descriptor.min, descriptor.max), (2.0, 8.0));

    let grid: GridDescriptor = serde_json::from_value(json!({
        "checkable": 3,
        "nbItems": 4,
        "itemWidth": "20px",
        "class": ["listAlikeGrid"]
    }))
    .unwrap();
    assert_eq!(grid.mode(), SelectionMode::None);
    assert_eq!(grid.nb_items, 4);
    assert_eq!(grid.common.classes, vec!["listAlikeGrid"]);
}

#[test]
fn test_mistyped_scalars_use_the_descriptor_defaults() {
    let slider: SliderDescriptor =
        serde_json::from_value(json!({"min": 0, "max": "10", "value": 3})).unwrap();
    assert_eq!((slider.min, slider.max, slider.value), (0.0, 100.0, 3.0));

    let list: ResultListDescriptor =
        serde_json::from_value(json!({"nbElPerPage": "2", "list": [1]})).unwrap();
    assert_eq!(list.nb_el_per_page, 10);
    assert_eq!(list.list.len(), 1);

    let rate: RateSliderDescriptor = serde_json::from_value(json!({
        "readOnly": "yes",
        "maxRate": "x",
        "initialValue": "3",
        "pattern": 1,
        "activeColor": false
    }))
    .unwrap();
    assert!(!rate.read_only);
    assert_eq!(rate.max_rate, 5);
    assert_eq!(rate.initial_value, None);
    assert_eq!(rate.pattern, focus::widgets::rate_slider::DEFAULT_PATTERN);
    assert_eq!(rate.active_color, focus::widgets::rate_slider::DEFAULT_ACTIVE_COLOR);

    let button: ButtonDescriptor = serde_json::from_value(json!({"id": 7, "text": "ok"})).unwrap();
    assert_eq!(button.common.id, None);
    assert_eq!(button.text, "ok");

    let item: GridItemDescriptor =
        serde_json::from_value(json!({"width": 40, "content": "<b>x</b>"})).unwrap();
    assert_eq!(item.width, None);
    assert!(item.content.is_some());
}

#[test]
fn test_mistyped_id_still_builds_on_every_container() {
    let mut rt = setup(2);
    let descriptor: ButtonDescriptor =
        serde_json::from_value(json!({"id": 7, "text": "go"})).unwrap();
    let buttons = Button::new(&mut rt, Some(".question"), descriptor, None);
    assert_eq!(buttons.ids().len(), 2);
}

#[test]
fn test_descriptor_from_json_builds_widget() {
    let mut rt = setup(1);
    let descriptor: ResultListDescriptor = serde_json::from_value(json!({
        "id": "results",
        "list": [1, 2, 3],
        "nbElPerPage": 2
    }))
    .unwrap();
    let list = ResultList::new(&mut rt, Some(".question"), descriptor, None);
    let id = list.ids()[0];
    assert_eq!(list.page_count(&rt, id), 2);
    assert_eq!(rt.document().attr(root(&rt, id), "id"), Some("results"));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_invalid_container_selector_builds_nothing() {
    let mut rt = setup(1);
    let buttons = Button::new(&mut rt, Some("div["), ButtonDescriptor::new("x"), None);
    assert!(buttons.is_empty());
    assert!(rt.registry().is_empty());
}

#[test]
fn test_unmatched_container_selector_builds_nothing() {
    let mut rt = setup(1);
    let sliders = Slider::new(&mut rt, Some(".nowhere"), SliderDescriptor::default(), None);
    assert!(sliders.is_empty());
}

#[test]
fn test_id_restricts_to_first_container() {
    let mut rt = setup(3);
    let labels = LabelList::new(
        &mut rt,
        Some(".question"),
        LabelListDescriptor {
            common: Common::default().with_id("tags"),
            ..LabelListDescriptor::default()
        },
        None,
    );
    assert_eq!(labels.len(), 1);
    let first = rt.containers(Some(".question"))[0];
    assert_eq!(
        rt.registry().find(&labels.ids()[0]).unwrap().container,
        Some(first)
    );
}

#[test]
fn test_default_container_is_body() {
    let mut rt = setup(0);
    let button = Button::new(&mut rt, None, ButtonDescriptor::new("x"), None);
    let body = rt.document().body();
    assert_eq!(
        rt.registry().find(&button.ids()[0]).unwrap().container,
        Some(body)
    );
}
