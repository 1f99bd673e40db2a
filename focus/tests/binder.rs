use std::cell::RefCell;
use std::rc::Rc;

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

/// Attachments on every connected node.
fn connected_attachments(rt: &Runtime) -> usize {
    let doc = rt.document();
    doc.descendants(doc.root())
        .into_iter()
        .map(|n| doc.attachments(n).len())
        .sum()
}

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Listener) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let make = move |name: &str| {
        let sink = Rc::clone(&sink);
        let name = name.to_string();
        Listener::new(EventType::Click, move |_, _| sink.borrow_mut().push(name.clone()))
    };
    (log, make)
}

// ============================================================================
// Rebind
// ============================================================================

#[test]
fn test_rebind_twice_adds_nothing() {
    let mut rt = setup(1);
    let slider = Slider::new(
        &mut rt,
        None,
        SliderDescriptor {
            sub_sliders: vec![SubSliderDescriptor::default(); 2],
            ..SliderDescriptor::new(0.0, 10.0)
        },
        None,
    );
    let node = rt.registry().find(&slider.ids()[0]).unwrap().node;
    let before = connected_attachments(&rt);
    assert!(before > 0);

    rt.rebind(node);
    assert_eq!(connected_attachments(&rt), before);
    rt.rebind(node);
    assert_eq!(connected_attachments(&rt), before);
}

#[test]
fn test_moved_markup_gets_its_listeners_back() {
    let mut rt = setup(2);
    let containers = rt.containers(Some(".question"));
    let slider = Slider::new(
        &mut rt,
        Some(".question"),
        SliderDescriptor {
            common: Common::default().with_id("only"),
            ..SliderDescriptor::new(0.0, 10.0)
        },
        None,
    );
    let id = slider.ids()[0];
    let old = rt.registry().find(&id).unwrap().node;
    let before = connected_attachments(&rt);

    let html = rt.document().outer_html(old);
    rt.document_mut().detach(old);
    assert!(connected_attachments(&rt) < before);
    let inserted = rt.insert(&html, containers[1], None).unwrap();
    assert_eq!(connected_attachments(&rt), before);

    rt.rebind(inserted);
    assert_eq!(connected_attachments(&rt), before);

    // the moved copy still reacts to track clicks
    let axis = rt.document().select_first(inserted, ".sliderAxis").unwrap().unwrap();
    rt.document_mut().set_layout(axis, Rect::from_size(112.0, 4.0));
    let dynamic = rt
        .document()
        .select_first(inserted, ".dynamicItemsContainer")
        .unwrap()
        .unwrap();
    rt.dispatch(Event::new(EventType::Click, dynamic).offset(70.0, 0.0));
    assert_eq!(slider.value(&rt, id), Some(7.0));
}

#[test]
fn test_listeners_on_unhashed_nodes_are_not_replayed() {
    let mut rt = setup(1);
    let container = rt.containers(Some(".question"))[0];
    rt.bind(container, [Listener::new("click", |_, _| {})]);
    assert_eq!(rt.logged_listeners(), 1);

    let html = rt.document().outer_html(container);
    let body = rt.document().body();
    rt.document_mut().detach(container);
    let copy = rt.insert(&html, body, None).unwrap();
    assert!(rt.document().attachments(copy).is_empty());
}

// ============================================================================
// Delegation
// ============================================================================

#[test]
fn test_delegated_listener_filters_on_target_hash() {
    let mut rt = setup(2);
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    let buttons = Button::new(
        &mut rt,
        Some(".question"),
        ButtonDescriptor {
            common: Common::default().with_listener(Listener::new("click", move |_, _| {
                *counter.borrow_mut() += 1;
            })),
            ..ButtonDescriptor::new("go")
        },
        None,
    );
    let records: Vec<NodeId> = buttons.generated(&rt).iter().map(|r| r.node).collect();

    rt.fire(EventType::Click, records[0]);
    rt.fire(EventType::Click, records[1]);
    assert_eq!(*hits.borrow(), 2);

    // clicks elsewhere never reach the handler
    let container = rt.containers(Some(".question"))[0];
    rt.fire(EventType::Click, container);
    assert_eq!(*hits.borrow(), 2);
}

#[test]
fn test_delegated_listener_survives_move() {
    let mut rt = setup(2);
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    let button = Button::new(
        &mut rt,
        None,
        ButtonDescriptor {
            common: Common::default().with_listener(Listener::new("click", move |_, _| {
                *counter.borrow_mut() += 1;
            })),
            ..ButtonDescriptor::new("go")
        },
        None,
    );
    let id = button.ids()[0];
    let node = rt.registry().find(&id).unwrap().node;
    let html = rt.document().outer_html(node);
    rt.document_mut().detach(node);
    let target = rt.containers(Some(".question"))[1];
    let moved = rt.insert(&html, target, None).unwrap();

    rt.fire(EventType::Click, moved);
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(rt.registry().find(&id).unwrap().node, moved);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_capture_then_target_then_bubble() {
    let mut rt = setup(1);
    let outer = rt.containers(Some(".question"))[0];
    let inner = rt.insert("<span>x</span>", outer, None).unwrap();
    let (log, make) = recorder();

    rt.bind(outer, [make("outer bubble")]);
    rt.bind(outer, [make("outer capture").capture(true)]);
    rt.bind(inner, [make("inner")]);

    rt.fire(EventType::Click, inner);
    assert_eq!(
        *log.borrow(),
        vec!["outer capture", "inner", "outer bubble"]
    );
}

#[test]
fn test_non_bubbling_events_stop_at_target() {
    let mut rt = setup(1);
    let outer = rt.containers(Some(".question"))[0];
    let inner = rt.insert("<span>x</span>", outer, None).unwrap();
    let hits = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&hits);
    rt.bind(
        outer,
        [Listener::new(EventType::MouseEnter, move |_, e: &Event| {
            sink.borrow_mut().push(e.current_target)
        })],
    );
    let sink = Rc::clone(&hits);
    rt.bind(
        inner,
        [Listener::new(EventType::MouseEnter, move |_, e: &Event| {
            sink.borrow_mut().push(e.current_target)
        })],
    );

    rt.fire(EventType::MouseEnter, inner);
    assert_eq!(*hits.borrow(), vec![inner]);
}

#[test]
fn test_handler_sees_current_target() {
    let mut rt = setup(1);
    let outer = rt.containers(Some(".question"))[0];
    let inner = rt.insert("<span>x</span>", outer, None).unwrap();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    rt.bind(
        outer,
        [Listener::new("click", move |_, e: &Event| {
            *sink.borrow_mut() = Some((e.target, e.current_target))
        })],
    );

    rt.fire(EventType::Click, inner);
    assert_eq!(*seen.borrow(), Some((inner, outer)));
}
