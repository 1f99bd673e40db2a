//! Builds a small survey page, plays a few interactions and prints the
//! resulting markup. Logs go to `survey.log`.

use std::time::Duration;

use serde_json::json;

use focus::logging::{self, LevelFilter};
use focus::prelude::*;

fn main() -> Result<(), FocusError> {
    logging::init("survey.log", LevelFilter::Debug)?;

    let mut rt = Runtime::new();
    let body = rt.document().body();
    for _ in 0..2 {
        rt.insert("<div class=\"question\"></div>", body, None)?;
    }

    let rating = RateSlider::new(&mut rt, Some(".question"), RateSliderDescriptor::default(), None);
    let slider = Slider::new(
        &mut rt,
        Some(".question"),
        serde_json::from_value(json!({
            "label": "Hours per week",
            "min": 0,
            "max": 40,
            "subSliders": [
                { "label": "work", "color": "steelblue" },
                { "label": "play", "color": "orange" }
            ]
        }))
        .unwrap_or_default(),
        None,
    );
    let grid = Grid::new(
        &mut rt,
        None,
        GridDescriptor {
            checkable: "multiple".into(),
            item_width: Some("80px".into()),
            contents: ["red", "green", "blue"]
                .into_iter()
                .map(GridItemDescriptor::with_content)
                .collect(),
            ..GridDescriptor::default()
        },
        None,
    );
    let results = ResultList::new(
        &mut rt,
        None,
        ResultListDescriptor::new((1..=23).map(|n| json!(n)).collect(), 5).with_render(
            |_, item, index| log::info!("result #{index}: {item}"),
        ),
        None,
    );

    let first_rating = rating.ids()[0];
    rating.set_value(&mut rt, 4, Some(first_rating));
    let roots: Vec<NodeId> = slider.generated(&rt).iter().map(|r| r.node).collect();
    for root in roots {
        if let Ok(Some(axis)) = rt.document().select_first(root, ".sliderAxis") {
            rt.document_mut().set_layout(axis, Rect::from_size(212.0, 8.0));
        }
    }
    slider.set_value(&mut rt, 25.0, None);

    let items = grid.items(&rt, None);
    for item in items.iter().step_by(2) {
        rt.fire(EventType::Click, item.node());
    }

    rt.advance(Duration::ZERO);
    results.go_to(&mut rt, 3, None);

    let grid_id = grid.ids()[0];
    let picked: Vec<String> = grid
        .selected(&rt, grid_id)
        .iter()
        .map(|item| rt.document().text_content(item.node()))
        .collect();
    println!("rating: {:?}", rating.rate(&rt, first_rating));
    println!("hours: {:?}", slider.value(&rt, slider.ids()[0]));
    println!("colours: {picked:?}");
    println!("page: {:?}", results.current_page(&rt, results.ids()[0]));
    println!("{}", rt.document().outer_html(body));
    Ok(())
}
