//! Image next to a paragraph of text.

use serde::Deserialize;

use focusdom::markup::escape_attr;

use crate::descriptor::{lenient, Common};
use crate::id::WidgetId;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_imageTextZone";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageTextZoneDescriptor {
    #[serde(flatten)]
    pub common: Common,
    /// Show the text cell first.
    #[serde(deserialize_with = "lenient")]
    pub image_after: bool,
    /// CSS width of the image.
    #[serde(deserialize_with = "lenient")]
    pub image_width: String,
    /// CSS height of the image.
    #[serde(deserialize_with = "lenient")]
    pub image_height: String,
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub alt: String,
    #[serde(deserialize_with = "lenient")]
    pub text: String,
}

impl ImageTextZoneDescriptor {
    fn markup(&self, id: WidgetId) -> String {
        let image = format!(
            "<td class=\"image\" data-hash=\"{}\">\
             <img class=\"bli\" data-hash=\"{}\" src=\"{}\" alt=\"{}\" style=\"width:{}; height:{};\">\
             </td>",
            WidgetId::new(),
            WidgetId::new(),
            escape_attr(&self.url),
            escape_attr(&self.alt),
            escape_attr(&self.image_width),
            escape_attr(&self.image_height),
        );
        let text = format!(
            "<td class=\"text\" data-hash=\"{}\"><p>{}</p></td>",
            WidgetId::new(),
            self.text
        );
        let (first, second) = if self.image_after {
            (text, image)
        } else {
            (image, text)
        };
        format!(
            "<table{}{} data-hash=\"{id}\"><tr>{first}{second}</tr></table>",
            self.common.class_attr(),
            self.common.id_attr(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ImageTextZone {
    ids: Vec<WidgetId>,
}

impl ImageTextZone {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: ImageTextZoneDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for container in containers {
            let id = WidgetId::new();
            let image = descriptor.url.clone();
            let text = descriptor.text.clone();
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id),
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::ImageTextZone { image, text },
            );
            if mounted.is_some() {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

impl Widget for ImageTextZone {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
