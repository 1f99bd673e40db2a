//! Empty banner framed by two shadow strips.

use serde::Deserialize;

use crate::descriptor::Common;
use crate::id::WidgetId;
use crate::registry::WidgetData;
use crate::runtime::Runtime;

use super::{mount, Widget};

pub const BASE_CLASS: &str = "basic_banner";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BannerDescriptor {
    #[serde(flatten)]
    pub common: Common,
}

impl BannerDescriptor {
    fn markup(&self, id: WidgetId) -> String {
        format!(
            "<div>\
             <div class=\"shadow-top\" style=\"height:4px\"></div>\
             <div{}{} data-hash=\"{id}\"></div>\
             <div class=\"shadow-bottom\" style=\"height:15px\"></div>\
             </div>",
            self.common.id_attr(),
            self.common.class_attr(),
        )
    }
}

/// Banners insert a wrapper holding three elements. Records track the
/// middle one; [`Runtime::widget_root`] gives the wrapper.
#[derive(Debug, Clone)]
pub struct Banner {
    ids: Vec<WidgetId>,
}

impl Banner {
    pub fn new(
        rt: &mut Runtime,
        container: Option<&str>,
        mut descriptor: BannerDescriptor,
        position: Option<usize>,
    ) -> Self {
        descriptor.common.add_base_class(BASE_CLASS);
        let containers = descriptor.common.restrict(rt.containers(container));

        let mut ids = Vec::new();
        for container in containers {
            let id = WidgetId::new();
            let mounted = mount(
                rt,
                id,
                &descriptor.markup(id),
                container,
                position,
                &descriptor.common.listeners,
                |_, _| WidgetData::Banner,
            );
            if mounted.is_some() {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

impl Widget for Banner {
    fn ids(&self) -> &[WidgetId] {
        &self.ids
    }
}
