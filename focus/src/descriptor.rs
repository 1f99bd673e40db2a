//! Descriptor fields shared by every widget kind.
//!
//! Descriptors deserialize from the same JSON objects the widgets were
//! always configured with. Malformed fields are coerced to their defaults
//! instead of failing the whole descriptor.

use focusdom::markup::escape_attr;
use focusdom::NodeId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::listener::Listener;

/// Fields every descriptor carries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Common {
    /// DOM id. When set only the first container gets an instance.
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Extra CSS classes. The widget's base class is always added.
    #[serde(rename = "class", deserialize_with = "lenient_vec")]
    pub classes: Vec<String>,
    /// Listeners delegated to the widget's identifier.
    #[serde(skip)]
    pub listeners: Vec<Listener>,
}

impl Common {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_listener(mut self, listener: Listener) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Add `class` unless it is already there.
    pub fn add_base_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// ` class="..."` attribute text.
    pub fn class_attr(&self) -> String {
        format!(" class=\"{}\"", escape_attr(&self.classes.join(" ")))
    }

    /// ` id="..."` attribute text, empty when no id is set.
    pub fn id_attr(&self) -> String {
        match &self.id {
            Some(id) => format!(" id=\"{}\"", escape_attr(id)),
            None => String::new(),
        }
    }

    /// Keep only the first container when an id is set.
    pub fn restrict(&self, mut containers: Vec<NodeId>) -> Vec<NodeId> {
        if self.id.is_some() {
            containers.truncate(1);
        }
        containers
    }
}

/// Deserialize a list, replacing anything that is not a well formed array
/// with an empty one.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_array() {
        if !value.is_null() {
            log::warn!("expected an array, got {value}; using an empty list");
        }
        return Ok(Vec::new());
    }
    match serde_json::from_value(value) {
        Ok(items) => Ok(items),
        Err(err) => {
            log::warn!("ignoring malformed list: {err}");
            Ok(Vec::new())
        }
    }
}

/// Deserialize a value, falling back to `T::default()` when it does not fit.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient_or(deserializer, T::default())
}

/// Deserialize a value, falling back to `fallback` when it does not fit.
///
/// Fields whose default is not `T::default()` wrap this in a named function
/// for `deserialize_with`.
pub(crate) fn lenient_or<'de, D, T>(deserializer: D, fallback: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            log::warn!("ignoring malformed field: {err}");
            Ok(fallback)
        }
    }
}

/// Pixel length as CSS text.
pub(crate) fn css_px(value: f64) -> String {
    format!("{value}px")
}
