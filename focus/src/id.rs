//! Widget identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a generated widget or sub-element.
///
/// Rendered into the `data-hash` attribute of the element it names, so it
/// survives serialization and reinsertion of the markup.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    /// Create a new unique widget ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse the value of a `data-hash` attribute.
    pub fn parse(hash: &str) -> Option<Self> {
        Uuid::parse_str(hash.trim()).ok().map(Self)
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WidgetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}
