use focusdom::{MarkupError, SelectorError};
use thiserror::Error;

use crate::id::WidgetId;

/// Errors raised by runtime operations.
///
/// Widget constructors never surface these: they log them and generate
/// fewer instances instead.
#[derive(Debug, Error)]
pub enum FocusError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("invalid markup: {0}")]
    Markup(#[from] MarkupError),

    #[error("markup did not produce any element")]
    NoElement,

    #[error("no widget registered for {0}")]
    UnknownWidget(WidgetId),

    #[error("could not open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}
