//! Error types for widget operations.

use std::fmt;

/// Errors raised by widget operations.
///
/// Every failure is reported before any state is touched, so a widget is
/// never left half-way through a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// A required argument was missing (for example an empty property key).
    NullArgument,

    /// An argument was present but unusable, such as a disposed parent.
    InvalidArgument,

    /// The widget has already been disposed.
    WidgetDisposed,

    /// The call was made from a thread other than the widget's owner.
    InvalidThreadAccess,

    /// The display does not allow widgets of this kind to be created.
    InvalidSubclass {
        /// Name of the rejected widget kind.
        kind: &'static str,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::NullArgument => write!(f, "Argument cannot be null"),
            WidgetError::InvalidArgument => write!(f, "Argument not valid"),
            WidgetError::WidgetDisposed => write!(f, "Widget is disposed"),
            WidgetError::InvalidThreadAccess => write!(f, "Invalid thread access"),
            WidgetError::InvalidSubclass { kind } => {
                write!(f, "Subclassing not allowed: {}", kind)
            }
        }
    }
}

impl std::error::Error for WidgetError {}

/// Result type alias for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
