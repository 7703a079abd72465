use std::fmt;

/// Route recognizer error
///
/// Returned by registration (`Router::add`) and by the generation side of the
/// router (`Router::generate`, `Router::handlers_for`). A path that matches no
/// route is not an error: `Router::recognize` returns `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerError {
    /// A dynamic segment declares a default value (`:id=1`)
    ///
    /// Default values are not part of the pattern syntax. The route is rejected
    /// before any automaton state is created for it.
    DefaultValueNotSupported {
        /// The parameter token as written, without the leading `:`
        param: String,
        /// The route pattern as registered
        route: String,
    },
    /// The route's capture pattern could not be compiled
    ///
    /// Only happens for patterns exceeding the regex size limits.
    InvalidPattern {
        /// The route pattern as registered
        route: String,
        /// The regex compiler's message
        reason: String,
    },
    /// No route is registered under the given name or handler id
    UnknownRoute {
        /// The name or handler id used for the lookup
        route: String,
    },
    /// A required dynamic or star segment has no value in the supplied parameters
    MissingParameter {
        /// The parameter name declared by the segment
        param: String,
        /// The name or handler id used for generation
        route: String,
    },
}

impl fmt::Display for RecognizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognizerError::DefaultValueNotSupported { param, route } => {
                write!(
                    f,
                    "Parameter {} in route {} has a default value, which is not supported.",
                    param, route
                )
            }
            RecognizerError::InvalidPattern { route, reason } => {
                write!(f, "Route {} cannot be compiled: {}", route, reason)
            }
            RecognizerError::UnknownRoute { route } => {
                write!(f, "There is no route named {}", route)
            }
            RecognizerError::MissingParameter { param, route } => {
                write!(
                    f,
                    "A value is required for route parameter '{}' in route '{}'.",
                    param, route
                )
            }
        }
    }
}

impl std::error::Error for RecognizerError {}
