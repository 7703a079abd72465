//! Route pattern segments and the character rules they expand into.
//!
//! A route pattern such as `/users/:id?/files/*path` is split on `/` into
//! [`Segment`]s. Each segment knows three things:
//!
//! - which [`CharSpec`]s it contributes to the automaton (`char_specs`)
//! - which fragment it contributes to the anchored capture pattern
//!   (`pattern_fragment`)
//! - how to render itself back into a path fragment (`render`)

use serde::Serialize;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

use super::params::RouteParams;
use crate::error::RecognizerError;

/// Capture fragment for a dynamic segment (one run of non-`/` characters)
pub(crate) const DYNAMIC_FRAGMENT: &str = "([^/]+)";
/// Capture fragment for a star segment (everything, `/` included)
pub(crate) const STAR_FRAGMENT: &str = "(.+)";

/// The set of characters a transition accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Accepts any character contained in the string
    Valid(Box<str>),
    /// Accepts any character *not* contained in the string
    Invalid(Box<str>),
}

/// A single character-acceptance rule in the automaton
///
/// Two specs are the same transition when their classes are equal; `repeat`
/// only decides whether a freshly created state gets a self-loop.
#[derive(Debug, Clone, Eq)]
pub struct CharSpec {
    pub class: CharClass,
    pub repeat: bool,
}

impl PartialEq for CharSpec {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
    }
}

impl CharSpec {
    /// Accept exactly the characters in `chars`
    pub fn valid(chars: impl Into<Box<str>>) -> Self {
        Self {
            class: CharClass::Valid(chars.into()),
            repeat: false,
        }
    }

    /// Accept any character except those in `chars`, repeatedly
    pub fn repeat_invalid(chars: impl Into<Box<str>>) -> Self {
        Self {
            class: CharClass::Invalid(chars.into()),
            repeat: true,
        }
    }

    /// The `/` boundary inserted in front of every non-empty segment
    pub fn separator() -> Self {
        Self::valid("/")
    }

    /// Whether this rule accepts `ch`
    #[inline]
    #[must_use]
    pub fn accepts(&self, ch: char) -> bool {
        match &self.class {
            CharClass::Valid(chars) => chars.contains(ch),
            CharClass::Invalid(chars) => !chars.contains(ch),
        }
    }
}

/// Tally of segment kinds a route contributed, used for disambiguation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentTypes {
    pub statics: usize,
    pub dynamics: usize,
    pub stars: usize,
}

/// One `/`-delimited component of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static { text: String, case_sensitive: bool },
    /// `:name` or `:name?`, matches one run of characters excluding `/`
    Dynamic { name: Arc<str>, optional: bool },
    /// `*name`, matches the rest of the path including `/`
    Star { name: Arc<str> },
    /// Empty component (`//` or a trailing `/`), contributes nothing
    Epsilon,
}

impl Segment {
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Segment::Dynamic { optional: true, .. })
    }

    /// Parameter name bound by this segment, if any
    #[must_use]
    pub fn name(&self) -> Option<&Arc<str>> {
        match self {
            Segment::Dynamic { name, .. } | Segment::Star { name } => Some(name),
            Segment::Static { .. } | Segment::Epsilon => None,
        }
    }

    /// Expand into the character rules that follow the `/` boundary
    pub fn char_specs(&self) -> SmallVec<[CharSpec; 8]> {
        match self {
            Segment::Static {
                text,
                case_sensitive,
            } => text
                .chars()
                .map(|ch| {
                    if *case_sensitive {
                        CharSpec::valid(ch.to_string())
                    } else {
                        let mut both: String = ch.to_uppercase().collect();
                        both.extend(ch.to_lowercase());
                        CharSpec::valid(both)
                    }
                })
                .collect(),
            Segment::Dynamic { .. } => smallvec::smallvec![CharSpec::repeat_invalid("/")],
            Segment::Star { .. } => smallvec::smallvec![CharSpec::repeat_invalid("")],
            Segment::Epsilon => SmallVec::new(),
        }
    }

    /// Fragment of the anchored capture pattern, without the leading `/`
    pub fn pattern_fragment(&self) -> String {
        match self {
            Segment::Static { text, .. } => regex::escape(text),
            Segment::Dynamic { .. } => DYNAMIC_FRAGMENT.to_string(),
            Segment::Star { .. } => STAR_FRAGMENT.to_string(),
            Segment::Epsilon => String::new(),
        }
    }

    /// Render this segment given the caller's parameters
    ///
    /// Dynamic and star segments record their name in `consumed` whether or
    /// not a value was supplied. Returns `None` when there is nothing to emit.
    pub(crate) fn render<'a>(
        &'a self,
        params: &'a RouteParams,
        consumed: &mut SmallVec<[Arc<str>; 8]>,
    ) -> Option<Cow<'a, str>> {
        match self {
            Segment::Static { text, .. } => Some(Cow::Borrowed(text.as_str())),
            Segment::Dynamic { name, .. } | Segment::Star { name } => {
                consumed.push(Arc::clone(name));
                params.get(name).map(|v| v.as_path_value())
            }
            Segment::Epsilon => None,
        }
    }
}

/// Result of parsing a route pattern
#[derive(Debug, Clone)]
pub(crate) struct ParsedRoute {
    pub segments: Vec<Segment>,
    pub names: Vec<Arc<str>>,
    pub types: SegmentTypes,
}

/// Split a route pattern into segments
///
/// One leading `/` is stripped. Dynamic names containing `=` (a default value)
/// are rejected before anything else happens to the route.
pub(crate) fn parse_route(route: &str, case_sensitive: bool) -> Result<ParsedRoute, RecognizerError> {
    let normalized = route.strip_prefix('/').unwrap_or(route);

    let mut segments = Vec::new();
    let mut names = Vec::new();
    let mut types = SegmentTypes::default();

    for component in normalized.split('/') {
        if let Some((name, optional)) = dynamic_token(component) {
            if name.contains('=') {
                return Err(RecognizerError::DefaultValueNotSupported {
                    param: name.to_string(),
                    route: route.to_string(),
                });
            }
            let name: Arc<str> = Arc::from(name);
            names.push(Arc::clone(&name));
            types.dynamics += 1;
            segments.push(Segment::Dynamic { name, optional });
        } else if let Some(name) = component.strip_prefix('*').filter(|n| !n.is_empty()) {
            let name: Arc<str> = Arc::from(name);
            names.push(Arc::clone(&name));
            types.stars += 1;
            segments.push(Segment::Star { name });
        } else if component.is_empty() {
            segments.push(Segment::Epsilon);
        } else {
            types.statics += 1;
            segments.push(Segment::Static {
                text: component.to_string(),
                case_sensitive,
            });
        }
    }

    Ok(ParsedRoute {
        segments,
        names,
        types,
    })
}

/// `:name` / `:name?` where `name` is non-empty and free of `?`
fn dynamic_token(component: &str) -> Option<(&str, bool)> {
    let body = component.strip_prefix(':')?;
    let (name, optional) = match body.strip_suffix('?') {
        Some(name) => (name, true),
        None => (body, false),
    };
    if name.is_empty() || name.contains('?') {
        return None;
    }
    Some((name, optional))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classifies_components() {
        let parsed = parse_route("/users/:id?/files/*path", false).unwrap();
        assert_eq!(parsed.segments.len(), 4);
        assert!(matches!(parsed.segments[0], Segment::Static { .. }));
        assert!(parsed.segments[1].is_optional());
        assert!(matches!(parsed.segments[3], Segment::Star { .. }));
        assert_eq!(
            parsed.types,
            SegmentTypes {
                statics: 2,
                dynamics: 1,
                stars: 1
            }
        );
        let names: Vec<&str> = parsed.names.iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, vec!["id", "path"]);
    }

    #[test]
    fn test_parse_empty_components_are_epsilon() {
        let parsed = parse_route("a//b", false).unwrap();
        assert_eq!(parsed.segments[1], Segment::Epsilon);
        assert_eq!(parsed.types.statics, 2);

        let root = parse_route("/", false).unwrap();
        assert_eq!(root.segments, vec![Segment::Epsilon]);
    }

    #[test]
    fn test_bare_sigils_are_static() {
        let parsed = parse_route(":/*/:?", false).unwrap();
        assert_eq!(parsed.types.statics, 3);
        assert!(parsed.names.is_empty());
    }

    #[test]
    fn test_default_value_is_rejected() {
        let err = parse_route("user/:id=1", false).unwrap_err();
        assert_eq!(
            err,
            RecognizerError::DefaultValueNotSupported {
                param: "id=1".to_string(),
                route: "user/:id=1".to_string()
            }
        );
    }

    #[test]
    fn test_static_specs_fold_case_unless_sensitive() {
        let seg = Segment::Static {
            text: "aB".to_string(),
            case_sensitive: false,
        };
        let specs = seg.char_specs();
        assert_eq!(specs[0], CharSpec::valid("Aa"));
        assert_eq!(specs[1], CharSpec::valid("Bb"));

        let strict = Segment::Static {
            text: "aB".to_string(),
            case_sensitive: true,
        };
        let specs = strict.char_specs();
        assert!(specs[0].accepts('a'));
        assert!(!specs[0].accepts('A'));
    }

    #[test]
    fn test_repeat_does_not_affect_equality() {
        let mut a = CharSpec::repeat_invalid("/");
        let b = CharSpec::repeat_invalid("/");
        a.repeat = false;
        assert_eq!(a, b);
        assert_ne!(CharSpec::valid("/"), CharSpec::repeat_invalid("/"));
    }

    #[test]
    fn test_star_accepts_everything() {
        let spec = CharSpec::repeat_invalid("");
        assert!(spec.accepts('/'));
        assert!(spec.accepts('x'));
        let dynamic = CharSpec::repeat_invalid("/");
        assert!(!dynamic.accepts('/'));
    }

    #[test]
    fn test_static_fragment_is_escaped() {
        let seg = Segment::Static {
            text: "a.b+c".to_string(),
            case_sensitive: false,
        };
        assert_eq!(seg.pattern_fragment(), r"a\.b\+c");
    }

    #[test]
    fn test_render_borrows_text_and_records_names() {
        let parsed = parse_route("/users/:id/*rest", false).unwrap();
        let params = RouteParams::from([("id", "7")]);
        let mut consumed = SmallVec::new();

        let rendered: Vec<_> = parsed
            .segments
            .iter()
            .map(|s| s.render(&params, &mut consumed))
            .collect();
        assert!(matches!(rendered[0], Some(Cow::Borrowed("users"))));
        assert!(matches!(rendered[1], Some(Cow::Borrowed("7"))));
        assert!(rendered[2].is_none());
        assert_eq!(consumed.len(), 2);
        assert_eq!(consumed[1].as_ref(), "rest");
    }
}
