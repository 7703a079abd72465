use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Strongly typed handler identifier.
///
/// Route records are indexed by handler identity. Handlers carry an explicit
/// stable id instead of relying on reference identity, so two `RouteHandler`
/// values with the same id refer to the same registration slot.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct HandlerId(Arc<str>);

impl HandlerId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for HandlerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HandlerId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HandlerId::new(s))
    }
}

impl From<&str> for HandlerId {
    fn from(s: &str) -> Self {
        HandlerId::new(s)
    }
}

impl From<String> for HandlerId {
    fn from(s: String) -> Self {
        HandlerId(Arc::from(s))
    }
}

impl AsRef<str> for HandlerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for HandlerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HandlerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(serde::de::Error::custom("handler id must not be empty"));
        }
        Ok(HandlerId::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_id_equality_is_by_value() {
        let a = HandlerId::new("user");
        let b: HandlerId = "user".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "user");
    }

    #[test]
    fn test_handler_id_rejects_empty_string() {
        let result: Result<HandlerId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
        let ok: HandlerId = serde_json::from_str("\"posts\"").unwrap();
        assert_eq!(ok.as_str(), "posts");
    }
}
