//! Parameter containers and the query-string / path codecs around them.
//!
//! - [`Params`]: parameters bound by a recognized route (path captures)
//! - [`QueryParams`]: the query string of a recognized path, in arrival order
//! - [`RouteParams`]: caller-supplied parameters for path generation

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of parameters stored inline before heap allocation.
/// Most routes bind four or fewer parameters.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated storage for bound path parameters.
///
/// Param names are `Arc<str>` shared with the route record, so binding a
/// parameter only clones a pointer; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Parameters bound by the winning route, keyed by declared name
///
/// Assignment is a plain keyed overwrite: a route that declares the same
/// name twice ends up with the value of the last capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: ParamVec,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`
    pub fn insert(&mut self, name: Arc<str>, value: String) {
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Remove `name`; used when an optional capture did not participate
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.inner.iter().position(|(k, _)| k.as_ref() == name)?;
        Some(self.inner.remove(pos).1)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (k, v) in &self.inner {
            map.serialize_entry(k.as_ref(), v)?;
        }
        map.end()
    }
}

/// A query-string value, or a value supplied for path generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// A key without `=` (`?debug`) or a boolean parameter
    Flag(bool),
    Text(String),
    /// A repeated key (`?a=1&a=2`) or a `key[]` list
    List(Vec<String>),
}

impl QueryValue {
    /// The value as a single string, if it is one
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            QueryValue::Flag(_) | QueryValue::List(_) => None,
        }
    }

    /// Text used when the value fills a path segment
    #[must_use]
    pub fn as_path_value(&self) -> Cow<'_, str> {
        match self {
            QueryValue::Text(s) => Cow::Borrowed(s),
            QueryValue::Flag(true) => Cow::Borrowed("true"),
            QueryValue::Flag(false) => Cow::Borrowed("false"),
            QueryValue::List(items) => Cow::Owned(items.join(",")),
        }
    }

    fn append(&mut self, value: String) {
        match self {
            QueryValue::List(items) => items.push(value),
            QueryValue::Text(existing) => {
                *self = QueryValue::List(vec![std::mem::take(existing), value]);
            }
            QueryValue::Flag(b) => {
                *self = QueryValue::List(vec![b.to_string(), value]);
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Flag(b)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        QueryValue::List(items)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(items: Vec<&str>) -> Self {
        QueryValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Parsed query string, in order of first arrival
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    inner: SmallVec<[(String, QueryValue); MAX_INLINE_PARAMS]>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.inner.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Shortcut for single-valued keys
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(QueryValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn slot(&mut self, key: &str) -> Option<&mut QueryValue> {
        self.inner.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn set(&mut self, key: String, value: QueryValue) {
        match self.slot(&key) {
            Some(slot) => *slot = value,
            None => self.inner.push((key, value)),
        }
    }

    fn append(&mut self, key: String, value: String) {
        match self.slot(&key) {
            Some(slot) => slot.append(value),
            None => self.inner.push((key, QueryValue::Text(value))),
        }
    }

    fn append_list(&mut self, key: String, value: String) {
        match self.slot(&key) {
            Some(slot) => slot.append(value),
            None => self.inner.push((key, QueryValue::List(vec![value]))),
        }
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (k, v) in &self.inner {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Parameters supplied to `Router::generate`
///
/// Keys are kept sorted so that leftover parameters serialize into a stable
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteParams {
    inner: BTreeMap<String, QueryValue>,
}

impl RouteParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.inner.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.inner.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for RouteParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<&Params> for RouteParams {
    fn from(params: &Params) -> Self {
        params.iter().collect()
    }
}

/// Parse a query string (with or without its leading `?`)
///
/// Pieces are form-urlencoded (`+` is a space). A key without `=` becomes
/// `Flag(true)`, `key[]=v` appends to a list under `key`, and a repeated plain
/// key collects its values into a list. Empty keys are skipped.
#[must_use]
pub fn parse_query_string(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for piece in query.split('&').filter(|p| !p.is_empty()) {
        let has_value = piece.contains('=');
        let Some((key, value)) = url::form_urlencoded::parse(piece.as_bytes()).next() else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        if !has_value {
            params.set(key.into_owned(), QueryValue::Flag(true));
            continue;
        }
        match key.strip_suffix("[]").filter(|k| !k.is_empty()) {
            Some(list_key) => params.append_list(list_key.to_string(), value.into_owned()),
            None => params.append(key.into_owned(), value.into_owned()),
        }
    }

    params
}

/// Serialize parameters into a query string with keys in sorted order
///
/// Lists are written as repeated `key[]=value` pairs. Returns an empty string
/// when there is nothing to write.
pub fn build_query_string<'a>(params: impl IntoIterator<Item = (&'a str, &'a QueryValue)>) -> String {
    let mut pairs: Vec<(&str, &QueryValue)> = params.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        match value {
            QueryValue::Text(text) => {
                serializer.append_pair(key, text);
            }
            QueryValue::Flag(b) => {
                serializer.append_pair(key, if *b { "true" } else { "false" });
            }
            QueryValue::List(items) => {
                let list_key = format!("{key}[]");
                for item in items {
                    serializer.append_pair(&list_key, item);
                }
            }
        }
    }
    serializer.finish()
}

/// Escapes of these characters stay encoded when a path is decoded
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Percent-decode a path, leaving escapes of reserved characters intact
///
/// `/a%2Fb` keeps its `%2F`, so an encoded slash never splits a segment.
/// Returns `None` when a `%` is not followed by two hex digits, or when the
/// decoded bytes are not valid UTF-8.
#[must_use]
pub fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    if !path.contains('%') {
        return Some(Cow::Borrowed(path));
    }

    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut chunk_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let hex = path.get(i + 1..i + 3)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let escaped = u8::from_str_radix(hex, 16).ok()?;
        if RESERVED.contains(&escaped) {
            out.push_str(&urlencoding::decode(&path[chunk_start..i]).ok()?);
            out.push_str(&path[i..i + 3]);
            chunk_start = i + 3;
        }
        i += 3;
    }
    out.push_str(&urlencoding::decode(&path[chunk_start..]).ok()?);

    Some(Cow::Owned(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_insert_overwrites() {
        let mut params = Params::new();
        let id: Arc<str> = Arc::from("id");
        params.insert(Arc::clone(&id), "1".to_string());
        params.insert(id, "2".to_string());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.remove("id"), Some("2".to_string()));
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_query_string_shapes() {
        let q = parse_query_string("?a=1&b=x+y&flag&tags[]=t1&tags[]=t2&a=2&=skip");
        assert_eq!(
            q.get("a"),
            Some(&QueryValue::List(vec!["1".to_string(), "2".to_string()]))
        );
        assert_eq!(q.get_text("b"), Some("x y"));
        assert_eq!(q.get("flag"), Some(&QueryValue::Flag(true)));
        assert_eq!(
            q.get("tags"),
            Some(&QueryValue::List(vec!["t1".to_string(), "t2".to_string()]))
        );
        let keys: Vec<&str> = q.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "flag", "tags"]);
    }

    #[test]
    fn test_parse_query_string_decodes_percent() {
        let q = parse_query_string("name=J%C3%BCrgen&empty=");
        assert_eq!(q.get_text("name"), Some("Jürgen"));
        assert_eq!(q.get_text("empty"), Some(""));
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn test_build_query_string_sorted_and_encoded() {
        let params = RouteParams::from([("z", "last"), ("a", "x y")]);
        assert_eq!(build_query_string(params.iter()), "a=x+y&z=last");

        let list = RouteParams::new().with("tags", vec!["a", "b"]).with("on", true);
        let query = build_query_string(list.iter());
        assert_eq!(query, "on=true&tags%5B%5D=a&tags%5B%5D=b");

        let parsed = parse_query_string(&query);
        assert_eq!(
            parsed.get("tags"),
            Some(&QueryValue::List(vec!["a".to_string(), "b".to_string()]))
        );
        assert!(build_query_string(RouteParams::new().iter()).is_empty());
    }

    #[test]
    fn test_decode_path_keeps_reserved_escapes() {
        assert_eq!(decode_path("/plain").unwrap(), "/plain");
        assert_eq!(decode_path("/a%20b").unwrap(), "/a b");
        assert_eq!(decode_path("/a%2Fb%3f").unwrap(), "/a%2Fb%3f");
        assert_eq!(decode_path("/caf%C3%A9/%2F%41").unwrap(), "/café/%2FA");
        assert!(decode_path("/bad%FF").is_none());
    }

    #[test]
    fn test_decode_path_rejects_malformed_escapes() {
        assert!(decode_path("/a%zz").is_none());
        assert!(decode_path("/a%2").is_none());
        assert!(decode_path("/%").is_none());
        assert!(decode_path("/a%g1/b").is_none());
        assert_eq!(decode_path("/100%25").unwrap(), "/100%");
    }
}
