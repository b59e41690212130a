use std::collections::HashMap;
use std::fmt;

/// The parameters attached to a single dispatched request.
///
/// Populated from, in merge order (later overwrites earlier): the query
/// string, the decoded request body, and captured path-template segments.
/// A fresh map is allocated for every dispatch and handed by reference to
/// each handler the request invokes.
///
/// ```
/// # use signpost::Params;
/// fn greet(params: &Params) -> String {
///     match params.get("name") {
///         Some(name) => format!("hello, {name}"),
///         None => "hello".to_owned(),
///     }
/// }
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Params {
    map: HashMap<String, String>,
}

impl Params {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the value registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.map.get(key.as_ref()).map(String::as_str)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the parameters, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // Later inserts overwrite earlier ones, which is what gives query, body
    // and capture merging its precedence.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}
