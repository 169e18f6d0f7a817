use std::ops::Index;
use std::slice;

/// A single wildcard value captured from a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// The wildcard values captured by a matched route, in the order their
/// placeholders appear in the route's path template.
///
/// Values can be retrieved by name or by position:
/// ```rust
/// # use flyrouter::Params;
/// let mut params = Params::new();
/// params.push("user", "gordon");
///
/// assert_eq!(params.get("user"), Some("gordon"));
/// assert_eq!(params[0].key, "user");
/// assert_eq!(params[0].value, "gordon");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    vec: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            vec: Vec::with_capacity(capacity),
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vec.push(Param {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Returns the value of the first parameter with the given name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vec
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Returns the captured values in template order.
    pub fn values(&self) -> Vec<&str> {
        self.vec.iter().map(|param| param.value.as_str()).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, Param> {
        self.vec.iter()
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
}

impl Index<usize> for Params {
    type Output = Param;

    fn index(&self, i: usize) -> &Param {
        &self.vec[i]
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}
