//! A case-insensitive, insertion-ordered collection of header values.
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The headers attached to an HTTP message.
///
/// Header names are compared case-insensitively: `content-type` and `Content-Type`
/// refer to the same header.
/// The casing used the first time a header was set is remembered and used when
/// iterating over the collection.
///
/// A header can carry multiple values (e.g. `Set-Cookie`): they are kept in the
/// order they were added.
/// Distinct headers are kept in insertion order.
///
/// # Example
///
/// ```rust
/// use http_message::headers::Headers;
///
/// let mut headers = Headers::new();
/// headers.add("Set-Cookie", "a=1");
/// headers.add("set-cookie", "b=2");
///
/// assert_eq!(headers.get("SET-COOKIE").unwrap(), ["a=1", "b=2"]);
/// assert_eq!(headers.iter().next().unwrap().0, "Set-Cookie");
/// ```
pub struct Headers {
    entries: IndexMap<String, HeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl Headers {
    /// Create an empty header collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to a single value, replacing every value it might already have.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.set_all(name, [value]);
    }

    /// Set `name` to the given values, replacing every value it might already have.
    pub fn set_all<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entries
            .entry(fold(name))
            .or_insert_with(|| HeaderEntry {
                name: name.to_owned(),
                values: Vec::new(),
            })
            .values = values;
    }

    /// Append a value to `name`, keeping the ones it already has.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(fold(name))
            .or_insert_with(|| HeaderEntry {
                name: name.to_owned(),
                values: Vec::new(),
            })
            .values
            .push(value.into());
    }

    /// All the values for `name`, in insertion order.
    ///
    /// It returns `None` if the header has never been set.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .get(&fold(name))
            .map(|entry| entry.values.as_slice())
    }

    /// The first value for `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)?.first().map(String::as_str)
    }

    /// All the values for `name`, joined by `, `.
    ///
    /// It returns `None` if the header has never been set.
    pub fn line(&self, name: &str) -> Option<String> {
        self.get(name).map(|values| values.join(", "))
    }

    /// Whether `name` has been set.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    /// Remove `name`, returning its values.
    ///
    /// Removing a header that has never been set is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries
            .shift_remove(&fold(name))
            .map(|entry| entry.values)
    }

    /// Iterate over `(name, values)` pairs, in insertion order.
    ///
    /// Names are returned with the casing they had when they were first set.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// The number of distinct headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl<N, V> Extend<(N, V)> for Headers
where
    N: AsRef<str>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.add(name.as_ref(), value);
        }
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}
