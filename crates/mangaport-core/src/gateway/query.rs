//! Provider query-string encoding.
//!
//! Parameters are kept in insertion order; providers may be order-sensitive
//! for repeated keys. Every leaf (key or value) is form-encoded exactly once,
//! so bracket suffixes travel as `%5B`/`%5D`.

use mangaport_types::Provider;
use url::form_urlencoded;

/// One parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    /// Ordered sequence; `key[]=v` per element unless comma-joined.
    List(Vec<String>),
    /// `key[sub]=v` per entry, e.g. order specifications.
    Nested(Vec<(String, String)>),
}

/// Insertion-ordered parameter mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((key.into(), ParamValue::Scalar(value.to_string())));
        self
    }

    pub fn list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.entries.push((key.into(), ParamValue::List(values)));
        self
    }

    pub fn nested<I, K, V>(mut self, key: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.entries.push((key.into(), ParamValue::Nested(entries)));
        self
    }

    /// Parse an inbound raw query into scalar entries, original order kept.
    ///
    /// Bracketed keys such as `includes[]` stay verbatim, so re-encoding
    /// reproduces the caller's pairs without a second escaping pass.
    pub fn from_query_str(raw: &str) -> Self {
        let entries = form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), ParamValue::Scalar(v.into_owned())))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Encoder bound to one provider's comma-joined allow-list.
#[derive(Debug, Clone, Copy)]
pub struct QueryEncoder {
    comma_joined: &'static [&'static str],
}

impl QueryEncoder {
    pub const fn new(comma_joined: &'static [&'static str]) -> Self {
        Self { comma_joined }
    }

    pub const fn for_provider(provider: Provider) -> Self {
        Self::new(provider.comma_joined_params())
    }

    fn is_comma_joined(&self, key: &str) -> bool {
        self.comma_joined.iter().any(|k| *k == key)
    }

    /// Encode `params` into a query string without the leading `?`.
    ///
    /// An empty comma-joined list emits no pair at all rather than a bare
    /// `manga=`, which MangaDex would read as a filter on an empty id.
    pub fn encode(&self, params: &QueryParams) -> String {
        let mut parts: Vec<String> = Vec::new();

        for (key, value) in params.iter() {
            match value {
                ParamValue::Scalar(v) => parts.push(pair(key, v)),
                ParamValue::List(values) if self.is_comma_joined(key) => {
                    if !values.is_empty() {
                        parts.push(pair(key, &values.join(",")));
                    }
                },
                ParamValue::List(values) => {
                    let array_key = format!("{}[]", key);
                    parts.extend(values.iter().map(|v| pair(&array_key, v)));
                },
                ParamValue::Nested(entries) => {
                    parts.extend(
                        entries.iter().map(|(sub, v)| pair(&format!("{}[{}]", key, sub), v)),
                    );
                },
            }
        }

        parts.join("&")
    }
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", escape(key), escape(value))
}

fn escape(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
