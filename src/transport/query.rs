use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `name=value` entry of a query string. The value is already rendered.
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Render `params` as an `application/x-www-form-urlencoded` query string.
///
/// Keys come out in ascending order; entries sharing a key keep their relative
/// order. Entries with an empty value are dropped.
pub fn encode(params: &[QueryParam]) -> String {
    let mut sorted: Vec<&QueryParam> = params.iter().filter(|p| !p.value.is_empty()).collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for param in sorted {
        serializer.append_pair(&param.name, &param.value);
    }
    serializer.finish()
}

/// Typed parameter structs that can render themselves as query entries.
pub trait ToQueryParams {
    fn to_query_params(&self) -> Vec<QueryParam>;
}

impl ToQueryParams for [QueryParam] {
    fn to_query_params(&self) -> Vec<QueryParam> {
        self.to_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Collects query entries from optional, mixed-type fields.
///
/// Zero numbers, `false` and `None` are skipped here so the encoder only ever
/// sees values the caller actually set.
pub struct QueryParams {
    params: Vec<QueryParam>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push(QueryParam::new(name, value));
        self
    }

    pub fn push_opt<V: AsRef<str>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(name, value.as_ref()),
            None => self,
        }
    }

    /// Skipped when `value` is zero.
    pub fn push_int(self, name: &str, value: i64) -> Self {
        if value == 0 {
            self
        } else {
            self.push(name, value.to_string())
        }
    }

    /// Skipped when `value` is `false`.
    pub fn push_bool(self, name: &str, value: bool) -> Self {
        if value { self.push(name, "true") } else { self }
    }

    /// RFC 3339 with millisecond precision and a `Z` suffix.
    pub fn push_time(self, name: &str, value: Option<DateTime<Utc>>) -> Self {
        match value {
            Some(time) => self.push(name, time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => self,
        }
    }

    /// One entry per value, all under `name`, in iteration order.
    pub fn push_all<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.params
            .extend(values.into_iter().map(|value| QueryParam::new(name, value)));
        self
    }

    pub fn as_slice(&self) -> &[QueryParam] {
        &self.params
    }

    pub fn into_vec(self) -> Vec<QueryParam> {
        self.params
    }

    pub fn encode(&self) -> String {
        encode(&self.params)
    }
}

impl From<QueryParams> for Vec<QueryParam> {
    fn from(value: QueryParams) -> Self {
        value.params
    }
}
