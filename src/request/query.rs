/// Ordered query parameters, passed through verbatim and percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    pub fn filter(self, filter: impl Into<String>) -> Self {
        self.param("$filter", filter)
    }

    pub fn select(self, select: impl Into<String>) -> Self {
        self.param("$select", select)
    }

    pub fn orderby(self, orderby: impl Into<String>) -> Self {
        self.param("$orderby", orderby)
    }

    pub fn top(self, top: u32) -> Self {
        self.param("$top", top.to_string())
    }

    pub fn skip(self, skip: u32) -> Self {
        self.param("$skip", skip.to_string())
    }

    pub fn expand(self, expand: impl Into<String>) -> Self {
        self.param("$expand", expand)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: String, value: String) {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `?<encoded>` or nothing for an empty query.
    pub fn to_suffix(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.encode())
        }
    }
}
