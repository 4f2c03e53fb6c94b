//! Solr query descriptor

/// Request parameter carrying the cursor
pub const CURSOR_MARK_PARAM: &str = "cursorMark";

/// Cursor value that starts a deep paging walk
pub const CURSOR_MARK_START: &str = "*";

/// Solr request parameters
///
/// Parameters keep their insertion order and may repeat (e.g. `fq`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolrQuery {
    params: Vec<(String, String)>,
}

impl SolrQuery {
    /// Create a query with the given `q` parameter
    pub fn new(q: impl Into<String>) -> Self {
        let mut query = Self::default();
        query.set("q", q);
        query
    }

    /// Get the first value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get every value of a parameter
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.params
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a parameter, replacing all of its previous values
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.params.iter().position(|(key, _)| *key == name) {
            Some(index) => {
                self.params[index].1 = value;
                let mut seen = 0;
                self.params.retain(|(key, _)| {
                    if *key == name {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.params.push((name, value)),
        }
        self
    }

    /// Append a value to a parameter
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Remove all values of a parameter
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.params.retain(|(key, _)| key != name);
        self
    }

    /// All parameters in insertion order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Current cursor, if any
    pub fn cursor_mark(&self) -> Option<&str> {
        self.get(CURSOR_MARK_PARAM)
    }

    /// Set the cursor for the next request
    pub fn set_cursor_mark(&mut self, mark: impl Into<String>) -> &mut Self {
        self.set(CURSOR_MARK_PARAM, mark)
    }

    /// Set page size
    #[must_use]
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.set("rows", rows.to_string());
        self
    }

    /// Set sort clause
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.set("sort", sort);
        self
    }

    /// Add a filter query
    #[must_use]
    pub fn with_filter_query(mut self, fq: impl Into<String>) -> Self {
        self.add("fq", fq);
        self
    }

    /// Set the field list
    #[must_use]
    pub fn with_fields(mut self, fl: impl Into<String>) -> Self {
        self.set("fl", fl);
        self
    }
}
