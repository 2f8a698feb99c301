use serde_json::Value;
use url::Url;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Value,
}

/// `window.location` plus the session history of the current page.
#[derive(Debug, Clone)]
pub struct LocationHistory {
    current: Url,
    entries: Vec<HistoryEntry>,
    index: usize,
}

pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

impl LocationHistory {
    pub fn new(initial_url: &str) -> Result<Self> {
        let current = parse_url(initial_url)?;
        Ok(Self {
            entries: vec![HistoryEntry {
                url: current.to_string(),
                state: Value::Null,
            }],
            current,
            index: 0,
        })
    }

    pub fn href(&self) -> &str {
        self.current.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.current
    }

    pub fn pathname(&self) -> &str {
        self.current.path()
    }

    /// `location.search`: `"?…"` or empty.
    pub fn search(&self) -> String {
        match self.current.query() {
            Some(query) if !query.is_empty() => format!("?{query}"),
            _ => String::new(),
        }
    }

    /// `location.hash`: `"#…"` or empty.
    pub fn hash(&self) -> String {
        match self.current.fragment() {
            Some(fragment) if !fragment.is_empty() => format!("#{fragment}"),
            _ => String::new(),
        }
    }

    /// `URLSearchParams.get`: first value for `name`, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn resolve(&self, target: &str) -> Result<Url> {
        self.current.join(target).map_err(|source| Error::InvalidUrl {
            url: target.to_string(),
            source,
        })
    }

    pub fn state(&self) -> &Value {
        &self.entries[self.index].state
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `history.pushState`: drops forward entries and appends a new one.
    pub fn push_state(&mut self, state: Value, url: &str) -> Result<()> {
        let next = self.same_origin_target(url)?;
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: next.to_string(),
            state,
        });
        self.index = self.entries.len() - 1;
        self.current = next;
        Ok(())
    }

    /// `history.replaceState`: rewrites the current entry without a reload.
    pub fn replace_state(&mut self, state: Value, url: &str) -> Result<()> {
        let next = self.same_origin_target(url)?;
        self.entries[self.index] = HistoryEntry {
            url: next.to_string(),
            state,
        };
        self.current = next;
        Ok(())
    }

    fn same_origin_target(&self, url: &str) -> Result<Url> {
        let next = self.resolve(url)?;
        if next.origin() != self.current.origin() {
            return Err(Error::ScriptRuntime(format!(
                "history update to {next} is not same-origin with {}",
                self.current
            )));
        }
        Ok(next)
    }
}
