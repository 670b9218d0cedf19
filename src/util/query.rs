use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Inbound query string, as received from the browser.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams {
            map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|x| x.as_str())
    }

    /// Like `get`, but treats an empty value (`?query=`) as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Only the literal string `true` counts as set.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }
}
