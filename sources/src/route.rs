//! Module to manage the routes used by the different sites
//!

use std::collections::btree_map::{Iter, Keys};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A struct that manages a collection of routes represented as key-value pairs.
///
/// Each route is stored as a pair of strings, where the key is the route name,
/// and the value is the path appended to the site's base URL.
///
/// ```
/// use std::collections::BTreeMap;
/// use stm_sources::Routes;
///
/// let routes = Routes::from(BTreeMap::from([
///     ("get".to_string(), "/buses/rest/stm-online".to_string()),
/// ]));
///
/// assert_eq!(routes.get("get"), Some(&"/buses/rest/stm-online".to_string()));
/// assert!(!routes.contains_key("token"));
/// ```
///
#[derive(Clone, Debug, Default, Deserialize, Serialize, Ord, PartialOrd, Eq, PartialEq)]
pub struct Routes(BTreeMap<String, String>);

impl Routes {
    /// Wrap `get`
    ///
    #[inline]
    pub fn get(&self, name: &str) -> Option<&String> {
        self.0.get(name)
    }

    /// Wrap `is_empty()`
    ///
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wrap `len()`
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Wrap `keys()`
    ///
    #[inline]
    pub fn keys(&self) -> Keys<'_, String, String> {
        self.0.keys()
    }

    /// Wrap `contains_key()`
    ///
    #[inline]
    pub fn contains_key(&self, s: &str) -> bool {
        self.0.contains_key(s)
    }

    /// Wrap `iter()`
    ///
    #[inline]
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for Routes {
    fn from(value: BTreeMap<String, String>) -> Self {
        Routes(value)
    }
}
