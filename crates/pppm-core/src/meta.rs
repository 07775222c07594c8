//! Meta comments embedded in pppm scripts and modules.
//!
//! A script declares its metadata in a block comment holding an Hjson
//! object whose first key is `pppm`:
//!
//! ```text
//! <#
//! {
//!     pppm: "1.0 App"
//!     ShortName: "vvvv"
//!     DefaultRepository: "https://github.com/vvvv/pppm-packs.git"
//! }
//! #>
//! ```

use crate::error::MetaError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static META_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<#\s*(?<hjson>\{\s*pppm:.*?\})\s*?#>").expect("meta comment pattern is valid")
});

/// Structured metadata with path lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaDocument(Value);

impl MetaDocument {
    /// Wrap an already parsed value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Extract the meta comment of a script. `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::Parse`] if a meta comment exists but its Hjson is malformed.
    pub fn from_script(source: &str) -> Result<Option<Self>, MetaError> {
        let Some(captures) = META_COMMENT.captures(source) else {
            return Ok(None);
        };
        Self::parse_hjson(&captures["hjson"]).map(Some)
    }

    /// Parse an Hjson (or plain JSON) object.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError::Parse`] if the text is not valid Hjson.
    pub fn parse_hjson(text: &str) -> Result<Self, MetaError> {
        deser_hjson::from_str::<Value>(text)
            .map(Self)
            .map_err(|e| MetaError::Parse(e.to_string()))
    }

    /// Look up a value by path: `$.a.b` or `a.b`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = path.strip_prefix('$').unwrap_or(path);
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.0, |node, segment| node.get(segment))
    }

    /// Look up a scalar by path, rendered as text. Objects, arrays and null yield `None`.
    pub fn get_str(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The underlying value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
