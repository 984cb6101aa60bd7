//! graphql types
//!
//! request and response wrappers following the graphql-over-http conventions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// a single graphql operation to send
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQlRequest {
    document: String,
    operation_name: Option<String>,
    variables: Map<String, Value>,
    extensions: Map<String, Value>,
}

impl GraphQlRequest {
    /// create a request for a graphql document
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            operation_name: None,
            variables: Map::new(),
            extensions: Map::new(),
        }
    }

    /// select the operation to run when the document holds several
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// replace all variables
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    /// set a single variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// replace all protocol extensions
    pub fn with_extensions(mut self, extensions: Map<String, Value>) -> Self {
        self.extensions = extensions;
        self
    }

    /// set a single protocol extension
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// graphql document text
    pub fn document(&self) -> &str {
        &self.document
    }

    /// operation name, if any
    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// request variables
    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// request extensions
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// body map for the wire; empty optional entries are left out
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("query".to_string(), Value::String(self.document.clone()));
        if let Some(name) = &self.operation_name {
            map.insert("operationName".to_string(), Value::String(name.clone()));
        }
        if !self.variables.is_empty() {
            map.insert(
                "variables".to_string(),
                Value::Object(self.variables.clone()),
            );
        }
        if !self.extensions.is_empty() {
            map.insert(
                "extensions".to_string(),
                Value::Object(self.extensions.clone()),
            );
        }
        map
    }
}

/// graphql response backed by the raw body map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphQlResponse {
    map: Map<String, Value>,
}

impl GraphQlResponse {
    /// wrap a decoded response body
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self { map }
    }

    /// response data, `None` when absent or null
    pub fn data(&self) -> Option<&Value> {
        self.map.get("data").filter(|data| !data.is_null())
    }

    /// graphql errors, empty when absent
    pub fn errors(&self) -> Vec<ResponseError> {
        match self.map.get("errors") {
            Some(Value::Array(errors)) => errors.iter().map(ResponseError::from_value).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![ResponseError::from_value(other)],
        }
    }

    /// response extensions, empty when absent
    pub fn extensions(&self) -> Map<String, Value> {
        match self.map.get("extensions") {
            Some(Value::Object(extensions)) => extensions.clone(),
            _ => Map::new(),
        }
    }

    /// true if the response carries non-null data
    pub fn is_valid(&self) -> bool {
        self.data().is_some()
    }

    /// true if the response contains graphql errors
    pub fn has_errors(&self) -> bool {
        match self.map.get("errors") {
            Some(Value::Array(errors)) => !errors.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    /// look up a value under `data` by path, e.g. `project.releases[0].version`
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut current = self.data()?;
        for segment in parse_path(path)? {
            current = match segment {
                PathSegment::Key(key) => current.as_object()?.get(key)?,
                PathSegment::Index(index) => current.as_array()?.get(index)?,
            };
        }
        Some(current)
    }

    /// borrow the raw body map
    pub fn to_map(&self) -> &Map<String, Value> {
        &self.map
    }

    /// consume into the raw body map
    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }
}

#[derive(Debug, PartialEq)]
enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<PathSegment<'_>>> {
    let mut segments = Vec::new();
    if path.is_empty() {
        return Some(segments);
    }
    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        } else if rest.is_empty() {
            return None;
        }
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest[1..close].parse().ok()?;
            segments.push(PathSegment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }
    Some(segments)
}

/// graphql error entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// error message
    pub message: String,
    /// error locations in the query
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
    /// response path
    #[serde(default)]
    pub path: Vec<Value>,
    /// optional extensions payload
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl ResponseError {
    /// error classification from `extensions.classification`, if present
    pub fn error_type(&self) -> Option<&str> {
        self.extensions
            .as_ref()?
            .get("classification")?
            .as_str()
    }

    // malformed entries keep their raw text as the message
    fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_else(|_| {
            let message = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Self {
                message,
                locations: Vec::new(),
                path: Vec::new(),
                extensions: None,
            }
        })
    }
}

/// graphql error location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLocation {
    /// line number (1-based)
    pub line: i64,
    /// column number (1-based)
    pub column: i64,
}
