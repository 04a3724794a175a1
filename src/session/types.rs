use serde::{Deserialize, Serialize};

/// Connection parameters of the hosting session, used to build fully
/// qualified URLs for cross-app navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub secure: bool,
    pub host: String,
    pub port: Option<u16>,
    /// Virtual-proxy prefix, without surrounding slashes.
    pub prefix: Option<String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            secure: true,
            host: "localhost".to_string(),
            port: None,
            prefix: None,
        }
    }
}

/// Selection state of a single value within a field's value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueState {
    Selected,
    Optional,
    Alternative,
    Excluded,
}

impl ValueState {
    pub fn is_excluded(self) -> bool {
        self == ValueState::Excluded
    }

    pub fn is_selected(self) -> bool {
        self == ValueState::Selected
    }
}

/// One row of a field's value list, including alternative-state values.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    pub text: String,
    /// Numeric representation when the value is a dual; `None` for pure text.
    pub num: Option<f64>,
    pub state: ValueState,
}

/// A value to select in a field, either by its numeric or textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// The textual form, as sent for toggle-style selection.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(t) => t.clone(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&ListValue> for FieldValue {
    fn from(value: &ListValue) -> Self {
        match value.num {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(value.text.clone()),
        }
    }
}

/// Definition of a transient value-list session object.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueListDef {
    pub field: String,
    pub state: String,
    /// Sort expression, already normalized to start with `=`.
    pub sort_expression: Option<String>,
    /// 1 for ascending, -1 for descending.
    pub sort_order: i32,
    pub max_rows: usize,
}

/// Definition of a transient two-column (dimension, measure) cube.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeDef {
    pub field: String,
    /// Measure expression, already normalized to start with `=`.
    pub measure: String,
    pub state: String,
    pub max_rows: usize,
}

/// One row of a two-column cube fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeRow {
    pub text: String,
    pub is_null: bool,
    pub measure: Option<f64>,
}

/// Data fetched from a transient session object, together with the object id
/// that must be disposed once the data has been consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionObjectData<T> {
    pub object_id: String,
    pub data: T,
}

/// A sheet entry from the app's object list.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetInfo {
    pub id: String,
    pub title: String,
    pub rank: f64,
}
