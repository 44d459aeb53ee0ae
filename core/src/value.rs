//! Option values and runtime type tags.
//!
//! [`OptionValue`] is the dynamically typed value stored in defaults,
//! supplied by callers and produced by resolution. [`TypeTag`] names the
//! runtime type of a value and is what allowed-type constraints are written
//! in.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use thiserror::Error;

/// Minimal view of a form handed to [`DataProducer`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormContext {
    /// Whether the form has children.
    pub compound: bool,
}

/// A value that computes data from the form it is attached to.
///
/// Producers are stored inside option values (for example as the result of
/// an `empty_data` default) and are only invoked by the form at submit time,
/// never during resolution or description.
///
/// # Examples
///
/// ```
/// use form_options_core::{DataProducer, FormContext, OptionValue};
///
/// let producer = DataProducer::new(|form: &FormContext| {
///     if form.compound { OptionValue::List(vec![]) } else { OptionValue::from("") }
/// });
/// assert_eq!(producer.call(&FormContext { compound: false }), OptionValue::from(""));
/// ```
#[derive(Clone)]
pub struct DataProducer(Arc<dyn Fn(&FormContext) -> OptionValue + Send + Sync>);

impl DataProducer {
    pub fn new(f: impl Fn(&FormContext) -> OptionValue + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the producer for the given form.
    pub fn call(&self, form: &FormContext) -> OptionValue {
        (self.0)(form)
    }
}

impl PartialEq for DataProducer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DataProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Closure(form)")
    }
}

/// A dynamically typed option value.
///
/// # Examples
///
/// ```
/// use form_options_core::OptionValue;
///
/// let value = OptionValue::from(vec![OptionValue::from("bar")]);
/// assert_eq!(value.type_name(), "array");
/// assert_eq!(value.render(), r#"["bar"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<OptionValue>),
    Map(IndexMap<String, OptionValue>),
    Callable(DataProducer),
}

impl OptionValue {
    /// Returns the runtime type tag name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) | Self::Map(_) => "array",
            Self::Callable(_) => "callable",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_producer(&self) -> Option<&DataProducer> {
        match self {
            Self::Callable(producer) => Some(producer),
            _ => None,
        }
    }

    /// Converts a scalar to its string form.
    ///
    /// Returns `None` for arrays and callables, which have no string form.
    pub fn cast_to_string(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::List(_) | Self::Map(_) | Self::Callable(_) => None,
        }
    }

    /// Renders the value on a single line, as used in error messages.
    pub fn render(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::String(s) => format!("{s:?}"),
            Self::List(items) => format!(
                "[{}]",
                items.iter().map(Self::render).collect::<Vec<_>>().join(", ")
            ),
            Self::Map(entries) => format!(
                "{{{}}}",
                entries
                    .iter()
                    .map(|(k, v)| format!("{k:?}: {}", v.render()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Callable(_) => "Closure(form)".to_string(),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Callable(_) => serializer.serialize_str("Closure(form)"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<OptionValue>> for OptionValue {
    fn from(value: Vec<OptionValue>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, OptionValue>> for OptionValue {
    fn from(value: IndexMap<String, OptionValue>) -> Self {
        Self::Map(value)
    }
}

impl From<DataProducer> for OptionValue {
    fn from(value: DataProducer) -> Self {
        Self::Callable(value)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Runtime type accepted by an allowed-types constraint.
///
/// # Examples
///
/// ```
/// use form_options_core::{OptionValue, TypeTag};
///
/// let tag: TypeTag = "string[]".parse().unwrap();
/// assert_eq!(tag, TypeTag::ListOf(Box::new(TypeTag::String)));
/// assert!(tag.matches(&OptionValue::from(vec![OptionValue::from("a")])));
/// assert!(!tag.matches(&OptionValue::from("a")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Callable,
    /// Accepts any value.
    Mixed,
    /// A list whose every element matches the inner tag.
    ListOf(Box<TypeTag>),
}

impl TypeTag {
    /// Returns `true` if `value` is of this type.
    pub fn matches(&self, value: &OptionValue) -> bool {
        match self {
            Self::Mixed => true,
            Self::Array => matches!(value, OptionValue::List(_) | OptionValue::Map(_)),
            Self::ListOf(inner) => match value {
                OptionValue::List(items) => items.iter().all(|item| inner.matches(item)),
                _ => false,
            },
            Self::Null => value.type_name() == "null",
            Self::Bool => value.type_name() == "bool",
            Self::Int => value.type_name() == "int",
            Self::Float => value.type_name() == "float",
            Self::String => value.type_name() == "string",
            Self::Callable => value.type_name() == "callable",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Callable => write!(f, "callable"),
            Self::Mixed => write!(f, "mixed"),
            Self::ListOf(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// Error returned when parsing an unknown type tag name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type tag: {0}")]
pub struct ParseTypeTagError(pub String);

impl FromStr for TypeTag {
    type Err = ParseTypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(Self::ListOf(Box::new(inner.parse()?)));
        }
        match s {
            "null" => Ok(Self::Null),
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" => Ok(Self::Int),
            "float" | "double" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "callable" => Ok(Self::Callable),
            "mixed" => Ok(Self::Mixed),
            other => Err(ParseTypeTagError(other.to_string())),
        }
    }
}
