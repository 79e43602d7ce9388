//! Scalar values carried through parsing and dispatch.
//!
//! Declared defaults, coerced option values and raw positional tokens all
//! share the [`Value`] type so the reconciler can move them between the
//! positional list and the keyword map without conversion.

use std::fmt;

/// A parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value. As a declared default it marks an optional positional with
    /// no type constraint.
    None,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Text; every bare token starts out as one of these.
    Str(String),
    /// A default whose type the coercer does not understand, kept in its
    /// display form. Tokens bound against it pass through as text.
    Opaque(String),
}

/// The scalar types a token may be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Integer,
    Float,
    String,
}

impl ScalarKind {
    /// Returns the lower-case name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the scalar kind of this value, if it has one.
    ///
    /// [`Value::None`] and [`Value::Opaque`] have no kind; tokens coerced
    /// against them are left untouched.
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Bool(_) => Some(ScalarKind::Boolean),
            Self::Int(_) => Some(ScalarKind::Integer),
            Self::Float(_) => Some(ScalarKind::Float),
            Self::Str(_) => Some(ScalarKind::String),
            Self::None | Self::Opaque(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the text of string-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) | Self::Opaque(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Renders the value the way a call preview shows it: text is quoted,
    /// scalars are bare.
    pub fn to_literal(&self) -> String {
        match self {
            Self::Str(text) => format!("{text:?}"),
            Self::None => String::from("none"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(text) | Self::Opaque(text) => f.write_str(text),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
