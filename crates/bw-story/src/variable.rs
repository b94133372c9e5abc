use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a story variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Free text.
    String,
    /// A floating-point number.
    Number,
    /// True or false.
    Boolean,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A runtime value bound to a story variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// A text value.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
}

impl VariableValue {
    /// The type this value carries.
    pub fn value_type(&self) -> VariableType {
        match self {
            Self::String(_) => VariableType::String,
            Self::Number(_) => VariableType::Number,
            Self::Boolean(_) => VariableType::Boolean,
        }
    }

    /// The zero value for a declared type.
    pub fn default_for(ty: VariableType) -> Self {
        match ty {
            VariableType::String => Self::String(String::new()),
            VariableType::Number => Self::Number(0.0),
            VariableType::Boolean => Self::Boolean(false),
        }
    }

    /// Parse user input: `true`/`false`, then a number, otherwise text.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed {
            "true" => Self::Boolean(true),
            "false" => Self::Boolean(false),
            _ => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .unwrap_or_else(|| Self::String(trimmed.to_string())),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for VariableValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for VariableValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for VariableValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// A variable declaration: its name, type, and starting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within a story.
    pub name: String,
    /// Declared type. Not enforced on write during playback.
    #[serde(rename = "type")]
    pub ty: VariableType,
    /// Value bound when a playthrough starts.
    pub initial: VariableValue,
}

impl Variable {
    /// Declare a variable whose type is taken from its initial value.
    pub fn new(name: impl Into<String>, initial: impl Into<VariableValue>) -> Self {
        let initial = initial.into();
        Self {
            name: name.into(),
            ty: initial.value_type(),
            initial,
        }
    }

    /// Declare a variable of the given type with its zero value.
    pub fn of_type(name: impl Into<String>, ty: VariableType) -> Self {
        Self {
            name: name.into(),
            ty,
            initial: VariableValue::default_for(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_values() {
        let v: VariableValue = serde_json::from_str("100").unwrap();
        assert_eq!(v, VariableValue::Number(100.0));
        let v: VariableValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, VariableValue::Boolean(true));
        let v: VariableValue = serde_json::from_str("\"sword\"").unwrap();
        assert_eq!(v, VariableValue::String("sword".to_string()));
    }

    #[test]
    fn parse_user_input() {
        assert_eq!(VariableValue::parse("false"), VariableValue::Boolean(false));
        assert_eq!(VariableValue::parse(" 42 "), VariableValue::Number(42.0));
        assert_eq!(VariableValue::parse("-1.5"), VariableValue::Number(-1.5));
        assert_eq!(
            VariableValue::parse("rusty key"),
            VariableValue::String("rusty key".to_string())
        );
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(VariableValue::Number(100.0).to_string(), "100");
        assert_eq!(VariableValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn declaration_infers_type() {
        let v = Variable::new("health", 100);
        assert_eq!(v.ty, VariableType::Number);
        let v = Variable::of_type("has_key", VariableType::Boolean);
        assert_eq!(v.initial, VariableValue::Boolean(false));
    }

    #[test]
    fn declaration_json_uses_type_key() {
        let json = serde_json::to_value(Variable::new("name", "Ada")).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["initial"], "Ada");
    }
}
