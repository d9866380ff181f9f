//! Column data types and transformation roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage type of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Floating-point numbers (integers are stored as floats).
    Number,
    /// Text/label values.
    Text,
    /// Boolean values (true/false).
    Boolean,
    /// Calendar dates.
    Date,
}

impl ColumnType {
    /// The transformation role a column of this type plays.
    pub fn role(&self) -> Role {
        match self {
            ColumnType::Number => Role::Numeric,
            ColumnType::Text => Role::Categorical,
            ColumnType::Boolean | ColumnType::Date => Role::Excluded,
        }
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Number
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Number => write!(f, "number"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}

/// Role of a column in cleaning and feature preprocessing.
///
/// Roles are derived from the column type at the start of each stage and are
/// never stored on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Imputed with the median, standardized to zero mean and unit variance.
    Numeric,
    /// Imputed with the mode, one-hot encoded.
    Categorical,
    /// Left alone by the cleaner and dropped by the feature transformer.
    Excluded,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Numeric => write!(f, "numeric"),
            Role::Categorical => write!(f, "categorical"),
            Role::Excluded => write!(f, "excluded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_type() {
        assert_eq!(ColumnType::Number.role(), Role::Numeric);
        assert_eq!(ColumnType::Text.role(), Role::Categorical);
        assert_eq!(ColumnType::Boolean.role(), Role::Excluded);
        assert_eq!(ColumnType::Date.role(), Role::Excluded);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ColumnType::Boolean).unwrap();
        assert_eq!(json, "\"boolean\"");
        let role: Role = serde_json::from_str("\"categorical\"").unwrap();
        assert_eq!(role, Role::Categorical);
    }
}
