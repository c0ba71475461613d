//! The agent identifies tools by string name; this models that surface as
//! a closed enum plus a small open-extension escape hatch, which is the
//! idiomatic shape for a registry keyed by tool identity.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ToolName {
    WriteToFile,
    ExecuteCommand,
    SelectIntent,
    Other(String),
}

impl ToolName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::WriteToFile => "write_to_file",
            Self::ExecuteCommand => "execute_command",
            Self::SelectIntent => "select_intent",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for ToolName {
    fn from(value: &str) -> Self {
        match value {
            "write_to_file" => Self::WriteToFile,
            "execute_command" => Self::ExecuteCommand,
            "select_intent" => Self::SelectIntent,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_round_trip() {
        assert_eq!(ToolName::from("write_to_file"), ToolName::WriteToFile);
        assert_eq!(ToolName::WriteToFile.as_str(), "write_to_file");
    }

    #[test]
    fn unknown_names_fall_back_to_other() {
        assert_eq!(ToolName::from("custom_tool"), ToolName::Other("custom_tool".to_string()));
    }
}
