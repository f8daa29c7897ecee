use serde::{Deserialize, Serialize};

/// How a plain-string target is compared against the source tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffMode {
    /// Reduce both sides to text and run one word diff over the whole document
    #[default]
    PlainText,
    /// Parse the target as markup and walk both trees
    Structural,
}

/// Differ options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffConfig {
    pub mode: DiffMode,

    /// Inserted between consecutive blocks when projecting a tree to text
    pub block_separator: String,

    /// Attributes left out of node equality, for keys that change on every
    /// edit without changing the node's identity
    pub ignored_attributes: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            mode: DiffMode::PlainText,
            block_separator: "\n".to_string(),
            ignored_attributes: Vec::new(),
        }
    }
}

impl DiffConfig {
    pub fn structural() -> Self {
        Self::default().with_mode(DiffMode::Structural)
    }

    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_block_separator(mut self, separator: impl Into<String>) -> Self {
        self.block_separator = separator.into();
        self
    }

    pub fn ignore_attribute(mut self, name: impl Into<String>) -> Self {
        self.ignored_attributes.push(name.into());
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_attributes.iter().any(|a| a == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiffConfig::default();
        assert_eq!(config.mode, DiffMode::PlainText);
        assert_eq!(config.block_separator, "\n");
        assert!(config.ignored_attributes.is_empty());
    }

    #[test]
    fn test_partial_json() {
        let config: DiffConfig =
            serde_json::from_str(r#"{"mode": "structural", "ignoredAttributes": ["id"]}"#)
                .unwrap();
        assert_eq!(config.mode, DiffMode::Structural);
        assert!(config.is_ignored("id"));
        assert_eq!(config.block_separator, "\n");
    }
}
