use crate::strip::StripPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HIGHLIGHT_LABEL: &str = "correction-added";
pub const DEFAULT_REMOVED_LABEL: &str = "correction-removed";

/// Annotator options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Also highlight removed text in decoration mode
    pub render_removed: bool,

    /// Label attached to highlights over added text
    pub highlight_label: String,

    /// Label attached to highlights over removed text
    pub removed_label: String,

    /// What happens to existing markers before re-annotating
    pub strip_policy: StripPolicy,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            render_removed: false,
            highlight_label: DEFAULT_HIGHLIGHT_LABEL.to_string(),
            removed_label: DEFAULT_REMOVED_LABEL.to_string(),
            strip_policy: StripPolicy::Discard,
        }
    }
}

impl AnnotatorConfig {
    pub fn with_render_removed(mut self, render_removed: bool) -> Self {
        self.render_removed = render_removed;
        self
    }

    pub fn with_strip_policy(mut self, policy: StripPolicy) -> Self {
        self.strip_policy = policy;
        self
    }
}
