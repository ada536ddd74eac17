//! Prompt definition types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A system prompt definition loaded from YAML.
///
/// The rendered `template` replaces the built-in system instructions when
/// passed as the `prompt_template` override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Short description shown by `grounded prompts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Default values for template variables
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: claims.sql
title: Claims SQL assistant
apiVersion: "1.0"
createdBy: test
template: "You write SQL for {{table}}."
variables:
  table: claims
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "claims.sql");
        assert_eq!(def.created_by, "test");
        assert_eq!(def.description, None);
        assert_eq!(def.variables.get("table").map(String::as_str), Some("claims"));
    }

    #[test]
    fn test_variables_default_to_empty() {
        let yaml = r#"
id: plain
title: Plain
apiVersion: "1.0"
template: "Answer with citations."
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(def.variables.is_empty());
        assert!(def.created_by.is_empty());
    }
}
