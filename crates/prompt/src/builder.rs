//! Prompt rendering for YAML prompt definitions.

use crate::types::PromptDefinition;
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Render a prompt definition into system instructions.
///
/// The definition's default variables are applied first; `variables`
/// supplied by the caller override them.
///
/// # Example
/// ```no_run
/// use grounded_prompt::{render_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("table".to_string(), "claims".to_string());
///
/// let system = render_prompt(&def, &vars)?;
/// println!("{}", system);
/// # Ok(())
/// # }
/// ```
pub fn render_prompt(
    definition: &PromptDefinition,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    tracing::debug!("Rendering prompt: {}", definition.id);

    let mut merged = definition.variables.clone();
    merged.extend(variables.iter().map(|(k, v)| (k.clone(), v.clone())));

    render_template(&definition.template, &merged)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_definition(template: &str) -> PromptDefinition {
        let mut variables = HashMap::new();
        variables.insert("table".to_string(), "claims".to_string());
        variables.insert("dialect".to_string(), "T-SQL".to_string());

        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            description: None,
            template: template.to_string(),
            variables,
        }
    }

    #[test]
    fn test_render_simple_template() {
        let mut vars = HashMap::new();
        vars.insert("prompt".to_string(), "Hello, world!".to_string());

        let result = render_template("Question: {{prompt}}", &vars).unwrap();
        assert_eq!(result, "Question: Hello, world!");
    }

    #[test]
    fn test_render_prompt_uses_defaults() {
        let def = create_test_definition("Write {{dialect}} for {{table}}.");
        let rendered = render_prompt(&def, &HashMap::new()).unwrap();
        assert_eq!(rendered, "Write T-SQL for claims.");
    }

    #[test]
    fn test_caller_variables_override_defaults() {
        let def = create_test_definition("Write {{dialect}} for {{table}}.");
        let mut vars = HashMap::new();
        vars.insert("table".to_string(), "[rnq_ai].[vehicle_repair_copilot]".to_string());

        let rendered = render_prompt(&def, &vars).unwrap();
        assert_eq!(rendered, "Write T-SQL for [rnq_ai].[vehicle_repair_copilot].");
    }

    #[test]
    fn test_citation_brackets_survive_rendering() {
        let def = create_test_definition("Cite like [info1.txt][info2.pdf] & never <merge>.");
        let rendered = render_prompt(&def, &HashMap::new()).unwrap();
        assert_eq!(rendered, "Cite like [info1.txt][info2.pdf] & never <merge>.");
    }

    #[test]
    fn test_invalid_template_is_prompt_error() {
        let def = create_test_definition("{{#if}}");
        let result = render_prompt(&def, &HashMap::new());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
