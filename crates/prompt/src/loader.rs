//! Prompt loader for YAML prompt definitions stored in `.grounded/prompts/`.

use crate::types::PromptDefinition;
use grounded_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Directory holding prompt definitions, relative to the workspace.
const PROMPTS_DIR: &str = ".grounded/prompts";

/// File extensions recognised as prompt definitions.
const PROMPT_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Load a prompt definition by ID from the workspace.
///
/// Looks for `<id>.yml` (or `<id>.yaml`) in `.grounded/prompts/`.
///
/// # Example
/// ```no_run
/// use grounded_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "claims.sql")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = find_prompt_file(workspace_path, prompt_id).ok_or_else(|| {
        AppError::Prompt(format!(
            "Prompt '{}' not found in {:?}",
            prompt_id,
            workspace_path.join(PROMPTS_DIR)
        ))
    })?;

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List all prompt IDs in the workspace, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace_path.join(PROMPTS_DIR);

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids: Vec<String> = walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_prompt_extension(e.path()))
        .filter_map(|e| {
            e.path()
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect();

    prompt_ids.sort();
    prompt_ids.dedup();

    Ok(prompt_ids)
}

fn find_prompt_file(workspace_path: &Path, prompt_id: &str) -> Option<PathBuf> {
    let prompts_dir = workspace_path.join(PROMPTS_DIR);
    PROMPT_EXTENSIONS
        .iter()
        .map(|ext| prompts_dir.join(format!("{}.{}", prompt_id, ext)))
        .find(|path| path.is_file())
}

fn has_prompt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| PROMPT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
