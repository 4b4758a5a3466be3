pub mod codes;
pub mod flatten;

use std::path::Path;

use serde_json::Value;

/// Read a JSON or YAML file; `.yaml` and `.yml` select YAML
pub fn load_document(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);

    let value = if is_yaml {
        serde_yaml::from_str(&text)
            .map_err(|e| format!("invalid YAML in {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&text)
            .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))?
    };
    Ok(value)
}
