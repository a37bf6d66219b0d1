use anyhow::{Context, Result};
use cgmath::{Vector3, vec3};
use std::{fs, path::Path};
use teleport_arc::{ArcConfig, SceneDescription};
use tracing::info;

/// Load a scene description from a JSON file
pub fn load_scene(path: &Path) -> Result<SceneDescription> {
    info!("Loading scene from {}", path.display());

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file {}", path.display()))?;
    let scene = SceneDescription::from_json(&json)
        .with_context(|| format!("Failed to parse scene file {}", path.display()))?;

    info!("Loaded {} colliders", scene.colliders.len());
    Ok(scene)
}

/// Load an arc configuration, falling back to defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<ArcConfig> {
    let Some(path) = path else {
        return Ok(ArcConfig::default());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ArcConfig = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid arc configuration in {}", path.display()))?;

    Ok(config)
}

/// Parse `x,y,z` into a vector, for clap
pub fn parse_vec3(value: &str) -> std::result::Result<Vector3<f32>, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", value, e))?;

    match parts.as_slice() {
        [x, y, z] => Ok(vec3(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1, -2.5,3"), Ok(vec3(1.0, -2.5, 3.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), ArcConfig::default());
    }

    #[test]
    fn test_bundled_scene_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/courtyard.json");
        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.colliders.len(), 3);
    }
}
