use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::schema::SceneManifest;

/// Load a scene manifest, validate it, and resolve every image path
/// relative to the manifest's own directory.
pub fn load_and_validate_scene(path: &Path) -> Result<SceneManifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let mut scene: SceneManifest = serde_yaml::from_str(&contents).map_err(|error| {
        let location = error
            .location()
            .map(|location| format!("line {}, column {}", location.line(), location.column()))
            .unwrap_or_else(|| "unknown location".to_owned());
        anyhow!(
            "failed to parse yaml in {} at {}: {}",
            path.display(),
            location,
            error
        )
    })?;

    scene.validate()?;
    resolve_scene_paths(&mut scene, path)?;
    Ok(scene)
}

fn resolve_scene_paths(scene: &mut SceneManifest, manifest_path: &Path) -> Result<()> {
    let manifest_dir = manifest_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    if let Some(base) = &scene.base_image {
        scene.base_image = Some(resolve_and_validate_image_path(
            &manifest_dir,
            base,
            "base_image",
        )?);
    }

    for (index, item) in scene.items.iter_mut().enumerate() {
        item.source = resolve_and_validate_image_path(
            &manifest_dir,
            &item.source,
            &format!("item #{index} source"),
        )?;
    }

    Ok(())
}

fn resolve_and_validate_image_path(
    manifest_dir: &Path,
    source_path: &Path,
    field_name: &str,
) -> Result<PathBuf> {
    let resolved = if source_path.is_absolute() {
        source_path.to_path_buf()
    } else {
        manifest_dir.join(source_path)
    };

    if !resolved.exists() {
        bail!("{} does not exist: {}", field_name, resolved.display());
    }

    if !resolved.is_file() {
        bail!("{} is not a file: {}", field_name, resolved.display());
    }

    Ok(resolved)
}
