//! Model artifact loading

use std::path::Path;
use std::sync::Arc;

use shared::LoadedModel;

/// Outcome of loading the artifact. The error string is what every
/// recommendation reports as `MODEL_UNAVAILABLE` when loading failed.
pub type ModelState = Result<Arc<LoadedModel>, String>;

/// Read and validate the model artifact at `path`
pub fn load_model(path: &Path) -> ModelState {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read model artifact {}: {}", path.display(), e))?;

    let model = LoadedModel::from_json(&json)
        .map_err(|e| format!("invalid model artifact {}: {}", path.display(), e))?;

    tracing::info!(
        "Loaded model artifact {} (revision {})",
        path.display(),
        model.revision()
    );
    Ok(Arc::new(model))
}

/// Load the artifact, logging instead of failing when it is unusable
pub fn load_model_or_warn(path: &Path) -> ModelState {
    let state = load_model(path);
    if let Err(reason) = &state {
        tracing::warn!("Model unavailable, recommendations disabled: {}", reason);
    }
    state
}
