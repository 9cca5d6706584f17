use crate::{
    adapter::{BackendStatus, PlatformAdapter},
    error::AppError,
    registry::{AppRegistry, Platform},
};
use serde_json::{json, Value};
use std::path::Path;

pub fn execute(
    adapter: &dyn PlatformAdapter,
    config_path: &Path,
    registry: Result<&AppRegistry, &AppError>,
) -> Result<Value, AppError> {
    let backend = match adapter.check_backend() {
        BackendStatus::Available => json!({ "name": adapter.backend_name(), "available": true }),
        BackendStatus::Unavailable { suggestion } => json!({
            "name": adapter.backend_name(),
            "available": false,
            "suggestion": suggestion
        }),
    };

    let config = match registry {
        Ok(r) => json!({ "path": config_path.display().to_string(), "loaded": true, "profiles": r.len() }),
        Err(e) => json!({
            "path": config_path.display().to_string(),
            "loaded": false,
            "error": e.to_string()
        }),
    };

    Ok(json!({
        "platform": Platform::current().as_str(),
        "version": env!("CARGO_PKG_VERSION"),
        "automation": backend,
        "config": config
    }))
}
