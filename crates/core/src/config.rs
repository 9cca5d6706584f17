use crate::{
    error::AppError,
    registry::{AppRegistry, Platform, RegistryDocument},
};
use std::path::{Path, PathBuf};

const LAUNCHER_DIR: &str = "client-launcher";
const CONFIG_FILE: &str = "config.json";
const MAX_CONFIG_BYTES: u64 = 4 * 1_048_576;

/// Per-user directory for config and generated artifacts.
pub fn launcher_dir() -> Result<PathBuf, AppError> {
    dirs::config_dir()
        .map(|d| d.join(LAUNCHER_DIR))
        .ok_or_else(|| AppError::Internal("user configuration directory not found".into()))
}

pub fn default_config_path() -> Result<PathBuf, AppError> {
    Ok(launcher_dir()?.join(CONFIG_FILE))
}

/// Directory bundled application paths are resolved against.
pub fn install_dir() -> Result<PathBuf, AppError> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| AppError::Internal("launcher executable has no parent directory".into()))
}

pub fn load_registry(path: &Path, platform: Platform) -> Result<AppRegistry, AppError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        AppError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(AppError::Config(format!("{} exceeds 4MB", path.display())));
    }
    let json = std::fs::read_to_string(path)?;
    let doc: RegistryDocument = serde_json::from_str(&json)
        .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
    let registry = doc.into_registry(platform);
    tracing::debug!(path = %path.display(), profiles = registry.len(), "loaded application registry");
    Ok(registry)
}

/// Writes `bytes` to `path`, creating parent directories. On unix the
/// directory is 0700 and the file 0600. Failures carry the target path.
pub fn write_private_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = path
        .parent()
        .ok_or_else(|| AppError::Internal(format!("invalid artifact path {}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .map_err(|e| AppError::artifact(dir, e))?;
    }
    #[cfg(not(unix))]
    std::fs::create_dir_all(dir).map_err(|e| AppError::artifact(dir, e))?;

    let tmp = path.with_extension("tmp");

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp)
            .map_err(|e| AppError::artifact(&tmp, e))?;
        file.write_all(bytes).map_err(|e| AppError::artifact(&tmp, e))?;
        file.flush().map_err(|e| AppError::artifact(&tmp, e))?;
    }
    #[cfg(not(unix))]
    std::fs::write(&tmp, bytes).map_err(|e| AppError::artifact(&tmp, e))?;

    std::fs::rename(&tmp, path).map_err(|e| AppError::artifact(path, e))?;
    Ok(())
}
