//! Side-channel connection list for Redis GUIs that read `.rdm/connections.json`.

use crate::{config::write_private_file, descriptor::ConnectionDescriptor, error::AppError};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONNECTIONS_DIR: &str = ".rdm";
pub const CONNECTIONS_FILE: &str = "connections.json";
const DEFAULT_TIMEOUT_MS: &str = "60000";

#[derive(Debug, Serialize)]
pub struct RedisConnection {
    pub host: String,
    pub port: String,
    pub name: String,
    pub auth: String,
    pub ssh_agent_path: String,
    pub ssh_password: String,
    pub ssh_private_key_path: String,
    pub timeout_connect: String,
    pub timeout_execute: String,
}

impl RedisConnection {
    pub fn from_descriptor(d: &ConnectionDescriptor) -> Self {
        let auth = match &d.token_id {
            Some(id) => format!("{id}@{}", d.secret.expose()),
            None => d.secret.expose().to_string(),
        };
        Self {
            host: d.host.clone(),
            port: d.port.to_string(),
            name: d.display_name.clone(),
            auth,
            ssh_agent_path: String::new(),
            ssh_password: String::new(),
            ssh_private_key_path: String::new(),
            timeout_connect: DEFAULT_TIMEOUT_MS.into(),
            timeout_execute: DEFAULT_TIMEOUT_MS.into(),
        }
    }
}

pub fn connections_path(base: &Path) -> PathBuf {
    base.join(CONNECTIONS_DIR).join(CONNECTIONS_FILE)
}

/// Replaces `<base>/.rdm/connections.json` with a single-entry list for `d`.
pub fn write_connection_list(base: &Path, d: &ConnectionDescriptor) -> Result<PathBuf, AppError> {
    let list = [RedisConnection::from_descriptor(d)];
    let json = serde_json::to_vec(&list)?;
    let path = connections_path(base);
    write_private_file(&path, &json)?;
    tracing::debug!(path = %path.display(), "wrote redis connection list");
    Ok(path)
}
