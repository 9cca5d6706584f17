//! Protocol-specific enrichment of the substitution mapping.
//!
//! Runs before template compilation. Builders that write artifacts do so
//! only when the profile actually references the key they produce, and a
//! failed write aborts the dispatch.

pub mod db_url;
pub mod redis;

use crate::{
    cipher,
    descriptor::{AppCategory, ConnectionDescriptor, Protocol},
    error::AppError,
    mapping::SubstitutionMapping,
    registry::AppProfile,
};
use std::path::Path;

pub const PASSWD_FILE_KEY: &str = "passwd_file";
pub const CONFIG_FILE_KEY: &str = "config_file";
pub const URL_KEY: &str = "url";
pub const ENV_USERNAME: &str = "VNC_USERNAME";
pub const ENV_PASSWORD: &str = "VNC_PASSWORD";
const DBEAVER_MSSQL_DRIVER: &str = "mssql_jdbc_ms_new";

/// Enriched mapping plus environment variables scoped to the child process.
#[derive(Debug, Default)]
pub struct Payload {
    pub mapping: SubstitutionMapping,
    pub env: Vec<(String, String)>,
}

pub fn build(
    d: &ConnectionDescriptor,
    profile: &AppProfile,
    artifact_dir: &Path,
) -> Result<Payload, AppError> {
    let mut payload = Payload { mapping: SubstitutionMapping::from_descriptor(d), env: Vec::new() };

    match d.protocol.category() {
        AppCategory::RemoteDesktop if d.protocol == Protocol::Vnc => {
            vnc(d, profile, artifact_dir, &mut payload)?
        }
        AppCategory::Databases => database(d, profile, artifact_dir, &mut payload.mapping)?,
        _ => {}
    }

    Ok(payload)
}

fn vnc(
    d: &ConnectionDescriptor,
    profile: &AppProfile,
    artifact_dir: &Path,
    payload: &mut Payload,
) -> Result<(), AppError> {
    if profile.env_credentials {
        payload.env.push((ENV_USERNAME.into(), d.username.clone()));
        payload.env.push((ENV_PASSWORD.into(), d.secret.expose().to_string()));
    }
    if profile.references(PASSWD_FILE_KEY) {
        let path = cipher::write_password_file(artifact_dir, d.secret.expose())?;
        payload.mapping.insert(PASSWD_FILE_KEY, path.display().to_string());
    }
    Ok(())
}

fn database(
    d: &ConnectionDescriptor,
    profile: &AppProfile,
    artifact_dir: &Path,
    mapping: &mut SubstitutionMapping,
) -> Result<(), AppError> {
    if d.protocol == Protocol::Oracle {
        mapping.insert("dbname", &d.username);
    }
    if d.protocol == Protocol::SqlServer && profile.name.eq_ignore_ascii_case("dbeaver") {
        mapping.insert("protocol", DBEAVER_MSSQL_DRIVER);
    }
    if d.protocol == Protocol::Redis && profile.references(CONFIG_FILE_KEY) {
        redis::write_connection_list(artifact_dir, d)?;
        mapping.insert(CONFIG_FILE_KEY, artifact_dir.display().to_string());
    }
    if profile.references(URL_KEY) {
        let scheme = profile.url_scheme.as_deref().unwrap_or(db_url::DEFAULT_SCHEME);
        let fields = db_url::DbUrlFields {
            protocol: &d.protocol,
            host: &d.host,
            name: d.display_suffix().unwrap_or(&d.username),
            port: d.port,
            username: &d.username,
            database: mapping.get("dbname").unwrap_or_default(),
        };
        let url = db_url::build(scheme, &fields);
        mapping.insert(URL_KEY, url);
    }
    Ok(())
}
