//! Normalized connection request.

use crate::error::AppError;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const URL_SCHEME: &str = "client-launcher://";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Ssh,
    Telnet,
    Sftp,
    Rdp,
    Vnc,
    Oracle,
    SqlServer,
    PostgreSql,
    MySql,
    MariaDb,
    Redis,
    MongoDb,
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Telnet => "telnet",
            Protocol::Sftp => "sftp",
            Protocol::Rdp => "rdp",
            Protocol::Vnc => "vnc",
            Protocol::Oracle => "oracle",
            Protocol::SqlServer => "sqlserver",
            Protocol::PostgreSql => "postgresql",
            Protocol::MySql => "mysql",
            Protocol::MariaDb => "mariadb",
            Protocol::Redis => "redis",
            Protocol::MongoDb => "mongodb",
            Protocol::Other(s) => s,
        }
    }

    /// Key used for profile matching and template substitution. Telnet
    /// shares the ssh-class client configuration.
    pub fn profile_key(&self) -> &str {
        match self {
            Protocol::Telnet => Protocol::Ssh.as_str(),
            other => other.as_str(),
        }
    }

    pub fn category(&self) -> AppCategory {
        match self {
            Protocol::Ssh | Protocol::Telnet => AppCategory::Terminal,
            Protocol::Sftp => AppCategory::FileTransfer,
            Protocol::Rdp | Protocol::Vnc => AppCategory::RemoteDesktop,
            _ => AppCategory::Databases,
        }
    }

    pub fn default_port(&self) -> Option<u16> {
        let port = match self {
            Protocol::Ssh | Protocol::Sftp => 22,
            Protocol::Telnet => 23,
            Protocol::Rdp => 3389,
            Protocol::Vnc => 5900,
            Protocol::Oracle => 1521,
            Protocol::SqlServer => 1433,
            Protocol::PostgreSql => 5432,
            Protocol::MySql | Protocol::MariaDb => 3306,
            Protocol::Redis => 6379,
            Protocol::MongoDb => 27017,
            Protocol::Other(_) => return None,
        };
        Some(port)
    }
}

impl From<&str> for Protocol {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Protocol::Ssh,
            "telnet" => Protocol::Telnet,
            "sftp" => Protocol::Sftp,
            "rdp" => Protocol::Rdp,
            "vnc" => Protocol::Vnc,
            "oracle" => Protocol::Oracle,
            "sqlserver" => Protocol::SqlServer,
            "postgresql" => Protocol::PostgreSql,
            "mysql" => Protocol::MySql,
            "mariadb" => Protocol::MariaDb,
            "redis" => Protocol::Redis,
            "mongodb" => Protocol::MongoDb,
            other => Protocol::Other(other.to_string()),
        }
    }
}

impl From<String> for Protocol {
    fn from(s: String) -> Self {
        Protocol::from(s.as_str())
    }
}

impl From<Protocol> for String {
    fn from(p: Protocol) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry section a protocol's clients are configured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppCategory {
    Terminal,
    RemoteDesktop,
    FileTransfer,
    Databases,
}

/// Password or token material. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub display_name: String,
    pub secret: Secret,
    pub database: Option<String>,
    pub raw_command: Option<String>,
    pub token_id: Option<String>,
}

#[derive(Deserialize)]
struct WireDescriptor {
    protocol: Protocol,
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: Option<u32>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: Secret,
    #[serde(default)]
    dbname: Option<String>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    token: Option<WireToken>,
}

#[derive(Deserialize)]
struct WireToken {
    id: String,
}

impl ConnectionDescriptor {
    pub fn new(protocol: Protocol, host: impl Into<String>) -> Self {
        let port = protocol.default_port().unwrap_or(0);
        Self {
            protocol,
            host: host.into(),
            port,
            username: String::new(),
            display_name: String::new(),
            secret: Secret::default(),
            database: None,
            raw_command: None,
            token_id: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Secret::new(secret);
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_token_id(mut self, id: impl Into<String>) -> Self {
        self.token_id = Some(id.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.raw_command = Some(command.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let wire: WireDescriptor = serde_json::from_str(json)
            .map_err(|e| AppError::invalid_input(format!("Invalid connection descriptor: {e}")))?;

        let port = match wire.port {
            Some(p) if (1..=65535).contains(&p) => p as u16,
            Some(p) => {
                return Err(AppError::invalid_input(format!(
                    "Port {p} is outside 1-65535"
                )))
            }
            None => wire.protocol.default_port().ok_or_else(|| {
                AppError::invalid_input(format!(
                    "No port given and '{}' has no conventional port",
                    wire.protocol
                ))
            })?,
        };

        Ok(Self {
            protocol: wire.protocol,
            host: wire.host,
            port,
            username: wire.username,
            display_name: wire.name,
            secret: wire.value,
            database: wire.dbname.filter(|d| !d.is_empty()),
            raw_command: wire.command.filter(|c| !c.trim().is_empty()),
            token_id: wire.token.map(|t| t.id),
        })
    }

    /// Parses `client-launcher://<base64 json>` as handed over by a URI handler.
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        let payload = url
            .trim()
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| AppError::invalid_input(format!("URL must start with {URL_SCHEME}")))?
            .trim_end_matches('/');

        let bytes = STANDARD
            .decode(payload)
            .or_else(|_| URL_SAFE.decode(payload))
            .or_else(|_| URL_SAFE_NO_PAD.decode(payload))
            .map_err(|e| AppError::invalid_input(format!("URL payload is not base64: {e}")))?;
        let json = String::from_utf8(bytes)
            .map_err(|_| AppError::invalid_input("URL payload is not UTF-8"))?;
        Self::from_json(&json)
    }

    /// Text after the last `@` of the display name, if any.
    pub fn display_suffix(&self) -> Option<&str> {
        self.display_name
            .rsplit_once('@')
            .map(|(_, suffix)| suffix)
            .filter(|s| !s.is_empty())
    }
}
