//! Operator-configured application profiles.

use crate::{
    action::AutomationStep,
    descriptor::{AppCategory, Protocol},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppProfile {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "protocol")]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "arg_format")]
    pub arg_template: String,
    /// Path is relative to the launcher's install directory.
    #[serde(default, rename = "is_internal")]
    pub bundled: bool,
    #[serde(default, rename = "automation", alias = "autoit")]
    pub automation_steps: Vec<AutomationStep>,
    /// Credentials go to the child as `VNC_USERNAME` / `VNC_PASSWORD`.
    #[serde(default)]
    pub env_credentials: bool,
    /// Scheme for the `{url}` key, `navicat` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_scheme: Option<String>,
}

impl AppProfile {
    pub fn new(name: impl Into<String>, path: impl Into<String>, arg_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            protocols: Vec::new(),
            path: path.into(),
            arg_template: arg_template.into(),
            bundled: false,
            automation_steps: Vec::new(),
            env_credentials: false,
            url_scheme: None,
        }
    }

    pub fn with_protocols(mut self, protocols: &[&str]) -> Self {
        self.protocols = protocols.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_steps(mut self, steps: Vec<AutomationStep>) -> Self {
        self.automation_steps = steps;
        self
    }

    pub fn supports(&self, protocol: &Protocol) -> bool {
        self.protocols.iter().any(|p| {
            p.eq_ignore_ascii_case(protocol.as_str()) || p.eq_ignore_ascii_case(protocol.profile_key())
        })
    }

    /// True when the argument template or any automation step mentions `{key}`.
    pub fn references(&self, key: &str) -> bool {
        let placeholder = format!("{{{key}}}");
        self.arg_template.contains(&placeholder)
            || self
                .automation_steps
                .iter()
                .any(|s| s.target.contains(&placeholder) || s.payload.contains(&placeholder))
    }

    pub fn needs_automation(&self) -> bool {
        !self.automation_steps.is_empty()
    }

    pub fn executable(&self, install_dir: &Path) -> PathBuf {
        if self.bundled {
            install_dir.join(&self.path)
        } else {
            PathBuf::from(&self.path)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformProfiles {
    #[serde(default)]
    pub terminal: Vec<AppProfile>,
    #[serde(default, rename = "remotedesktop")]
    pub remote_desktop: Vec<AppProfile>,
    #[serde(default, rename = "filetransfer")]
    pub file_transfer: Vec<AppProfile>,
    #[serde(default)]
    pub databases: Vec<AppProfile>,
}

/// The configuration document: one profile set per platform.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub windows: PlatformProfiles,
    #[serde(default)]
    pub macos: PlatformProfiles,
    #[serde(default)]
    pub linux: PlatformProfiles,
}

impl RegistryDocument {
    pub fn into_registry(self, platform: Platform) -> AppRegistry {
        let profiles = match platform {
            Platform::Windows => self.windows,
            Platform::MacOs => self.macos,
            Platform::Linux => self.linux,
        };
        let mut registry = AppRegistry::default();
        let sections = [
            (AppCategory::Terminal, profiles.terminal),
            (AppCategory::RemoteDesktop, profiles.remote_desktop),
            (AppCategory::FileTransfer, profiles.file_transfer),
            (AppCategory::Databases, profiles.databases),
        ];
        for (category, list) in sections {
            for profile in list {
                registry.push(category, profile);
            }
        }
        registry
    }
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub category: AppCategory,
    pub profile: AppProfile,
}

/// Profiles for the running platform in operator priority order.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    entries: Vec<RegistryEntry>,
}

impl AppRegistry {
    pub fn push(&mut self, category: AppCategory, profile: AppProfile) {
        self.entries.push(RegistryEntry { category, profile });
    }

    pub fn with(mut self, category: AppCategory, profile: AppProfile) -> Self {
        self.push(category, profile);
        self
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First profile in the protocol's category that supports it.
    pub fn find(&self, protocol: &Protocol) -> Option<&AppProfile> {
        let category = protocol.category();
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| &e.profile)
            .find(|p| p.supports(protocol))
    }
}
