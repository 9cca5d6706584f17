use client_launcher_core::{
    adapter::PlatformAdapter,
    commands::{helpers::DescriptorSource, launch, profiles, resolve, status, version},
    config,
    dispatcher::{Dispatcher, LaunchContext, SystemLauncher},
    error::AppError,
    registry::Platform,
    sequencer::Timing,
};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::{Commands, SourceArgs};

pub fn dispatch(
    cmd: Commands,
    config_path: Option<PathBuf>,
    adapter: &dyn PlatformAdapter,
) -> Result<Value, AppError> {
    let platform = Platform::current();

    match cmd {
        Commands::Version => version::execute(),

        Commands::Status => {
            let config_path = resolve_config_path(config_path)?;
            let registry = config::load_registry(&config_path, platform);
            status::execute(adapter, &config_path, registry.as_ref())
        }

        Commands::Profiles(a) => profiles::execute(
            profiles::ProfilesArgs { protocol: a.protocol },
            &config::load_registry(&resolve_config_path(config_path)?, platform)?,
        ),

        Commands::Launch(a) => {
            let source = descriptor_source(a)?;
            let ctx = build_context(&resolve_config_path(config_path)?, platform)?;
            let dispatcher = Dispatcher::new(&ctx, adapter, &SystemLauncher);
            launch::execute(launch::LaunchArgs { source }, &dispatcher)
        }

        Commands::Resolve(a) => {
            let source = descriptor_source(a)?;
            let ctx = build_context(&resolve_config_path(config_path)?, platform)?;
            let dispatcher = Dispatcher::new(&ctx, adapter, &SystemLauncher);
            resolve::execute(resolve::ResolveArgs { source }, &dispatcher)
        }
    }
}

/// `--config` when given, otherwise the per-user default. Only commands
/// that read the registry ask for it.
fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match explicit {
        Some(p) => Ok(p),
        None => config::default_config_path(),
    }
}

fn build_context(config_path: &Path, platform: Platform) -> Result<LaunchContext, AppError> {
    Ok(LaunchContext {
        registry: config::load_registry(config_path, platform)?,
        artifact_dir: config::launcher_dir()?,
        install_dir: config::install_dir()?,
        timing: Timing::default(),
    })
}

fn descriptor_source(args: SourceArgs) -> Result<DescriptorSource, AppError> {
    match (args.descriptor, args.url) {
        (Some(d), _) if d == "-" => {
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            Ok(DescriptorSource::Json(json))
        }
        (Some(d), _) => Ok(DescriptorSource::Json(d)),
        (None, Some(url)) => Ok(DescriptorSource::Url(url)),
        (None, None) => Err(AppError::invalid_input("Either --descriptor or --url is required")),
    }
}
