mod cli;
mod dispatch;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use client_launcher_core::{adapter::PlatformAdapter, error::AppError};
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                e.exit();
            }
            let msg = e.to_string();
            let first_line = msg.lines().next().unwrap_or("parse error");
            let json = serde_json::json!({
                "version": "1.0",
                "ok": false,
                "command": "unknown",
                "error": { "code": "INVALID_ARGS", "message": first_line }
            });
            emit_json(&json);
            std::process::exit(2);
        }
    };

    init_tracing(cli.verbose, cli.log_file.as_deref());

    let cmd = match cli.command {
        Some(c) => c,
        None => {
            Cli::command().print_help().unwrap_or(());
            std::process::exit(0);
        }
    };

    let cmd_name = cmd.name();
    let adapter = build_adapter();
    tracing::debug!(command = cmd_name, backend = adapter.backend_name(), "dispatching");

    let result = dispatch::dispatch(cmd, cli.config, &adapter);
    finish(cmd_name, result);
}

fn finish(cmd_name: &str, result: Result<serde_json::Value, AppError>) {
    match result {
        Ok(data) => {
            let response = serde_json::json!({
                "version": "1.0",
                "ok": true,
                "command": cmd_name,
                "data": data
            });
            emit_json(&response);
            std::process::exit(0);
        }
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "command failed");
            let mut error = serde_json::json!({
                "code": e.code(),
                "message": e.to_string(),
            });
            if let Some(s) = e.suggestion() {
                error["suggestion"] = serde_json::Value::String(s.to_string());
            }
            let response = serde_json::json!({
                "version": "1.0",
                "ok": false,
                "command": cmd_name,
                "error": error
            });
            emit_json(&response);
            std::process::exit(1);
        }
    }
}

fn emit_json(value: &serde_json::Value) {
    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if serde_json::to_writer(&mut writer, value).is_err() {
        return;
    }
    let _ = writer.write_all(b"\n");
    let _ = writer.flush();
}

fn build_adapter() -> impl PlatformAdapter {
    #[cfg(target_os = "macos")]
    {
        client_launcher_macos::MacOSAdapter::new()
    }

    #[cfg(target_os = "windows")]
    {
        client_launcher_windows::WindowsAdapter::new()
    }

    #[cfg(target_os = "linux")]
    {
        client_launcher_linux::LinuxAdapter::new()
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        client_launcher_core::adapter::NoopAdapter
    }
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::{fmt, EnvFilter};
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = log_file.and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("cannot open log file {}: {e}", path.display()))
            .ok()
    });

    match file {
        Some(file) => fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init(),
        None => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init(),
    }
}
