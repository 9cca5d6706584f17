//! Argument builders for `xdotool` and the one place it is executed.

use client_launcher_core::{
    action::{KeyCombo, Modifier},
    error::AdapterError,
};
use std::io::Write;
use std::process::{Command, Stdio};

/// Per-character delay for `xdotool type`, in milliseconds.
const TYPE_DELAY_MS: &str = "12";

/// Escapes regex metacharacters so `title` matches literally in `--name`.
pub fn escape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn search_args(title: &str) -> Vec<String> {
    vec!["search".into(), "--onlyvisible".into(), "--name".into(), escape_title(title)]
}

pub fn activate_args(window_id: &str) -> Vec<String> {
    vec!["windowactivate".into(), "--sync".into(), window_id.into()]
}

pub fn active_name_args() -> Vec<String> {
    vec!["getactivewindow".into(), "getwindowname".into()]
}

/// Types whatever arrives on stdin, so the text never shows up in the
/// process list.
pub fn type_args() -> Vec<String> {
    vec![
        "type".into(),
        "--clearmodifiers".into(),
        "--delay".into(),
        TYPE_DELAY_MS.into(),
        "--file".into(),
        "-".into(),
    ]
}

pub fn key_args(combo: &KeyCombo) -> Vec<String> {
    vec!["key".into(), "--clearmodifiers".into(), keysym(combo)]
}

/// Moves relative to the active window and left-clicks.
pub fn click_args(x: i32, y: i32) -> Vec<String> {
    vec![
        "getactivewindow".into(),
        "mousemove".into(),
        "--window".into(),
        "%1".into(),
        x.to_string(),
        y.to_string(),
        "click".into(),
        "1".into(),
    ]
}

/// X keysym chord such as `ctrl+shift+Tab`.
pub fn keysym(combo: &KeyCombo) -> String {
    let mut parts: Vec<String> = combo
        .modifiers
        .iter()
        .map(|m| match m {
            Modifier::Cmd => "super",
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Shift => "shift",
        })
        .map(String::from)
        .collect();
    let key = match combo.key.as_str() {
        "enter" | "return" => "Return".to_string(),
        "tab" => "Tab".into(),
        "escape" | "esc" => "Escape".into(),
        "space" => "space".into(),
        "backspace" | "bs" => "BackSpace".into(),
        "delete" | "del" => "Delete".into(),
        "home" => "Home".into(),
        "end" => "End".into(),
        "pageup" | "pgup" => "Prior".into(),
        "pagedown" | "pgdn" => "Next".into(),
        "up" => "Up".into(),
        "down" => "Down".into(),
        "left" => "Left".into(),
        "right" => "Right".into(),
        "insert" | "ins" => "Insert".into(),
        f if is_function_key(f) => f.to_uppercase(),
        other => other.to_string(),
    };
    parts.push(key);
    parts.join("+")
}

fn is_function_key(key: &str) -> bool {
    key.len() > 1 && key.starts_with('f') && key[1..].chars().all(|c| c.is_ascii_digit())
}

/// Runs xdotool. `Ok(None)` when it exits non-zero, which for `search`
/// means nothing matched.
pub fn run(args: &[String]) -> Result<Option<String>, AdapterError> {
    exec(args, None)
}

/// Types `text` through [`type_args`], feeding it on stdin.
pub fn type_text(text: &str) -> Result<String, AdapterError> {
    let args = type_args();
    exec(&args, Some(text))?.ok_or_else(|| AdapterError::action_failed("xdotool type failed"))
}

fn exec(args: &[String], input: Option<&str>) -> Result<Option<String>, AdapterError> {
    let mut child = Command::new("xdotool")
        .args(args)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AdapterError::backend_missing("xdotool").with_platform_detail(e.to_string()))?;
    if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| AdapterError::action_failed("could not pipe text to xdotool").with_platform_detail(e.to_string()))?;
    }
    let output = child
        .wait_with_output()
        .map_err(|e| AdapterError::internal(format!("xdotool did not finish: {e}")))?;
    if !output.status.success() {
        tracing::debug!(
            command = args.first().map(String::as_str).unwrap_or_default(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "xdotool exited with failure"
        );
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
}

/// Like [`run`], but a non-zero exit is an action failure.
pub fn run_checked(args: &[String]) -> Result<String, AdapterError> {
    let command = args.first().map(String::as_str).unwrap_or_default();
    run(args)?.ok_or_else(|| AdapterError::action_failed(format!("xdotool {command} failed")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_matched_literally() {
        assert_eq!(escape_title("Login (db1)"), "Login \\(db1\\)");
        assert_eq!(search_args("a.b")[3], "a\\.b");
    }

    #[test]
    fn keysyms_follow_x_names() {
        assert_eq!(keysym(&KeyCombo::parse("{ENTER}").unwrap()), "Return");
        assert_eq!(keysym(&KeyCombo::parse("ctrl+shift+tab").unwrap()), "ctrl+shift+Tab");
        assert_eq!(keysym(&KeyCombo::parse("!{F4}").unwrap()), "alt+F4");
        assert_eq!(keysym(&KeyCombo::parse("ctrl+a").unwrap()), "ctrl+a");
    }

    #[test]
    fn typed_text_is_read_from_stdin() {
        let args = type_args();
        assert_eq!(args[args.len() - 2..], ["--file".to_string(), "-".to_string()]);
        assert!(args.iter().all(|a| !a.contains("tiger")));
    }

    #[test]
    fn click_is_relative_to_active_window() {
        assert_eq!(click_args(5, -3)[4..6], ["5".to_string(), "-3".to_string()]);
    }
}
