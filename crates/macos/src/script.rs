//! AppleScript sources for the System Events calls the adapter makes.
//!
//! Builders are plain string functions so they can be checked on any
//! host. Only [`run`] touches `osascript`.

use client_launcher_core::error::AdapterError;

const FRONT_PROCESS: &str = "first process whose frontmost is true";

/// Quotes `s` as an AppleScript string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Raises the first window whose title contains `title`. Prints `found`
/// on success and nothing otherwise.
pub fn activate_window(title: &str) -> String {
    format!(
        r#"tell application "System Events"
    repeat with proc in (processes where background only is false)
        repeat with w in windows of proc
            if name of w contains {t} then
                set frontmost of proc to true
                perform action "AXRaise" of w
                return "found"
            end if
        end repeat
    end repeat
end tell
return """#,
        t = quote(title)
    )
}

/// Prints the title of the frontmost window.
pub fn front_window_title() -> String {
    format!(
        r#"tell application "System Events"
    return name of front window of ({FRONT_PROCESS})
end tell"#
    )
}

fn element(control: &str) -> String {
    if control.is_empty() {
        format!("front window of ({FRONT_PROCESS})")
    } else {
        format!(
            "first UI element of entire contents of front window of ({FRONT_PROCESS}) whose name is {}",
            quote(control)
        )
    }
}

pub fn keystroke(control: &str, text: &str) -> String {
    let focus = if control.is_empty() {
        String::new()
    } else {
        format!("    set focused of ({}) to true\n", element(control))
    };
    format!(
        "tell application \"System Events\"\n{focus}    keystroke {}\nend tell",
        quote(text)
    )
}

/// Replaces the control's value. Without a control the focused field is
/// cleared with select-all and retyped.
pub fn set_value(control: &str, text: &str) -> String {
    if control.is_empty() {
        return format!(
            "tell application \"System Events\"\n    keystroke \"a\" using {{command down}}\n    keystroke {}\nend tell",
            quote(text)
        );
    }
    format!(
        "tell application \"System Events\"\n    set value of ({}) to {}\nend tell",
        element(control),
        quote(text)
    )
}

/// Clicks `x`,`y` relative to the element's top-left corner.
pub fn click_at(control: &str, x: i32, y: i32) -> String {
    format!(
        r#"tell application "System Events"
    set {{px, py}} to position of ({})
    click at {{px + {x}, py + {y}}}
end tell"#,
        element(control)
    )
}

/// Reports whether assistive access is granted to the caller.
pub fn ui_elements_enabled() -> &'static str {
    r#"tell application "System Events" to return UI elements enabled"#
}

/// osascript reads the program from stdin, so typed text embedded in the
/// source stays out of the process list.
pub const OSASCRIPT_ARGS: [&str; 1] = ["-"];

/// Runs `source` and returns trimmed stdout. A non-zero exit is an error
/// carrying osascript's stderr as platform detail.
#[cfg(target_os = "macos")]
pub fn run(source: &str) -> Result<String, AdapterError> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new("osascript")
        .args(OSASCRIPT_ARGS)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AdapterError::backend_missing("osascript").with_platform_detail(e.to_string()))?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .map_err(|e| AdapterError::action_failed("could not pipe script to osascript").with_platform_detail(e.to_string()))?;
    }
    let output = child
        .wait_with_output()
        .map_err(|e| AdapterError::internal(format!("osascript did not finish: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(%stderr, "osascript failed");
        return Err(AdapterError::action_failed("System Events rejected the request")
            .with_platform_detail(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(not(target_os = "macos"))]
pub fn run(_source: &str) -> Result<String, AdapterError> {
    Err(AdapterError::not_supported("osascript"))
}
