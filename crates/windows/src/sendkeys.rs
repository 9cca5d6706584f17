//! `WScript.Shell` SendKeys notation and the PowerShell bridge.

use client_launcher_core::{
    action::{KeyCombo, Modifier},
    error::AdapterError,
};

/// Wraps SendKeys metacharacters in braces so `text` is typed literally.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '+' | '^' | '%' | '~' | '(' | ')' | '{' | '}' | '[' | ']' => {
                out.push('{');
                out.push(c);
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}

pub fn combo_keys(combo: &KeyCombo) -> String {
    let mut out = String::new();
    for m in &combo.modifiers {
        out.push(match m {
            Modifier::Ctrl => '^',
            Modifier::Alt => '%',
            Modifier::Shift => '+',
            // no Windows-key prefix in SendKeys
            Modifier::Cmd => '^',
        });
    }
    let key = match combo.key.as_str() {
        "enter" | "return" => "{ENTER}".to_string(),
        "tab" => "{TAB}".into(),
        "escape" | "esc" => "{ESC}".into(),
        "space" => " ".into(),
        "backspace" | "bs" => "{BACKSPACE}".into(),
        "delete" | "del" => "{DELETE}".into(),
        "home" => "{HOME}".into(),
        "end" => "{END}".into(),
        "pageup" | "pgup" => "{PGUP}".into(),
        "pagedown" | "pgdn" => "{PGDN}".into(),
        "up" => "{UP}".into(),
        "down" => "{DOWN}".into(),
        "left" => "{LEFT}".into(),
        "right" => "{RIGHT}".into(),
        "insert" | "ins" => "{INSERT}".into(),
        f if f.len() > 1 && f.starts_with('f') && f[1..].chars().all(|c| c.is_ascii_digit()) => {
            format!("{{{}}}", f.to_uppercase())
        }
        other => escape_literal(other),
    };
    out.push_str(&key);
    out
}

/// Environment variable carrying the title or keys into the script.
/// Scripts are fixed text, so typed input never reaches the command line.
pub const INPUT_ENV: &str = "CLIENT_LAUNCHER_INPUT";

pub const CHECK_SCRIPT: &str = "$null = New-Object -ComObject WScript.Shell; 'ok'";

pub const APP_ACTIVATE_SCRIPT: &str =
    "$ws = New-Object -ComObject WScript.Shell; if ($ws.AppActivate($env:CLIENT_LAUNCHER_INPUT)) { 'found' }";

pub const SEND_KEYS_SCRIPT: &str =
    "$ws = New-Object -ComObject WScript.Shell; $ws.SendKeys($env:CLIENT_LAUNCHER_INPUT)";

pub fn powershell_args(script: &str) -> [&str; 4] {
    ["-NoProfile", "-NonInteractive", "-Command", script]
}

/// Runs `script` with `input` exposed as [`INPUT_ENV`].
#[cfg(target_os = "windows")]
pub fn run(script: &str, input: Option<&str>) -> Result<String, AdapterError> {
    use std::os::windows::process::CommandExt;
    use std::process::Command;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let mut command = Command::new("powershell");
    command.args(powershell_args(script)).creation_flags(CREATE_NO_WINDOW);
    match input {
        Some(value) => command.env(INPUT_ENV, value),
        None => command.env_remove(INPUT_ENV),
    };
    let output = command
        .output()
        .map_err(|e| AdapterError::backend_missing("powershell").with_platform_detail(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(%stderr, "powershell failed");
        return Err(AdapterError::action_failed("WScript.Shell call failed").with_platform_detail(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(not(target_os = "windows"))]
pub fn run(_script: &str, _input: Option<&str>) -> Result<String, AdapterError> {
    Err(AdapterError::not_supported("powershell"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metacharacters_are_braced() {
        assert_eq!(escape_literal("p@ss+w0rd(1)"), "p@ss{+}w0rd{(}1{)}");
        assert_eq!(escape_literal("100%~"), "100{%}{~}");
    }

    #[test]
    fn combos_use_sendkeys_prefixes() {
        assert_eq!(combo_keys(&KeyCombo::parse("{ENTER}").unwrap()), "{ENTER}");
        assert_eq!(combo_keys(&KeyCombo::parse("ctrl+shift+tab").unwrap()), "^+{TAB}");
        assert_eq!(combo_keys(&KeyCombo::parse("alt+f4").unwrap()), "%{F4}");
    }

    #[test]
    fn scripts_read_their_input_from_the_environment() {
        for script in [APP_ACTIVATE_SCRIPT, SEND_KEYS_SCRIPT] {
            assert!(script.contains(&format!("$env:{INPUT_ENV}")));
        }
        let args = powershell_args(SEND_KEYS_SCRIPT);
        assert!(args.iter().all(|a| !a.contains("tiger")));
        assert_eq!(args[3], SEND_KEYS_SCRIPT);
    }
}
