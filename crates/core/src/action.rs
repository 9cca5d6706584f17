use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One scripted UI action. The short names used by older configs
/// (`Wait`, `ControlSend`, ...) are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    #[serde(alias = "Wait")]
    WaitForWindow,
    #[serde(alias = "ControlSend")]
    SendText,
    #[serde(alias = "ControlSetText")]
    SetText,
    #[serde(alias = "ControlClick")]
    Click,
    #[serde(alias = "SendKey")]
    SendKeyCombination,
}

impl StepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepAction::WaitForWindow => "wait_for_window",
            StepAction::SendText => "send_text",
            StepAction::SetText => "set_text",
            StepAction::Click => "click",
            StepAction::SendKeyCombination => "send_key_combination",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationStep {
    #[serde(alias = "cmd")]
    pub action: StepAction,
    /// Window title or control identifier. Template-expanded before use.
    #[serde(default, alias = "element")]
    pub target: String,
    /// Text, `x,y` coordinates, key combination or wait seconds depending on `action`.
    #[serde(default, alias = "type")]
    pub payload: String,
}

impl AutomationStep {
    pub fn new(action: StepAction, target: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { action, target: target.into(), payload: payload.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    pub key: String,
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Modifier {
    Cmd,
    Ctrl,
    Alt,
    Shift,
}

const AUTOIT_MODIFIERS: &[char] = &['^', '!', '+', '#'];
const MAX_REPEAT: usize = 100;

impl KeyCombo {
    /// Accepts `ctrl+shift+t` style combos as well as AutoIt-style
    /// `^{ENTER}` chords. Key names are lowercased. A string holding
    /// several keys is rejected, see [`KeyCombo::parse_sequence`].
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let mut combos = Self::parse_sequence(s)?;
        if combos.len() > 1 {
            return Err(AppError::invalid_input(format!(
                "'{}' is a sequence of {} keys, not a single combo",
                s.trim(),
                combos.len()
            )));
        }
        combos
            .pop()
            .ok_or_else(|| AppError::invalid_input("Empty key combo"))
    }

    /// Parses one or more keys in send order. AutoIt notation
    /// (`^+{TAB}`, `{TAB}{ENTER}`, `{TAB 3}`) yields one combo per key;
    /// plus syntax and bare key names yield exactly one.
    pub fn parse_sequence(s: &str) -> Result<Vec<Self>, AppError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::invalid_input("Empty key combo"));
        }
        if s.starts_with(AUTOIT_MODIFIERS) || s.contains('{') {
            parse_autoit_sequence(s)
        } else if s.len() > 1 && s.contains('+') {
            Ok(vec![parse_plus_combo(&s.to_lowercase())?])
        } else {
            Ok(vec![KeyCombo { key: s.to_lowercase(), modifiers: Vec::new() }])
        }
    }
}

fn parse_plus_combo(s: &str) -> Result<KeyCombo, AppError> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();
    let key = parts
        .last()
        .copied()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::invalid_input("Empty key combo"))?
        .to_string();
    let mut modifiers = Vec::new();

    for &part in &parts[..parts.len() - 1] {
        let modifier = match part {
            "cmd" | "command" | "super" | "win" => Modifier::Cmd,
            "ctrl" | "control" => Modifier::Ctrl,
            "alt" | "option" => Modifier::Alt,
            "shift" => Modifier::Shift,
            other => {
                return Err(AppError::invalid_input(format!(
                    "Unknown modifier: '{other}'"
                )))
            }
        };
        modifiers.push(modifier);
    }

    Ok(KeyCombo { key, modifiers })
}

fn parse_autoit_sequence(s: &str) -> Result<Vec<KeyCombo>, AppError> {
    let mut combos = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let mut modifiers = Vec::new();
        while rest.len() > 1 {
            let modifier = match rest.as_bytes()[0] {
                b'^' => Modifier::Ctrl,
                b'!' => Modifier::Alt,
                b'+' => Modifier::Shift,
                b'#' => Modifier::Cmd,
                _ => break,
            };
            modifiers.push(modifier);
            rest = &rest[1..];
        }

        let (token, tail) = next_token(rest, s)?;
        rest = tail;
        let (name, count) = match token.rsplit_once(' ') {
            Some((name, n)) if !name.trim().is_empty() => match n.parse::<usize>() {
                Ok(n) => (name.trim(), n),
                Err(_) => (token, 1),
            },
            _ => (token, 1),
        };
        let key = if name == " " { "space".to_string() } else { name.trim().to_lowercase() };
        if key.is_empty() {
            return Err(AppError::invalid_input(format!("No key in combo '{s}'")));
        }
        if count > MAX_REPEAT {
            return Err(AppError::invalid_input(format!(
                "Repeat count {count} in '{s}' exceeds {MAX_REPEAT}"
            )));
        }
        for _ in 0..count {
            combos.push(KeyCombo { key: key.clone(), modifiers: modifiers.clone() });
        }
    }
    Ok(combos)
}

/// Splits off one key: a `{NAME}` group (`{}}` and `{{}` name the braces
/// themselves) or a single character.
fn next_token<'a>(rest: &'a str, whole: &str) -> Result<(&'a str, &'a str), AppError> {
    if let Some(body) = rest.strip_prefix('{') {
        if body.starts_with("}}") || body.starts_with("{}") {
            return Ok((&body[..1], &body[2..]));
        }
        let end = body.find('}').ok_or_else(|| {
            AppError::invalid_input(format!("Unclosed '{{' in key combo '{whole}'"))
        })?;
        return Ok((&body[..end], &body[end + 1..]));
    }
    let first = rest
        .chars()
        .next()
        .ok_or_else(|| AppError::invalid_input(format!("No key in combo '{whole}'")))?;
    Ok(rest.split_at(first.len_utf8()))
}
