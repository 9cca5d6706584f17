use crate::script::quote;
use client_launcher_core::action::{KeyCombo, Modifier};

/// AppleScript statement sending `combo` through System Events.
pub fn key_statement(combo: &KeyCombo) -> String {
    let using = modifier_clause(&combo.modifiers);
    match key_to_keycode(&combo.key) {
        Some(code) if combo.key.chars().count() > 1 => format!("key code {code}{using}"),
        _ => format!("keystroke {}{using}", quote(&combo.key)),
    }
}

fn modifier_clause(modifiers: &[Modifier]) -> String {
    if modifiers.is_empty() {
        return String::new();
    }
    let names: Vec<&str> = modifiers
        .iter()
        .map(|m| match m {
            Modifier::Cmd => "command down",
            Modifier::Ctrl => "control down",
            Modifier::Alt => "option down",
            Modifier::Shift => "shift down",
        })
        .collect();
    format!(" using {{{}}}", names.join(", "))
}

pub fn key_to_keycode(key: &str) -> Option<u16> {
    Some(match key {
        "a" => 0, "b" => 11, "c" => 8, "d" => 2, "e" => 14, "f" => 3,
        "g" => 5, "h" => 4, "i" => 34, "j" => 38, "k" => 40, "l" => 37,
        "m" => 46, "n" => 45, "o" => 31, "p" => 35, "q" => 12, "r" => 15,
        "s" => 1, "t" => 17, "u" => 32, "v" => 9, "w" => 13, "x" => 7,
        "y" => 16, "z" => 6,
        "0" => 29, "1" => 18, "2" => 19, "3" => 20, "4" => 21,
        "5" => 23, "6" => 22, "7" => 26, "8" => 28, "9" => 25,
        "return" | "enter" => 36,
        "escape" | "esc" => 53,
        "tab" => 48,
        "space" => 49,
        "delete" | "backspace" | "bs" => 51,
        "forwarddelete" | "del" => 117,
        "home" => 115,
        "end" => 119,
        "pageup" | "pgup" => 116,
        "pagedown" | "pgdn" => 121,
        "left" => 123, "right" => 124, "down" => 125, "up" => 126,
        "f1" => 122, "f2" => 120, "f3" => 99, "f4" => 118,
        "f5" => 96, "f6" => 97, "f7" => 98, "f8" => 100,
        "f9" => 101, "f10" => 109, "f11" => 103, "f12" => 111,
        _ => return None,
    })
}
