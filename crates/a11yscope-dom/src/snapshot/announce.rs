//! Screen-reader announcement synthesis.
//!
//! A non-blank `aria-label` is always announced verbatim. Otherwise each
//! category has its own phrasing, quoted label first.

use super::raw::{FocusableEntry, FormControl, Heading, Landmark, RoleEntry};

/// Trimmed, non-empty value.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn labelled(label: Option<&str>, phrase: &str) -> String {
    match present(label) {
        Some(label) => format!("\"{}\" {}", label, phrase),
        None => phrase.to_string(),
    }
}

pub fn heading(h: &Heading) -> String {
    if let Some(aria) = present(h.aria_label.as_deref()) {
        return aria.to_string();
    }
    labelled(Some(&h.text), &format!("heading level {}", h.level))
}

pub fn landmark(l: &Landmark) -> String {
    if let Some(aria) = present(l.aria_label.as_deref()) {
        return aria.to_string();
    }
    let role = l.role.trim().to_ascii_lowercase();
    let phrase = match landmark_phrase(&role) {
        Some(phrase) => phrase.to_string(),
        None => format!("Landmark: {}", role),
    };
    match present(l.label.as_deref()) {
        Some(label) => format!("{}, {}", phrase, label),
        None => phrase,
    }
}

fn landmark_phrase(role: &str) -> Option<&'static str> {
    Some(match role {
        "banner" => "Banner landmark",
        "navigation" => "Navigation landmark",
        "main" => "Main landmark",
        "complementary" => "Complementary landmark",
        "contentinfo" => "Content information landmark",
        "region" => "Region landmark",
        "search" => "Search landmark",
        "form" => "Form landmark",
        _ => return None,
    })
}

pub fn role(r: &RoleEntry) -> String {
    if let Some(aria) = present(r.aria_label.as_deref()) {
        return aria.to_string();
    }
    let role = r.role.trim().to_ascii_lowercase();
    labelled(r.label.as_deref(), &role_phrase(&role))
}

pub(crate) fn role_phrase(role: &str) -> String {
    match role {
        "button" => "button",
        "link" => "link",
        "checkbox" => "checkbox",
        "radio" => "radio button",
        "tab" => "tab",
        "menuitem" => "menu item",
        "combobox" => "combo box",
        "textbox" => "edit text",
        "dialog" => "dialog",
        "alert" => "alert",
        other => other,
    }
    .to_string()
}

pub fn form_control(f: &FormControl) -> String {
    if let Some(aria) = present(f.aria_label.as_deref()) {
        return aria.to_string();
    }
    let phrase = input_phrase(&f.control_type);
    let label = present(f.label.as_deref())
        .or_else(|| present(f.name.as_deref()))
        .or_else(|| present(f.id.as_deref()));

    let mut out = match label {
        Some(label) => format!("\"{}\" {}", label, phrase),
        None => format!("unlabeled {}", phrase),
    };
    if f.required {
        out.push_str(", required");
    }
    out
}

fn input_phrase(control_type: &str) -> &'static str {
    match control_type.trim().to_ascii_lowercase().as_str() {
        "checkbox" => "checkbox",
        "radio" => "radio button",
        "submit" | "button" | "reset" => "button",
        "select" | "select-one" | "select-multiple" => "combo box",
        "textarea" => "edit text, multi-line",
        _ => "edit text",
    }
}

pub fn focusable(f: &FocusableEntry) -> String {
    if let Some(aria) = present(f.aria_label.as_deref()) {
        return aria.to_string();
    }
    let element = f.element.trim().to_ascii_lowercase();
    let phrase = match present(f.role.as_deref()) {
        Some(role) => role_phrase(&role.to_ascii_lowercase()),
        None => match element.as_str() {
            "a" => "link".to_string(),
            "button" => "button".to_string(),
            "input" => input_phrase(f.input_type.as_deref().unwrap_or("text")).to_string(),
            "select" => "combo box".to_string(),
            "textarea" => "edit text, multi-line".to_string(),
            other => other.to_string(),
        },
    };
    let label = present(f.label.as_deref())
        .or_else(|| present(f.name.as_deref()))
        .or_else(|| present(f.href.as_deref()));
    labelled(label, &phrase)
}
