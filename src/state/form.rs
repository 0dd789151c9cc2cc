//! Modal form state for create/edit dialogs.
//!
//! Every list view shares the same modal pattern: a stack of text
//! fields, an optional multi-line editor (config values), and an
//! optional enable/disable switch. The form validates on submit and
//! the active view's handler turns it into a network event.

use crate::api::{Category, Icon, SearchEngine, SystemConfig, Wallpaper};
use regex::Regex;
use tui_textarea::TextArea;

/// Identifies which record type a form edits, carrying the record id
/// when editing an existing one.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Category { id: Option<u64> },
    SearchEngine { id: Option<u64> },
    Icon { id: Option<u64> },
    Wallpaper { id: Option<u64> },
    Config { update: bool },
    Password,
}

/// One single-line input within a form.
///
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl FormField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        FormField {
            label,
            value: value.into(),
            masked: false,
        }
    }

    fn masked(label: &'static str) -> Self {
        FormField {
            label,
            value: String::new(),
            masked: true,
        }
    }
}

/// State of the currently open modal form.
///
pub struct FormState {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<FormField>,
    pub value_editor: Option<TextArea<'static>>,
    pub is_active: Option<bool>,
    pub focus: usize,
    pub error: Option<String>,
}

impl FormState {
    /// Form for creating or editing a category.
    ///
    pub fn category(existing: Option<&Category>) -> Self {
        let title = match existing {
            Some(category) => format!("Edit Category: {}", category.name),
            None => "New Category".to_string(),
        };
        FormState {
            kind: FormKind::Category {
                id: existing.map(|c| c.id),
            },
            title,
            fields: vec![
                FormField::new("Name", existing.map(|c| c.name.as_str()).unwrap_or("")),
                FormField::new(
                    "English name",
                    existing.map(|c| c.name_en.as_str()).unwrap_or(""),
                ),
            ],
            value_editor: None,
            is_active: Some(existing.map(|c| c.is_active).unwrap_or(true)),
            focus: 0,
            error: None,
        }
    }

    /// Form for creating or editing a search engine.
    ///
    pub fn search_engine(existing: Option<&SearchEngine>) -> Self {
        let title = match existing {
            Some(engine) => format!("Edit Search Engine: {}", engine.name),
            None => "New Search Engine".to_string(),
        };
        FormState {
            kind: FormKind::SearchEngine {
                id: existing.map(|e| e.id),
            },
            title,
            fields: vec![
                FormField::new("Name", existing.map(|e| e.name.as_str()).unwrap_or("")),
                FormField::new(
                    "Search URL (%s = query)",
                    existing.map(|e| e.url.as_str()).unwrap_or(""),
                ),
                FormField::new(
                    "Icon URL",
                    existing.map(|e| e.icon_url.as_str()).unwrap_or(""),
                ),
            ],
            value_editor: None,
            is_active: Some(existing.map(|e| e.is_active).unwrap_or(true)),
            focus: 0,
            error: None,
        }
    }

    /// Form for creating or editing a bookmark icon.
    ///
    pub fn icon(existing: Option<&Icon>) -> Self {
        let title = match existing {
            Some(icon) => format!("Edit Bookmark: {}", icon.title),
            None => "New Bookmark".to_string(),
        };
        let category_ids = existing
            .map(|icon| {
                icon.categories
                    .iter()
                    .map(|c| c.id.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        FormState {
            kind: FormKind::Icon {
                id: existing.map(|i| i.id),
            },
            title,
            fields: vec![
                FormField::new("Title", existing.map(|i| i.title.as_str()).unwrap_or("")),
                FormField::new(
                    "Description",
                    existing.map(|i| i.description.as_str()).unwrap_or(""),
                ),
                FormField::new("URL", existing.map(|i| i.url.as_str()).unwrap_or("")),
                FormField::new(
                    "Image URL",
                    existing.map(|i| i.img_url.as_str()).unwrap_or(""),
                ),
                FormField::new(
                    "Background color",
                    existing.map(|i| i.bg_color.as_str()).unwrap_or("#ffffff"),
                ),
                FormField::new("Category IDs (comma-separated)", category_ids),
            ],
            value_editor: None,
            is_active: Some(existing.map(|i| i.is_active).unwrap_or(true)),
            focus: 0,
            error: None,
        }
    }

    /// Form for creating or editing a wallpaper.
    ///
    pub fn wallpaper(existing: Option<&Wallpaper>) -> Self {
        let title = match existing {
            Some(wallpaper) => format!("Edit Wallpaper: {}", wallpaper.title),
            None => "New Wallpaper".to_string(),
        };
        FormState {
            kind: FormKind::Wallpaper {
                id: existing.map(|w| w.id),
            },
            title,
            fields: vec![
                FormField::new("Title", existing.map(|w| w.title.as_str()).unwrap_or("")),
                FormField::new("URL", existing.map(|w| w.url.as_str()).unwrap_or("")),
                FormField::new(
                    "Thumbnail URL",
                    existing.map(|w| w.thumb_url.as_str()).unwrap_or(""),
                ),
                FormField::new("Source", existing.map(|w| w.source.as_str()).unwrap_or("")),
            ],
            value_editor: None,
            is_active: Some(existing.map(|w| w.is_active).unwrap_or(true)),
            focus: 0,
            error: None,
        }
    }

    /// Form for creating or editing a configuration entry. Values can
    /// span multiple lines, so they get a full editor.
    ///
    pub fn config(existing: Option<&SystemConfig>) -> Self {
        let title = match existing {
            Some(config) => format!("Edit Config: {}", config.key),
            None => "New Config Entry".to_string(),
        };
        let mut value_editor = TextArea::from(
            existing
                .map(|c| c.value.lines().map(str::to_string).collect::<Vec<_>>())
                .unwrap_or_default(),
        );
        value_editor.set_cursor_line_style(ratatui::style::Style::default());
        FormState {
            kind: FormKind::Config {
                update: existing.is_some(),
            },
            title,
            fields: vec![FormField::new(
                "Key",
                existing.map(|c| c.key.as_str()).unwrap_or(""),
            )],
            value_editor: Some(value_editor),
            is_active: None,
            focus: 0,
            error: None,
        }
    }

    /// Form for changing the admin password.
    ///
    pub fn password() -> Self {
        FormState {
            kind: FormKind::Password,
            title: "Change Password".to_string(),
            fields: vec![
                FormField::masked("Current password"),
                FormField::masked("New password"),
                FormField::masked("Repeat new password"),
            ],
            value_editor: None,
            is_active: None,
            focus: 0,
            error: None,
        }
    }

    /// Total number of focusable slots: text fields, then the value
    /// editor if present, then the enable switch if present.
    ///
    pub fn slot_count(&self) -> usize {
        self.fields.len()
            + usize::from(self.value_editor.is_some())
            + usize::from(self.is_active.is_some())
    }

    /// Move focus to the next slot, wrapping.
    ///
    pub fn next_slot(&mut self) {
        self.focus = (self.focus + 1) % self.slot_count();
    }

    /// Move focus to the previous slot, wrapping.
    ///
    pub fn prev_slot(&mut self) {
        self.focus = (self.focus + self.slot_count() - 1) % self.slot_count();
    }

    /// Whether focus is on the multi-line value editor.
    ///
    pub fn on_value_editor(&self) -> bool {
        self.value_editor.is_some() && self.focus == self.fields.len()
    }

    /// Whether focus is on the enable/disable switch.
    ///
    pub fn on_switch(&self) -> bool {
        self.is_active.is_some() && self.focus == self.slot_count() - 1
    }

    /// Mutable access to the focused single-line field, if any.
    ///
    pub fn active_field_mut(&mut self) -> Option<&mut FormField> {
        if self.focus < self.fields.len() {
            self.fields.get_mut(self.focus)
        } else {
            None
        }
    }

    /// Flip the enable/disable switch if focus is on it.
    ///
    pub fn toggle_switch(&mut self) {
        if self.on_switch() {
            if let Some(flag) = self.is_active.as_mut() {
                *flag = !*flag;
            }
        }
    }

    /// The multi-line editor's content joined back into one value.
    ///
    pub fn editor_value(&self) -> String {
        self.value_editor
            .as_ref()
            .map(|editor| editor.lines().join("\n"))
            .unwrap_or_default()
    }

    /// Check field contents against per-kind rules. Returns the first
    /// violation found.
    ///
    pub fn validate(&self) -> Result<(), String> {
        let field = |index: usize| self.fields[index].value.trim();
        match &self.kind {
            FormKind::Category { .. } => {
                if field(0).is_empty() {
                    return Err("Name is required".to_string());
                }
            }
            FormKind::SearchEngine { .. } => {
                if field(0).is_empty() {
                    return Err("Name is required".to_string());
                }
                if !is_http_url(field(1)) {
                    return Err("Search URL must start with http:// or https://".to_string());
                }
                if !field(1).contains("%s") {
                    return Err("Search URL must contain a %s placeholder".to_string());
                }
                if !field(2).is_empty() && !is_http_url(field(2)) {
                    return Err("Icon URL must start with http:// or https://".to_string());
                }
            }
            FormKind::Icon { .. } => {
                if field(0).is_empty() {
                    return Err("Title is required".to_string());
                }
                if !is_http_url(field(2)) {
                    return Err("URL must start with http:// or https://".to_string());
                }
                if !field(3).is_empty() && !is_http_url(field(3)) {
                    return Err("Image URL must start with http:// or https://".to_string());
                }
                if !field(4).is_empty() && !is_hex_color(field(4)) {
                    return Err("Background color must look like #rrggbb".to_string());
                }
                if parse_id_list(field(5)).is_none() {
                    return Err("Category IDs must be comma-separated numbers".to_string());
                }
            }
            FormKind::Wallpaper { .. } => {
                if field(0).is_empty() {
                    return Err("Title is required".to_string());
                }
                if !is_http_url(field(1)) {
                    return Err("URL must start with http:// or https://".to_string());
                }
                if !field(2).is_empty() && !is_http_url(field(2)) {
                    return Err("Thumbnail URL must start with http:// or https://".to_string());
                }
            }
            FormKind::Config { .. } => {
                if !is_config_key(field(0)) {
                    return Err("Key must be lowercase letters, digits or underscores".to_string());
                }
            }
            FormKind::Password => {
                if field(0).is_empty() {
                    return Err("Current password is required".to_string());
                }
                if self.fields[1].value.len() < 6 {
                    return Err("New password must be at least 6 characters".to_string());
                }
                if self.fields[1].value != self.fields[2].value {
                    return Err("New passwords do not match".to_string());
                }
            }
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    Regex::new(r"^https?://\S+$")
        .map(|pattern| pattern.is_match(value))
        .unwrap_or(false)
}

fn is_hex_color(value: &str) -> bool {
    Regex::new(r"^#[0-9a-fA-F]{6}$")
        .map(|pattern| pattern.is_match(value))
        .unwrap_or(false)
}

fn is_config_key(value: &str) -> bool {
    Regex::new(r"^[a-z][a-z0-9_]*$")
        .map(|pattern| pattern.is_match(value))
        .unwrap_or(false)
}

/// Parse "1,2,3" into ids; empty input is an empty list. Returns None
/// on anything non-numeric.
///
pub fn parse_id_list(value: &str) -> Option<Vec<u64>> {
    if value.trim().is_empty() {
        return Some(Vec::new());
    }
    value
        .split(',')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_form_requires_name() {
        let form = FormState::category(None);
        assert!(form.validate().is_err());

        let mut form = FormState::category(None);
        form.fields[0].value = "Tools".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_search_engine_form_requires_placeholder() {
        let mut form = FormState::search_engine(None);
        form.fields[0].value = "DuckDuckGo".to_string();
        form.fields[1].value = "https://duckduckgo.com/?q=test".to_string();
        let err = form.validate().unwrap_err();
        assert!(err.contains("%s"));

        form.fields[1].value = "https://duckduckgo.com/?q=%s".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_icon_form_checks_color_and_ids() {
        let mut form = FormState::icon(None);
        form.fields[0].value = "Mail".to_string();
        form.fields[2].value = "https://mail.example.com".to_string();
        form.fields[4].value = "red".to_string();
        assert!(form.validate().unwrap_err().contains("#rrggbb"));

        form.fields[4].value = "#aabbcc".to_string();
        form.fields[5].value = "1,x".to_string();
        assert!(form.validate().unwrap_err().contains("Category IDs"));

        form.fields[5].value = "1, 2".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_password_form_rules() {
        let mut form = FormState::password();
        form.fields[0].value = "old".to_string();
        form.fields[1].value = "short".to_string();
        form.fields[2].value = "short".to_string();
        assert!(form.validate().is_err());

        form.fields[1].value = "longenough".to_string();
        form.fields[2].value = "different".to_string();
        assert!(form.validate().unwrap_err().contains("match"));

        form.fields[2].value = "longenough".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_slot_navigation_covers_switch() {
        let mut form = FormState::category(None);
        // Two fields plus the enable switch.
        assert_eq!(form.slot_count(), 3);
        form.next_slot();
        form.next_slot();
        assert!(form.on_switch());
        form.toggle_switch();
        assert_eq!(form.is_active, Some(false));
        form.next_slot();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_config_form_uses_editor() {
        let mut form = FormState::config(None);
        assert_eq!(form.slot_count(), 2);
        form.next_slot();
        assert!(form.on_value_editor());
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list(""), Some(vec![]));
        assert_eq!(parse_id_list("3"), Some(vec![3]));
        assert_eq!(parse_id_list("1, 2,3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_id_list("1,b"), None);
    }
}
