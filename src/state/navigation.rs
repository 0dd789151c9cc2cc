//! Navigation-related state types.
//!
//! This module contains enums and types related to navigation, views,
//! menus, and focus.

/// Specifying the different foci.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    Menu,
    View,
}

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Login,
    Categories,
    SearchEngines,
    Icons,
    Wallpapers,
    Settings,
}

impl View {
    /// Views reachable from the sidebar menu, in display order.
    ///
    pub const MENU: [View; 5] = [
        View::Categories,
        View::SearchEngines,
        View::Icons,
        View::Wallpapers,
        View::Settings,
    ];

    /// Sidebar label for the view.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Categories => "Categories",
            View::SearchEngines => "Search Engines",
            View::Icons => "Bookmark Icons",
            View::Wallpapers => "Wallpapers",
            View::Settings => "System Config",
        }
    }
}

/// Specifies which login input currently has focus.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoginField {
    Username,
    Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus() {
        assert_eq!(Focus::Menu, Focus::Menu);
        assert_ne!(Focus::Menu, Focus::View);
    }

    #[test]
    fn test_menu_excludes_login() {
        assert!(!View::MENU.contains(&View::Login));
        assert_eq!(View::MENU.len(), 5);
    }

    #[test]
    fn test_view_titles() {
        assert_eq!(View::Categories.title(), "Categories");
        assert_eq!(View::Settings.title(), "System Config");
    }
}
