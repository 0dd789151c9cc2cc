use crate::api::{AdminUser, Category, ConfigKeyInfo, Icon, Page, SearchEngine, SystemConfig, Wallpaper};
use crate::app::{ConfigSaveSender, NetworkEventSender};
use crate::events::network::Event as NetworkEvent;
use crate::state::form::parse_id_list;
use crate::state::{Focus, FormKind, FormState, LoginField, View};
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use log::*;
use ratatui::layout::Rect;

/// How many render ticks a notification stays visible.
const NOTIFICATION_TICKS: u16 = 80;

/// Cap on retained log entries for the debug pane.
const MAX_DEBUG_ENTRIES: usize = 500;

/// Page size requested for paginated views.
pub const PAGE_SIZE: i64 = 20;

fn empty_page<T>() -> Page<T> {
    Page {
        list: vec![],
        total: 0,
        page: 1,
        size: PAGE_SIZE,
    }
}

/// Distinguishes success notices from error notices in the footer.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// One transient footer notification.
///
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    ticks_left: u16,
}

/// A delete awaiting user confirmation.
///
#[derive(Debug, Clone)]
pub enum PendingDelete {
    Category { id: u64, name: String },
    SearchEngine { id: u64, name: String },
    Icon { id: u64, title: String },
    Wallpaper { id: u64, title: String },
    Config { key: String },
}

impl PendingDelete {
    /// Human-readable description for the confirmation dialog.
    ///
    pub fn description(&self) -> String {
        match self {
            PendingDelete::Category { name, .. } => {
                format!("Delete category '{}'? Its bookmarks become uncategorized.", name)
            }
            PendingDelete::SearchEngine { name, .. } => {
                format!("Delete search engine '{}'?", name)
            }
            PendingDelete::Icon { title, .. } => format!("Delete bookmark '{}'?", title),
            PendingDelete::Wallpaper { title, .. } => format!("Delete wallpaper '{}'?", title),
            PendingDelete::Config { key } => format!("Delete config entry '{}'?", key),
        }
    }
}

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    // Session
    access_token: Option<String>,
    user: Option<AdminUser>,
    auth_error: Option<String>,
    login_username: String,
    login_password: String,
    login_field: LoginField,
    // Navigation
    terminal_size: Rect,
    spinner_index: usize,
    current_focus: Focus,
    current_view: View,
    menu_index: usize,
    loading: bool,
    // Collections
    categories: Vec<Category>,
    categories_generation: u64,
    categories_index: usize,
    engines: Vec<SearchEngine>,
    engines_generation: u64,
    engines_index: usize,
    icons: Page<Icon>,
    icons_index: usize,
    wallpapers: Page<Wallpaper>,
    wallpapers_index: usize,
    configs: Vec<SystemConfig>,
    config_keys: Vec<ConfigKeyInfo>,
    configs_index: usize,
    // Modals
    form: Option<FormState>,
    pending_delete: Option<PendingDelete>,
    notification: Option<Notification>,
    // Log pane
    debug_mode: bool,
    debug_index: usize,
    debug_entries: Vec<String>,
    // Appearance
    theme: Theme,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            config_save_sender: None,
            access_token: None,
            user: None,
            auth_error: None,
            login_username: String::new(),
            login_password: String::new(),
            login_field: LoginField::Username,
            terminal_size: Rect::default(),
            spinner_index: 0,
            current_focus: Focus::Menu,
            current_view: View::Login,
            menu_index: 0,
            loading: false,
            categories: vec![],
            categories_generation: 0,
            categories_index: 0,
            engines: vec![],
            engines_generation: 0,
            engines_index: 0,
            icons: empty_page(),
            icons_index: 0,
            wallpapers: empty_page(),
            wallpapers_index: 0,
            configs: vec![],
            config_keys: vec![],
            configs_index: 0,
            form: None,
            pending_delete: None,
            notification: None,
            debug_mode: false,
            debug_index: 0,
            debug_entries: vec![],
            theme: Theme::default(),
        }
    }
}

impl State {
    /// Return new instance with channel senders and any session token
    /// restored from configuration.
    ///
    pub fn new(
        net_sender: NetworkEventSender,
        config_save_sender: ConfigSaveSender,
        access_token: Option<String>,
        theme: Theme,
    ) -> State {
        let has_token = access_token.is_some();
        State {
            net_sender: Some(net_sender),
            config_save_sender: Some(config_save_sender),
            access_token,
            current_view: if has_token { View::Categories } else { View::Login },
            current_focus: if has_token { Focus::Menu } else { Focus::View },
            theme,
            ..State::default()
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Dispatch a network event to the network thread.
    ///
    pub fn send_network_event(&self, event: NetworkEvent) {
        if let Some(sender) = &self.net_sender {
            if let Err(e) = sender.send(event) {
                error!("Failed to dispatch network event: {}", e);
            }
        }
    }

    /// Ask the config saver thread to persist the current session.
    ///
    fn request_config_save(&self) {
        if let Some(sender) = &self.config_save_sender {
            if sender.send(()).is_err() {
                warn!("Config saver unavailable; session not persisted");
            }
        }
    }

    /// Advance animations and expire transient notices. Called once
    /// per render tick.
    ///
    pub fn tick(&mut self) {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        if let Some(notification) = self.notification.as_mut() {
            notification.ticks_left = notification.ticks_left.saturating_sub(1);
        }
        if matches!(&self.notification, Some(notification) if notification.ticks_left == 0) {
            self.notification = None;
        }
    }

    pub fn spinner_index(&self) -> usize {
        self.spinner_index
    }

    pub fn set_terminal_size(&mut self, size: Rect) {
        self.terminal_size = size;
    }

    #[allow(dead_code)]
    pub fn terminal_size(&self) -> Rect {
        self.terminal_size
    }

    // ===== Session =====

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Install a fresh session after login: remember the token, clear
    /// the login form, persist the token, and enter the first view.
    ///
    pub fn set_session(&mut self, token: String, user: AdminUser) {
        info!("Session established for '{}'", user.username);
        self.access_token = Some(token);
        self.user = Some(user);
        self.auth_error = None;
        self.login_username.clear();
        self.login_password.clear();
        self.request_config_save();
        self.current_focus = Focus::Menu;
        self.set_view(View::Categories);
    }

    pub fn user(&self) -> Option<&AdminUser> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: AdminUser) {
        self.user = Some(user);
    }

    /// Drop the session, e.g. after the backend rejects the stored
    /// token, and fall back to the login screen.
    ///
    pub fn clear_session(&mut self, reason: String) {
        warn!("Session cleared: {}", reason);
        self.access_token = None;
        self.user = None;
        self.auth_error = Some(reason);
        self.current_view = View::Login;
        self.current_focus = Focus::View;
        self.request_config_save();
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn set_auth_error(&mut self, message: String) {
        self.auth_error = Some(message);
    }

    pub fn login_username(&self) -> &str {
        &self.login_username
    }

    pub fn login_password(&self) -> &str {
        &self.login_password
    }

    pub fn login_field(&self) -> LoginField {
        self.login_field
    }

    pub fn toggle_login_field(&mut self) {
        self.login_field = match self.login_field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn push_login_char(&mut self, c: char) {
        match self.login_field {
            LoginField::Username => self.login_username.push(c),
            LoginField::Password => self.login_password.push(c),
        }
    }

    pub fn pop_login_char(&mut self) {
        match self.login_field {
            LoginField::Username => self.login_username.pop(),
            LoginField::Password => self.login_password.pop(),
        };
    }

    /// Submit the login form if both fields are filled.
    ///
    pub fn submit_login(&mut self) {
        if self.login_username.is_empty() || self.login_password.is_empty() {
            self.auth_error = Some("Enter username and password".to_string());
            return;
        }
        self.auth_error = None;
        self.loading = true;
        self.send_network_event(NetworkEvent::Login {
            username: self.login_username.clone(),
            password: self.login_password.clone(),
        });
    }

    // ===== Navigation =====

    pub fn current_view(&self) -> View {
        self.current_view
    }

    /// Switch view and kick off the fetch that populates it. Every
    /// entry re-fetches from the server; nothing is cached across
    /// visits.
    ///
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.loading = true;
        match view {
            View::Login => self.loading = false,
            View::Categories => self.send_network_event(NetworkEvent::LoadCategories),
            View::SearchEngines => self.send_network_event(NetworkEvent::LoadSearchEngines),
            View::Icons => self.send_network_event(NetworkEvent::LoadIcons { page: 1 }),
            View::Wallpapers => {
                self.send_network_event(NetworkEvent::LoadWallpapers { page: 1 })
            }
            View::Settings => self.send_network_event(NetworkEvent::LoadConfigs),
        }
    }

    /// Re-fetch the current view's data.
    ///
    pub fn refresh_current_view(&mut self) {
        let view = self.current_view;
        match view {
            View::Icons => {
                let page = self.icons.page;
                self.loading = true;
                self.send_network_event(NetworkEvent::LoadIcons { page });
            }
            View::Wallpapers => {
                let page = self.wallpapers.page;
                self.loading = true;
                self.send_network_event(NetworkEvent::LoadWallpapers { page });
            }
            _ => self.set_view(view),
        }
    }

    pub fn current_focus(&self) -> Focus {
        self.current_focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.current_focus = focus;
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % View::MENU.len();
    }

    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + View::MENU.len() - 1) % View::MENU.len();
    }

    /// Enter the view selected in the sidebar.
    ///
    pub fn activate_menu_selection(&mut self) {
        let view = View::MENU[self.menu_index];
        self.current_focus = Focus::View;
        self.set_view(view);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    // ===== Row selection =====

    /// Index of the selected row in the current view's list.
    ///
    pub fn selected_row(&self) -> usize {
        match self.current_view {
            View::Categories => self.categories_index,
            View::SearchEngines => self.engines_index,
            View::Icons => self.icons_index,
            View::Wallpapers => self.wallpapers_index,
            View::Settings => self.configs_index,
            View::Login => 0,
        }
    }

    fn current_list_len(&self) -> usize {
        match self.current_view {
            View::Categories => self.categories.len(),
            View::SearchEngines => self.engines.len(),
            View::Icons => self.icons.list.len(),
            View::Wallpapers => self.wallpapers.list.len(),
            View::Settings => self.configs.len(),
            View::Login => 0,
        }
    }

    pub fn select_next_row(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }
        let slot = self.selected_row_mut_ref();
        *slot = (*slot + 1) % len;
    }

    pub fn select_prev_row(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }
        let slot = self.selected_row_mut_ref();
        *slot = (*slot + len - 1) % len;
    }

    fn selected_row_mut_ref(&mut self) -> &mut usize {
        match self.current_view {
            View::Categories => &mut self.categories_index,
            View::SearchEngines => &mut self.engines_index,
            View::Icons => &mut self.icons_index,
            View::Wallpapers => &mut self.wallpapers_index,
            _ => &mut self.configs_index,
        }
    }

    pub fn configs_index(&self) -> usize {
        self.configs_index
    }

    // ===== Categories =====

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_generation(&self) -> u64 {
        self.categories_generation
    }

    /// Replace the category mirror with the synchronizer's sequence.
    ///
    pub fn set_categories(&mut self, categories: Vec<Category>, generation: u64) {
        self.categories = categories;
        self.categories_generation = generation;
        self.categories_index = self
            .categories_index
            .min(self.categories.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.categories_index)
    }

    /// Apply a row move to the local mirror before the synchronizer
    /// confirms it, so the view reflects the gesture immediately.
    ///
    pub fn move_category_row(&mut self, from: usize, to: usize) {
        if from < self.categories.len() && to < self.categories.len() {
            let record = self.categories.remove(from);
            self.categories.insert(to, record);
            self.categories_index = to;
        }
    }

    // ===== Search engines =====

    pub fn engines(&self) -> &[SearchEngine] {
        &self.engines
    }

    pub fn engines_generation(&self) -> u64 {
        self.engines_generation
    }

    pub fn set_engines(&mut self, engines: Vec<SearchEngine>, generation: u64) {
        self.engines = engines;
        self.engines_generation = generation;
        self.engines_index = self.engines_index.min(self.engines.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn selected_engine(&self) -> Option<&SearchEngine> {
        self.engines.get(self.engines_index)
    }

    pub fn move_engine_row(&mut self, from: usize, to: usize) {
        if from < self.engines.len() && to < self.engines.len() {
            let record = self.engines.remove(from);
            self.engines.insert(to, record);
            self.engines_index = to;
        }
    }

    // ===== Icons =====

    pub fn icons(&self) -> &[Icon] {
        &self.icons.list
    }

    pub fn set_icons(&mut self, page: Page<Icon>) {
        self.icons = page;
        self.icons_index = self.icons_index.min(self.icons.list.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn icons_page(&self) -> i64 {
        self.icons.page
    }

    pub fn icons_page_count(&self) -> i64 {
        self.icons.page_count()
    }

    pub fn icons_total(&self) -> i64 {
        self.icons.total
    }

    pub fn selected_icon(&self) -> Option<&Icon> {
        self.icons.list.get(self.icons_index)
    }

    pub fn icons_next_page(&mut self) {
        if self.icons.page < self.icons.page_count() {
            self.loading = true;
            self.send_network_event(NetworkEvent::LoadIcons {
                page: self.icons.page + 1,
            });
        }
    }

    pub fn icons_prev_page(&mut self) {
        if self.icons.page > 1 {
            self.loading = true;
            self.send_network_event(NetworkEvent::LoadIcons {
                page: self.icons.page - 1,
            });
        }
    }

    // ===== Wallpapers =====

    pub fn wallpapers(&self) -> &[Wallpaper] {
        &self.wallpapers.list
    }

    pub fn set_wallpapers(&mut self, page: Page<Wallpaper>) {
        self.wallpapers = page;
        self.wallpapers_index = self
            .wallpapers_index
            .min(self.wallpapers.list.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn wallpapers_page(&self) -> i64 {
        self.wallpapers.page
    }

    pub fn wallpapers_page_count(&self) -> i64 {
        self.wallpapers.page_count()
    }

    pub fn wallpapers_total(&self) -> i64 {
        self.wallpapers.total
    }

    pub fn selected_wallpaper(&self) -> Option<&Wallpaper> {
        self.wallpapers.list.get(self.wallpapers_index)
    }

    pub fn wallpapers_next_page(&mut self) {
        if self.wallpapers.page < self.wallpapers.page_count() {
            self.loading = true;
            self.send_network_event(NetworkEvent::LoadWallpapers {
                page: self.wallpapers.page + 1,
            });
        }
    }

    pub fn wallpapers_prev_page(&mut self) {
        if self.wallpapers.page > 1 {
            self.loading = true;
            self.send_network_event(NetworkEvent::LoadWallpapers {
                page: self.wallpapers.page - 1,
            });
        }
    }

    // ===== System config =====

    pub fn configs(&self) -> &[SystemConfig] {
        &self.configs
    }

    pub fn set_configs(&mut self, configs: Vec<SystemConfig>) {
        self.configs = configs;
        self.configs_index = self.configs_index.min(self.configs.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn config_keys(&self) -> &[ConfigKeyInfo] {
        &self.config_keys
    }

    pub fn set_config_keys(&mut self, keys: Vec<ConfigKeyInfo>) {
        self.config_keys = keys;
    }

    pub fn selected_config(&self) -> Option<&SystemConfig> {
        self.configs.get(self.configs_index)
    }

    // ===== Modal forms =====

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Validate the open form and dispatch the matching save event.
    /// Validation failures stay in the form as an inline error.
    ///
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if let Err(message) = form.validate() {
            form.error = Some(message);
            return;
        }

        let field = |index: usize| form.fields[index].value.trim().to_string();
        let event = match &form.kind {
            FormKind::Category { id } => NetworkEvent::SaveCategory {
                id: *id,
                name: field(0),
                name_en: field(1),
                is_active: form.is_active.unwrap_or(true),
            },
            FormKind::SearchEngine { id } => NetworkEvent::SaveSearchEngine {
                id: *id,
                name: field(0),
                url: field(1),
                icon_url: field(2),
                is_active: form.is_active.unwrap_or(true),
            },
            FormKind::Icon { id } => NetworkEvent::SaveIcon {
                id: *id,
                payload: crate::api::IconPayload {
                    title: field(0),
                    description: field(1),
                    url: field(2),
                    img_url: field(3),
                    bg_color: field(4),
                    category_ids: parse_id_list(&field(5)).unwrap_or_default(),
                    is_active: form.is_active.unwrap_or(true),
                },
            },
            FormKind::Wallpaper { id } => NetworkEvent::SaveWallpaper {
                id: *id,
                payload: crate::api::WallpaperPayload {
                    title: field(0),
                    url: field(1),
                    thumb_url: field(2),
                    source: field(3),
                    is_active: form.is_active.unwrap_or(true),
                },
            },
            FormKind::Config { .. } => NetworkEvent::SaveConfig {
                key: field(0),
                value: form.editor_value(),
            },
            FormKind::Password => NetworkEvent::ChangePassword {
                old_password: form.fields[0].value.clone(),
                new_password: form.fields[1].value.clone(),
            },
        };

        self.form = None;
        self.loading = true;
        self.send_network_event(event);
    }

    // ===== Delete confirmation =====

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn request_delete(&mut self, pending: PendingDelete) {
        self.pending_delete = Some(pending);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Dispatch the delete the user just confirmed.
    ///
    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        self.loading = true;
        let event = match pending {
            PendingDelete::Category { id, .. } => NetworkEvent::DeleteCategory { id },
            PendingDelete::SearchEngine { id, .. } => NetworkEvent::DeleteSearchEngine { id },
            PendingDelete::Icon { id, .. } => NetworkEvent::DeleteIcon { id },
            PendingDelete::Wallpaper { id, .. } => NetworkEvent::DeleteWallpaper { id },
            PendingDelete::Config { key } => NetworkEvent::DeleteConfig { key },
        };
        self.send_network_event(event);
    }

    // ===== Notifications =====

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification {
            kind: NotificationKind::Success,
            text: text.into(),
            ticks_left: NOTIFICATION_TICKS,
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification {
            kind: NotificationKind::Error,
            text: text.into(),
            ticks_left: NOTIFICATION_TICKS,
        });
    }

    // ===== Log pane =====

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
        if self.debug_mode {
            self.debug_index = self.debug_entries.len().saturating_sub(1);
        }
    }

    pub fn debug_entries(&self) -> &[String] {
        &self.debug_entries
    }

    pub fn debug_index(&self) -> usize {
        self.debug_index
    }

    pub fn push_debug_entry(&mut self, entry: String) {
        self.debug_entries.push(entry);
        if self.debug_entries.len() > MAX_DEBUG_ENTRIES {
            let excess = self.debug_entries.len() - MAX_DEBUG_ENTRIES;
            self.debug_entries.drain(..excess);
            self.debug_index = self.debug_index.saturating_sub(excess);
        }
    }

    pub fn debug_next(&mut self) {
        if !self.debug_entries.is_empty() {
            self.debug_index = (self.debug_index + 1).min(self.debug_entries.len() - 1);
        }
    }

    pub fn debug_prev(&mut self) {
        self.debug_index = self.debug_index.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    fn category(id: u64, sort_order: i64) -> Category {
        let mut category: Category = Faker.fake();
        category.id = id;
        category.sort_order = sort_order;
        category
    }

    #[test]
    fn test_move_category_row_is_a_shift_not_a_swap() {
        let mut state = State::default();
        state.set_categories(
            vec![category(1, 0), category(2, 1), category(3, 2), category(4, 3)],
            1,
        );
        state.move_category_row(0, 2);
        let ids: Vec<u64> = state.categories().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
        assert_eq!(state.categories_index, 2);
    }

    #[test]
    fn test_set_categories_clamps_selection() {
        let mut state = State::default();
        state.set_categories(vec![category(1, 0), category(2, 1), category(3, 2)], 1);
        state.categories_index = 2;
        state.set_categories(vec![category(1, 0)], 2);
        assert_eq!(state.categories_index, 0);
    }

    #[test]
    fn test_notification_expires_after_ticks() {
        let mut state = State::default();
        state.notify_error("save failed");
        assert!(state.notification().is_some());
        for _ in 0..NOTIFICATION_TICKS {
            state.tick();
        }
        assert!(state.notification().is_none());
    }

    #[test]
    fn test_debug_entries_are_capped() {
        let mut state = State::default();
        for i in 0..(MAX_DEBUG_ENTRIES + 25) {
            state.push_debug_entry(format!("entry {}", i));
        }
        assert_eq!(state.debug_entries().len(), MAX_DEBUG_ENTRIES);
        assert!(state.debug_entries()[0].contains("entry 25"));
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut state = State::default();
        state.menu_prev();
        assert_eq!(state.menu_index(), View::MENU.len() - 1);
        state.menu_next();
        assert_eq!(state.menu_index(), 0);
    }
}
