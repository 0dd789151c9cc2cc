use crate::events::network::Event as NetworkEvent;
use crate::state::{Focus, FormState, PendingDelete, State, View};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers},
};
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            if event::poll(tick_rate).unwrap() {
                if let CrosstermEvent::Key(key) = event::read().unwrap() {
                    tx_clone.send(Event::Input(key)).unwrap();
                }
            }
            tx_clone.send(Event::Tick).unwrap();
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns
    /// result with value true if should continue or false if exit was
    /// requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => Ok(handle_key(key, state)),
            Event::Tick => {
                state.tick();
                Ok(true)
            }
        }
    }
}

/// Route one key press through the modal stack, then the active view.
///
fn handle_key(key: KeyEvent, state: &mut State) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    // Modals swallow input before anything else sees it.
    if state.form().is_some() {
        handle_form_key(key, state);
        return true;
    }
    if state.pending_delete().is_some() {
        handle_confirm_key(key, state);
        return true;
    }
    if state.is_debug_mode() {
        handle_debug_key(key, state);
        return true;
    }
    if state.current_view() == View::Login {
        handle_login_key(key, state);
        return true;
    }

    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('`') => {
            state.toggle_debug_mode();
            return true;
        }
        KeyCode::Tab => {
            let focus = match state.current_focus() {
                Focus::Menu => Focus::View,
                Focus::View => Focus::Menu,
            };
            state.set_focus(focus);
            return true;
        }
        _ => {}
    }

    match state.current_focus() {
        Focus::Menu => handle_menu_key(key, state),
        Focus::View => handle_view_key(key, state),
    }
    true
}

/// Navigate the sidebar and enter views.
///
fn handle_menu_key(key: KeyEvent, state: &mut State) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.menu_next(),
        KeyCode::Char('k') | KeyCode::Up => state.menu_prev(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => state.activate_menu_selection(),
        _ => {}
    }
}

/// Handle keys for the focused management view.
///
fn handle_view_key(key: KeyEvent, state: &mut State) {
    // Shared list navigation first.
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.select_next_row();
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.select_prev_row();
            return;
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.set_focus(Focus::Menu);
            return;
        }
        KeyCode::Char('r') => {
            state.refresh_current_view();
            return;
        }
        _ => {}
    }

    match state.current_view() {
        View::Categories => match key.code {
            KeyCode::Char('n') => state.open_form(FormState::category(None)),
            KeyCode::Char('e') => {
                if let Some(category) = state.selected_category().cloned() {
                    state.open_form(FormState::category(Some(&category)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(category) = state.selected_category() {
                    state.request_delete(PendingDelete::Category {
                        id: category.id,
                        name: category.name.clone(),
                    });
                }
            }
            KeyCode::Char('J') => move_row(state, 1),
            KeyCode::Char('K') => move_row(state, -1),
            _ => {}
        },
        View::SearchEngines => match key.code {
            KeyCode::Char('n') => state.open_form(FormState::search_engine(None)),
            KeyCode::Char('e') => {
                if let Some(engine) = state.selected_engine().cloned() {
                    state.open_form(FormState::search_engine(Some(&engine)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(engine) = state.selected_engine() {
                    state.request_delete(PendingDelete::SearchEngine {
                        id: engine.id,
                        name: engine.name.clone(),
                    });
                }
            }
            KeyCode::Char('J') => move_row(state, 1),
            KeyCode::Char('K') => move_row(state, -1),
            _ => {}
        },
        View::Icons => match key.code {
            KeyCode::Char('n') => state.open_form(FormState::icon(None)),
            KeyCode::Char('e') => {
                if let Some(icon) = state.selected_icon().cloned() {
                    state.open_form(FormState::icon(Some(&icon)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(icon) = state.selected_icon() {
                    state.request_delete(PendingDelete::Icon {
                        id: icon.id,
                        title: icon.title.clone(),
                    });
                }
            }
            KeyCode::Char(']') => state.icons_next_page(),
            KeyCode::Char('[') => state.icons_prev_page(),
            _ => {}
        },
        View::Wallpapers => match key.code {
            KeyCode::Char('n') => state.open_form(FormState::wallpaper(None)),
            KeyCode::Char('e') => {
                if let Some(wallpaper) = state.selected_wallpaper().cloned() {
                    state.open_form(FormState::wallpaper(Some(&wallpaper)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(wallpaper) = state.selected_wallpaper() {
                    state.request_delete(PendingDelete::Wallpaper {
                        id: wallpaper.id,
                        title: wallpaper.title.clone(),
                    });
                }
            }
            KeyCode::Char(']') => state.wallpapers_next_page(),
            KeyCode::Char('[') => state.wallpapers_prev_page(),
            _ => {}
        },
        View::Settings => match key.code {
            KeyCode::Char('n') => state.open_form(FormState::config(None)),
            KeyCode::Char('e') => {
                if let Some(config) = state.selected_config().cloned() {
                    state.open_form(FormState::config(Some(&config)));
                }
            }
            KeyCode::Char('d') => {
                if let Some(config) = state.selected_config() {
                    state.request_delete(PendingDelete::Config {
                        key: config.key.clone(),
                    });
                }
            }
            KeyCode::Char('p') => state.open_form(FormState::password()),
            _ => {}
        },
        View::Login => {}
    }
}

/// Move the selected row one position and dispatch the reorder. The
/// local mirror moves immediately; the synchronizer confirms or snaps
/// back afterwards. The gesture carries the generation of the sequence
/// it was computed against.
///
fn move_row(state: &mut State, delta: i64) {
    let from = state.selected_row();
    match state.current_view() {
        View::Categories => {
            let len = state.categories().len();
            let Some(to) = shifted_index(from, delta, len) else {
                return;
            };
            let generation = state.categories_generation();
            state.move_category_row(from, to);
            state.send_network_event(NetworkEvent::MoveCategory {
                from,
                to,
                generation,
            });
        }
        View::SearchEngines => {
            let len = state.engines().len();
            let Some(to) = shifted_index(from, delta, len) else {
                return;
            };
            let generation = state.engines_generation();
            state.move_engine_row(from, to);
            state.send_network_event(NetworkEvent::MoveSearchEngine {
                from,
                to,
                generation,
            });
        }
        _ => {}
    }
}

/// Target index for a one-step move, or None when it falls off either
/// end of the list.
///
fn shifted_index(from: usize, delta: i64, len: usize) -> Option<usize> {
    let to = from as i64 + delta;
    if to < 0 || to >= len as i64 {
        return None;
    }
    Some(to as usize)
}

/// Handle keys while a modal form is open.
///
fn handle_form_key(key: KeyEvent, state: &mut State) {
    let Some(form) = state.form_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            state.close_form();
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            form.next_slot();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_slot();
            return;
        }
        _ => {}
    }

    if form.on_value_editor() {
        // The multi-line editor takes everything else, including
        // Enter; Ctrl+S submits.
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            state.submit_form();
            return;
        }
        if let Some(editor) = form.value_editor.as_mut() {
            editor.input(key);
        }
        return;
    }

    match key.code {
        KeyCode::Enter => state.submit_form(),
        KeyCode::Char(' ') if form.on_switch() => form.toggle_switch(),
        KeyCode::Char(c) => {
            if let Some(field) = form.active_field_mut() {
                field.value.push(c);
                form.error = None;
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = form.active_field_mut() {
                field.value.pop();
                form.error = None;
            }
        }
        _ => {}
    }
}

/// Handle keys while a delete confirmation is open.
///
fn handle_confirm_key(key: KeyEvent, state: &mut State) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => state.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => state.cancel_delete(),
        _ => {}
    }
}

/// Handle keys while the log pane has focus.
///
fn handle_debug_key(key: KeyEvent, state: &mut State) {
    match key.code {
        KeyCode::Char('`') | KeyCode::Esc => state.toggle_debug_mode(),
        KeyCode::Char('j') | KeyCode::Down => state.debug_next(),
        KeyCode::Char('k') | KeyCode::Up => state.debug_prev(),
        _ => {}
    }
}

/// Handle keys on the login screen.
///
fn handle_login_key(key: KeyEvent, state: &mut State) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            state.toggle_login_field()
        }
        KeyCode::Enter => state.submit_login(),
        KeyCode::Backspace => state.pop_login_char(),
        KeyCode::Char(c) => state.push_login_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_index_bounds() {
        assert_eq!(shifted_index(0, -1, 3), None);
        assert_eq!(shifted_index(2, 1, 3), None);
        assert_eq!(shifted_index(1, 1, 3), Some(2));
        assert_eq!(shifted_index(1, -1, 3), Some(0));
    }

    #[test]
    fn test_confirm_key_cancels() {
        let mut state = State::default();
        state.request_delete(PendingDelete::Config {
            key: "weather_api_key".to_string(),
        });
        handle_confirm_key(
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            &mut state,
        );
        assert!(state.pending_delete().is_none());
    }

    #[test]
    fn test_ctrl_c_requests_exit() {
        let mut state = State::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!handle_key(key, &mut state));
    }

    #[test]
    fn test_login_typing_fills_active_field() {
        let mut state = State::default();
        handle_login_key(
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE),
            &mut state,
        );
        assert_eq!(state.login_username(), "a");
        state.toggle_login_field();
        handle_login_key(
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE),
            &mut state,
        );
        assert_eq!(state.login_password(), "x");
    }
}
