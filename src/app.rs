use crate::api::DualTab;
use crate::config::Config;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger;
use crate::state::State;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;
pub type ConfigSaveSender = std::sync::mpsc::Sender<()>;
type ConfigSaveReceiver = std::sync::mpsc::Receiver<()>;
type LogReceiver = std::sync::mpsc::Receiver<String>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration.
    /// Returns the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        let (log_tx, log_rx) = std::sync::mpsc::channel::<String>();
        logger::init(log_tx)?;

        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let (config_save_tx, config_save_rx) = std::sync::mpsc::channel::<()>();
        let access_token = config.access_token.clone();
        let theme = Theme::by_name(&config.theme_name);
        let app = App {
            state: Arc::new(Mutex::new(State::new(
                tx.clone(),
                config_save_tx.clone(),
                access_token,
                theme,
            ))),
            config,
        };
        app.start_network(rx);
        app.start_config_saver(config_save_rx);
        app.start_ui(tx, log_rx).await?;

        // Save config on exit
        {
            let state = app.state.lock().await;
            let mut config = app.config.clone();
            config.access_token = state.access_token().map(str::to_owned);
            if let Err(e) = config.save() {
                error!("Failed to save config on exit: {}", e);
            }
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Start a thread to handle config save requests.
    ///
    fn start_config_saver(&self, receiver: ConfigSaveReceiver) {
        let state = Arc::clone(&self.state);
        let mut config = self.config.clone();
        std::thread::spawn(move || {
            while receiver.recv().is_ok() {
                {
                    let state_guard = state.blocking_lock();
                    config.access_token = state_guard.access_token().map(str::to_owned);
                }
                if let Err(e) = config.save() {
                    error!("Failed to save config: {}", e);
                }
            }
        });
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    /// Handler failures surface to the user as a footer notification,
    /// not just a log line, so a reorder snap-back cannot be mistaken
    /// for an ignored gesture.
    fn start_network(&self, net_receiver: NetworkEventReceiver) {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        let api_url = self.config.api_url.clone();
        let access_token = self.config.access_token.clone();
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async {
                    let api = DualTab::new(&api_url, access_token.as_deref());
                    let mut network_event_handler =
                        NetworkEventHandler::new(Arc::clone(&cloned_state), api);
                    while let Ok(network_event) = net_receiver.recv() {
                        match network_event_handler.handle(network_event).await {
                            Ok(_) => (),
                            Err(e) => {
                                error!("Failed to handle network event: {}", e);
                                let mut state = cloned_state.lock().await;
                                state.set_loading(false);
                                if state.notification().is_none() {
                                    state.notify_error(e.to_string());
                                }
                            }
                        }
                    }
                })
        });
    }

    /// Begin the terminal event poll on a separate thread before
    /// starting the render loop on the main thread. Return the result
    /// following an exit request or unrecoverable error.
    ///
    async fn start_ui(&self, net_sender: NetworkEventSender, log_receiver: LogReceiver) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        // With a restored session, validate it and prefill the first
        // view; otherwise the login screen is already up.
        if self.config.access_token.is_some() {
            net_sender.send(NetworkEvent::Me)?;
            net_sender.send(NetworkEvent::LoadCategories)?;
        }

        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            while let Ok(entry) = log_receiver.try_recv() {
                state.push_debug_entry(entry);
            }
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            }
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                break;
            }
        }

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

        Ok(())
    }
}
