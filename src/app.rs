//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, live subscriptions, and rendering.

use crate::backend::{LocalBackend, Subscription};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventConfig, EventHandler, EventLoop};
use crate::model::{PredictionView, UserProfile};
use crate::services::{Services, Session};
use crate::state::{Action, AuthMode, Notification, Store, View};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

const SUBMIT_INCOMPLETE: &str = "Please fill in all required fields";
const SUBMIT_FAILED: &str = "Failed to submit prediction. Please try again.";

/// The live query backing the visible tab.
#[derive(Debug, Default)]
enum ViewFeed {
    #[default]
    Idle,
    Analysts(Subscription<Vec<UserProfile>>),
    Predictions(Subscription<Vec<PredictionView>>),
}

impl ViewFeed {
    /// Next snapshot as an action. Never resolves while idle.
    async fn next(&mut self) -> Option<Action> {
        match self {
            Self::Idle => std::future::pending().await,
            Self::Analysts(sub) => sub.next_snapshot().await.map(Action::AnalystsLoaded),
            Self::Predictions(sub) => sub.next_snapshot().await.map(Action::PredictionsLoaded),
        }
    }

    /// Release the current subscription, if any.
    fn close(&mut self) {
        match std::mem::take(self) {
            Self::Idle => {}
            Self::Analysts(sub) => sub.unsubscribe(),
            Self::Predictions(sub) => sub.unsubscribe(),
        }
    }
}

enum Step {
    Event(Event),
    Session(Option<Option<Session>>),
    Feed(Option<Action>),
}

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Data-access services.
    services: Services,
    /// Session observer; `None` once it has ended.
    session_feed: Option<Subscription<Option<Session>>>,
    /// Live query of the visible tab.
    view_feed: ViewFeed,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application over the local backend.
    pub async fn new(config: Config) -> Result<Self> {
        let backend = LocalBackend::open(config.data_file())?;
        Self::with_services(config, Services::local(backend))
    }

    /// Create a new application over the given services.
    pub fn with_services(config: Config, services: Services) -> Result<Self> {
        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.ui.mouse_support {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create store
        let store = Store::new();

        // Create event handler
        let event_handler = EventHandler::new(config.keybindings.clone());

        let session_feed = Some(services.session.watch());

        Ok(Self {
            terminal,
            store,
            event_handler,
            services,
            session_feed,
            view_feed: ViewFeed::Idle,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        let event_config = EventConfig::default().with_tick_rate_ms(self.config.ui.tick_rate_ms);
        let (mut event_rx, event_task) = EventLoop::new(event_config).start();

        // Main event loop
        loop {
            // Update event handler with current state
            self.event_handler.update_store_snapshot(&self.store);

            // Render UI
            self.draw()?;

            let step = tokio::select! {
                // Handle terminal events
                Some(event) = event_rx.recv() => Step::Event(event),

                // Session changes
                session = next_session(&mut self.session_feed) => Step::Session(session),

                // Live data for the visible tab
                update = self.view_feed.next() => Step::Feed(update),
            };

            match step {
                Step::Event(event) => {
                    if let Some(action) = self.event_handler.handle_event(&event) {
                        self.handle_action(action).await?;
                    }
                }
                Step::Session(Some(session)) => self.session_changed(session),
                Step::Session(None) => {
                    tracing::warn!("Session observer ended");
                    self.session_feed = None;
                }
                Step::Feed(Some(action)) => self.store.reduce(action),
                Step::Feed(None) => {
                    tracing::warn!("Live query ended");
                    self.view_feed = ViewFeed::Idle;
                }
            }

            // Check if we should quit
            if self.store.app.should_quit {
                break;
            }
        }

        self.view_feed.close();
        if let Some(feed) = self.session_feed.take() {
            feed.unsubscribe();
        }
        event_task.abort();
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let store = &self.store;
        let config = &self.config;
        self.terminal.draw(|frame| {
            Ui::render(frame, store, config);
        })?;
        Ok(())
    }

    /// Handle an action.
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SubmitAuth => {
                if self.store.auth_form.submitting {
                    return Ok(());
                }
                self.store.reduce(Action::SubmitAuth);
                self.draw()?;
                self.submit_auth().await;
            }
            Action::Logout => {
                self.view_feed.close();
                if let Err(e) = self.services.session.logout().await {
                    tracing::error!("Sign-out failed: {}", e);
                    self.store.reduce(Action::SetError(e.to_string()));
                }
            }
            Action::SubmitPrediction => {
                if self.store.submit_form.submitting {
                    return Ok(());
                }
                self.submit_prediction().await?;
            }
            Action::SetView(_) | Action::NextView => {
                let before = self.store.app.current_view;
                self.store.reduce(action);
                if self.store.app.current_view != before {
                    self.open_view_feed();
                }
            }
            _ => {
                // Let the store handle the action
                self.store.reduce(action);
            }
        }

        Ok(())
    }

    /// Apply a session change, opening or closing the tab's live query.
    fn session_changed(&mut self, session: Option<Session>) {
        let signed_in = session.is_some();
        let was_signed_in = self.store.session.is_signed_in();
        self.store.reduce(Action::SessionChanged(session));
        if !signed_in {
            self.view_feed.close();
        } else if !was_signed_in {
            self.open_view_feed();
        }
    }

    /// Swap the live query over to the visible tab.
    fn open_view_feed(&mut self) {
        self.view_feed.close();

        let feed = match self.store.app.current_view {
            View::Browse => self
                .services
                .analysts
                .subscribe_to_top_analysts(self.config.ui.analysts_limit)
                .map(ViewFeed::Analysts),
            View::Predictions => self
                .services
                .predictions
                .subscribe_to_all_predictions()
                .map(ViewFeed::Predictions),
            View::Submit => Ok(ViewFeed::Idle),
        };

        match feed {
            Ok(feed) => self.view_feed = feed,
            Err(e) => {
                tracing::error!("Failed to open live query: {}", e);
                self.store.reduce(Action::SetError(e.to_string()));
            }
        }
    }

    async fn submit_auth(&mut self) {
        let form = &self.store.auth_form;
        let result = match form.mode {
            AuthMode::SignIn => self
                .services
                .session
                .login(&form.email, &form.password)
                .await
                .map(|_| None),
            AuthMode::SignUp => self
                .services
                .session
                .signup(
                    &form.email,
                    &form.password,
                    &form.display_name,
                    form.specialty_label(),
                )
                .await
                .map(Some),
        };

        match result {
            // Sign-in is picked up by the session observer.
            Ok(None) => {}
            Ok(Some(session)) => {
                tracing::info!(uid = %session.principal.uid, "Signed up");
                // The observer will report the same principal again; reduce
                // now so the freshly written profile shows immediately.
                self.session_changed(Some(session));
            }
            Err(e) => {
                tracing::warn!("Authentication failed: {}", e);
                self.store.reduce(Action::AuthFailed(auth_message(&e)));
            }
        }
    }

    async fn submit_prediction(&mut self) -> Result<()> {
        let Some(principal) = self
            .store
            .session
            .current
            .as_ref()
            .map(|s| s.principal.clone())
        else {
            return Ok(());
        };

        let draft = match self.store.submit_form.draft.validate() {
            Ok(draft) => draft,
            Err(e) => {
                tracing::debug!("Rejected submission: {}", e);
                self.store
                    .reduce(Action::ShowNotification(Notification::warning(SUBMIT_INCOMPLETE)));
                return Ok(());
            }
        };

        self.store.reduce(Action::SubmitPrediction);
        self.draw()?;

        match self.services.predictions.create_prediction(&principal, draft).await {
            Ok(id) => self.store.reduce(Action::PredictionSubmitted(id)),
            Err(_) => self.store.reduce(Action::SubmissionFailed(SUBMIT_FAILED.to_string())),
        }
        Ok(())
    }
}

/// Next session state, or `None` once the observer has ended.
async fn next_session(
    feed: &mut Option<Subscription<Option<Session>>>,
) -> Option<Option<Session>> {
    match feed {
        Some(feed) => feed.next_snapshot().await,
        None => std::future::pending().await,
    }
}

/// Text shown on the login form for a failed attempt.
fn auth_message(error: &Error) -> String {
    match error {
        Error::Authentication(kind) => kind.message().to_string(),
        Error::Validation(message) => message.clone(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
