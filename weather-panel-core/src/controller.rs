//! The view controller: owns the panel state, issues backend requests and moves
//! the display between idle, loading, success and error.

use chrono::Utc;
use parking_lot::Mutex;
use std::{
    borrow::Cow,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::{debug, error, warn};

use crate::{
    backend::WeatherBackend,
    config::ControllerSettings,
    error::PanelError,
    model::{DisplayPhase, Units, ViewState, WeatherSnapshot},
    render::WeatherView,
    validate::{Validity, classify, require_location, sanitize_location},
    view::ViewBinding,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// A key press as seen by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Ctrl on most platforms, Cmd on macOS.
    pub command: bool,
    /// Whether the location field had focus.
    pub in_location: bool,
}

impl KeyPress {
    pub fn enter_in_location() -> Self {
        Self { key: Key::Enter, command: false, in_location: true }
    }

    pub fn action(&self) -> KeyAction {
        match (self.key, self.command) {
            (Key::Enter, true) => KeyAction::Fetch,
            (Key::Char('l'), true) => KeyAction::FocusLocation,
            (Key::Enter, false) if self.in_location => KeyAction::Fetch,
            _ => KeyAction::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Fetch,
    FocusLocation,
    Ignored,
}

#[derive(Debug)]
pub struct ViewController<B, V> {
    backend: B,
    view: Arc<V>,
    state: Arc<Mutex<ViewState>>,
    latest_request: AtomicU64,
    settings: ControllerSettings,
}

impl<B, V> ViewController<B, V>
where
    B: WeatherBackend,
    V: ViewBinding,
{
    pub fn new(backend: B, view: Arc<V>, settings: ControllerSettings) -> Self {
        view.set_units_selector(settings.units);

        Self {
            backend,
            view,
            state: Arc::new(Mutex::new(ViewState::new(settings.units))),
            latest_request: AtomicU64::new(0),
            settings,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn state(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn units(&self) -> Units {
        self.state.lock().units
    }

    /// Keystroke handler for the location field: strip disallowed characters and
    /// update the validity class.
    pub fn on_location_input(&self) -> Validity {
        let raw = self.view.location_value();
        let clean = sanitize_location(&raw);
        if let Cow::Owned(clean) = &clean {
            self.view.set_location_value(clean);
        }

        // Classified on what was typed, before sanitizing.
        let validity = classify(&raw);
        self.view.set_location_validity(validity);
        validity
    }

    /// Fetch weather for the location currently in the field.
    ///
    /// Errors are already on display when this returns; the result is for
    /// callers that need to know how it went.
    pub async fn fetch_weather(&self) -> Result<(), PanelError> {
        let raw = self.view.location_value();
        let location = match require_location(&raw) {
            Ok(location) => location.to_string(),
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        self.begin_loading();

        let units = self.units();
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, %location, %units, "issuing weather request");

        let outcome = self.backend.weather(&location, units).await;

        if self.is_stale(token) {
            debug!(token, "discarding response superseded by a newer request");
            return Ok(());
        }

        let err = match outcome {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(snapshot) => {
                    self.apply_snapshot(snapshot, units);
                    return Ok(());
                }
                None => PanelError::Backend(envelope.error),
            },
            Ok(envelope) => {
                warn!(%location, error = ?envelope.error, "backend reported failure");
                PanelError::Backend(envelope.error)
            }
            Err(e) => {
                error!(%location, "weather request failed: {e:#}");
                PanelError::Transport(e)
            }
        };

        self.fail(&err);
        Err(err)
    }

    /// Ask the backend where we are, fill in the field, then fetch for it.
    pub async fn detect_location(&self) -> Result<(), PanelError> {
        self.begin_loading();

        let err = match self.backend.detect_location().await {
            Ok(envelope) => match envelope.detected() {
                Some(location) => {
                    debug!(%location, "location detected");
                    self.view.set_location_value(location);
                    tokio::time::sleep(self.settings.timings.detect_delay()).await;
                    return self.fetch_weather().await;
                }
                None => {
                    warn!(error = ?envelope.error, "backend could not detect location");
                    PanelError::DetectionUnavailable
                }
            },
            Err(e) => {
                error!("location detection failed: {e:#}");
                PanelError::DetectionFailed(e)
            }
        };

        self.fail(&err);
        Err(err)
    }

    /// The unit selector changed.
    pub async fn select_units(&self, units: Units) -> Result<(), PanelError> {
        self.state.lock().units = units;
        self.refetch_for_units().await
    }

    /// One of the unit toggle buttons was clicked.
    pub async fn switch_units(&self, units: Units) -> Result<(), PanelError> {
        {
            let mut state = self.state.lock();
            if state.units == units {
                return Ok(());
            }
            state.units = units;
        }
        self.view.set_units_selector(units);
        self.refetch_for_units().await
    }

    pub async fn handle_key(&self, key: KeyPress) -> Result<KeyAction, PanelError> {
        let action = key.action();
        match action {
            KeyAction::Fetch => self.fetch_weather().await?,
            KeyAction::FocusLocation => self.view.focus_location(),
            KeyAction::Ignored => {}
        }
        Ok(action)
    }

    async fn refetch_for_units(&self) -> Result<(), PanelError> {
        let has_snapshot = self.state.lock().snapshot.is_some();
        if has_snapshot && !self.view.location_value().is_empty() {
            self.fetch_weather().await
        } else {
            Ok(())
        }
    }

    fn is_stale(&self, token: u64) -> bool {
        self.settings.discard_stale_responses
            && self.latest_request.load(Ordering::SeqCst) != token
    }

    fn begin_loading(&self) {
        self.view.hide_result();
        self.view.hide_error();
        self.view.show_spinner();
        self.state.lock().phase = DisplayPhase::Loading;
    }

    fn apply_snapshot(&self, snapshot: WeatherSnapshot, units: Units) {
        self.view.hide_spinner();
        self.view.hide_error();
        self.view.show_result(&WeatherView::new(&snapshot, units));

        {
            let mut state = self.state.lock();
            state.snapshot = Some(snapshot);
            state.phase = DisplayPhase::Success;
            state.updated_at = Some(Utc::now());
        }

        let view = Arc::clone(&self.view);
        let delay = self.settings.timings.pulse_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.pulse_temperature();
        });
    }

    fn fail(&self, err: &PanelError) {
        self.view.hide_spinner();
        self.view.show_error(&err.to_string());
        self.state.lock().phase = DisplayPhase::Error;

        let view = Arc::clone(&self.view);
        let state = Arc::clone(&self.state);
        let delay = self.settings.timings.error_dismiss();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.hide_error();
            let mut state = state.lock();
            if state.phase == DisplayPhase::Error {
                state.phase = DisplayPhase::Idle;
            }
        });
    }
}
