use parking_lot::Mutex;
use std::fmt::Debug;

use crate::{
    model::Units,
    render::{WeatherView, render_html},
    validate::Validity,
};

/// Named accessors for every region of the weather panel.
///
/// The controller only talks to the UI through this trait, so it can drive a
/// terminal, a test double, or anything else that has these regions.
pub trait ViewBinding: Send + Sync + Debug + 'static {
    fn location_value(&self) -> String;
    fn set_location_value(&self, value: &str);
    fn set_location_validity(&self, validity: Validity);
    fn focus_location(&self);

    fn set_units_selector(&self, units: Units);

    fn show_spinner(&self);
    fn hide_spinner(&self);

    fn show_result(&self, view: &WeatherView);
    fn hide_result(&self);

    fn show_error(&self, message: &str);
    fn hide_error(&self);

    /// Emphasis effect on the temperature element. Must be a no-op when no
    /// result is on display.
    fn pulse_temperature(&self);
}

/// Snapshot of every region of a [`MemoryView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub location: String,
    pub validity: Validity,
    pub location_focused: bool,
    pub units_selector: Units,
    pub spinner_visible: bool,
    pub result_visible: bool,
    pub result_markup: Option<String>,
    pub error_visible: bool,
    pub error_text: String,
    pub temperature_pulsed: bool,
}

/// In-memory view. Results are kept as rendered HTML.
#[derive(Debug, Default)]
pub struct MemoryView {
    regions: Mutex<Regions>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(value: &str) -> Self {
        let view = Self::new();
        view.set_location_value(value);
        view
    }

    pub fn regions(&self) -> Regions {
        self.regions.lock().clone()
    }
}

impl ViewBinding for MemoryView {
    fn location_value(&self) -> String {
        self.regions.lock().location.clone()
    }

    fn set_location_value(&self, value: &str) {
        self.regions.lock().location = value.to_string();
    }

    fn set_location_validity(&self, validity: Validity) {
        self.regions.lock().validity = validity;
    }

    fn focus_location(&self) {
        self.regions.lock().location_focused = true;
    }

    fn set_units_selector(&self, units: Units) {
        self.regions.lock().units_selector = units;
    }

    fn show_spinner(&self) {
        self.regions.lock().spinner_visible = true;
    }

    fn hide_spinner(&self) {
        self.regions.lock().spinner_visible = false;
    }

    fn show_result(&self, view: &WeatherView) {
        let markup = render_html(view)
            .inspect_err(|err| tracing::error!(%err, "failed to render weather panel"))
            .ok();

        let mut regions = self.regions.lock();
        regions.result_markup = markup;
        regions.result_visible = true;
        regions.temperature_pulsed = false;
    }

    fn hide_result(&self) {
        self.regions.lock().result_visible = false;
    }

    fn show_error(&self, message: &str) {
        let mut regions = self.regions.lock();
        regions.error_text = message.to_string();
        regions.error_visible = true;
    }

    fn hide_error(&self) {
        self.regions.lock().error_visible = false;
    }

    fn pulse_temperature(&self) {
        let mut regions = self.regions.lock();
        let has_temperature = regions
            .result_markup
            .as_deref()
            .is_some_and(|m| m.contains("temperature-display"));
        if has_temperature {
            regions.temperature_pulsed = true;
        }
    }
}
