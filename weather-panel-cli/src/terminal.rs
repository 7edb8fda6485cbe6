use parking_lot::Mutex;
use weather_panel_core::{Units, Validity, ViewBinding, WeatherView, render_html, render_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Html,
}

/// Prints the panel to the terminal: results to stdout, errors to stderr.
#[derive(Debug)]
pub struct TerminalView {
    output: Output,
    location: Mutex<String>,
}

impl TerminalView {
    pub fn new(output: Output, location: &str) -> Self {
        Self { output, location: Mutex::new(location.to_string()) }
    }
}

impl ViewBinding for TerminalView {
    fn location_value(&self) -> String {
        self.location.lock().clone()
    }

    fn set_location_value(&self, value: &str) {
        *self.location.lock() = value.to_string();
    }

    fn set_location_validity(&self, validity: Validity) {
        if validity == Validity::Invalid {
            eprintln!("⚠️  Location looks too short.");
        }
    }

    fn focus_location(&self) {}

    fn set_units_selector(&self, units: Units) {
        tracing::debug!(%units, "unit selector updated");
    }

    fn show_spinner(&self) {
        if self.output == Output::Text {
            eprintln!("⏳ Fetching weather for {}...", self.location.lock().trim());
        }
    }

    fn hide_spinner(&self) {}

    fn show_result(&self, view: &WeatherView) {
        let rendered = match self.output {
            Output::Text => render_text(view).map(|text| format!("\n{text}")),
            Output::Html => render_html(view),
        };

        match rendered {
            Ok(out) => println!("{out}"),
            Err(err) => eprintln!("❌ {err}"),
        }
    }

    fn hide_result(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("❌ {message}");
    }

    fn hide_error(&self) {}

    fn pulse_temperature(&self) {}
}
