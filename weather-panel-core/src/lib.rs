//! Core library for the weather panel.
//!
//! This crate defines:
//! - The weather snapshot model and the backend envelopes
//! - A client for the weather backend (`/api/weather`, `/api/location`)
//! - Location validation, rendering and advisory tips
//! - The view controller that drives any [`ViewBinding`]
//!
//! It is used by `weather-panel-cli`, but any front end that can implement
//! [`ViewBinding`] can reuse it.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod tips;
pub mod validate;
pub mod view;

pub use backend::{WeatherBackend, backend_from_config, http::HttpBackend};
pub use config::{Config, ControllerSettings, Timings};
pub use controller::{Key, KeyAction, KeyPress, ViewController};
pub use error::PanelError;
pub use model::{
    DisplayPhase, LocationEnvelope, Units, ViewState, WeatherEnvelope, WeatherSnapshot,
};
pub use render::{RenderError, WeatherView, render, render_html, render_text};
pub use tips::{Advisory, weather_tips};
pub use validate::Validity;
pub use view::{MemoryView, ViewBinding};
