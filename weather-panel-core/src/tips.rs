//! Advisory tips derived from a snapshot.
//!
//! Values are read from the leading number of each pre-formatted field
//! (`"-5.0°C"` reads as -5). A field with no leading number yields no tip.

use std::fmt;

use crate::model::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Freezing,
    Cold,
    Hot,
    Humid,
    Windy,
    Rain,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::Freezing => "🧥 It's freezing! Dress warmly and watch for icy conditions.",
            Advisory::Cold => "🧥 It's quite cold. Don't forget your jacket!",
            Advisory::Hot => "☀️ It's hot! Stay hydrated and seek shade when possible.",
            Advisory::Humid => "💧 High humidity today. It might feel warmer than it is.",
            Advisory::Windy => "💨 It's windy! Secure loose items and be careful outdoors.",
            Advisory::Rain => "☔ Don't forget your umbrella!",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Tips in emission order: temperature band, humidity, wind, rain.
pub fn weather_tips(snapshot: &WeatherSnapshot) -> Vec<Advisory> {
    let mut tips = Vec::new();

    if let Some(temp) = leading_number(&snapshot.temperature) {
        if temp < 0.0 {
            tips.push(Advisory::Freezing);
        } else if temp < 10.0 {
            tips.push(Advisory::Cold);
        } else if temp > 30.0 {
            tips.push(Advisory::Hot);
        }
    }

    if leading_number(&snapshot.humidity).is_some_and(|h| h > 80.0) {
        tips.push(Advisory::Humid);
    }

    if leading_number(&snapshot.wind_speed).is_some_and(|w| w > 10.0) {
        tips.push(Advisory::Windy);
    }

    if snapshot.description.to_lowercase().contains("rain") {
        tips.push(Advisory::Rain);
    }

    tips
}

/// Parse the longest numeric prefix after leading whitespace.
pub fn leading_number(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // exponent only counts when followed by at least one digit
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
