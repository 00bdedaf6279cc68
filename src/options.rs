use serde::{Deserialize, Serialize};
use tracing::Level;

/// Runtime options for the workout tracker.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOptions {
    /// localStorage key holding the workout list (default: "workouts")
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Zoom level used when panning to a workout (default: 13)
    #[serde(default = "default_map_zoom")]
    pub map_zoom: u8,

    /// Marker popup behaviour
    #[serde(default)]
    pub popup: PopupOptions,

    /// Pan animation when a list item is clicked
    #[serde(default)]
    pub pan: PanOptions,

    /// Delay before the hidden form gets its display style back (default: 1000)
    #[serde(default = "default_form_reset_delay_ms")]
    pub form_reset_delay_ms: u32,

    /// Most verbose level written to the console: error, warn, info, debug, trace (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            map_zoom: default_map_zoom(),
            popup: PopupOptions::default(),
            pan: PanOptions::default(),
            form_reset_delay_ms: default_form_reset_delay_ms(),
            log_level: default_log_level(),
        }
    }
}

impl AppOptions {
    /// The configured log level, falling back to INFO when unrecognized.
    pub fn max_log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default)]
    pub auto_close: bool,
    #[serde(default)]
    pub close_on_click: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            min_width: default_min_width(),
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanOptions {
    #[serde(default = "default_true")]
    pub animate: bool,
    #[serde(default = "default_pan_duration")]
    pub duration_secs: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            duration_secs: default_pan_duration(),
        }
    }
}

fn default_storage_key() -> String {
    "workouts".to_string()
}

fn default_map_zoom() -> u8 {
    13
}

fn default_form_reset_delay_ms() -> u32 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_width() -> u32 {
    250
}

fn default_min_width() -> u32 {
    100
}

fn default_pan_duration() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
