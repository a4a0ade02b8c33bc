use crate::model::Rgba;
use serde::{Deserialize, Serialize};

use super::{GAUGE_MAX, GAUGE_MIN};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct AppSettings {
    pub default_gauge: f32,
    pub filled_tracks: bool,
    pub window_width: f32,
    pub window_height: f32,
    /// Empty disables the log file.
    pub log_file: String,
    pub last_directory: Option<String>,
    pub background: Rgba,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_gauge: 8.0,
            filled_tracks: false,
            window_width: 1024.0,
            window_height: 768.0,
            log_file: "railsketch.log".to_string(),
            last_directory: None,
            background: Rgba::opaque(0, 0, 0),
        }
    }
}

impl AppSettings {
    fn sanitized(mut self) -> Self {
        if !self.default_gauge.is_finite() {
            self.default_gauge = Self::default().default_gauge;
        }
        self.default_gauge = self.default_gauge.clamp(GAUGE_MIN, GAUGE_MAX);
        self
    }
}

pub(crate) fn config_path() -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config").join("railsketch.toml");
        if path.exists() {
            return path.display().to_string();
        }
    }
    "settings.toml".to_string()
}

pub(crate) fn load_settings(path: &str) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    let settings = if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(&s).ok())
    } else {
        serde_json::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(&s).ok())
    };
    settings.map(AppSettings::sanitized)
}

pub(crate) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), String> {
    if path.ends_with(".toml") {
        let toml = toml::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, toml).map_err(|e| e.to_string())
    } else {
        let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| e.to_string())
    }
}
