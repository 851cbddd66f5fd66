use crate::*;
use serde::{Deserialize, Serialize};
use serde_json as json;
use std::{fs, path::PathBuf};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum BackendSelection {
    // first backend whose HMD probe succeeds, Oculus before OpenVR
    Auto,
    Oculus,
    Openvr,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrackingSpace {
    Seated,
    Standing,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    // tracked meters to scene units
    pub world_scale: f32,
    pub tracking_space: TrackingSpace,
    pub near_clip: f32,
    pub far_clip: f32,
    pub pixels_per_display_pixel: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world_scale: 1_f32,
            tracking_space: TrackingSpace::Standing,
            near_clip: 0.01,
            far_clip: 100_f32,
            pixels_per_display_pixel: 1_f32,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSelection,
    pub session: SessionConfig,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendSelection::Auto,
            session: SessionConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

pub fn load_settings(path: &str) -> StrResult<Settings> {
    const TRACE_CONTEXT: &str = "Settings";
    trace_err!(json::from_str(&trace_err!(fs::read_to_string(path))?))
}
