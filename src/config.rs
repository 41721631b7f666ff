use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_STORE_PATH: &str = "incident_reports.csv";
const DEFAULT_SOUND_PATH: &str = "alert_sound.mp3";
const DEFAULT_CAMERA_URL: &str = "stub://front_camera";
const DEFAULT_CAMERA_FPS: u32 = 10;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 480;

#[derive(Debug, Deserialize, Default)]
struct WatchdConfigFile {
    incident_store_path: Option<String>,
    alert_log_path: Option<PathBuf>,
    alert_sound_path: Option<String>,
    camera: Option<CameraConfigFile>,
    geolocate: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct WatchdConfig {
    pub incident_store_path: String,
    /// When set, the log stream is piped to this file instead of stderr.
    pub alert_log_path: Option<PathBuf>,
    pub alert_sound_path: String,
    pub camera: CameraSettings,
    pub geolocate: bool,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub url: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl WatchdConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SAFEWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: WatchdConfigFile) -> Self {
        let camera = CameraSettings {
            url: file
                .camera
                .as_ref()
                .and_then(|camera| camera.url.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_URL.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        Self {
            incident_store_path: file
                .incident_store_path
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),
            alert_log_path: file.alert_log_path,
            alert_sound_path: file
                .alert_sound_path
                .unwrap_or_else(|| DEFAULT_SOUND_PATH.to_string()),
            camera,
            geolocate: file.geolocate.unwrap_or(true),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("SAFEWATCH_STORE_PATH") {
            if !path.trim().is_empty() {
                self.incident_store_path = path;
            }
        }
        if let Ok(path) = std::env::var("SAFEWATCH_ALERT_LOG") {
            if !path.trim().is_empty() {
                self.alert_log_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var("SAFEWATCH_SOUND_PATH") {
            if !path.trim().is_empty() {
                self.alert_sound_path = path;
            }
        }
        if let Ok(url) = std::env::var("SAFEWATCH_CAMERA_URL") {
            if !url.trim().is_empty() {
                self.camera.url = url;
            }
        }
        if let Ok(fps) = std::env::var("SAFEWATCH_TARGET_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("SAFEWATCH_TARGET_FPS must be an integer frame rate"))?;
            self.camera.target_fps = fps;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.incident_store_path.trim().is_empty() {
            return Err(anyhow!("incident_store_path must not be empty"));
        }
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be at least 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera frame dimensions must be nonzero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<WatchdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
