use crate::viewer::model::{default_palette, OverlayColor, MIN_PALETTE_LEN};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "skyline_viewer.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerSettings {
    /// When enabled logging starts at debug level and honours `RUST_LOG`.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Program spawned as the out-of-process viewer.
    #[serde(default = "default_viewer_command")]
    pub viewer_command: String,
    #[serde(default)]
    pub viewer_args: Vec<String>,
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Overlay colors, assigned cyclically. At least six entries.
    #[serde(default = "default_palette")]
    pub palette: Vec<OverlayColor>,
    /// Inbox polling interval while the window is idle.
    #[serde(default = "default_repaint_interval_ms")]
    pub repaint_interval_ms: u64,
}

fn default_viewer_command() -> String {
    "skyline_viewer".into()
}

fn default_window_size() -> (f32, f32) {
    (640.0, 480.0)
}

fn default_stroke_width() -> f32 {
    2.0
}

fn default_repaint_interval_ms() -> u64 {
    250
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            viewer_command: default_viewer_command(),
            viewer_args: Vec::new(),
            window_size: default_window_size(),
            stroke_width: default_stroke_width(),
            palette: default_palette(),
            repaint_interval_ms: default_repaint_interval_ms(),
        }
    }
}

impl ViewerSettings {
    /// Loads settings from `path`. A missing or blank file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read viewer settings file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut loaded: Self = serde_json::from_str(&content)
            .with_context(|| format!("deserialize viewer settings file {}", path.display()))?;
        loaded.sanitize();
        Ok(loaded)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("create viewer settings folder {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("serialize viewer settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write viewer settings file {}", path.display()))
    }

    pub fn sanitize(&mut self) {
        if self.palette.len() < MIN_PALETTE_LEN {
            tracing::warn!(
                len = self.palette.len(),
                "palette needs at least {MIN_PALETTE_LEN} colors; using defaults"
            );
            self.palette = default_palette();
        }
        if !(self.stroke_width > 0.0) {
            self.stroke_width = default_stroke_width();
        }
        if !(self.window_size.0 > 0.0 && self.window_size.1 > 0.0) {
            self.window_size = default_window_size();
        }
        if self.repaint_interval_ms == 0 {
            self.repaint_interval_ms = default_repaint_interval_ms();
        }
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads from `explicit` when given, otherwise from next to the executable.
pub fn load(explicit: Option<&Path>) -> Result<ViewerSettings> {
    match explicit {
        Some(path) => ViewerSettings::load(path),
        None => ViewerSettings::load(&resolve_settings_path()?),
    }
}

/// Value of a `--settings <path>` argument, if present.
pub fn settings_arg(args: &[String]) -> Result<Option<PathBuf>> {
    let Some(pos) = args.iter().position(|a| a == "--settings") else {
        return Ok(None);
    };
    args.get(pos + 1)
        .map(|p| Some(PathBuf::from(p)))
        .ok_or_else(|| anyhow!("--settings requires a path"))
}
