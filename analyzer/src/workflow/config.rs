use anyhow::Context;
use sogcore::prelude::{
    SeriesMode, Settings, DEFAULT_GLITCH_DISTANCE_NM, DEFAULT_PERCENTILE,
    DEFAULT_SMOOTHING_WINDOW_LEN,
};
use sogcore::processing::DEFAULT_DEDUP_EPSILON_NM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted analysis preferences. Keys missing from the file keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub glitch_distance_nm: f64,
    pub percentile: f64,
    pub smoothing_window_len: usize,
    pub dedup_epsilon_nm: f64,
    pub filtered: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            glitch_distance_nm: DEFAULT_GLITCH_DISTANCE_NM,
            percentile: DEFAULT_PERCENTILE,
            smoothing_window_len: DEFAULT_SMOOTHING_WINDOW_LEN,
            dedup_epsilon_nm: DEFAULT_DEDUP_EPSILON_NM,
            filtered: true,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let contents = serde_yaml::to_string(self).context("serializing workflow config")?;
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::write(path_ref, contents)
            .with_context(|| format!("writing workflow config {}", path_ref.display()))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn from_args(glitch_distance_nm: f64, percentile: f64, smoothing_window_len: usize) -> Self {
        Self {
            glitch_distance_nm,
            percentile,
            smoothing_window_len,
            ..Default::default()
        }
    }

    /// Overlays command-line values on top of the loaded configuration.
    pub fn with_overrides(
        mut self,
        glitch_distance_nm: Option<f64>,
        percentile: Option<f64>,
        smoothing_window_len: Option<usize>,
        raw: bool,
    ) -> Self {
        if let Some(value) = glitch_distance_nm {
            self.glitch_distance_nm = value;
        }
        if let Some(value) = percentile {
            self.percentile = value;
        }
        if let Some(value) = smoothing_window_len {
            self.smoothing_window_len = value;
        }
        if raw {
            self.filtered = false;
        }
        self
    }

    /// Validated engine settings.
    pub fn to_settings(&self) -> anyhow::Result<Settings> {
        let settings = Settings {
            glitch_distance_nm: self.glitch_distance_nm,
            percentile: self.percentile,
            smoothing_window_len: self.smoothing_window_len,
        };
        settings.validate().context("validating workflow settings")?;
        Ok(settings)
    }

    pub fn mode(&self) -> SeriesMode {
        SeriesMode::from_filtered(self.filtered)
    }
}
