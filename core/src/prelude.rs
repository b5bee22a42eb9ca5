use serde::{Deserialize, Serialize};

pub const DEFAULT_GLITCH_DISTANCE_NM: f64 = 2.0;
pub const DEFAULT_PERCENTILE: f64 = 95.0;
pub const DEFAULT_SMOOTHING_WINDOW_LEN: usize = 3;

/// Identifier of a vessel as carried by the race files.
pub type VesselId = u64;

/// User-tunable analysis settings, supplied by the host per request.
///
/// Missing keys in a serialized form fall back to their defaults, so a partial
/// user configuration overlays the defaults field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Legs longer than this are treated as a position glitch.
    pub glitch_distance_nm: f64,
    /// Percentile of the leg-speed distribution used as the outlier ceiling.
    pub percentile: f64,
    /// Centred moving-average window, odd, 1 disables smoothing.
    pub smoothing_window_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glitch_distance_nm: DEFAULT_GLITCH_DISTANCE_NM,
            percentile: DEFAULT_PERCENTILE,
            smoothing_window_len: DEFAULT_SMOOTHING_WINDOW_LEN,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> StageResult<()> {
        if !self.glitch_distance_nm.is_finite() || self.glitch_distance_nm <= 0.0 {
            return Err(StageError::InvalidSettings(format!(
                "glitch distance must be a positive number of nm, got {}",
                self.glitch_distance_nm
            )));
        }
        if !self.percentile.is_finite() || !(0.0..=100.0).contains(&self.percentile) {
            return Err(StageError::InvalidSettings(format!(
                "percentile must lie within 0..=100, got {}",
                self.percentile
            )));
        }
        if self.smoothing_window_len == 0 || self.smoothing_window_len % 2 == 0 {
            return Err(StageError::InvalidSettings(format!(
                "smoothing window must be odd and at least 1, got {}",
                self.smoothing_window_len
            )));
        }
        Ok(())
    }

    /// Copy of these settings with display smoothing switched off.
    pub fn unsmoothed(&self) -> Self {
        Self {
            smoothing_window_len: 1,
            ..*self
        }
    }
}

/// Whether a speed series is passed through the outlier filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    Raw,
    #[default]
    Filtered,
}

impl SeriesMode {
    pub fn from_filtered(filtered: bool) -> Self {
        if filtered {
            SeriesMode::Filtered
        } else {
            SeriesMode::Raw
        }
    }

    pub fn is_filtered(self) -> bool {
        matches!(self, SeriesMode::Filtered)
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("stage not initialized: {0}")]
    NotInitialized(String),
    #[error("decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StageResult<T> = Result<T, StageError>;

/// Lifecycle shared by the analysis stages that depend on [`Settings`].
pub trait AnalysisStage {
    fn initialize(&mut self, settings: &Settings) -> StageResult<()>;
    fn cleanup(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.glitch_distance_nm, 2.0);
        assert_eq!(settings.percentile, 95.0);
        assert_eq!(settings.smoothing_window_len, 3);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let even = Settings {
            smoothing_window_len: 4,
            ..Default::default()
        };
        assert!(matches!(
            even.validate(),
            Err(StageError::InvalidSettings(_))
        ));

        let zero_window = Settings {
            smoothing_window_len: 0,
            ..Default::default()
        };
        assert!(zero_window.validate().is_err());

        let negative = Settings {
            glitch_distance_nm: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan = Settings {
            glitch_distance_nm: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let too_high = Settings {
            percentile: 100.5,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn partial_json_overlays_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"percentile": 80}"#).unwrap();
        assert_eq!(settings.percentile, 80.0);
        assert_eq!(settings.glitch_distance_nm, DEFAULT_GLITCH_DISTANCE_NM);
        assert_eq!(settings.smoothing_window_len, DEFAULT_SMOOTHING_WINDOW_LEN);
    }

    #[test]
    fn unsmoothed_keeps_filter_settings() {
        let settings = Settings {
            glitch_distance_nm: 5.0,
            percentile: 90.0,
            smoothing_window_len: 7,
        };
        let plain = settings.unsmoothed();
        assert_eq!(plain.smoothing_window_len, 1);
        assert_eq!(plain.glitch_distance_nm, 5.0);
        assert_eq!(plain.percentile, 90.0);
    }
}
