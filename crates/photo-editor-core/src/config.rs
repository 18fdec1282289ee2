//! Editor configuration.
//!
//! Every field has a default, so hosts only need to supply what they change:
//!
//! ```ignore
//! let config: EditorConfig = serde_json::from_str(r#"{ "fit_policy": "fill_axis" }"#)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{DEFAULT_OVERSHOOT_TENSION, DEFAULT_SNAP_BACK_DURATION};
use crate::decode::FilterType;
use crate::geometry::{FitPolicy, ScaleBounds};
use crate::storage::DEFAULT_FILE_PREFIX;
use crate::text::TextStyle;

/// Tunables of a [`PhotoEditor`](crate::editor::PhotoEditor) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Range the pinch zoom factor is clamped to.
    pub scale_bounds: ScaleBounds,
    /// Fit policy used for the base image and for overlay images.
    pub fit_policy: FitPolicy,
    /// Length of the snap-back animation in milliseconds.
    pub snap_back_duration_ms: u64,
    /// Overshoot tension of the snap-back curve.
    pub overshoot_tension: f32,
    /// Resampling filter used when flattening.
    pub resize_filter: FilterType,
    /// Style given to newly added text labels.
    pub text_style: TextStyle,
    /// Prefix of saved file names.
    pub file_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale_bounds: ScaleBounds::default(),
            fit_policy: FitPolicy::default(),
            snap_back_duration_ms: DEFAULT_SNAP_BACK_DURATION.as_millis() as u64,
            overshoot_tension: DEFAULT_OVERSHOOT_TENSION,
            resize_filter: FilterType::default(),
            text_style: TextStyle::default(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn snap_back_duration(&self) -> Duration {
        Duration::from_millis(self.snap_back_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.scale_bounds, ScaleBounds::new(0.5, 3.0).unwrap());
        assert_eq!(config.fit_policy, FitPolicy::DownscaleCentered);
        assert_eq!(config.snap_back_duration(), Duration::from_millis(300));
        assert_eq!(config.overshoot_tension, 4.0);
        assert_eq!(config.file_prefix, "photo_editor_image_");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(
            r#"{
                "fit_policy": "fill_axis",
                "scale_bounds": { "min": 1.0, "max": 3.0 },
                "text_style": { "font_size": 30.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fit_policy, FitPolicy::FillAxis);
        assert_eq!(config.scale_bounds, ScaleBounds::new(1.0, 3.0).unwrap());
        assert_eq!(config.text_style.font_size, 30.0);
        assert_eq!(config.text_style.padding, 8.0);
        assert_eq!(config.snap_back_duration_ms, 300);
        assert_eq!(config.resize_filter, FilterType::Bilinear);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_inverted_scale_bounds_rejected() {
        let result: Result<EditorConfig, _> =
            serde_json::from_str(r#"{ "scale_bounds": { "min": 3.0, "max": 0.5 } }"#);
        assert!(result.is_err());

        let result: Result<EditorConfig, _> =
            serde_json::from_str(r#"{ "scale_bounds": { "min": 0.0, "max": 3.0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fit_policy_rejected() {
        let result: Result<EditorConfig, _> = serde_json::from_str(r#"{ "fit_policy": "stretch" }"#);
        assert!(result.is_err());
    }
}
