//! Pinch-to-zoom scale resolution for the base image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Invalid scale bounds {min}..={max}: both must be finite with 0 < min <= max")]
pub struct InvalidScaleBounds {
    pub min: f32,
    pub max: f32,
}

#[derive(Serialize, Deserialize)]
struct RawScaleBounds {
    min: f32,
    max: f32,
}

/// Inclusive range the zoom factor is clamped to.
///
/// Always finite with `0 < min <= max`; deserialization rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScaleBounds", into = "RawScaleBounds")]
pub struct ScaleBounds {
    min: f32,
    max: f32,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 3.0 }
    }
}

impl ScaleBounds {
    pub fn new(min: f32, max: f32) -> Result<Self, InvalidScaleBounds> {
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Ok(Self { min, max })
        } else {
            Err(InvalidScaleBounds { min, max })
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamp `factor` into the range. NaN counts as natural size (1.0).
    pub fn clamp(&self, factor: f32) -> f32 {
        let factor = if factor.is_nan() { 1.0 } else { factor };
        factor.clamp(self.min, self.max)
    }
}

impl TryFrom<RawScaleBounds> for ScaleBounds {
    type Error = InvalidScaleBounds;

    fn try_from(raw: RawScaleBounds) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl From<ScaleBounds> for RawScaleBounds {
    fn from(bounds: ScaleBounds) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
        }
    }
}

/// Result of feeding one pinch sample into the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchOutcome {
    /// New clamped factor.
    pub factor: f32,
    /// The image went below natural size and should animate back to 1.0.
    pub snap_back: bool,
}

/// Apply a multiplicative pinch delta to the current factor.
///
/// A delta that is not a positive finite number leaves the factor untouched.
/// A NaN `current` is treated as 1.0.
///
/// # Example
///
/// ```
/// use photo_editor_core::geometry::{apply_pinch, ScaleBounds};
///
/// let outcome = apply_pinch(1.0, 0.4, ScaleBounds::default());
/// assert_eq!(outcome.factor, 0.5);
/// assert!(outcome.snap_back);
/// ```
pub fn apply_pinch(current: f32, delta: f32, bounds: ScaleBounds) -> PinchOutcome {
    let current = if current.is_nan() { 1.0 } else { current };
    let factor = if delta.is_finite() && delta > 0.0 {
        bounds.clamp(current * delta)
    } else {
        bounds.clamp(current)
    };

    PinchOutcome {
        factor,
        snap_back: factor < 1.0,
    }
}

/// Zoom factor of the base image display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    factor: f32,
    bounds: ScaleBounds,
}

impl ScaleState {
    pub fn new(bounds: ScaleBounds) -> Self {
        Self {
            factor: bounds.clamp(1.0),
            bounds,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Feed a pinch sample and store the resulting factor.
    pub fn apply(&mut self, delta: f32) -> PinchOutcome {
        let outcome = apply_pinch(self.factor, delta, self.bounds);
        self.factor = outcome.factor;
        outcome
    }

    /// Overwrite the factor, clamped to the bounds.
    pub fn set(&mut self, factor: f32) {
        if factor.is_finite() {
            self.factor = self.bounds.clamp(factor);
        }
    }

    /// Return to natural size.
    pub fn reset(&mut self) {
        self.factor = self.bounds.clamp(1.0);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
