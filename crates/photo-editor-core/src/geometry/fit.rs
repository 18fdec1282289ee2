//! Aspect-preserving fit of an image inside a container.
//!
//! Used for the initial layout of the base image, for re-layout after a
//! snap-back, and for sizing overlay images against the base image bounds.

use serde::{Deserialize, Serialize};

use super::{Placement, Point, Size};

/// How an image is fitted into its container.
///
/// An editor uses one policy for every fit it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    /// Keep the intrinsic size when it fits; otherwise shrink by the smaller
    /// of the two axis scales. Never upscales. Centered.
    #[default]
    DownscaleCentered,
    /// Fill the container along the axis the image is relatively wider on and
    /// derive the other axis from the aspect ratio. May upscale. Centered.
    FillAxis,
}

/// Compute where and how large an image is drawn inside a container.
///
/// Returns an empty placement at the origin when either size is empty.
///
/// # Example
///
/// ```
/// use photo_editor_core::geometry::{fit, FitPolicy, Size};
///
/// let placed = fit(
///     Size::new(2000.0, 1000.0),
///     Size::new(500.0, 500.0),
///     FitPolicy::DownscaleCentered,
/// );
/// assert_eq!((placed.width, placed.height), (500.0, 250.0));
/// assert_eq!((placed.x, placed.y), (0.0, 125.0));
/// ```
pub fn fit(intrinsic: Size, container: Size, policy: FitPolicy) -> Placement {
    if intrinsic.is_empty() || container.is_empty() {
        return Placement::default();
    }

    let size = match policy {
        FitPolicy::DownscaleCentered => downscale_to_fit(intrinsic, container),
        FitPolicy::FillAxis => fill_axis(intrinsic, container),
    };

    Placement::new(
        Point::new(
            (container.width - size.width) / 2.0,
            (container.height - size.height) / 2.0,
        ),
        size,
    )
}

fn downscale_to_fit(intrinsic: Size, container: Size) -> Size {
    if intrinsic.width <= container.width && intrinsic.height <= container.height {
        return intrinsic;
    }

    let width_scale = container.width / intrinsic.width;
    let height_scale = container.height / intrinsic.height;
    let scale = width_scale.min(height_scale);

    // Rounding in `w * (cw / w)` can overshoot the container by an ulp.
    Size::new(
        (intrinsic.width * scale).min(container.width),
        (intrinsic.height * scale).min(container.height),
    )
}

fn fill_axis(intrinsic: Size, container: Size) -> Size {
    let image_ratio = intrinsic.width / intrinsic.height;
    let view_ratio = container.width / container.height;

    if image_ratio > view_ratio {
        Size::new(container.width, container.width / image_ratio)
    } else {
        Size::new(container.height * image_ratio, container.height)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
