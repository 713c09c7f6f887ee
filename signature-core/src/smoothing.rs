//! Velocity and pressure driven width smoothing.
//!
//! Each incoming sample updates an exponentially smoothed velocity. Faster
//! motion thins the line, pressure thickens it, and the resolved width is
//! itself low-pass filtered so consecutive segments never jump in width.
//! Long jumps between samples are filled with interpolated points.

use serde::{Deserialize, Serialize};

use crate::{Point, SignatureError, SignatureResult};

/// Tunable constants for stroke smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Weight of the previous velocity in the exponential filter (k).
    pub velocity_smoothing: f32,
    /// Speed (pixels per sample) that maps to a normalized speed of 1.0.
    pub reference_speed: f32,
    /// How strongly normalized speed thins the line (0 = not at all).
    pub speed_dampening: f32,
    /// Lowest pressure factor, so light input never collapses the line.
    pub pressure_floor: f32,
    /// Pressure assumed when the host reports none.
    pub default_pressure: f32,
    /// Minimum width as a fraction of the base width.
    pub min_width_ratio: f32,
    /// Maximum width as a fraction of the base width.
    pub max_width_ratio: f32,
    /// Weight of the previous width in the width low-pass filter.
    pub width_smoothing: f32,
    /// Jumps longer than this get interpolated points.
    pub interpolation_threshold: f32,
    /// Spacing of interpolated points.
    pub interpolation_step: f32,
    /// Moves this close to the last recorded point are coalesced.
    pub min_move_distance: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            velocity_smoothing: 0.7,
            reference_speed: 100.0,
            speed_dampening: 0.5,
            pressure_floor: 0.1,
            default_pressure: 1.0,
            min_width_ratio: 0.5,
            max_width_ratio: 1.5,
            width_smoothing: 0.6,
            interpolation_threshold: 10.0,
            interpolation_step: 5.0,
            min_move_distance: 1.0,
        }
    }
}

impl SmoothingConfig {
    /// Check that every constant is in its usable range.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> SignatureResult<()> {
        let unit_open = 0.0..1.0;
        let unit = 0.0..=1.0;

        if !unit_open.contains(&self.velocity_smoothing) {
            return Err(invalid("velocity_smoothing must be in [0, 1)"));
        }
        if self.reference_speed.is_nan() || self.reference_speed <= 0.0 {
            return Err(invalid("reference_speed must be positive"));
        }
        if !unit.contains(&self.speed_dampening) {
            return Err(invalid("speed_dampening must be in [0, 1]"));
        }
        if self.pressure_floor.is_nan() || self.pressure_floor <= 0.0 || self.pressure_floor > 1.0 {
            return Err(invalid("pressure_floor must be in (0, 1]"));
        }
        if !unit.contains(&self.default_pressure) {
            return Err(invalid("default_pressure must be in [0, 1]"));
        }
        if self.min_width_ratio.is_nan()
            || self.min_width_ratio <= 0.0
            || self.max_width_ratio.is_nan()
            || self.max_width_ratio < self.min_width_ratio
        {
            return Err(invalid(
                "width ratios must satisfy 0 < min_width_ratio <= max_width_ratio",
            ));
        }
        if !unit_open.contains(&self.width_smoothing) {
            return Err(invalid("width_smoothing must be in [0, 1)"));
        }
        if self.interpolation_step.is_nan() || self.interpolation_step <= 0.0 {
            return Err(invalid("interpolation_step must be positive"));
        }
        if self.interpolation_threshold.is_nan() || self.interpolation_threshold < 0.0 {
            return Err(invalid("interpolation_threshold must not be negative"));
        }
        if self.min_move_distance.is_nan() || self.min_move_distance < 0.0 {
            return Err(invalid("min_move_distance must not be negative"));
        }
        Ok(())
    }

    /// Smallest width a stroke of `base_width` may take.
    #[must_use]
    pub fn min_width(&self, base_width: f32) -> f32 {
        base_width * self.min_width_ratio
    }

    /// Largest width a stroke of `base_width` may take.
    #[must_use]
    pub fn max_width(&self, base_width: f32) -> f32 {
        base_width * self.max_width_ratio
    }
}

fn invalid(reason: &str) -> SignatureError {
    SignatureError::InvalidConfig(reason.to_string())
}

/// Result of feeding one sample through the smoother.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSample {
    /// Points synthesized between the previous position and the sample.
    pub interpolated: Vec<Point>,
    /// The sample position itself.
    pub point: Point,
    /// Smoothed width shared by the sample and its interpolated points.
    pub width: f32,
    /// Normalized speed in `[0, 1]` used to resolve the width.
    pub normalized_speed: f32,
}

/// Per-stroke filter state, reset on every pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    last_point: Point,
    velocity_x: f32,
    velocity_y: f32,
    last_width: f32,
}

impl SmoothingState {
    /// Fresh state anchored at a stroke's origin.
    #[must_use]
    pub fn new(origin: Point, base_width: f32) -> Self {
        Self {
            last_point: origin,
            velocity_x: 0.0,
            velocity_y: 0.0,
            last_width: base_width,
        }
    }

    /// Last recorded raw position.
    #[must_use]
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    /// Current smoothed velocity `(x, y)`.
    #[must_use]
    pub fn velocity(&self) -> (f32, f32) {
        (self.velocity_x, self.velocity_y)
    }

    /// Last resolved width.
    #[must_use]
    pub fn last_width(&self) -> f32 {
        self.last_width
    }

    /// Feed a sample through the filter.
    ///
    /// Returns `None`, leaving the state untouched, when the sample is within
    /// `min_move_distance` of the last recorded position.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn advance(
        &mut self,
        point: Point,
        pressure: Option<f32>,
        base_width: f32,
        config: &SmoothingConfig,
    ) -> Option<SmoothedSample> {
        let distance = self.last_point.distance(point);
        if distance <= config.min_move_distance {
            return None;
        }

        let k = config.velocity_smoothing;
        let raw_x = point.x - self.last_point.x;
        let raw_y = point.y - self.last_point.y;
        self.velocity_x = self.velocity_x * k + raw_x * (1.0 - k);
        self.velocity_y = self.velocity_y * k + raw_y * (1.0 - k);

        let speed = self.velocity_x.hypot(self.velocity_y);
        let normalized_speed = (speed / config.reference_speed).clamp(0.0, 1.0);

        let pressure_factor = pressure
            .unwrap_or(config.default_pressure)
            .clamp(config.pressure_floor, 1.0);
        let min_width = config.min_width(base_width);
        let max_width = config.max_width(base_width);
        let target = base_width * pressure_factor * (1.0 - normalized_speed * config.speed_dampening);
        let resolved = target.clamp(min_width, max_width);

        let w = config.width_smoothing;
        self.last_width = (self.last_width * w + resolved * (1.0 - w)).clamp(min_width, max_width);

        let mut interpolated = Vec::new();
        if distance > config.interpolation_threshold {
            let steps = (distance / config.interpolation_step).floor() as usize;
            let divisions = (steps + 1) as f32;
            interpolated.extend(
                (1..=steps).map(|i| self.last_point.lerp(point, i as f32 / divisions)),
            );
        }

        self.last_point = point;

        Some(SmoothedSample {
            interpolated,
            point,
            width: self.last_width,
            normalized_speed,
        })
    }
}
