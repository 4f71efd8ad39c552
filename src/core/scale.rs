use serde::{Deserialize, Serialize};

use crate::core::types::Layout;
use crate::error::{ChartError, ChartResult};

/// Mapping mode used by the value scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScaleMode {
    /// Uniform spacing in raw value units.
    #[default]
    Linear,
    /// Symmetric-log spacing: `sign(v) * ln(1 + |v|)`. Defined for zero and
    /// negative values, unlike a plain log scale.
    Symlog,
}

/// Value axis model mapped to an inverted Y pixel axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    domain_start: f64,
    domain_end: f64,
    transformed_start: f64,
    transformed_end: f64,
    mode: ScaleMode,
}

impl ValueScale {
    /// Creates a value scale from an explicit domain.
    pub fn new(domain_start: f64, domain_end: f64, mode: ScaleMode) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "value scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            transformed_start: transform(domain_start, mode),
            transformed_end: transform(domain_end, mode),
            mode,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn mode(self) -> ScaleMode {
        self.mode
    }

    /// Maps a raw value to pixel Y. The domain maximum lands at the top of
    /// the layout (pixel 0).
    pub fn value_to_pixel(self, value: f64, layout: Layout) -> ChartResult<f64> {
        if !layout.is_valid() {
            return Err(ChartError::InvalidLayout {
                width: layout.width,
                height: layout.height,
            });
        }
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.transformed_end - self.transformed_start;
        let normalized = (transform(value, self.mode) - self.transformed_start) / span;
        Ok((1.0 - normalized) * f64::from(layout.height))
    }

    pub fn pixel_to_value(self, pixel: f64, layout: Layout) -> ChartResult<f64> {
        if !layout.is_valid() {
            return Err(ChartError::InvalidLayout {
                width: layout.width,
                height: layout.height,
            });
        }
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.transformed_end - self.transformed_start;
        let normalized = 1.0 - pixel / f64::from(layout.height);
        Ok(invert(self.transformed_start + normalized * span, self.mode))
    }
}

fn transform(value: f64, mode: ScaleMode) -> f64 {
    match mode {
        ScaleMode::Linear => value,
        ScaleMode::Symlog => value.signum() * value.abs().ln_1p(),
    }
}

fn invert(value: f64, mode: ScaleMode) -> f64 {
    match mode {
        ScaleMode::Linear => value,
        ScaleMode::Symlog => value.signum() * value.abs().exp_m1(),
    }
}
