use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Plot area dimensions in pixels.
///
/// Every projection function takes a `Layout` explicitly; there is no
/// process-wide layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
}

impl Layout {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One time-series reading from an observations web service.
///
/// `value == None` marks a masked or missing reading. `qualifiers` carries
/// the approval/estimation/mask codes attached by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Epoch milliseconds.
    pub time: i64,
    pub value: Option<f64>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

impl Observation {
    #[must_use]
    pub fn new(time: i64, value: Option<f64>, qualifiers: Vec<String>) -> Self {
        Self {
            time,
            value,
            qualifiers,
        }
    }

    /// Builds an observation from a service reading with a decimal value.
    pub fn from_decimal_reading(
        time: DateTime<Utc>,
        value: Option<Decimal>,
        qualifiers: Vec<String>,
    ) -> ChartResult<Self> {
        let value = match value {
            Some(decimal) => Some(decimal_to_f64(decimal, "observation value")?),
            None => None,
        };
        Ok(Self {
            time: datetime_to_epoch_millis(time),
            value,
            qualifiers,
        })
    }

    /// Returns the value when it is present and finite.
    #[must_use]
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|value| value.is_finite())
    }
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_epoch_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}
