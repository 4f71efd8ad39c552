use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::types::Observation;

/// Maximum time gap bridged inside one continuous (unmasked) segment.
pub const MAX_LINE_POINT_GAP_MS: i64 = 72 * 60 * 1000;

/// Masking reason attached to a null-valued reading.
///
/// Codes follow the NWIS masking vocabulary and are matched
/// case-insensitively against a point's qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataMask {
    Ice,
    Flood,
    Backwater,
    ZeroFlow,
    Dry,
    Seasonal,
    PartialRecord,
    RatingDevelopment,
    EquipmentMalfunction,
    Maintenance,
    Discontinued,
    Test,
    Pump,
    Unavailable,
}

impl DataMask {
    pub const ALL: [DataMask; 14] = [
        Self::Ice,
        Self::Flood,
        Self::Backwater,
        Self::ZeroFlow,
        Self::Dry,
        Self::Seasonal,
        Self::PartialRecord,
        Self::RatingDevelopment,
        Self::EquipmentMalfunction,
        Self::Maintenance,
        Self::Discontinued,
        Self::Test,
        Self::Pump,
        Self::Unavailable,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ice => "ice",
            Self::Flood => "fld",
            Self::Backwater => "bkw",
            Self::ZeroFlow => "zfl",
            Self::Dry => "dry",
            Self::Seasonal => "ssn",
            Self::PartialRecord => "pr",
            Self::RatingDevelopment => "rat",
            Self::EquipmentMalfunction => "eqp",
            Self::Maintenance => "mnt",
            Self::Discontinued => "dis",
            Self::Test => "tst",
            Self::Pump => "pmp",
            Self::Unavailable => "***",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Ice => "Ice Affected",
            Self::Flood => "Flood",
            Self::Backwater => "Backwater",
            Self::ZeroFlow => "Zeroflow",
            Self::Dry => "Dry",
            Self::Seasonal => "Seasonal",
            Self::PartialRecord => "Partial Record",
            Self::RatingDevelopment => "Rating Development",
            Self::EquipmentMalfunction => "Equipment Malfunction",
            Self::Maintenance => "Maintenance",
            Self::Discontinued => "Discontinued",
            Self::Test => "Test",
            Self::Pump => "Pump",
            Self::Unavailable => "Unavailable",
        }
    }

    /// Matches a single qualifier code, ignoring case.
    #[must_use]
    pub fn from_qualifier(qualifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mask| mask.code().eq_ignore_ascii_case(qualifier))
    }
}

/// Approval/estimation/mask triple shared by every point in a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointClass {
    pub approved: bool,
    pub estimated: bool,
    pub mask: Option<DataMask>,
}

impl PointClass {
    /// Classifies one observation from its qualifiers.
    ///
    /// `approved` requires the exact `A` qualifier and `estimated` requires
    /// `e` or `E`; the mask is only resolved for null-valued points. A
    /// null-valued point whose qualifiers match no known mask code stays
    /// unmasked (an inherited data-quality gap surfaced to callers rather
    /// than papered over).
    #[must_use]
    pub fn of(observation: &Observation) -> Self {
        let approved = observation
            .qualifiers
            .iter()
            .any(|qualifier| qualifier == "A");
        let estimated = observation
            .qualifiers
            .iter()
            .any(|qualifier| qualifier == "e" || qualifier == "E");

        let mask = if observation.value.is_none() {
            resolve_mask(observation)
        } else {
            None
        };

        Self {
            approved,
            estimated,
            mask,
        }
    }

    #[must_use]
    pub fn is_masked(self) -> bool {
        self.mask.is_some()
    }
}

fn resolve_mask(observation: &Observation) -> Option<DataMask> {
    let matches: SmallVec<[DataMask; 2]> = observation
        .qualifiers
        .iter()
        .filter_map(|qualifier| DataMask::from_qualifier(qualifier))
        .collect();

    if matches.len() > 1 {
        warn!(
            time = observation.time,
            masks = ?matches,
            "observation carries more than one mask qualifier; keeping the first"
        );
    }

    matches.first().copied()
}

/// Contiguous run of observations sharing one classification.
///
/// Never empty; points are in input (time) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub class: PointClass,
    pub points: Vec<Observation>,
}

/// Partitions time-ordered observations into homogeneous line segments.
///
/// A new segment starts whenever the classification triple changes, or when
/// an unmasked point follows its predecessor by more than
/// [`MAX_LINE_POINT_GAP_MS`]. Masked runs are never split on gap: a masked
/// interval is one visual block regardless of duration. Input points must
/// already be time-ordered; no sorting is performed.
#[must_use]
pub fn classify_into_segments(points: &[Observation]) -> Vec<LineSegment> {
    let mut segments: Vec<LineSegment> = Vec::new();

    for point in points {
        let class = PointClass::of(point);

        let start_new = match segments.last() {
            None => true,
            Some(current) => {
                if current.class != class {
                    true
                } else if class.is_masked() {
                    false
                } else {
                    let previous_time = current
                        .points
                        .last()
                        .map(|previous| previous.time)
                        .unwrap_or(point.time);
                    point.time - previous_time > MAX_LINE_POINT_GAP_MS
                }
            }
        };

        if start_new {
            segments.push(LineSegment {
                class,
                points: vec![point.clone()],
            });
        } else if let Some(current) = segments.last_mut() {
            current.points.push(point.clone());
        }
    }

    segments
}
