//! Distance window and label thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Binary class assigned from a continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn as_i64(self) -> i64 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Label::Negative),
            1 => Some(Label::Positive),
            _ => None,
        }
    }
}

/// Closed interval `[lower, upper]` on the variant–TSS distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceWindow {
    lower: i64,
    upper: i64,
}

impl DistanceWindow {
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(ModelError::InvalidWindow { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Window `[0, upper]`.
    pub fn up_to(upper: i64) -> Result<Self> {
        Self::new(0, upper)
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// Inclusive on both ends.
    pub fn contains(&self, distance: i64) -> bool {
        self.lower <= distance && distance <= self.upper
    }

    /// [`contains`](Self::contains) for fractional distances.
    pub fn contains_f64(&self, distance: f64) -> bool {
        self.lower as f64 <= distance && distance <= self.upper as f64
    }
}

/// Two-threshold labeling policy.
///
/// Scores at or above `positive` are positives, scores at or below
/// `negative` are negatives, and anything strictly between is ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct LabelThresholds {
    positive: f64,
    negative: f64,
}

#[derive(Deserialize)]
struct RawThresholds {
    positive: f64,
    negative: f64,
}

impl TryFrom<RawThresholds> for LabelThresholds {
    type Error = ModelError;

    fn try_from(raw: RawThresholds) -> Result<Self> {
        Self::new(raw.positive, raw.negative)
    }
}

impl LabelThresholds {
    /// Equal or inverted thresholds are rejected, as are non-finite values.
    pub fn new(positive: f64, negative: f64) -> Result<Self> {
        if !positive.is_finite() || !negative.is_finite() || positive <= negative {
            return Err(ModelError::InvalidThresholds { positive, negative });
        }
        Ok(Self { positive, negative })
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    /// Label for a score, or `None` inside the ambiguous zone.
    pub fn classify(&self, score: f64) -> Option<Label> {
        if score >= self.positive {
            Some(Label::Positive)
        } else if score <= self.negative {
            Some(Label::Negative)
        } else {
            None
        }
    }
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            positive: 0.90,
            negative: 0.01,
        }
    }
}
