use crate::models::alert::Severity;

/// Fill-level cutoffs separating the severity tiers, in percent.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub low: f64,
    pub moderate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            moderate: 70.0,
        }
    }
}

impl Thresholds {
    /// Maps a fill level to a severity tier: `[0, low]` is low,
    /// `(low, moderate]` is moderate, anything above is high.
    pub fn classify(&self, fill_level: f64) -> Severity {
        if fill_level <= self.low {
            Severity::Low
        } else if fill_level <= self.moderate {
            Severity::Moderate
        } else {
            Severity::High
        }
    }
}
