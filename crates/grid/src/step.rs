use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest accepted step. Below this the lat/lon counts stop being meaningful
/// for a single-canvas viewer and the row loop dominates generation time.
pub const MIN_STEP_DEG: f64 = 0.05;
/// Largest accepted step: one latitude band per hemisphere.
pub const MAX_STEP_DEG: f64 = 180.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("step must be a finite number of degrees, got {0}")]
    NotFinite(f64),
    #[error("step must be positive, got {0}°")]
    NonPositive(f64),
    #[error("step {value}° outside [{min}°, {max}°]", min = MIN_STEP_DEG, max = MAX_STEP_DEG)]
    OutOfRange { value: f64 },
    #[error("invalid step {0:?}")]
    Parse(String),
}

/// Angular sampling step in degrees, validated into `[MIN_STEP_DEG, MAX_STEP_DEG]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AngularStep(f64);

impl AngularStep {
    pub fn new(degrees: f64) -> Result<Self, StepError> {
        let degrees = check_sign(degrees)?;
        if !(MIN_STEP_DEG..=MAX_STEP_DEG).contains(&degrees) {
            return Err(StepError::OutOfRange { value: degrees });
        }
        Ok(Self(degrees))
    }

    /// Compile-time constructor for literal steps; an out-of-range literal
    /// fails const evaluation.
    pub const fn new_const(degrees: f64) -> Self {
        assert!(degrees >= MIN_STEP_DEG && degrees <= MAX_STEP_DEG);
        Self(degrees)
    }

    /// Like [`AngularStep::new`] but pulls finite positive values into range
    /// instead of rejecting them.
    pub fn clamped(degrees: f64) -> Result<Self, StepError> {
        let degrees = check_sign(degrees)?;
        Ok(Self(degrees.clamp(MIN_STEP_DEG, MAX_STEP_DEG)))
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

fn check_sign(degrees: f64) -> Result<f64, StepError> {
    if !degrees.is_finite() {
        return Err(StepError::NotFinite(degrees));
    }
    if degrees <= 0.0 {
        return Err(StepError::NonPositive(degrees));
    }
    Ok(degrees)
}

impl TryFrom<f64> for AngularStep {
    type Error = StepError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AngularStep> for f64 {
    fn from(step: AngularStep) -> Self {
        step.0
    }
}

impl FromStr for AngularStep {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| StepError::Parse(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for AngularStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapError {
    #[error("point cap must be at least 1")]
    Zero,
}

/// Hard upper bound on the number of emitted grid points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PointCap(NonZeroUsize);

impl PointCap {
    pub const DEFAULT: PointCap = PointCap(NonZeroUsize::new(1_200_000).unwrap());

    pub fn new(points: usize) -> Result<Self, CapError> {
        NonZeroUsize::new(points).map(Self).ok_or(CapError::Zero)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PointCap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PointCap {
    type Error = CapError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PointCap> for usize {
    fn from(cap: PointCap) -> Self {
        cap.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{AngularStep, CapError, MAX_STEP_DEG, MIN_STEP_DEG, PointCap, StepError};

    #[test]
    fn rejects_degenerate_steps() {
        assert_eq!(AngularStep::new(0.0), Err(StepError::NonPositive(0.0)));
        assert_eq!(AngularStep::new(-3.0), Err(StepError::NonPositive(-3.0)));
        assert!(matches!(
            AngularStep::new(f64::NAN),
            Err(StepError::NotFinite(_))
        ));
        assert_eq!(
            AngularStep::new(400.0),
            Err(StepError::OutOfRange { value: 400.0 })
        );
    }

    #[test]
    fn clamps_into_range() {
        assert_eq!(AngularStep::clamped(1e-6).unwrap().degrees(), MIN_STEP_DEG);
        assert_eq!(AngularStep::clamped(720.0).unwrap().degrees(), MAX_STEP_DEG);
        assert_eq!(AngularStep::clamped(3.0).unwrap().degrees(), 3.0);
        assert!(AngularStep::clamped(f64::INFINITY).is_err());
        assert!(AngularStep::clamped(0.0).is_err());
    }

    #[test]
    fn parses_select_values() {
        assert_eq!("0.2".parse::<AngularStep>().unwrap().degrees(), 0.2);
        assert_eq!(" 5 ".parse::<AngularStep>().unwrap().degrees(), 5.0);
        assert_eq!(
            "five".parse::<AngularStep>(),
            Err(StepError::Parse("five".to_string()))
        );
    }

    #[test]
    fn serde_validates_step() {
        let step: AngularStep = serde_json::from_str("2.0").unwrap();
        assert_eq!(step.degrees(), 2.0);
        assert!(serde_json::from_str::<AngularStep>("-1.0").is_err());
    }

    #[test]
    fn point_cap_rejects_zero() {
        assert_eq!(PointCap::new(0), Err(CapError::Zero));
        assert_eq!(PointCap::default().get(), 1_200_000);
        assert!(serde_json::from_str::<PointCap>("0").is_err());
    }
}
