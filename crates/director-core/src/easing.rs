//! Easing curves for cinematic tweens.
//!
//! Penner-style curves over the normalized time `t ∈ [0, 1]`. The "out"
//! variants are written in `(t - 1)` form so results stay bit-identical to
//! the usual reference tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectorError;

/// Named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EasingType {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
}

impl EasingType {
    pub const ALL: [EasingType; 16] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
    ];

    /// Applies the curve. Input is not clamped.
    #[allow(clippy::float_cmp)]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }
            Self::EaseInQuint => t * t * t * t * t,
            Self::EaseOutQuint => {
                let u = t - 1.0;
                1.0 + u * u * u * u * u
            }
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 + 16.0 * u * u * u * u * u
                }
            }
            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseInQuad => "EaseInQuad",
            Self::EaseOutQuad => "EaseOutQuad",
            Self::EaseInOutQuad => "EaseInOutQuad",
            Self::EaseInCubic => "EaseInCubic",
            Self::EaseOutCubic => "EaseOutCubic",
            Self::EaseInOutCubic => "EaseInOutCubic",
            Self::EaseInQuart => "EaseInQuart",
            Self::EaseOutQuart => "EaseOutQuart",
            Self::EaseInOutQuart => "EaseInOutQuart",
            Self::EaseInQuint => "EaseInQuint",
            Self::EaseOutQuint => "EaseOutQuint",
            Self::EaseInOutQuint => "EaseInOutQuint",
            Self::EaseInExpo => "EaseInExpo",
            Self::EaseOutExpo => "EaseOutExpo",
            Self::EaseInOutExpo => "EaseInOutExpo",
        }
    }

    /// Looks a curve up by its table name, e.g. `"EaseOutCubic"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown easing curve: {s}"))
    }
}

/// Easing used by a tween: a named curve or a caller-supplied function.
#[derive(Clone, Copy)]
pub enum Easing {
    Curve(EasingType),
    Custom(fn(f64) -> f64),
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Curve(curve) => curve.apply(t),
            Self::Custom(f) => f(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Curve(EasingType::Linear)
    }
}

impl From<EasingType> for Easing {
    fn from(curve: EasingType) -> Self {
        Self::Curve(curve)
    }
}

impl TryFrom<&str> for Easing {
    type Error = DirectorError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        EasingType::from_name(name)
            .map(Self::Curve)
            .ok_or_else(|| DirectorError::UnknownEasing(name.to_owned()))
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curve(curve) => f.debug_tuple("Curve").field(curve).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
