//! Easing functions for animations
//!
//! The catalog follows the formulas published on <https://easings.net/>.
//! Every function maps a progress value in `[0, 1]` to an eased value; the
//! back and elastic families overshoot that range in between but still hit
//! `0` and `1` at the ends.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::AnimationError;

const C1: f64 = 1.70158;
const C2: f64 = C1 * 1.525;
const C3: f64 = C1 + 1.0;
const C4: f64 = (2.0 * PI) / 3.0;
const C5: f64 = (2.0 * PI) / 4.5;

const N1: f64 = 7.5625;
const D1: f64 = 2.75;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Easing {
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
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Easing {
    /// Every easing in the catalog, in declaration order
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
    ];

    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// The input is not clamped.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Easing::Linear => x,

            Easing::EaseInQuad => ease_in_pow(x, 2),
            Easing::EaseOutQuad => ease_out_pow(x, 2),
            Easing::EaseInOutQuad => ease_in_out_pow(x, 2),
            Easing::EaseInCubic => ease_in_pow(x, 3),
            Easing::EaseOutCubic => ease_out_pow(x, 3),
            Easing::EaseInOutCubic => ease_in_out_pow(x, 3),
            Easing::EaseInQuart => ease_in_pow(x, 4),
            Easing::EaseOutQuart => ease_out_pow(x, 4),
            Easing::EaseInOutQuart => ease_in_out_pow(x, 4),
            Easing::EaseInQuint => ease_in_pow(x, 5),
            Easing::EaseOutQuint => ease_out_pow(x, 5),
            Easing::EaseInOutQuint => ease_in_out_pow(x, 5),

            Easing::EaseInSine => 1.0 - ((x * PI) / 2.0).cos(),
            Easing::EaseOutSine => ((x * PI) / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * x).cos() - 1.0) / 2.0,

            Easing::EaseInExpo => {
                if x == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * x - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if x == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * x)
                }
            }
            Easing::EaseInOutExpo => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    2f64.powf(20.0 * x - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * x + 10.0)) / 2.0
                }
            }

            Easing::EaseInCirc => 1.0 - (1.0 - x * x).sqrt(),
            Easing::EaseOutCirc => (1.0 - (x - 1.0).powi(2)).sqrt(),
            Easing::EaseInOutCirc => {
                if x < 0.5 {
                    (1.0 - (1.0 - (2.0 * x).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * x + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            Easing::EaseInBack => C3 * x * x * x - C1 * x * x,
            Easing::EaseOutBack => 1.0 + C3 * (x - 1.0).powi(3) + C1 * (x - 1.0).powi(2),
            Easing::EaseInOutBack => {
                if x < 0.5 {
                    ((2.0 * x).powi(2) * ((C2 + 1.0) * 2.0 * x - C2)) / 2.0
                } else {
                    ((2.0 * x - 2.0).powi(2) * ((C2 + 1.0) * (x * 2.0 - 2.0) + C2) + 2.0) / 2.0
                }
            }

            Easing::EaseInElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    -2f64.powf(10.0 * x - 10.0) * ((x * 10.0 - 10.75) * C4).sin()
                }
            }
            Easing::EaseOutElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    2f64.powf(-10.0 * x) * ((x * 10.0 - 0.75) * C4).sin() + 1.0
                }
            }
            Easing::EaseInOutElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else if x < 0.5 {
                    -(2f64.powf(20.0 * x - 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0
                } else {
                    (2f64.powf(-20.0 * x + 10.0) * ((20.0 * x - 11.125) * C5).sin()) / 2.0 + 1.0
                }
            }

            Easing::EaseInBounce => 1.0 - ease_out_bounce(1.0 - x),
            Easing::EaseOutBounce => ease_out_bounce(x),
            Easing::EaseInOutBounce => {
                if x < 0.5 {
                    (1.0 - ease_out_bounce(1.0 - 2.0 * x)) / 2.0
                } else {
                    (1.0 + ease_out_bounce(2.0 * x - 1.0)) / 2.0
                }
            }
        }
    }

    /// The easings.net name of this function, e.g. `easeOutExpo`
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseInOutQuint => "easeInOutQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseInOutCirc => "easeInOutCirc",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseInOutBack => "easeInOutBack",
            Easing::EaseInElastic => "easeInElastic",
            Easing::EaseOutElastic => "easeOutElastic",
            Easing::EaseInOutElastic => "easeInOutElastic",
            Easing::EaseInBounce => "easeInBounce",
            Easing::EaseOutBounce => "easeOutBounce",
            Easing::EaseInOutBounce => "easeInOutBounce",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| AnimationError::UnknownEasing(s.to_string()))
    }
}

#[inline]
fn ease_in_pow(x: f64, n: i32) -> f64 {
    x.powi(n)
}

#[inline]
fn ease_out_pow(x: f64, n: i32) -> f64 {
    1.0 - (1.0 - x).powi(n)
}

/// `2^(n-1) * x^n` on the first half, mirrored on the second
#[inline]
fn ease_in_out_pow(x: f64, n: i32) -> f64 {
    if x < 0.5 {
        2f64.powi(n - 1) * x.powi(n)
    } else {
        1.0 - (-2.0 * x + 2.0).powi(n) / 2.0
    }
}

fn ease_out_bounce(x: f64) -> f64 {
    if x < 1.0 / D1 {
        N1 * x * x
    } else if x < 2.0 / D1 {
        let x = x - 1.5 / D1;
        N1 * x * x + 0.75
    } else if x < 2.5 / D1 {
        let x = x - 2.25 / D1;
        N1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / D1;
        N1 * x * x + 0.984375
    }
}
