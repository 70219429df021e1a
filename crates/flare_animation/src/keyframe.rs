//! Keyframe compilation
//!
//! Keyframes are declared relative to each other: "wait `delay`, then move to
//! `value` over `duration`". Before anything is evaluated they are compiled
//! into absolute, contiguous intervals on the variable's clock, so lookups
//! never need to reason about delays.

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::KeyframeError;

/// A single relative keyframe
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawKeyframe {
    /// Hold time (ms) before the transition starts
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_zero"))]
    pub delay: f64,
    /// Transition time in milliseconds
    pub duration: f64,
    /// Target value reached at the end of the transition
    pub value: f64,
    /// Easing used for the transition
    #[cfg_attr(feature = "serde", serde(default))]
    pub easing: Easing,
}

#[cfg(feature = "serde")]
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl RawKeyframe {
    /// Transition to `value` over `duration` ms without delay
    pub fn new(duration: f64, value: f64, easing: Easing) -> Self {
        Self {
            delay: 0.0,
            duration,
            value,
            easing,
        }
    }

    /// Builder: hold for `delay` ms before transitioning
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// An absolute time window with fixed endpoints
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompiledInterval {
    pub start_at: f64,
    pub end_at: f64,
    pub from: f64,
    pub to: f64,
    pub easing: Easing,
}

impl CompiledInterval {
    /// True for delay holds and other segments that never change value
    pub fn is_constant(&self) -> bool {
        self.from == self.to
    }

    /// Value of this interval at `timestamp`
    ///
    /// Constant segments skip easing entirely, and timestamps on or outside
    /// the bounds return the exact endpoint values.
    pub fn sample(&self, timestamp: f64) -> f64 {
        if self.is_constant() {
            return self.from;
        }

        // Zero-width: jump once the clock reaches the end
        if self.end_at <= self.start_at {
            return if timestamp >= self.end_at {
                self.to
            } else {
                self.from
            };
        }

        let progress = inv_lerp(self.start_at, self.end_at, timestamp);
        if progress <= 0.0 {
            self.from
        } else if progress >= 1.0 {
            self.to
        } else {
            lerp(self.from, self.to, self.easing.apply(progress))
        }
    }
}

/// Compiled intervals of one variable, most variables need very few
pub type Intervals = SmallVec<[CompiledInterval; 4]>;

/// Compile relative keyframes into contiguous absolute intervals
///
/// A positive delay becomes its own constant interval holding the previous
/// value. The first interval always starts at 0.
pub fn compile(
    initial_value: f64,
    keyframes: &[RawKeyframe],
) -> Result<Intervals, KeyframeError> {
    if keyframes.is_empty() {
        return Err(KeyframeError::Empty);
    }
    if !initial_value.is_finite() {
        return Err(KeyframeError::NonFiniteInitialValue(initial_value));
    }

    let mut intervals = Intervals::with_capacity(keyframes.len());
    let mut cursor = 0.0;
    let mut current = initial_value;

    for (index, keyframe) in keyframes.iter().enumerate() {
        validate(index, keyframe)?;

        if keyframe.delay > 0.0 {
            intervals.push(CompiledInterval {
                start_at: cursor,
                end_at: cursor + keyframe.delay,
                from: current,
                to: current,
                easing: keyframe.easing,
            });
            cursor += keyframe.delay;
        }

        intervals.push(CompiledInterval {
            start_at: cursor,
            end_at: cursor + keyframe.duration,
            from: current,
            to: keyframe.value,
            easing: keyframe.easing,
        });
        cursor += keyframe.duration;
        current = keyframe.value;
    }

    Ok(intervals)
}

fn validate(index: usize, keyframe: &RawKeyframe) -> Result<(), KeyframeError> {
    if !keyframe.delay.is_finite() || keyframe.delay < 0.0 {
        return Err(KeyframeError::InvalidDelay {
            index,
            delay: keyframe.delay,
        });
    }
    if !keyframe.duration.is_finite() || keyframe.duration < 0.0 {
        return Err(KeyframeError::InvalidDuration {
            index,
            duration: keyframe.duration,
        });
    }
    if !keyframe.value.is_finite() {
        return Err(KeyframeError::NonFiniteValue {
            index,
            value: keyframe.value,
        });
    }
    Ok(())
}

/// Linear interpolation: `(max - min) * t + min`
#[inline]
pub fn lerp(min: f64, max: f64, t: f64) -> f64 {
    (max - min) * t + min
}

/// Inverse of [`lerp`]: where `value` sits between `min` and `max`
#[inline]
pub fn inv_lerp(min: f64, max: f64, value: f64) -> f64 {
    (value - min) / (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start_at: f64, end_at: f64, from: f64, to: f64) -> CompiledInterval {
        CompiledInterval {
            start_at,
            end_at,
            from,
            to,
            easing: Easing::Linear,
        }
    }

    #[test]
    fn single_keyframe_compiles_to_one_interval() {
        let intervals = compile(0.0, &[RawKeyframe::new(100.0, 10.0, Easing::Linear)]).unwrap();
        assert_eq!(intervals.as_slice(), &[interval(0.0, 100.0, 0.0, 10.0)]);
    }

    #[test]
    fn delay_becomes_constant_interval() {
        let intervals = compile(
            0.0,
            &[RawKeyframe::new(100.0, 10.0, Easing::Linear).with_delay(50.0)],
        )
        .unwrap();
        assert_eq!(
            intervals.as_slice(),
            &[
                interval(0.0, 50.0, 0.0, 0.0),
                interval(50.0, 150.0, 0.0, 10.0)
            ]
        );
    }

    #[test]
    fn delay_hold_carries_upcoming_easing() {
        let intervals = compile(
            1.0,
            &[RawKeyframe::new(10.0, 2.0, Easing::EaseOutExpo).with_delay(5.0)],
        )
        .unwrap();
        assert_eq!(intervals[0].easing, Easing::EaseOutExpo);
        assert!(intervals[0].is_constant());
    }

    #[test]
    fn chained_keyframes_start_from_previous_value() {
        let intervals = compile(
            0.5,
            &[
                RawKeyframe::new(500.0, 1.8, Easing::EaseOutQuad),
                RawKeyframe::new(1500.0, 1.1, Easing::EaseInQuad),
            ],
        )
        .unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].from, 0.5);
        assert_eq!(intervals[1].from, 1.8);
        assert_eq!(intervals[1].start_at, 500.0);
        assert_eq!(intervals[1].end_at, 2000.0);
    }

    #[test]
    fn intervals_are_contiguous() {
        let intervals = compile(
            0.0,
            &[
                RawKeyframe::new(50.0, 1.0, Easing::Linear),
                RawKeyframe::new(0.0, 3.0, Easing::Linear).with_delay(20.0),
                RawKeyframe::new(40.0, 0.0, Easing::EaseInBack).with_delay(10.0),
            ],
        )
        .unwrap();
        assert_eq!(intervals[0].start_at, 0.0);
        for pair in intervals.windows(2) {
            assert_eq!(pair[0].end_at, pair[1].start_at);
            assert!(pair[0].start_at <= pair[0].end_at);
        }
        assert_eq!(intervals.last().unwrap().end_at, 120.0);
    }

    #[test]
    fn empty_keyframes_are_rejected() {
        assert_eq!(compile(0.0, &[]), Err(KeyframeError::Empty));
    }

    #[test]
    fn negative_timings_are_rejected() {
        assert_eq!(
            compile(
                0.0,
                &[
                    RawKeyframe::new(10.0, 1.0, Easing::Linear),
                    RawKeyframe::new(-1.0, 1.0, Easing::Linear)
                ]
            ),
            Err(KeyframeError::InvalidDuration {
                index: 1,
                duration: -1.0
            })
        );
        assert_eq!(
            compile(0.0, &[RawKeyframe::new(10.0, 1.0, Easing::Linear).with_delay(-5.0)]),
            Err(KeyframeError::InvalidDelay {
                index: 0,
                delay: -5.0
            })
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(matches!(
            compile(0.0, &[RawKeyframe::new(10.0, f64::NAN, Easing::Linear)]),
            Err(KeyframeError::NonFiniteValue { index: 0, .. })
        ));
        assert!(matches!(
            compile(f64::INFINITY, &[RawKeyframe::new(10.0, 1.0, Easing::Linear)]),
            Err(KeyframeError::NonFiniteInitialValue(_))
        ));
        assert!(matches!(
            compile(0.0, &[RawKeyframe::new(f64::NAN, 1.0, Easing::Linear)]),
            Err(KeyframeError::InvalidDuration { index: 0, .. })
        ));
    }

    #[test]
    fn sample_clamps_to_endpoints() {
        let iv = CompiledInterval {
            easing: Easing::EaseOutBack,
            ..interval(10.0, 20.0, 2.0, 4.0)
        };
        assert_eq!(iv.sample(0.0), 2.0);
        assert_eq!(iv.sample(10.0), 2.0);
        assert_eq!(iv.sample(20.0), 4.0);
        assert_eq!(iv.sample(25.0), 4.0);
    }

    #[test]
    fn zero_width_interval_jumps_at_its_end() {
        let iv = interval(30.0, 30.0, 1.0, 5.0);
        assert_eq!(iv.sample(29.9), 1.0);
        assert_eq!(iv.sample(30.0), 5.0);
        assert_eq!(iv.sample(31.0), 5.0);
    }

    #[test]
    fn lerp_and_inv_lerp_are_inverse() {
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
        assert_eq!(inv_lerp(2.0, 6.0, 3.0), 0.25);
    }
}
