//! Timeline variables
//!
//! A variable is one numeric field driven by a timeline. Targets are never
//! owned: the caller hands in a setter closure that writes into whatever
//! object the value belongs to.

use std::fmt;

use crate::error::{AnimationError, Result};
use crate::keyframe::{compile, CompiledInterval, Intervals, RawKeyframe};

/// Writes an animated value onto its target
pub type Setter = Box<dyn FnMut(f64)>;

/// Plain-data description of a variable: name, start value and keyframes
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub name: String,
    pub initial_value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keyframes: Vec<RawKeyframe>,
}

impl Track {
    pub fn new(name: impl Into<String>, initial_value: f64) -> Self {
        Self {
            name: name.into(),
            initial_value,
            keyframes: Vec::new(),
        }
    }

    /// Builder: append a keyframe
    pub fn keyframe(mut self, keyframe: RawKeyframe) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    /// Attach a setter, producing a variable a timeline can drive
    pub fn bind<F>(self, setter: F) -> TimelineVariable
    where
        F: FnMut(f64) + 'static,
    {
        TimelineVariable {
            track: self,
            setter: Box::new(setter),
        }
    }

    /// Compile the keyframes without binding a target
    pub fn compile(&self) -> Result<Intervals> {
        compile(self.initial_value, &self.keyframes).map_err(|source| {
            AnimationError::InvalidVariable {
                name: self.name.clone(),
                source,
            }
        })
    }
}

/// A track bound to the field it animates
pub struct TimelineVariable {
    pub track: Track,
    pub setter: Setter,
}

impl TimelineVariable {
    pub fn new<F>(name: impl Into<String>, initial_value: f64, setter: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        Track::new(name, initial_value).bind(setter)
    }

    /// Builder: append a keyframe
    pub fn keyframe(mut self, keyframe: RawKeyframe) -> Self {
        self.track.keyframes.push(keyframe);
        self
    }

    pub fn name(&self) -> &str {
        &self.track.name
    }

    /// Compile into an immutable variable, failing fast on bad input
    pub fn compile(self) -> Result<CompiledVariable> {
        let intervals = self.track.compile()?;
        Ok(CompiledVariable {
            name: self.track.name,
            intervals,
            setter: self.setter,
        })
    }
}

impl fmt::Debug for TimelineVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineVariable")
            .field("track", &self.track)
            .finish_non_exhaustive()
    }
}

/// A variable with its keyframes resolved to absolute intervals
pub struct CompiledVariable {
    name: String,
    intervals: Intervals,
    setter: Setter,
}

impl CompiledVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled intervals, never empty
    pub fn intervals(&self) -> &[CompiledInterval] {
        &self.intervals
    }

    /// Time at which the last interval ends
    pub fn end_at(&self) -> f64 {
        self.intervals.last().map_or(0.0, |iv| iv.end_at)
    }

    /// Evaluate the variable at `timestamp`
    pub fn value_at(&self, timestamp: f64) -> f64 {
        self.interval_at(timestamp).sample(timestamp)
    }

    /// The interval responsible for `timestamp`
    ///
    /// Before the start this is the first interval, after the end the last.
    /// On a shared boundary the later interval wins; both give the same value
    /// unless the later one has zero width, in which case its value has just
    /// been reached.
    pub fn interval_at(&self, timestamp: f64) -> &CompiledInterval {
        let after = self
            .intervals
            .partition_point(|iv| iv.start_at <= timestamp);
        &self.intervals[after.saturating_sub(1)]
    }

    /// Evaluate at `timestamp` and write the result onto the target
    pub fn apply(&mut self, timestamp: f64) -> f64 {
        let value = self.value_at(timestamp);
        (self.setter)(value);
        value
    }

    /// True once `timestamp` has moved strictly past the last interval
    pub fn is_complete(&self, timestamp: f64) -> bool {
        self.end_at() < timestamp
    }
}

impl fmt::Debug for CompiledVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledVariable")
            .field("name", &self.name)
            .field("intervals", &self.intervals)
            .finish_non_exhaustive()
    }
}

/// Evaluate a compiled variable at an arbitrary timestamp
pub fn value_at(variable: &CompiledVariable, timestamp: f64) -> f64 {
    variable.value_at(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::error::KeyframeError;
    use std::cell::Cell;
    use std::rc::Rc;

    fn compiled(initial_value: f64, keyframes: &[RawKeyframe]) -> CompiledVariable {
        let mut track = Track::new("test.value", initial_value);
        track.keyframes.extend_from_slice(keyframes);
        track.bind(|_| {}).compile().unwrap()
    }

    #[test]
    fn boundaries_return_exact_endpoints() {
        let var = compiled(0.0, &[RawKeyframe::new(100.0, 10.0, Easing::EaseInOutExpo)]);
        assert_eq!(var.value_at(-50.0), 0.0);
        assert_eq!(var.value_at(0.0), 0.0);
        assert_eq!(var.value_at(100.0), 10.0);
        assert_eq!(var.value_at(5000.0), 10.0);
    }

    #[test]
    fn transition_start_after_delay_returns_from() {
        let var = compiled(
            0.0,
            &[RawKeyframe::new(100.0, 10.0, Easing::Linear).with_delay(50.0)],
        );
        assert_eq!(var.value_at(25.0), 0.0);
        assert_eq!(var.value_at(50.0), 0.0);
        assert_eq!(var.value_at(100.0), 5.0);
        assert_eq!(var.value_at(150.0), 10.0);
    }

    #[test]
    fn two_step_sequence_with_hold() {
        let var = compiled(
            0.0,
            &[
                RawKeyframe::new(50.0, 1.0, Easing::Linear),
                RawKeyframe::new(40.0, 0.0, Easing::Linear).with_delay(10.0),
            ],
        );
        assert_eq!(var.value_at(25.0), 0.5);
        assert_eq!(var.value_at(55.0), 1.0);
        assert_eq!(var.value_at(80.0), 0.5);
        assert_eq!(var.value_at(1000.0), 0.0);
    }

    #[test]
    fn zero_duration_keyframe_jumps() {
        let var = compiled(
            0.0,
            &[
                RawKeyframe::new(100.0, 1.0, Easing::Linear),
                RawKeyframe::new(0.0, 7.0, Easing::Linear),
                RawKeyframe::new(100.0, 9.0, Easing::Linear),
            ],
        );
        assert_eq!(var.value_at(99.0), 0.99);
        assert_eq!(var.value_at(100.0), 7.0);
        assert_eq!(var.value_at(150.0), 8.0);
    }

    #[test]
    fn lone_zero_duration_keyframe_holds_target() {
        let var = compiled(3.0, &[RawKeyframe::new(0.0, 4.0, Easing::EaseOutBounce)]);
        assert_eq!(var.value_at(-1.0), 3.0);
        assert_eq!(var.value_at(0.0), 4.0);
        assert_eq!(var.value_at(10.0), 4.0);
    }

    #[test]
    fn apply_writes_through_setter() {
        let cell = Rc::new(Cell::new(-1.0));
        let sink = cell.clone();
        let mut var = TimelineVariable::new("cell", 2.0, move |v| sink.set(v))
            .keyframe(RawKeyframe::new(10.0, 4.0, Easing::Linear))
            .compile()
            .unwrap();
        assert_eq!(var.apply(5.0), 3.0);
        assert_eq!(cell.get(), 3.0);
    }

    #[test]
    fn completion_is_strictly_after_end() {
        let var = compiled(0.0, &[RawKeyframe::new(100.0, 1.0, Easing::Linear)]);
        assert!(!var.is_complete(100.0));
        assert!(var.is_complete(100.5));
    }

    #[test]
    fn compile_error_names_the_variable() {
        let err = TimelineVariable::new("light.intensity", 0.0, |_| {})
            .compile()
            .unwrap_err();
        assert_eq!(
            err,
            AnimationError::InvalidVariable {
                name: "light.intensity".into(),
                source: KeyframeError::Empty,
            }
        );
    }
}
