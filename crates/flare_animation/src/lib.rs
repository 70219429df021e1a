//! Flare Animation Engine
//!
//! Keyframe compilation, easing, and seekable timelines for driving numeric
//! properties (light intensities, shader uniforms, mesh scales) frame by frame.
//!
//! # Features
//!
//! - **Easing**: the full easings.net catalog
//! - **Keyframes**: delay/duration keyframes compiled to absolute intervals
//! - **Timelines**: play, pause and seek with completion notification
//! - **Headless**: frame scheduling and clocks are injected by the host
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use flare_animation::{
//!     Easing, ManualClock, ManualScheduler, RawKeyframe, Timeline, TimelineVariable,
//! };
//!
//! let intensity = Rc::new(Cell::new(0.0));
//! let target = intensity.clone();
//! let light = TimelineVariable::new("light.intensity", 0.0, move |v| target.set(v))
//!     .keyframe(RawKeyframe::new(50.0, 4.0, Easing::EaseInExpo))
//!     .keyframe(RawKeyframe::new(500.0, 0.0, Easing::EaseOutQuad));
//!
//! let mut timeline = Timeline::new(vec![light], ManualScheduler::new(), ManualClock::new())?;
//! timeline.seek(50.0);
//! assert_eq!(intensity.get(), 4.0);
//! # Ok::<(), flare_animation::AnimationError>(())
//! ```

pub mod easing;
pub mod error;
pub mod events;
pub mod keyframe;
pub mod presets;
pub mod scheduler;
pub mod timeline;
pub mod variable;

pub use easing::Easing;
pub use error::{AnimationError, KeyframeError, Result};
pub use events::{ListenerId, TimelineEvent};
pub use keyframe::{compile, inv_lerp, lerp, CompiledInterval, RawKeyframe};
pub use presets::AnimationPreset;
pub use scheduler::{
    Clock, FrameScheduler, FrameToken, ManualClock, ManualScheduler, SystemClock,
};
pub use timeline::Timeline;
pub use variable::{value_at, CompiledVariable, Setter, TimelineVariable, Track};
