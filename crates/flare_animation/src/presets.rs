//! Animation presets
//!
//! Ready-made track sets. Presets are plain data: bind each track to the
//! field it should drive before building a timeline.

use crate::easing::Easing;
use crate::keyframe::RawKeyframe;
use crate::variable::Track;

/// Pre-built track sets for common sequences
pub struct AnimationPreset;

impl AnimationPreset {
    /// Explosion burst: a light flash, an expanding fire/smoke plume and a
    /// shower of sparkles that rise and fade
    ///
    /// Track names follow `object.property`, e.g. `light.intensity`.
    pub fn explosion() -> Vec<Track> {
        vec![
            // Flash
            Track::new("light.intensity", 0.0)
                .keyframe(RawKeyframe::new(50.0, 4.0, Easing::EaseInExpo))
                .keyframe(RawKeyframe::new(500.0, 0.0, Easing::EaseOutQuad)),
            // Fire and smoke
            Track::new("fire_smoke.circle_limit", 1.0)
                .keyframe(RawKeyframe::new(10.0, 0.7, Easing::EaseOutExpo)),
            Track::new("fire_smoke.smoke_scale", 0.1)
                .keyframe(RawKeyframe::new(1000.0, 2.5, Easing::EaseOutExpo)),
            Track::new("fire_smoke.circle_smoothness", 0.15).keyframe(
                RawKeyframe::new(2000.0, 0.85, Easing::EaseOutExpo).with_delay(50.0),
            ),
            Track::new("fire_smoke.height", 0.0)
                .keyframe(RawKeyframe::new(500.0, 0.8, Easing::EaseOutQuad))
                .keyframe(RawKeyframe::new(4000.0, 2.0, Easing::EaseInQuad)),
            Track::new("fire_smoke.scale_y", 1.0).keyframe(
                RawKeyframe::new(10000.0, 1.6, Easing::EaseOutQuad).with_delay(100.0),
            ),
            Track::new("fire_smoke.transparency", 0.15)
                .keyframe(RawKeyframe::new(5000.0, 0.3, Easing::Linear).with_delay(5000.0)),
            Track::new("fire_smoke.transparency_smoothness", 0.1).keyframe(
                RawKeyframe::new(20000.0, 2.0, Easing::EaseOutQuad).with_delay(500.0),
            ),
            // Sparkles
            Track::new("sparkles.scale", 0.0)
                .keyframe(RawKeyframe::new(50.0, 1.0, Easing::Linear))
                .keyframe(RawKeyframe::new(1500.0, 0.0, Easing::Linear).with_delay(500.0)),
            Track::new("sparkles.height", 0.0)
                .keyframe(RawKeyframe::new(500.0, 1.8, Easing::EaseOutQuad))
                .keyframe(RawKeyframe::new(1500.0, 1.1, Easing::EaseInQuad)),
            Track::new("sparkles.radius", 0.5)
                .keyframe(RawKeyframe::new(1500.0, 2.0, Easing::EaseOutExpo)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_tracks_compile() {
        for track in AnimationPreset::explosion() {
            let intervals = track.compile().unwrap();
            assert!(!intervals.is_empty(), "{} has no intervals", track.name);
        }
    }

    #[test]
    fn explosion_track_names_are_unique() {
        let mut names: Vec<String> = AnimationPreset::explosion()
            .into_iter()
            .map(|t| t.name)
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn explosion_ends_with_transparency_smoothness() {
        let longest = AnimationPreset::explosion()
            .iter()
            .map(|t| (t.name.clone(), t.compile().unwrap().last().unwrap().end_at))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(longest.0, "fire_smoke.transparency_smoothness");
        assert_eq!(longest.1, 20500.0);
    }
}
