//! Presentation parameters per region state.

use myth_shared::Vec3;
use serde::{Deserialize, Serialize};

use crate::state::RegionState;

/// Fog, sky and color grading inputs for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionVisuals {
    /// Fog color (linear RGB).
    pub fog_color: Vec3,
    /// Clear/sky color (linear RGB).
    pub sky_color: Vec3,
    /// Exponential fog density.
    pub fog_density: f32,
    /// Scene color multiplier.
    pub color_intensity: f32,
}

impl Default for RegionVisuals {
    fn default() -> Self {
        Self::for_state(RegionState::Stable)
    }
}

impl RegionVisuals {
    /// Fixed palette of `state`.
    #[must_use]
    pub const fn for_state(state: RegionState) -> Self {
        match state {
            RegionState::Stable => Self {
                fog_color: Vec3::new(0.05, 0.05, 0.08),
                sky_color: Vec3::new(0.02, 0.02, 0.05),
                fog_density: 0.02,
                color_intensity: 1.0,
            },
            RegionState::Awakening => Self {
                fog_color: Vec3::new(0.08, 0.05, 0.12),
                sky_color: Vec3::new(0.04, 0.02, 0.08),
                fog_density: 0.025,
                color_intensity: 1.1,
            },
            RegionState::Fractured => Self {
                fog_color: Vec3::new(0.12, 0.04, 0.15),
                sky_color: Vec3::new(0.06, 0.02, 0.10),
                fog_density: 0.03,
                color_intensity: 1.25,
            },
            RegionState::Mythic => Self {
                fog_color: Vec3::new(0.15, 0.05, 0.20),
                sky_color: Vec3::new(0.08, 0.03, 0.15),
                fog_density: 0.04,
                color_intensity: 1.5,
            },
        }
    }

    /// Component-wise linear blend: `self` at `t = 0`, `other` at `t = 1`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            fog_color: self.fog_color.lerp(other.fog_color, t),
            sky_color: self.sky_color.lerp(other.sky_color, t),
            fog_density: self.fog_density + (other.fog_density - self.fog_density) * t,
            color_intensity: self.color_intensity
                + (other.color_intensity - self.color_intensity) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = RegionVisuals::for_state(RegionState::Stable);
        let b = RegionVisuals::for_state(RegionState::Mythic);
        assert_eq!(a.lerp(&b, 0.0), a);
        let end = a.lerp(&b, 1.0);
        assert!((end.fog_density - b.fog_density).abs() < 1e-6);
        assert!((end.color_intensity - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_intensity_rises_with_state() {
        let mut last = 0.0;
        for state in RegionState::ALL {
            let v = RegionVisuals::for_state(state);
            assert!(v.color_intensity > last);
            last = v.color_intensity;
        }
    }
}
