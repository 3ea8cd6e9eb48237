//! # Region Simulator
//!
//! Tracks every region the observer has entered.
//!
//! ## Pressure Dynamics
//!
//! Per update of length `dt`:
//! - occupied region: `pressure += build_rate * dt` (capped at 1), visit clock reset
//! - every other region: visit clock advances; once it exceeds `decay_delay`,
//!   `pressure -= decay_rate * dt` (floored at 0)
//!
//! The state of every region is then recomputed from its pressure. The same
//! thresholds apply going up and coming down.

use std::collections::HashMap;

use myth_shared::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::RegionState;
use crate::visuals::RegionVisuals;

/// Region coordinate (identifies a region in the coarse grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionCoord {
    /// X coordinate (in regions).
    pub x: i32,
    /// Z coordinate (in regions).
    pub z: i32,
}

impl RegionCoord {
    /// Creates a new region coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Tunables of the pressure field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionConfig {
    /// Region edge length in world units.
    pub region_size: f32,
    /// Pressure gained per second while occupied.
    pub build_rate: f32,
    /// Pressure lost per second once decay starts.
    pub decay_rate: f32,
    /// Seconds of absence before decay starts.
    pub decay_delay: f32,
    /// Pressure at which a region becomes Awakening.
    pub awakening_threshold: f32,
    /// Pressure at which a region becomes Fractured.
    pub fractured_threshold: f32,
    /// Pressure at which a region becomes Mythic.
    pub mythic_threshold: f32,
    /// How far toward the next state's palette visuals may drift (0..1).
    pub visual_blend: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            region_size: 20.0,
            build_rate: 0.1,
            decay_rate: 0.02,
            decay_delay: 10.0,
            awakening_threshold: 0.3,
            fractured_threshold: 0.6,
            mythic_threshold: 0.9,
            visual_blend: 0.5,
        }
    }
}

/// Per-region simulation state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionData {
    /// State derived from `pressure`.
    pub state: RegionState,
    /// Narrative pressure in `[0, 1]`.
    pub pressure: f32,
    /// Seconds since the observer last stood here.
    pub time_since_visit: f32,
    /// Seconds spent in the current state.
    pub state_timer: f32,
}

/// A region crossed a threshold during an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange {
    /// Region that changed.
    pub coord: RegionCoord,
    /// State before the update.
    pub from: RegionState,
    /// State after the update.
    pub to: RegionState,
}

/// Pressure field over every visited region.
#[derive(Debug)]
pub struct RegionSimulator {
    config: RegionConfig,
    regions: HashMap<RegionCoord, RegionData>,
    current: RegionCoord,
    fallback: RegionData,
}

impl Default for RegionSimulator {
    fn default() -> Self {
        Self::new(RegionConfig::default())
    }
}

impl RegionSimulator {
    /// Creates a simulator with no tracked regions.
    ///
    /// # Panics
    ///
    /// Panics if `region_size` is not a positive finite number, or if
    /// either rate is negative or non-finite.
    #[must_use]
    pub fn new(config: RegionConfig) -> Self {
        assert!(
            config.region_size.is_finite() && config.region_size > 0.0,
            "region size must be positive"
        );
        assert!(
            config.build_rate.is_finite() && config.build_rate >= 0.0,
            "build rate must be non-negative"
        );
        assert!(
            config.decay_rate.is_finite() && config.decay_rate >= 0.0,
            "decay rate must be non-negative"
        );
        Self {
            config,
            regions: HashMap::new(),
            current: RegionCoord::default(),
            fallback: RegionData::default(),
        }
    }

    /// Simulation parameters.
    #[must_use]
    pub const fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Region containing `position`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn region_coord(&self, position: Vec3) -> RegionCoord {
        RegionCoord {
            x: (position.x / self.config.region_size).floor() as i32,
            z: (position.z / self.config.region_size).floor() as i32,
        }
    }

    /// State for a pressure value.
    #[must_use]
    pub fn state_for_pressure(&self, pressure: f32) -> RegionState {
        state_for(&self.config, pressure)
    }

    /// Advances every tracked region by `dt` with the observer at `position`.
    ///
    /// Returns the occupied region's transition, if it crossed a threshold.
    pub fn update(&mut self, position: Vec3, dt: f32) -> Option<StateChange> {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "Ignoring invalid region time step");
            0.0
        };

        let occupied = self.region_coord(position);
        if !self.regions.contains_key(&occupied) {
            debug!(region = %occupied, "Tracking new region");
            self.regions.insert(occupied, RegionData::default());
        }
        self.current = occupied;

        let config = self.config;
        let mut occupied_change = None;

        for (&coord, data) in &mut self.regions {
            if coord == occupied {
                data.pressure = (data.pressure + config.build_rate * dt).clamp(0.0, 1.0);
                data.time_since_visit = 0.0;
            } else {
                data.time_since_visit += dt;
                if data.time_since_visit > config.decay_delay {
                    data.pressure = (data.pressure - config.decay_rate * dt).clamp(0.0, 1.0);
                }
            }

            let state = state_for(&config, data.pressure);
            if state == data.state {
                data.state_timer += dt;
                continue;
            }

            let change = StateChange {
                coord,
                from: data.state,
                to: state,
            };
            data.state = state;
            data.state_timer = 0.0;

            debug!(region = %coord, from = %change.from, to = %change.to, "Region state changed");
            if coord == occupied {
                occupied_change = Some(change);
            }
        }

        occupied_change
    }

    /// Visuals of the occupied region, part-way toward the next state's palette.
    ///
    /// Not smoothed over time; presentation layers ease toward this target.
    #[must_use]
    pub fn current_visuals(&self) -> RegionVisuals {
        let data = self.current_region_data();
        let here = RegionVisuals::for_state(data.state);
        let next = RegionVisuals::for_state(data.state.next());
        here.lerp(&next, self.state_progress(data) * self.config.visual_blend)
    }

    /// Where `data.pressure` sits within its state's band, in `[0, 1]`.
    #[must_use]
    pub fn state_progress(&self, data: &RegionData) -> f32 {
        let c = &self.config;
        let (low, high) = match data.state {
            RegionState::Stable => (0.0, c.awakening_threshold),
            RegionState::Awakening => (c.awakening_threshold, c.fractured_threshold),
            RegionState::Fractured => (c.fractured_threshold, c.mythic_threshold),
            RegionState::Mythic => return 1.0,
        };
        if high <= low {
            return 1.0;
        }
        ((data.pressure - low) / (high - low)).clamp(0.0, 1.0)
    }

    /// Tracked region at `coord`.
    #[must_use]
    pub fn region(&self, coord: RegionCoord) -> Option<&RegionData> {
        self.regions.get(&coord)
    }

    /// Region the observer occupied at the last update.
    #[must_use]
    pub const fn current_region(&self) -> RegionCoord {
        self.current
    }

    /// Data of the current region (a fresh Stable region if untracked).
    #[must_use]
    pub fn current_region_data(&self) -> &RegionData {
        self.regions.get(&self.current).unwrap_or(&self.fallback)
    }

    /// Number of regions ever entered (or restored).
    #[must_use]
    pub fn tracked_region_count(&self) -> usize {
        self.regions.len()
    }

    /// Every tracked region in ascending `(z, x)` order.
    #[must_use]
    pub fn regions(&self) -> Vec<(RegionCoord, RegionData)> {
        let mut out: Vec<_> = self.regions.iter().map(|(c, d)| (*c, *d)).collect();
        out.sort_unstable_by_key(|(c, _)| (c.z, c.x));
        out
    }

    /// Sets a region's pressure directly (save restore).
    ///
    /// Pressure is clamped to `[0, 1]`; the state is derived from it. The
    /// region's clocks restart.
    pub fn restore_region(&mut self, coord: RegionCoord, pressure: f32) -> RegionState {
        let clamped = if pressure.is_nan() { 0.0 } else { pressure.clamp(0.0, 1.0) };
        if (clamped - pressure).abs() > f32::EPSILON || pressure.is_nan() {
            warn!(region = %coord, pressure, clamped, "Restored pressure out of range");
        }

        let state = self.state_for_pressure(clamped);
        self.regions.insert(
            coord,
            RegionData {
                state,
                pressure: clamped,
                time_since_visit: 0.0,
                state_timer: 0.0,
            },
        );
        state
    }

    /// Moves the current-region marker without simulating (after a teleport or load).
    pub fn set_current_region(&mut self, coord: RegionCoord) {
        self.current = coord;
    }

    /// Forgets every region.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.current = RegionCoord::default();
    }
}

fn state_for(config: &RegionConfig, pressure: f32) -> RegionState {
    if pressure >= config.mythic_threshold {
        RegionState::Mythic
    } else if pressure >= config.fractured_threshold {
        RegionState::Fractured
    } else if pressure >= config.awakening_threshold {
        RegionState::Awakening
    } else {
        RegionState::Stable
    }
}
