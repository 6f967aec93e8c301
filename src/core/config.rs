//! Engine configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the behavior engine
///
/// These values have been tuned against the reference skirmish scenarios.
/// Changing them shifts combat pacing and how quickly monsters react.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === TIME ===
    /// Seconds of simulation time that one tick represents
    ///
    /// Every monster thinks exactly once per tick. Timed tasks, memory
    /// expiry, and sound lifetimes are all measured against this clock.
    pub tick_seconds: f32,

    // === SENSING ===
    /// Default radius of the per-think entity scan (world units)
    pub sense_radius: f32,

    /// Sensing is skipped entirely when no player is within this distance
    ///
    /// This reproduces the classic "nobody is watching" optimization:
    /// a skipped monster keeps last tick's sensory conditions rather than
    /// recomputing them. Deliberate approximation, not a bug.
    pub sense_cull_distance: f32,

    /// How long an emitted sound stays audible (seconds)
    pub sound_lifetime: f32,

    // === DAMAGE ===
    /// Damage at or above this amount counts as a heavy hit
    pub heavy_damage_threshold: f32,

    /// How long after a hit the damage condition bits stay raised (seconds)
    ///
    /// The condition set is recomputed from scratch every think, so damage
    /// must be remembered as a timestamp and converted back into bits for
    /// as long as this window lasts.
    pub damage_condition_window: f32,

    /// Default seconds a monster ignores further light damage after flinching
    ///
    /// Per-monster behaviors may override this; it is what keeps combat
    /// animations from being aborted by every grazing hit.
    pub flinch_delay: f32,

    // === COMBAT RANGES ===
    /// Maximum distance for melee attacks (world units)
    pub melee_range: f32,

    /// Minimum distance for ranged attacks; closer than this, melee rules
    pub range_attack_min: f32,

    /// Maximum distance for ranged attacks
    pub range_attack_max: f32,

    /// Turn rate used when facing a target (degrees per second)
    pub yaw_speed_deg: f32,

    // === ENEMY TRACKING ===
    /// Maximum distance the last-known-position may drift per think
    ///
    /// While the enemy is out of sight the LKP is advanced by the
    /// monster's own recent velocity, clamped to this step. The
    /// prediction is intentionally crude; see `enemy::EnemyTracker`.
    pub lkp_extrapolation_max: f32,

    /// How long a monster stays suspicious after losing its reason to be
    pub alert_linger: f32,

    /// How long a failed route suppresses further chase attempts
    ///
    /// Without this a monster facing a blocked path would re-plan the
    /// same doomed route every time its filler schedule ends.
    pub route_retry_delay: f32,

    // === SQUADS ===
    /// Recruitment scan radius for `form_squad` (world units)
    pub squad_recruit_radius: f32,

    /// Maximum squad size including the leader
    pub max_squad_size: usize,

    /// Broadcast radius for `call_for_help`
    pub help_radius: f32,

    // === COVER ===
    /// How far a cover search will place the monster from its current spot
    pub cover_search_distance: f32,

    /// Number of candidate directions sampled per cover search
    pub cover_search_attempts: usize,

    // === SPATIAL ===
    /// Cell size of the spatial hash grid (world units)
    ///
    /// Should be a fraction of sense_radius so radius queries touch a
    /// bounded number of cells.
    pub grid_cell_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.1,

            sense_radius: 512.0,
            sense_cull_distance: 2048.0,
            sound_lifetime: 0.3,

            heavy_damage_threshold: 20.0,
            damage_condition_window: 0.5,
            flinch_delay: 1.5,

            melee_range: 64.0,
            range_attack_min: 64.0,
            range_attack_max: 784.0,
            yaw_speed_deg: 360.0,

            lkp_extrapolation_max: 32.0,
            alert_linger: 10.0,
            route_retry_delay: 2.0,

            squad_recruit_radius: 512.0,
            max_squad_size: 5,
            help_radius: 512.0,

            cover_search_distance: 192.0,
            cover_search_attempts: 8,

            grid_cell_size: 128.0,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> crate::core::error::Result<()> {
        use crate::core::error::MindError;

        if self.tick_seconds <= 0.0 {
            return Err(MindError::InvalidConfig(
                "tick_seconds must be positive".into(),
            ));
        }

        if self.range_attack_min >= self.range_attack_max {
            return Err(MindError::InvalidConfig(format!(
                "range_attack_min ({}) must be < range_attack_max ({})",
                self.range_attack_min, self.range_attack_max
            )));
        }

        if self.melee_range > self.range_attack_max {
            return Err(MindError::InvalidConfig(format!(
                "melee_range ({}) must be <= range_attack_max ({})",
                self.melee_range, self.range_attack_max
            )));
        }

        // Grid cells should be small relative to the scan radius so a
        // radius query touches a bounded neighborhood.
        if self.grid_cell_size > self.sense_radius {
            return Err(MindError::InvalidConfig(format!(
                "grid_cell_size ({}) must be <= sense_radius ({})",
                self.grid_cell_size, self.sense_radius
            )));
        }

        if self.max_squad_size < 2 {
            return Err(MindError::InvalidConfig(
                "max_squad_size must be at least 2".into(),
            ));
        }

        Ok(())
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> crate::core::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string
    ///
    /// Missing keys fall back to their defaults, so a tuning file only
    /// needs to name the values it changes.
    pub fn parse_toml(content: &str) -> crate::core::error::Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
