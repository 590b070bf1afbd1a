//! Tunable simulation parameters. Every section falls back to its defaults when omitted.

use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_ITERATION_CAP;
pub use crate::vision::VisionConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub level: LevelConfig,
    pub vision: VisionConfig,
    pub noise: NoiseConfig,
    pub timing: TimingConfig,
    pub combat: CombatConfig,
    pub explore: ExploreConfig,
    pub search: SearchConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    pub room_attempts: u32,
    pub max_rooms: usize,
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub monsters: usize,
    pub foliage_patches: usize,
    pub foliage_radius: i32,
    pub trees: usize,
    pub barrels: usize,
    pub lit_rooms: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 24,
            room_attempts: 120,
            max_rooms: 9,
            min_room_size: 4,
            max_room_size: 9,
            monsters: 5,
            foliage_patches: 3,
            foliage_radius: 3,
            trees: 4,
            barrels: 3,
            lit_rooms: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Flood ceiling for noises the player can hear.
    pub hearing_radius: i32,
    pub door_noise: i32,
    pub combat_noise: i32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { hearing_radius: 12, door_noise: 8, combat_noise: 10 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub normal_delay: u32,
    pub fog_duration: u32,
    pub night_duration: u32,
    pub fire_delay: u32,
    pub smoke_duration: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            normal_delay: 10,
            fog_duration: 60,
            night_duration: 100,
            fire_delay: 10,
            smoke_duration: 20,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_hp: i32,
    pub player_damage: i32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self { player_hp: 12, player_damage: 2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    pub rest_turns: u32,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self { rest_turns: 20 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub iteration_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { iteration_cap: DEFAULT_ITERATION_CAP }
    }
}
