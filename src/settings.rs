//! Session settings
//!
//! Fixed for the lifetime of a session and handed to the engine at
//! construction. Persisted as JSON by hosts that want to keep them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::layout::Layout;
use crate::sim::placement::FullRowPolicy;

/// Full palette, trimmed by difficulty (RGB)
const BASE_PALETTE: [u32; 6] = [0xE8_4A_5F, 0x2A_9D_F4, 0x7B_C9_50, 0xF4_C4_30, 0x9B_5D_E5, 0xF2_84_2B];

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Number of distinct piece colors
    pub fn palette_size(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 4,
            Difficulty::Hard => 6,
        }
    }

    pub fn palette(&self) -> Vec<u32> {
        BASE_PALETTE[..self.palette_size()].to_vec()
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Board ===
    pub rows: usize,
    pub cols: usize,
    /// Edge length of a cell in field units
    pub cell_size: f32,

    // === Projectile ===
    /// Distance per tick
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Contact happens at `2 * radius - contact_slack`
    pub contact_slack: f32,

    // === Rules ===
    /// Aim change per tick (degrees)
    pub aim_step_deg: f32,
    pub min_cluster: usize,
    pub full_row_policy: FullRowPolicy,
    /// Piece colors (RGB), indexed by `Color`
    pub palette: Vec<u32>,

    // === Demo ===
    /// Ticks the autopilot aims before each shot
    pub demo_fire_interval: u32,

    /// Fixed session seed; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_size: CELL_SIZE,

            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: CELL_SIZE / 2.0,
            contact_slack: CONTACT_SLACK,

            aim_step_deg: AIM_STEP_DEG,
            min_cluster: MIN_CLUSTER,
            full_row_policy: FullRowPolicy::Overwrite,
            palette: Difficulty::Normal.palette(),

            demo_fire_interval: DEMO_FIRE_INTERVAL,

            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies its palette)
    pub fn from_preset(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(difficulty);
        settings
    }

    pub fn apply_preset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.palette = difficulty.palette();
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.rows, self.cols, self.cell_size)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 1 {
            return Err(Error::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.palette.is_empty() || self.palette.len() > u8::MAX as usize {
            return Err(Error::InvalidPalette(self.palette.len()));
        }
        if !positive(self.cell_size) {
            return Err(invalid("cell_size", "must be positive"));
        }
        if !positive(self.projectile_radius) || self.projectile_radius > self.cell_size {
            return Err(invalid("projectile_radius", "must be in (0, cell_size]"));
        }
        // A single step must stay shorter than the contact distance
        let reach = 2.0 * self.projectile_radius - self.contact_slack;
        if !(self.contact_slack.is_finite() && self.contact_slack >= 0.0) || reach <= 0.0 {
            return Err(invalid("contact_slack", "must be in [0, 2 * radius)"));
        }
        if !positive(self.projectile_speed) || self.projectile_speed >= reach {
            return Err(invalid(
                "projectile_speed",
                "must be positive and below the contact distance",
            ));
        }
        if !positive(self.aim_step_deg) {
            return Err(invalid("aim_step_deg", "must be positive"));
        }
        if self.min_cluster < 2 {
            return Err(invalid("min_cluster", "must be at least 2"));
        }
        if self.demo_fire_interval == 0 {
            return Err(invalid("demo_fire_interval", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate; without an explicit `palette` the difficulty picks one
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let explicit_palette = value.get("palette").is_some();
        let mut settings: Self = serde_json::from_value(value)?;
        if !explicit_palette {
            settings.apply_preset(settings.difficulty);
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[inline]
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(name: &'static str, reason: &str) -> Error {
    Error::InvalidSetting {
        name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.rows, 8);
        assert_eq!(settings.cols, 10);
        assert_eq!(settings.palette.len(), 4);
    }

    #[test]
    fn test_presets_change_palette() {
        assert_eq!(Settings::from_preset(Difficulty::Easy).palette.len(), 3);
        assert_eq!(Settings::from_preset(Difficulty::Hard).palette.len(), 6);
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("impossible"), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = Settings {
            rows: 1,
            ..Settings::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidDimensions { .. })));

        let bad = Settings {
            palette: Vec::new(),
            ..Settings::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidPalette(0))));

        let bad = Settings {
            projectile_speed: 40.0,
            ..Settings::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidSetting {
                name: "projectile_speed",
                ..
            })
        ));

        let bad = Settings {
            contact_slack: f32::NAN,
            ..Settings::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{ "cols": 12, "full_row_policy": "game-over-on-full" }"#)
                .expect("parse");
        assert_eq!(settings.cols, 12);
        assert_eq!(settings.rows, 8);
        assert_eq!(settings.full_row_policy, FullRowPolicy::GameOverOnFull);
    }

    #[test]
    fn test_json_difficulty_drives_palette() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let json = format!(r#"{{ "difficulty": "{}" }}"#, difficulty.as_str());
            let settings = Settings::from_json(&json).expect("parse");
            assert_eq!(settings.difficulty, difficulty);
            assert_eq!(settings.palette, difficulty.palette());

            let preset = Settings::from_preset(difficulty);
            let restored = Settings::from_json(&preset.to_json().expect("json")).expect("parse");
            assert_eq!(restored, preset);
        }
    }

    #[test]
    fn test_json_explicit_palette_wins() {
        let settings =
            Settings::from_json(r#"{ "difficulty": "Hard", "palette": [1, 2] }"#).expect("parse");
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.palette, vec![1, 2]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(Error::Json(_))));
        assert!(matches!(
            Settings::from_json(r#"{ "min_cluster": 1 }"#),
            Err(Error::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "cluster_shot_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            seed: Some(1234),
            ..Settings::from_preset(Difficulty::Easy)
        };
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
