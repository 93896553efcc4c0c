//! Game settings and preferences
//!
//! Presentation-side budgets and toggles. Nothing here feeds back into the
//! simulation contract; the effect store itself stays uncapped and callers
//! apply these budgets when emitting particles.

use serde::{Deserialize, Serialize};

/// Quality preset levels
///
/// `Low` is tuned for big classroom touch boards, which choke on heavy
/// particle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum free particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 300,
            QualityPreset::High => 600,
        }
    }

    /// Swirl pool size for this preset
    pub fn swirl_budget(&self) -> usize {
        match self {
            QualityPreset::Low => 15,
            QualityPreset::Medium => 30,
            QualityPreset::High => 50,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on explosions
    pub screen_shake: bool,
    /// Particle effects (explosions, sparks, swirl)
    pub particles: bool,

    // === HUD ===
    /// Show the active-object and effect counters
    pub show_debug: bool,

    // === Accessibility ===
    /// Reduced motion (minimize shake and convergence bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            show_debug: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle budget
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective swirl pool budget
    pub fn swirl_budget(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.swirl_budget()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_round_trip() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn particle_toggle_zeroes_budgets() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 600);
        assert_eq!(settings.swirl_budget(), 50);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.swirl_budget(), 0);
    }
}
