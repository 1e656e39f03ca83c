//! Renderer configuration (spec §6.4)
//!
//! Plain config structs for the ray-caster's tunables, in the teacher's
//! `RenderSettings` style (`renderer/settings.rs`) rather than a builder or
//! a CLI — the spec explicitly leaves the CLI unfixed (spec §1).

/// Stereo/autostereo viewpoint mode (spec §4.K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoMode {
    None,
    Stereo,
    Autostereo5,
    Autostereo8,
}

impl StereoMode {
    #[must_use]
    pub fn view_count(self) -> u32 {
        match self {
            Self::None => 1,
            Self::Stereo => 2,
            Self::Autostereo5 => 5,
            Self::Autostereo8 => 8,
        }
    }

    /// `(widthFactor, heightFactor)` relative to the viewport (spec §4.K table).
    #[must_use]
    pub fn viewport_factors(self) -> (f32, f32) {
        match self {
            Self::None => (1.0, 1.0),
            Self::Stereo => (1.0, 0.5),
            Self::Autostereo5 => (0.6, 0.5),
            Self::Autostereo8 => (0.375, 0.5),
        }
    }
}

/// Ambient-occlusion tunables (spec §6.4 `ao`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientOcclusionOptions {
    pub enabled: bool,
    pub factor: f32,
}

impl Default for AmbientOcclusionOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            factor: 1.0,
        }
    }
}

/// Colour-bleeding tunables (spec §6.4 `colour_bleeding`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourBleedingOptions {
    pub enabled: bool,
    pub strength: (f32, f32, f32),
}

impl Default for ColourBleedingOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: (1.0, 1.0, 1.0),
        }
    }
}

/// SAT / illumination pre-compute parameters (spec §4.G, §6.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatOptions {
    pub size_ratio: f32,
    pub shells: u32,
    pub radius: u32,
    pub angle: f32,
    pub samples: u32,
}

impl Default for SatOptions {
    fn default() -> Self {
        Self {
            size_ratio: 0.25,
            shells: 4,
            radius: 2,
            angle: 0.3,
            samples: 8,
        }
    }
}

/// The full set of renderer options (spec §6.4).
///
/// Mutating a field that affects shader compilation (AO, colour bleeding,
/// soft shadows, pre-integration, stereo mode) should go through
/// [`super::raycaster::RayCaster`] setters, which recompile the material
/// only when the resulting option-define string actually changes (spec
/// §4.L step 4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererOptions {
    pub samples: u32,
    pub preintegration: bool,
    pub ao: AmbientOcclusionOptions,
    pub colour_bleeding: ColourBleedingOptions,
    pub soft_shadows: bool,
    pub sat: SatOptions,
    pub opacity_correction: u32,
    pub stereo_mode: StereoMode,
    pub focal_length: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            samples: 512,
            preintegration: false,
            ao: AmbientOcclusionOptions::default(),
            colour_bleeding: ColourBleedingOptions::default(),
            soft_shadows: false,
            sat: SatOptions::default(),
            opacity_correction: 200,
            stereo_mode: StereoMode::None,
            focal_length: 0.0,
        }
    }
}

impl RendererOptions {
    /// Whether the SAT/illumination pre-compute pass is needed at all
    /// (spec §4.L step 1: AO or colour-bleeding or soft shadows).
    #[must_use]
    pub fn needs_illumination(&self) -> bool {
        self.ao.enabled || self.colour_bleeding.enabled || self.soft_shadows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_mode_matches_spec_table() {
        assert_eq!(StereoMode::None.viewport_factors(), (1.0, 1.0));
        assert_eq!(StereoMode::Stereo.viewport_factors(), (1.0, 0.5));
        assert_eq!(StereoMode::Autostereo5.viewport_factors(), (0.6, 0.5));
        assert_eq!(StereoMode::Autostereo8.viewport_factors(), (0.375, 0.5));
        assert_eq!(StereoMode::Autostereo5.view_count(), 5);
    }

    #[test]
    fn needs_illumination_is_any_of_three_flags() {
        let mut opts = RendererOptions::default();
        assert!(!opts.needs_illumination());
        opts.soft_shadows = true;
        assert!(opts.needs_illumination());
    }
}
