use thiserror::Error;

use crate::game::constants::{arena, heat};
use crate::game::state::ArenaBounds;
use crate::util::vec2::Vec2;

/// Arena configuration for the AI subsystem
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Half extent of the square arena (world units)
    pub half_extent: f32,
    /// Safety margin kept between navigation targets and the walls
    pub margin: f32,
    /// Heat map cells per axis
    pub heat_resolution: usize,
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena half extent must be positive, got {0}")]
    NonPositiveExtent(f32),
    #[error("margin {margin} must be smaller than the half extent {half_extent}")]
    MarginTooLarge { margin: f32, half_extent: f32 },
    #[error("heat resolution must be at least 2, got {0}")]
    HeatResolutionTooSmall(usize),
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: arena::HALF_EXTENT,
            margin: arena::MARGIN,
            heat_resolution: heat::RESOLUTION,
        }
    }
}

impl ArenaConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(extent) = std::env::var("ARENA_HALF_EXTENT") {
            if let Ok(parsed) = extent.parse::<f32>() {
                if parsed > 0.0 {
                    config.half_extent = parsed;
                } else {
                    tracing::warn!("ARENA_HALF_EXTENT must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid ARENA_HALF_EXTENT '{}', using default", extent);
            }
        }

        if let Ok(margin) = std::env::var("ARENA_MARGIN") {
            if let Ok(parsed) = margin.parse::<f32>() {
                if parsed >= 0.0 {
                    config.margin = parsed;
                } else {
                    tracing::warn!("ARENA_MARGIN must be >= 0, using default");
                }
            } else {
                tracing::warn!("Invalid ARENA_MARGIN '{}', using default", margin);
            }
        }

        if let Ok(resolution) = std::env::var("AI_HEAT_RESOLUTION") {
            if let Ok(parsed) = resolution.parse::<usize>() {
                if parsed >= 2 {
                    config.heat_resolution = parsed;
                } else {
                    tracing::warn!("AI_HEAT_RESOLUTION must be >= 2, using default");
                }
            } else {
                tracing::warn!("Invalid AI_HEAT_RESOLUTION '{}', using default", resolution);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_extent <= 0.0 {
            return Err(ConfigError::NonPositiveExtent(self.half_extent));
        }
        if self.margin >= self.half_extent {
            return Err(ConfigError::MarginTooLarge {
                margin: self.margin,
                half_extent: self.half_extent,
            });
        }
        if self.heat_resolution < 2 {
            return Err(ConfigError::HeatResolutionTooSmall(self.heat_resolution));
        }
        Ok(())
    }

    /// Arena bounds described by this configuration
    pub fn bounds(&self) -> ArenaBounds {
        ArenaBounds::new(
            Vec2::new(-self.half_extent, -self.half_extent),
            Vec2::new(self.half_extent, self.half_extent),
            self.margin,
        )
    }
}
