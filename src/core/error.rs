use thiserror::Error;

/// A command batch that cannot be applied to the snapshot it targets.
///
/// Raised before any mutation; the source snapshot stays authoritative.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("tick carries {found} player actions but the game has {expected} players")]
    PlayerCountMismatch { expected: usize, found: usize },

    #[error("player {player} has {roster} vessels but its commands were authored against {authored}")]
    VesselCommandMismatch {
        player: usize,
        roster: usize,
        authored: usize,
    },

    #[error("player {player} submitted a turn of {found} ticks, expected {expected}")]
    TurnLengthMismatch {
        player: usize,
        expected: usize,
        found: usize,
    },
}

/// Failure while building the first snapshot of a match
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("match has no players")]
    NoPlayers,

    #[error("player {player} has no mothership in their deck")]
    EmptyDeck { player: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("ticks_per_turn must be at least 1")]
    NoTicksPerTurn,

    #[error("seconds_per_turn must be positive, got {0}")]
    NonPositiveTurnLength(f32),

    #[error("world must have positive finite dimensions, got {width}x{height}")]
    DegenerateWorld { width: f32, height: f32 },

    #[error("asteroid size range is inverted, negative or not finite ({min}..{max})")]
    InvalidAsteroidSizes { min: f32, max: f32 },
}

#[derive(Error, Debug)]
pub enum ArmadaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ArmadaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: ArmadaError = ValidationError::PlayerCountMismatch {
            expected: 2,
            found: 1,
        }
        .into();
        assert!(matches!(
            err,
            ArmadaError::Validation(ValidationError::PlayerCountMismatch { .. })
        ));
        assert!(err.to_string().contains("2 players"));
    }
}
