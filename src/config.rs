use std::fmt;

use thiserror::Error;

use crate::maze::Cell;

/// Animation pacing presets, in milliseconds per search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
}

impl SpeedPreset {
    pub fn step_ms(self) -> u64 {
        match self {
            SpeedPreset::Slow => 50,
            SpeedPreset::Normal => 20,
            SpeedPreset::Fast => 5,
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedPreset::Slow => write!(f, "Slow (50 ms/step)"),
            SpeedPreset::Normal => write!(f, "Normal (20 ms/step)"),
            SpeedPreset::Fast => write!(f, "Fast (5 ms/step)"),
        }
    }
}

/// Maze size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    Small,
    Big,
}

impl SizePreset {
    pub fn dims(self) -> (u16, u16) {
        match self {
            SizePreset::Small => (25, 25),
            SizePreset::Big => (55, 55),
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizePreset::Small => write!(f, "Small (25 x 25)"),
            SizePreset::Big => write!(f, "Big (55 x 55)"),
        }
    }
}

/// Rejected configuration input. Raised before any generation or search
/// state is touched, never mid-run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions {rows}x{cols} are too small; both sides must be at least 3")]
    DimensionsTooSmall { rows: u16, cols: u16 },
    #[error("cell {cell} lies outside the {rows}x{cols} grid")]
    EndpointOutOfBounds { cell: Cell, rows: u16, cols: u16 },
    #[error("step delay must be at least 1 ms")]
    ZeroStepDelay,
}

/// Validated inputs for one generate-and-solve session.
///
/// Odd dimensions give the best mazes (the carver works on a step-2
/// lattice), but even values are accepted; the generator forces the
/// endpoints open either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceConfig {
    rows: u16,
    cols: u16,
    start: Cell,
    end: Cell,
    step_ms: u64,
}

impl RaceConfig {
    /// Configuration with the default endpoints: top-left interior corner
    /// to bottom-right interior corner.
    pub fn new(rows: u16, cols: u16, step_ms: u64) -> Result<Self, ConfigError> {
        if rows < 3 || cols < 3 {
            return Err(ConfigError::DimensionsTooSmall { rows, cols });
        }
        Self::with_endpoints(
            rows,
            cols,
            Cell::new(1, 1),
            Cell::new(rows - 2, cols - 2),
            step_ms,
        )
    }

    pub fn with_endpoints(
        rows: u16,
        cols: u16,
        start: Cell,
        end: Cell,
        step_ms: u64,
    ) -> Result<Self, ConfigError> {
        if rows < 3 || cols < 3 {
            return Err(ConfigError::DimensionsTooSmall { rows, cols });
        }
        for cell in [start, end] {
            if cell.row >= rows || cell.col >= cols {
                return Err(ConfigError::EndpointOutOfBounds { cell, rows, cols });
            }
        }
        if step_ms == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }
        Ok(RaceConfig {
            rows,
            cols,
            start,
            end,
            step_ms,
        })
    }

    /// Same maze dimensions and endpoints at a different animation speed.
    pub fn with_step_ms(self, step_ms: u64) -> Result<Self, ConfigError> {
        Self::with_endpoints(self.rows, self.cols, self.start, self.end, step_ms)
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_are_interior_corners() {
        let config = RaceConfig::new(25, 31, 20).unwrap();
        assert_eq!(config.start(), Cell::new(1, 1));
        assert_eq!(config.end(), Cell::new(23, 29));
    }

    #[test]
    fn rejects_tiny_grids() {
        assert_eq!(
            RaceConfig::new(2, 25, 20),
            Err(ConfigError::DimensionsTooSmall { rows: 2, cols: 25 })
        );
        assert!(RaceConfig::new(3, 3, 20).is_ok());
    }

    #[test]
    fn rejects_out_of_bounds_endpoints() {
        let result = RaceConfig::with_endpoints(5, 5, Cell::new(1, 1), Cell::new(5, 3), 20);
        assert_eq!(
            result,
            Err(ConfigError::EndpointOutOfBounds {
                cell: Cell::new(5, 3),
                rows: 5,
                cols: 5,
            })
        );
    }

    #[test]
    fn rejects_zero_step_delay() {
        assert_eq!(RaceConfig::new(5, 5, 0), Err(ConfigError::ZeroStepDelay));
    }

    #[test]
    fn speed_presets_match_the_three_buttons() {
        assert_eq!(SpeedPreset::Slow.step_ms(), 50);
        assert_eq!(SpeedPreset::Normal.step_ms(), 20);
        assert_eq!(SpeedPreset::Fast.step_ms(), 5);
    }
}
