//! Residual evaluation parameters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Partition;

/// Fluid constants and global extents used by every evaluation.
///
/// # Example
///
/// ```
/// use richards_fv::residual::ResidualConfig;
///
/// let config = ResidualConfig::default()
///     .with_gravity(9.81)
///     .with_viscosity(1e-3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualConfig {
    /// Gravitational acceleration
    pub gravity: f64,
    /// Dynamic viscosity of the fluid
    pub viscosity: f64,
    /// Global surface extents `[NX, NY]`; taken from the partition if unset
    pub global_extent: Option<[usize; 2]>,
}

impl Default for ResidualConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            viscosity: 1.0,
            global_extent: None,
        }
    }
}

impl ResidualConfig {
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_viscosity(mut self, viscosity: f64) -> Self {
        self.viscosity = viscosity;
        self
    }

    /// Override the global `[NX, NY]` used for overland edge bookkeeping.
    pub fn with_global_extent(mut self, extent: [usize; 2]) -> Self {
        self.global_extent = Some(extent);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viscosity > 0.0 && self.viscosity.is_finite()) {
            return Err(ConfigError::NonPositiveViscosity(self.viscosity));
        }
        if !(self.gravity >= 0.0 && self.gravity.is_finite()) {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        Ok(())
    }

    /// Validate against a partition: the configured extents, if any, must
    /// match the partition's global box.
    pub fn validate_for(&self, partition: &Partition) -> Result<(), ConfigError> {
        self.validate()?;
        let [nx, ny, _] = partition.global_extent();
        match self.global_extent {
            Some(configured) if configured != [nx, ny] => Err(ConfigError::ExtentMismatch {
                configured,
                partition: [nx, ny],
            }),
            _ => Ok(()),
        }
    }

    /// Global `[NX, NY]` for a partition.
    pub fn global_columns(&self, partition: &Partition) -> [usize; 2] {
        self.global_extent.unwrap_or_else(|| {
            let [nx, ny, _] = partition.global_extent();
            [nx, ny]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert_eq!(
            ResidualConfig::default().with_viscosity(0.0).validate(),
            Err(ConfigError::NonPositiveViscosity(0.0))
        );
        assert!(matches!(
            ResidualConfig::default().with_gravity(f64::NAN).validate(),
            Err(ConfigError::InvalidGravity(_))
        ));
    }

    #[test]
    fn test_global_columns_default_to_partition() {
        let partition = Partition::single([5, 3, 2], [1.0; 3]).unwrap();
        let config = ResidualConfig::default();
        assert_eq!(config.global_columns(&partition), [5, 3]);
        assert!(config.validate_for(&partition).is_ok());

        let config = config.with_global_extent([4, 3]);
        assert_eq!(config.global_columns(&partition), [4, 3]);
        assert!(matches!(
            config.validate_for(&partition),
            Err(ConfigError::ExtentMismatch { .. })
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let config: ResidualConfig = serde_json::from_str(r#"{"gravity": 9.81}"#).unwrap();
        assert_eq!(config.gravity, 9.81);
        assert_eq!(config.viscosity, 1.0);
        assert_eq!(config.global_extent, None);
    }
}
