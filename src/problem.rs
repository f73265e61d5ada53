//! Physical property fields of the problem.
//!
//! Volume properties (porosity, permeability, specific storage) and surface
//! properties (slopes, Manning roughness) are read-only during a residual
//! evaluation. Each is a [`DistributedField`] on the same partition as the
//! pressure, with a one-cell halo so face terms can read neighbours.

use serde::{Deserialize, Serialize};

use crate::grid::{DistributedField, HaloExchange, Partition};

/// Uniform site properties used to build homogeneous problems.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProperties {
    pub porosity: f64,
    /// Saturated permeability along x, y, z
    pub permeability: [f64; 3],
    pub specific_storage: f64,
    pub x_slope: f64,
    pub y_slope: f64,
    /// Manning roughness coefficient
    pub mannings: f64,
}

impl Default for SiteProperties {
    fn default() -> Self {
        Self {
            porosity: 0.4,
            permeability: [1.0; 3],
            specific_storage: 1e-4,
            x_slope: 0.0,
            y_slope: 0.0,
            mannings: 5.52e-6,
        }
    }
}

impl SiteProperties {
    pub fn with_porosity(mut self, porosity: f64) -> Self {
        self.porosity = porosity;
        self
    }

    /// Isotropic permeability.
    pub fn with_permeability(mut self, k: f64) -> Self {
        self.permeability = [k; 3];
        self
    }

    pub fn with_anisotropic_permeability(mut self, k: [f64; 3]) -> Self {
        self.permeability = k;
        self
    }

    pub fn with_specific_storage(mut self, ss: f64) -> Self {
        self.specific_storage = ss;
        self
    }

    pub fn with_slopes(mut self, x_slope: f64, y_slope: f64) -> Self {
        self.x_slope = x_slope;
        self.y_slope = y_slope;
        self
    }

    pub fn with_mannings(mut self, n: f64) -> Self {
        self.mannings = n;
        self
    }
}

/// Porosity, permeability, storage, slopes and roughness for one partition.
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemData {
    pub porosity: DistributedField,
    pub permeability_x: DistributedField,
    pub permeability_y: DistributedField,
    pub permeability_z: DistributedField,
    pub specific_storage: DistributedField,
    /// Surface slope along x (per column)
    pub x_slope: DistributedField,
    /// Surface slope along y (per column)
    pub y_slope: DistributedField,
    /// Manning roughness (per column)
    pub mannings: DistributedField,
}

impl ProblemData {
    /// Uniform properties on every cell, ghosts included.
    ///
    /// # Example
    ///
    /// ```
    /// use richards_fv::grid::Partition;
    /// use richards_fv::problem::{ProblemData, SiteProperties};
    /// use richards_fv::types::CellIndex;
    ///
    /// let partition = Partition::single([4, 4, 2], [1.0, 1.0, 0.5]).unwrap();
    /// let site = SiteProperties::default().with_permeability(0.1).with_slopes(0.01, 0.0);
    /// let problem = ProblemData::homogeneous(&partition, &site);
    /// assert_eq!(problem.permeability_z.get(CellIndex::new(0, 0, 1)), Some(0.1));
    /// assert_eq!(problem.x_slope.get(CellIndex::new(3, 3, 0)), Some(0.01));
    /// ```
    pub fn homogeneous(partition: &Partition, site: &SiteProperties) -> Self {
        let volume = |v: f64| DistributedField::constant(partition, 1, v);
        let surface = |v: f64| DistributedField::surface_constant(partition, 1, v);
        Self {
            porosity: volume(site.porosity),
            permeability_x: volume(site.permeability[0]),
            permeability_y: volume(site.permeability[1]),
            permeability_z: volume(site.permeability[2]),
            specific_storage: volume(site.specific_storage),
            x_slope: surface(site.x_slope),
            y_slope: surface(site.y_slope),
            mannings: surface(site.mannings),
        }
    }

    /// Permeability fields indexed by axis.
    pub fn permeability(&self) -> [&DistributedField; 3] {
        [&self.permeability_x, &self.permeability_y, &self.permeability_z]
    }

    /// Refresh every property's ghost cells after editing owned values.
    pub fn refresh_ghosts(&mut self, halo: &dyn HaloExchange) {
        for field in [
            &mut self.porosity,
            &mut self.permeability_x,
            &mut self.permeability_y,
            &mut self.permeability_z,
            &mut self.specific_storage,
            &mut self.x_slope,
            &mut self.y_slope,
            &mut self.mannings,
        ] {
            halo.exchange(field);
        }
    }
}
