use serde::{Deserialize, Serialize};

/// Holds parameters for linear elasticity
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamElasticity {
    /// Young's modulus
    pub young: f64,

    /// Poisson's coefficient
    pub poisson: f64,
}

impl ParamElasticity {
    /// Returns the Lamé parameters (λ, G)
    pub fn lame(&self) -> (f64, f64) {
        let lambda = self.young * self.poisson / ((1.0 + self.poisson) * (1.0 - 2.0 * self.poisson));
        let shear = self.young / (2.0 * (1.0 + self.poisson));
        (lambda, shear)
    }

    /// Returns sample parameters (stress scaled in GPa)
    pub fn sample() -> Self {
        ParamElasticity {
            young: 1.0,
            poisson: 0.25,
        }
    }
}

/// Holds parameters for single-phase flow
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamFlow {
    /// Isotropic permeability (used when no tensor field is set)
    pub permeability: f64,

    /// Fluid dynamic viscosity
    pub viscosity: f64,

    /// Specific storage coefficient
    pub storativity: f64,

    /// Aperture (cross-sectional opening; 1.0 for bulk cells)
    pub aperture: f64,
}

impl ParamFlow {
    /// Returns sample bulk parameters (SI units, matching a tight rock)
    pub fn sample_bulk() -> Self {
        ParamFlow {
            permeability: 1e-11,
            viscosity: 1e-3,
            storativity: 1e-10,
            aperture: 1.0,
        }
    }

    /// Returns sample fracture parameters
    pub fn sample_fracture() -> Self {
        ParamFlow {
            permeability: 1e-8,
            viscosity: 1e-3,
            storativity: 1e-10,
            aperture: 1e-3,
        }
    }
}

/// Holds parameters for the frictional contact condition
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamContact {
    /// Coulomb friction coefficient
    pub friction_coefficient: f64,

    /// Numerical parameter weighting the displacement jump in the
    /// complementarity function (units of traction per length)
    pub c_num: f64,

    /// Initial normal traction used as the first Newton guess
    /// (negative means compression)
    pub initial_normal_traction: f64,
}

impl ParamContact {
    /// Returns sample parameters
    pub fn sample() -> Self {
        ParamContact {
            friction_coefficient: 0.5,
            c_num: 100.0,
            initial_normal_traction: -100.0,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
