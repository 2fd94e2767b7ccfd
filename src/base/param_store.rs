use super::{BcType, Grid, InterfaceGrid, ParamContact, ParamElasticity, ParamFlow, PhysicsKey};
use crate::StrError;
use russell_tensor::{Mandel, Tensor2};

/// Defines an experiment-specific boundary-value provider
///
/// Given the grid and the (new) time, returns one value array with
/// `num_faces × ncomp` entries; only boundary-face entries are read.
pub type BcValueFn = fn(&Grid, f64) -> Vec<f64>;

/// Holds the boundary-condition types and values of one physics
///
/// Every boundary face must be covered by exactly one condition. The
/// values of the previously committed time are kept as well because the
/// divergence-of-displacement coupling needs boundary values at both
/// time levels.
pub struct BcConfig {
    kinds: Vec<Option<BcType>>,
    ncomp: usize,

    /// Values at the new (target) time (num_faces × ncomp)
    pub values: Vec<f64>,

    /// Values at the previously committed time (num_faces × ncomp)
    pub values_prev: Vec<f64>,
}

impl BcConfig {
    /// Allocates a new instance with zero values and no conditions set
    pub fn new(grid: &Grid, ncomp: usize) -> Self {
        BcConfig {
            kinds: vec![None; grid.num_faces()],
            ncomp,
            values: vec![0.0; grid.num_faces() * ncomp],
            values_prev: vec![0.0; grid.num_faces() * ncomp],
        }
    }

    /// Sets the condition type of a boundary face
    pub fn set(&mut self, grid: &Grid, face: usize, bc_type: BcType) -> Result<&mut Self, StrError> {
        if face >= self.kinds.len() {
            return Err("face index is out of bounds");
        }
        if !grid.is_boundary(face) {
            return Err("cannot set a boundary condition on an interior face");
        }
        if self.kinds[face].is_some() {
            return Err("boundary face already has a condition");
        }
        self.kinds[face] = Some(bc_type);
        Ok(self)
    }

    /// Returns the condition type of a face (None for uncovered faces)
    pub fn kind(&self, face: usize) -> Option<BcType> {
        self.kinds[face]
    }

    /// Returns one value component at the new time
    pub fn value(&self, face: usize, comp: usize) -> f64 {
        self.values[face * self.ncomp + comp]
    }

    /// Returns one value component at the previously committed time
    pub fn value_prev(&self, face: usize, comp: usize) -> f64 {
        self.values_prev[face * self.ncomp + comp]
    }

    /// Replaces the values at the new time (the committed values are untouched)
    pub fn update_values(&mut self, values: Vec<f64>) -> Result<(), StrError> {
        if values.len() != self.values.len() {
            return Err("boundary values have the wrong length");
        }
        self.values = values;
        Ok(())
    }

    /// Initializes both time levels with the same values
    pub fn initialize_values(&mut self, values: Vec<f64>) -> Result<(), StrError> {
        if values.len() != self.values.len() {
            return Err("boundary values have the wrong length");
        }
        self.values_prev = values.clone();
        self.values = values;
        Ok(())
    }

    /// Commits the values at the new time as the previous values
    pub fn commit(&mut self) {
        self.values_prev.copy_from_slice(&self.values);
    }

    /// Checks that every boundary face is covered exactly once
    pub fn validate(&self, grid: &Grid) -> Result<(), StrError> {
        if self.kinds.len() != grid.num_faces() {
            return Err("boundary condition arrays do not match the grid");
        }
        for face in 0..grid.num_faces() {
            if grid.is_boundary(face) && self.kinds[face].is_none() {
                return Err("boundary face without a boundary condition");
            }
        }
        Ok(())
    }
}

/// Holds the mechanics parameters of the bulk grid
pub struct MechanicsParams {
    /// Physics keyword (must equal the contact keyword of every fracture)
    pub key: PhysicsKey,

    pub elasticity: ParamElasticity,

    /// Biot coefficient α
    pub biot_alpha: f64,

    /// Displacement/traction boundary conditions (ndim components per face)
    pub bc: BcConfig,

    /// Boundary-value provider called by the time stepper
    pub bc_value_fn: Option<BcValueFn>,
}

/// Holds the flow parameters of the bulk grid
pub struct FlowParams {
    pub key: PhysicsKey,

    pub flow: ParamFlow,

    /// Permeability tensor field (one tensor per bulk cell)
    pub permeability: Vec<Tensor2>,

    /// Pressure/flux boundary conditions (one component per face)
    pub bc: BcConfig,

    pub bc_value_fn: Option<BcValueFn>,
}

/// Holds the interface parameters of one fracture
pub struct FractureParams {
    /// Keyword of the contact condition; assembly fails fast unless it
    /// equals the mechanics keyword
    pub key: PhysicsKey,

    pub contact: ParamContact,

    /// Fracture-internal flow parameters (aperture, permeability, storage)
    pub flow: ParamFlow,
}

/// Holds all physical and numerical parameters, keyed by grid and physics
pub struct ParameterStore {
    pub mechanics: MechanicsParams,
    pub flow: FlowParams,
    pub fractures: Vec<FractureParams>,
}

impl ParameterStore {
    /// Allocates a new instance with sample parameters and empty boundary conditions
    pub fn new(grid: &Grid, n_fracture: usize) -> Self {
        let flow = ParamFlow::sample_bulk();
        ParameterStore {
            mechanics: MechanicsParams {
                key: PhysicsKey::Mechanics,
                elasticity: ParamElasticity::sample(),
                biot_alpha: 1.0,
                bc: BcConfig::new(grid, grid.ndim),
                bc_value_fn: None,
            },
            flow: FlowParams {
                key: PhysicsKey::Flow,
                flow,
                permeability: ParameterStore::isotropic_permeability(grid, flow.permeability),
                bc: BcConfig::new(grid, 1),
                bc_value_fn: None,
            },
            fractures: (0..n_fracture)
                .map(|_| FractureParams {
                    key: PhysicsKey::Mechanics,
                    contact: ParamContact::sample(),
                    flow: ParamFlow::sample_fracture(),
                })
                .collect(),
        }
    }

    /// Builds an isotropic permeability tensor field
    pub fn isotropic_permeability(grid: &Grid, k: f64) -> Vec<Tensor2> {
        (0..grid.num_cells())
            .map(|_| {
                let mut kk = Tensor2::new(Mandel::Symmetric2D);
                kk.sym_set(0, 0, k);
                kk.sym_set(1, 1, k);
                kk
            })
            .collect()
    }

    /// Checks keyword consistency, parameter ranges, and boundary coverage
    pub fn validate(&self, grid: &Grid, interfaces: &[InterfaceGrid]) -> Result<(), StrError> {
        if self.mechanics.key != PhysicsKey::Mechanics {
            return Err("mechanics parameters must use the mechanics keyword");
        }
        if self.flow.key != PhysicsKey::Flow {
            return Err("flow parameters must use the flow keyword");
        }
        if self.fractures.len() != interfaces.len() {
            return Err("one parameter set per fracture is required");
        }
        for fracture in &self.fractures {
            if fracture.key != self.mechanics.key {
                return Err("mechanics keyword must equal contact keyword");
            }
            if fracture.contact.friction_coefficient < 0.0 {
                return Err("friction coefficient must be non-negative");
            }
            if fracture.contact.c_num <= 0.0 {
                return Err("contact numerical parameter must be positive");
            }
            if fracture.flow.aperture <= 0.0 {
                return Err("fracture aperture must be positive");
            }
        }
        if self.mechanics.biot_alpha < 0.0 || self.mechanics.biot_alpha > 1.0 {
            return Err("biot_alpha must be in [0, 1]");
        }
        if self.flow.flow.viscosity <= 0.0 {
            return Err("viscosity must be positive");
        }
        if self.flow.flow.storativity < 0.0 {
            return Err("storativity must be non-negative");
        }
        if self.flow.permeability.len() != grid.num_cells() {
            return Err("permeability must be given for every cell");
        }
        self.mechanics.bc.validate(grid)?;
        self.flow.bc.validate(grid)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
