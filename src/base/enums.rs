use serde::{Deserialize, Serialize};

/// Defines the type of a condition on a boundary face
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BcType {
    /// Prescribed primary value (displacement or pressure) at the face
    Dirichlet,

    /// Prescribed flux (traction or volumetric flux) at the face
    Neumann,
}

/// Defines the physics keyword owning a set of parameters
///
/// The mechanics keyword is shared by the elasticity parameters and by the
/// contact parameters of every fracture; assembly fails fast otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhysicsKey {
    Mechanics,
    Flow,
}

/// Defines the mechanical state of an interface (fracture) cell
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ContactMode {
    /// Zero traction; the normal gap is free to grow
    Open,

    /// Tangential jump frozen; traction inside the friction cone
    Sticking,

    /// Tangential traction on the friction-cone boundary
    Sliding,
}

/// Defines the kind of a discrete operator block
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperatorKind {
    /// Displacement → force balance (bulk)
    StressDivergence,

    /// Pressure → force balance (Biot coupling)
    PressureGradient,

    /// Pressure → mass balance (bulk, weighted by Δt)
    FluxDivergence,

    /// Pressure increment → mass balance (storativity)
    MassStorage,

    /// Pressure increment → mass balance (implicit-coupling correction)
    BiotStabilization,

    /// Displacement increment → mass balance (Biot coupling)
    DisplacementDivergence,

    /// Mortar traction and fracture pressure → bulk force balance
    MortarTraction,

    /// Bulk and fracture pressures → flux continuity across the interface
    FluxContinuity,

    /// Fracture storage and fracture-tangential flow
    FractureMassBalance,

    /// Normal-jump increment → fracture mass balance (div-u coupling)
    JumpDivergence,
}

/// Defines a primary variable group in the global unknown vector
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Variable {
    /// Bulk displacement (ndim components per bulk cell)
    U,

    /// Bulk pressure (one per bulk cell)
    P,

    /// Fracture pressure (one per interface cell)
    Pf,

    /// Mortar contact traction in the local normal/tangent frame
    /// (ndim components per interface cell)
    Lam,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
