//! Makes available common structures needed to set up and run a simulation
//!
//! You may write `use porofrac::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{
    BcType, BcValueFn, Config, ContactMode, Grid, InterfaceGrid, ParamContact, ParamElasticity, ParamFlow,
    ParameterStore, PhysicsKey, SampleGrids,
};
pub use crate::fv::{Assembler, ContactSolver, DofLayout, FvState, SolverStatus, TimeStepper};
pub use crate::StrError;
