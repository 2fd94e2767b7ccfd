//! Implements the finite volume discretization and the implicit solvers

mod assembler;
mod contact;
mod interface;
mod layout;
mod linear_system;
mod operators;
mod solver_contact;
mod state;
mod stencil;
mod time_stepper;
pub use crate::fv::assembler::*;
pub use crate::fv::contact::*;
pub use crate::fv::interface::*;
pub use crate::fv::layout::*;
pub use crate::fv::linear_system::*;
pub use crate::fv::operators::*;
pub use crate::fv::solver_contact::*;
pub use crate::fv::state::*;
pub use crate::fv::stencil::*;
pub use crate::fv::time_stepper::*;
