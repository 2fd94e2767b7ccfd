//! Implements the base structures for a fractured poromechanics simulation

mod config;
mod enums;
mod grid;
mod interface_grid;
mod param_store;
mod parameters;
mod sample_grids;
pub use crate::base::config::*;
pub use crate::base::enums::*;
pub use crate::base::grid::*;
pub use crate::base::interface_grid::*;
pub use crate::base::param_store::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_grids::*;
