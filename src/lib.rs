//! Porofrac implements a finite volume simulator for coupled poromechanics
//! on fractured domains: linear elasticity with frictional contact on the
//! fracture surfaces, coupled to single-phase flow in the bulk rock and in
//! the fracture network, advanced implicitly in time by a semismooth
//! Newton iteration.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fv;
pub mod prelude;
