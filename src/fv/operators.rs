use super::{flow_transmissibilities, stress_stiffnesses, DofLayout};
use crate::base::{BcType, Grid, OperatorKind, ParameterStore, Variable};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::CooMatrix;

/// Holds one sparse operator block of the typed operator table
///
/// A block maps one variable group to one equation group and is linear in
/// its unknown: the residual contribution is `A x - rhs`, with `x` the
/// column-variable block of the global unknown vector. Row and column
/// indices are local to the block; the assembler shifts them by the
/// variable offsets of the layout.
pub struct OperatorBlock {
    pub kind: OperatorKind,
    pub row_var: Variable,
    pub col_var: Variable,
    pub nrow: usize,
    pub ncol: usize,
    pub triplets: Vec<(usize, usize, f64)>,
    pub rhs: Vector,
}

impl OperatorBlock {
    /// Allocates a new (empty) instance
    pub fn new(kind: OperatorKind, row_var: Variable, col_var: Variable, nrow: usize, ncol: usize) -> Self {
        OperatorBlock {
            kind,
            row_var,
            col_var,
            nrow,
            ncol,
            triplets: Vec::new(),
            rhs: Vector::new(nrow),
        }
    }

    /// Appends one matrix entry (duplicates are summed on assembly)
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.nrow && j < self.ncol);
        self.triplets.push((i, j, value));
    }

    /// Returns the number of matrix entries
    pub fn nnz(&self) -> usize {
        self.triplets.len()
    }

    /// Checks the block dimensions against the variable layout
    pub fn check_dims(&self, layout: &DofLayout) -> Result<(), StrError> {
        if self.nrow != layout.var_dim(self.row_var) || self.ncol != layout.var_dim(self.col_var) {
            return Err("operator block dimensions do not match the variable layout");
        }
        Ok(())
    }

    /// Inserts the block entries into the global coefficient matrix
    pub fn add_to_coo(&self, coo: &mut CooMatrix, row_offset: usize, col_offset: usize) -> Result<(), StrError> {
        for (i, j, value) in &self.triplets {
            coo.put(row_offset + i, col_offset + j, *value)?;
        }
        Ok(())
    }

    /// Accumulates the residual contribution `A x - rhs` into the global residual
    pub fn add_to_residual(&self, rr: &mut Vector, xx: &Vector, row_offset: usize, col_offset: usize) {
        for (i, j, value) in &self.triplets {
            rr[row_offset + i] += value * xx[col_offset + j];
        }
        for i in 0..self.nrow {
            rr[row_offset + i] -= self.rhs[i];
        }
    }
}

/// Holds the bulk operator blocks of one linearization point
///
/// All blocks are rebuilt at the beginning of every assembly in the same
/// deterministic order, so the global sparsity pattern is stable across
/// Newton iterations within a time step.
pub struct BulkOperators {
    pub all: Vec<OperatorBlock>,
}

impl BulkOperators {
    /// Builds the six bulk operator blocks
    ///
    /// `uu_prev` is the committed solution of the previous time step (used
    /// by the storage, stabilization, and div-u terms).
    pub fn new(
        grid: &Grid,
        store: &ParameterStore,
        layout: &DofLayout,
        dt: f64,
        uu_prev: &Vector,
    ) -> Result<Self, StrError> {
        if dt <= 0.0 {
            return Err("Δt must be positive");
        }
        let ndim = grid.ndim;
        let nu = ndim * grid.num_cells();
        let np = grid.num_cells();
        let alpha = store.mechanics.biot_alpha;
        let (lambda, shear) = store.mechanics.elasticity.lame();
        let stiff = stress_stiffnesses(grid, &store.mechanics.elasticity)?;
        let trans = flow_transmissibilities(grid, &store.flow.permeability, store.flow.flow.viscosity)?;

        let mut div_sigma = OperatorBlock::new(OperatorKind::StressDivergence, Variable::U, Variable::U, nu, nu);
        let mut grad_p = OperatorBlock::new(OperatorKind::PressureGradient, Variable::U, Variable::P, nu, np);
        let mut flux = OperatorBlock::new(OperatorKind::FluxDivergence, Variable::P, Variable::P, np, np);
        let mut mass = OperatorBlock::new(OperatorKind::MassStorage, Variable::P, Variable::P, np, np);
        let mut stab = OperatorBlock::new(OperatorKind::BiotStabilization, Variable::P, Variable::P, np, np);
        let mut div_u = OperatorBlock::new(OperatorKind::DisplacementDivergence, Variable::P, Variable::U, np, nu);

        // face loops: force balance, Biot pressure force, flux, and div-u
        for (f, face) in grid.faces.iter().enumerate() {
            let low = face.low;
            let n = face.normal;
            let t = [-n[1], n[0]];
            let area = face.area;
            let (kn, kt) = stiff[f];
            let tq = trans[f];
            match face.high {
                Some(high) => {
                    // traction on the low cell: C ([u_high] - [u_low]); R_low = -tr, R_high = +tr
                    for a in 0..ndim {
                        for b in 0..ndim {
                            let c = kn * n[a] * n[b] + kt * t[a] * t[b];
                            div_sigma.put(low * ndim + a, low * ndim + b, c);
                            div_sigma.put(low * ndim + a, high * ndim + b, -c);
                            div_sigma.put(high * ndim + a, high * ndim + b, c);
                            div_sigma.put(high * ndim + a, low * ndim + b, -c);
                        }
                    }
                    // face pressure (two-point average) reduces the total stress
                    for a in 0..ndim {
                        let c = alpha * area * n[a] * 0.5;
                        grad_p.put(low * ndim + a, low, c);
                        grad_p.put(low * ndim + a, high, c);
                        grad_p.put(high * ndim + a, low, -c);
                        grad_p.put(high * ndim + a, high, -c);
                    }
                    // two-point flux, implicit in time
                    flux.put(low, low, dt * tq);
                    flux.put(low, high, -dt * tq);
                    flux.put(high, high, dt * tq);
                    flux.put(high, low, -dt * tq);
                    // face displacement (two-point average) changes the pore volume
                    for a in 0..ndim {
                        let c = alpha * area * n[a] * 0.5;
                        let u_prev_avg = uu_prev[layout.eq_u(low, a)] + uu_prev[layout.eq_u(high, a)];
                        div_u.put(low, low * ndim + a, c);
                        div_u.put(low, high * ndim + a, c);
                        div_u.rhs[low] += c * u_prev_avg;
                        div_u.put(high, low * ndim + a, -c);
                        div_u.put(high, high * ndim + a, -c);
                        div_u.rhs[high] -= c * u_prev_avg;
                    }
                }
                None => {
                    // mechanics boundary conditions
                    match store.mechanics.bc.kind(f) {
                        Some(BcType::Dirichlet) => {
                            for a in 0..ndim {
                                for b in 0..ndim {
                                    let c = kn * n[a] * n[b] + kt * t[a] * t[b];
                                    div_sigma.put(low * ndim + a, low * ndim + b, c);
                                    div_sigma.rhs[low * ndim + a] += c * store.mechanics.bc.value(f, b);
                                }
                            }
                            for a in 0..ndim {
                                let db = store.mechanics.bc.value(f, a) - store.mechanics.bc.value_prev(f, a);
                                div_u.rhs[low] -= alpha * area * n[a] * db;
                            }
                        }
                        Some(BcType::Neumann) => {
                            for a in 0..ndim {
                                div_sigma.rhs[low * ndim + a] += store.mechanics.bc.value(f, a) * area;
                                let c = alpha * area * n[a];
                                div_u.put(low, low * ndim + a, c);
                                div_u.rhs[low] += c * uu_prev[layout.eq_u(low, a)];
                            }
                        }
                        None => return Err("boundary face without a boundary condition"),
                    }
                    // flow boundary conditions
                    match store.flow.bc.kind(f) {
                        Some(BcType::Dirichlet) => {
                            let p_b = store.flow.bc.value(f, 0);
                            flux.put(low, low, dt * tq);
                            flux.rhs[low] += dt * tq * p_b;
                            for a in 0..ndim {
                                grad_p.rhs[low * ndim + a] -= alpha * area * n[a] * p_b;
                            }
                        }
                        Some(BcType::Neumann) => {
                            // prescribed outward volumetric flux per unit area
                            let q_b = store.flow.bc.value(f, 0);
                            flux.rhs[low] -= dt * q_b * area;
                            for a in 0..ndim {
                                grad_p.put(low * ndim + a, low, alpha * area * n[a]);
                            }
                        }
                        None => return Err("boundary face without a boundary condition"),
                    }
                }
            }
        }

        // cell loops: storage and stabilization on the pressure increment
        let s_coeff = store.flow.flow.storativity;
        let stab_coeff = alpha * alpha / (lambda + 2.0 * shear);
        for cell in 0..grid.num_cells() {
            let vol = grid.cell_volumes[cell];
            let p_prev = uu_prev[layout.eq_p(cell)];
            mass.put(cell, cell, s_coeff * vol);
            mass.rhs[cell] += s_coeff * vol * p_prev;
            stab.put(cell, cell, stab_coeff * vol);
            stab.rhs[cell] += stab_coeff * vol * p_prev;
        }

        let all = vec![div_sigma, grad_p, flux, mass, stab, div_u];
        for block in &all {
            block.check_dims(layout)?;
        }
        Ok(BulkOperators { all })
    }

    /// Returns the total number of matrix entries over all blocks
    pub fn nnz(&self) -> usize {
        self.all.iter().map(|b| b.nnz()).sum()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
