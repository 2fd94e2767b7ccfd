use super::{displacement_jump, eval_contact, BulkOperators, DofLayout, FvState, InterfaceOperators};
use crate::base::{ContactMode, Grid, InterfaceGrid, ParameterStore};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::CooMatrix;

/// Implements the global assembly of the residual and the Jacobian
///
/// The operator blocks are rebuilt on every call in a fixed order and all
/// potential contact entries are inserted even when their current value is
/// zero, so the sparsity pattern is identical across Newton iterations and
/// the factorization can reuse its symbolic analysis.
pub struct Assembler {
    pub layout: DofLayout,
}

impl Assembler {
    /// Allocates a new instance after validating the inputs
    pub fn new(grid: &Grid, interfaces: &[InterfaceGrid], store: &ParameterStore) -> Result<Assembler, StrError> {
        store.validate(grid, interfaces)?;
        for ifc in interfaces {
            ifc.validate(grid)?;
        }
        let layout = DofLayout::new(grid, interfaces)?;
        Ok(Assembler { layout })
    }

    /// Returns an upper bound of the number of matrix entries
    ///
    /// Includes the diagonal headroom used by the singular-system recovery.
    pub fn nnz_sup(
        &self,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &FvState,
    ) -> Result<usize, StrError> {
        let bulk = BulkOperators::new(grid, store, &self.layout, state.dt, &state.uu_prev)?;
        let coupling = InterfaceOperators::new(grid, interfaces, store, &self.layout, state.dt, &state.uu_prev)?;
        // 4 λ-entries and 8 u-entries per interface cell
        let contact = 12 * self.layout.n_ifc;
        Ok(bulk.nnz() + coupling.nnz() + contact + self.layout.n_equation)
    }

    /// Assembles the residual vector and the Jacobian matrix
    ///
    /// The residual is evaluated at `state.uu`; the committed solution
    /// `state.uu_prev` supplies the previous-time terms.
    pub fn assemble(
        &self,
        kk: &mut CooMatrix,
        rr: &mut Vector,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &FvState,
    ) -> Result<(), StrError> {
        if rr.dim() != self.layout.n_equation {
            return Err("residual vector has the wrong dimension");
        }
        kk.reset();
        rr.fill(0.0);

        let bulk = BulkOperators::new(grid, store, &self.layout, state.dt, &state.uu_prev)?;
        for block in &bulk.all {
            let ro = self.layout.offset(block.row_var);
            let co = self.layout.offset(block.col_var);
            block.add_to_coo(kk, ro, co)?;
            block.add_to_residual(rr, &state.uu, ro, co);
        }

        let coupling = InterfaceOperators::new(grid, interfaces, store, &self.layout, state.dt, &state.uu_prev)?;
        for block in &coupling.all {
            let ro = self.layout.offset(block.row_var);
            let co = self.layout.offset(block.col_var);
            block.add_to_coo(kk, ro, co)?;
            block.add_to_residual(rr, &state.uu, ro, co);
        }

        // contact conditions (the only writers of the λ rows)
        for (ifr, ifc) in interfaces.iter().enumerate() {
            let contact = &store.fractures[ifr].contact;
            for j in 0..ifc.num_cells() {
                let k = self.layout.ifc_index(ifr, j);
                let lam_n = state.uu[self.layout.eq_lam(k, 0)];
                let lam_t = state.uu[self.layout.eq_lam(k, 1)];
                let (un, ut) = displacement_jump(ifc, j, &self.layout, &state.uu);
                let (_, ut_prev) = displacement_jump(ifc, j, &self.layout, &state.uu_prev);
                let res = eval_contact(lam_n, lam_t, un, ut, ut_prev, contact.friction_coefficient, contact.c_num);
                let (low, high) = ifc.cell_map[j];
                let n = ifc.normals[j];
                let t = ifc.tangent(j);
                for i in 0..2 {
                    let row = self.layout.eq_lam(k, i);
                    rr[row] += res.rr[i];
                    kk.put(row, self.layout.eq_lam(k, 0), res.d_lam[i][0])?;
                    kk.put(row, self.layout.eq_lam(k, 1), res.d_lam[i][1])?;
                    for a in 0..2 {
                        let d = res.d_jump[i][0] * n[a] + res.d_jump[i][1] * t[a];
                        kk.put(row, self.layout.eq_u(high, a), d)?;
                        kk.put(row, self.layout.eq_u(low, a), -d)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the contact mode every interface cell would select at the
    /// current iterate
    pub fn trial_modes(
        &self,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &FvState,
    ) -> Vec<ContactMode> {
        let mut modes = Vec::with_capacity(self.layout.n_ifc);
        for (ifr, ifc) in interfaces.iter().enumerate() {
            let contact = &store.fractures[ifr].contact;
            for j in 0..ifc.num_cells() {
                let k = self.layout.ifc_index(ifr, j);
                let lam_n = state.uu[self.layout.eq_lam(k, 0)];
                let lam_t = state.uu[self.layout.eq_lam(k, 1)];
                let (un, ut) = displacement_jump(ifc, j, &self.layout, &state.uu);
                let (_, ut_prev) = displacement_jump(ifc, j, &self.layout, &state.uu_prev);
                let res = eval_contact(lam_n, lam_t, un, ut, ut_prev, contact.friction_coefficient, contact.c_num);
                modes.push(res.mode);
            }
        }
        modes
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
