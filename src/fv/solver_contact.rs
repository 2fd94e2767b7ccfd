use super::{Assembler, FvState, LinearSystem};
use crate::base::{Config, Grid, InterfaceGrid, ParameterStore};
use crate::StrError;
use russell_lab::{vec_copy, vec_max_scaled, vec_norm, Norm, Vector};

/// Indicates the status of the nonlinear solver
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverStatus {
    Initialized,
    Iterating,
    Converged,
    Diverged,
}

/// Implements the semismooth Newton solver of one time step
///
/// Convergence requires a small residual AND a stable set of contact
/// modes: an iterate whose modes still change is not accepted even when
/// the residual norm is already below the tolerance. The first iteration
/// checks the unscaled max-norm; later iterations check the max-norm
/// scaled by the first residual.
pub struct ContactSolver<'a> {
    config: &'a Config,
    pub assembler: Assembler,
    pub lin_sys: LinearSystem<'a>,
    pub status: SolverStatus,
    pub iterations: usize,
}

impl<'a> ContactSolver<'a> {
    /// Allocates a new instance
    pub fn new(
        config: &'a Config,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &FvState,
    ) -> Result<Self, StrError> {
        config.validate()?;
        let assembler = Assembler::new(grid, interfaces, store)?;
        let nnz_sup = assembler.nnz_sup(grid, interfaces, store, state)?;
        let lin_sys = LinearSystem::new(assembler.layout.n_equation, nnz_sup, config.lin_sol_genie)?;
        Ok(ContactSolver {
            config,
            assembler,
            lin_sys,
            status: SolverStatus::Initialized,
            iterations: 0,
        })
    }

    /// Runs the Newton iterations of one time step
    ///
    /// On success, `state.uu` holds the converged solution; the committed
    /// arrays (`uu_prev`, `modes_prev`) are left untouched either way, so
    /// the caller can restore and retry with a smaller time step.
    pub fn solve(
        &mut self,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &mut FvState,
    ) -> Result<(), StrError> {
        self.config.print_header();
        self.status = SolverStatus::Iterating;
        let n = self.assembler.layout.n_equation;
        let mut rr0 = Vector::new(n);
        let mut perturbed = false;
        let mut eps = 0.0;
        for iteration in 0..self.config.n_max_iterations {
            self.iterations = iteration;

            // residual and Jacobian at the current iterate; the diagonal is
            // always present (zero or perturbed) so the sparsity pattern is
            // identical in every factorization
            {
                let LinearSystem { kk, rr, .. } = &mut self.lin_sys;
                let coo = &mut *kk;
                self.assembler.assemble(coo, rr, grid, interfaces, store, state)?;
            }
            self.lin_sys.perturb_diagonal(eps)?;

            // convergence check (residual and contact-mode stability)
            let trial = self.assembler.trial_modes(interfaces, store, state);
            let modes_stable = trial == state.modes;
            let max_rr = vec_norm(&self.lin_sys.rr, Norm::Max);
            let converged = if iteration == 0 {
                vec_copy(&mut rr0, &self.lin_sys.rr)?;
                self.config.print_iteration(iteration, max_rr, max_rr);
                max_rr < self.config.tol_rr
            } else {
                let max_rr_scaled = vec_max_scaled(&self.lin_sys.rr, &rr0, 1.0);
                self.config.print_iteration(iteration, max_rr, max_rr_scaled);
                max_rr_scaled < self.config.tol_rr
            };
            if converged && modes_stable {
                self.status = SolverStatus::Converged;
                return Ok(());
            }

            // factorization with a single diagonal-perturbation recovery
            if self.lin_sys.factorize().is_err() {
                if perturbed {
                    self.status = SolverStatus::Diverged;
                    return Err("contact mechanics iterations did not converge");
                }
                perturbed = true;
                eps = self.config.tol_rr;
                {
                    let LinearSystem { kk, rr, .. } = &mut self.lin_sys;
                    let coo = &mut *kk;
                    self.assembler.assemble(coo, rr, grid, interfaces, store, state)?;
                }
                self.lin_sys.perturb_diagonal(eps)?;
                if self.lin_sys.factorize().is_err() {
                    self.status = SolverStatus::Diverged;
                    return Err("contact mechanics iterations did not converge");
                }
            }

            // Newton update: uu -= mdu
            self.lin_sys.solve()?;
            for i in 0..n {
                state.uu[i] -= self.lin_sys.mdu[i];
            }
            state.modes = self.assembler.trial_modes(interfaces, store, state);
        }
        self.status = SolverStatus::Diverged;
        Err("contact mechanics iterations did not converge")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ContactSolver, SolverStatus};
    use crate::base::{BcType, Config, Grid, ParameterStore, SampleGrids};
    use crate::fv::FvState;
    use russell_lab::approx_eq;

    fn poroelastic_setup(grid: &Grid) -> ParameterStore {
        let mut store = ParameterStore::new(grid, 0);
        store.flow.flow = crate::base::ParamFlow {
            permeability: 1.0,
            viscosity: 1.0,
            storativity: 1.0,
            aperture: 1.0,
        };
        store.flow.permeability = ParameterStore::isotropic_permeability(grid, 1.0);
        for face in 0..grid.num_faces() {
            if grid.is_boundary(face) {
                store.mechanics.bc.set(grid, face, BcType::Dirichlet).unwrap();
                store.flow.bc.set(grid, face, BcType::Dirichlet).unwrap();
            }
        }
        store
    }

    #[test]
    fn zero_problem_converges_immediately() {
        let grid = SampleGrids::cartesian_2d(3, 3, 3.0, 3.0).unwrap();
        let store = poroelastic_setup(&grid);
        let config = Config::new();
        let mut state = {
            let assembler = crate::fv::Assembler::new(&grid, &[], &store).unwrap();
            FvState::new(&assembler.layout, &[], &store, &config).unwrap()
        };
        let mut solver = ContactSolver::new(&config, &grid, &[], &store, &state).unwrap();
        solver.solve(&grid, &[], &store, &mut state).unwrap();
        assert_eq!(solver.status, SolverStatus::Converged);
        assert_eq!(solver.iterations, 0);
    }

    #[test]
    fn linear_poroelastic_problem_converges_in_one_update() {
        // prescribed boundary pressure drives the system; without contact
        // the problem is linear, so one Newton update must suffice
        let grid = SampleGrids::cartesian_2d(3, 3, 3.0, 3.0).unwrap();
        let mut store = poroelastic_setup(&grid);
        store.flow.bc.initialize_values(vec![1.0; grid.num_faces()]).unwrap();
        let config = Config::new();
        let mut state = {
            let assembler = crate::fv::Assembler::new(&grid, &[], &store).unwrap();
            FvState::new(&assembler.layout, &[], &store, &config).unwrap()
        };
        let mut solver = ContactSolver::new(&config, &grid, &[], &store, &state).unwrap();
        solver.solve(&grid, &[], &store, &mut state).unwrap();
        assert_eq!(solver.status, SolverStatus::Converged);
        assert_eq!(solver.iterations, 1);
        // the pressure relaxes towards the boundary value
        for cell in 0..grid.num_cells() {
            let p = state.uu[solver.assembler.layout.eq_p(cell)];
            assert!(p.is_finite());
        }
        // the corner cell has two faces held at p = 1
        assert!(state.uu[solver.assembler.layout.eq_p(0)] > 0.0);
        approx_eq(state.t, 0.0, 1e-15);
    }

    #[test]
    fn solve_reports_non_convergence() {
        let grid = SampleGrids::cartesian_2d(2, 2, 2.0, 2.0).unwrap();
        let mut store = poroelastic_setup(&grid);
        store.flow.bc.initialize_values(vec![1.0; grid.num_faces()]).unwrap();
        let mut config = Config::new();
        config.n_max_iterations = 1; // the single allowed iteration cannot finish
        let mut state = {
            let assembler = crate::fv::Assembler::new(&grid, &[], &store).unwrap();
            FvState::new(&assembler.layout, &[], &store, &config).unwrap()
        };
        let mut solver = ContactSolver::new(&config, &grid, &[], &store, &state).unwrap();
        assert_eq!(
            solver.solve(&grid, &[], &store, &mut state).err(),
            Some("contact mechanics iterations did not converge")
        );
        assert_eq!(solver.status, SolverStatus::Diverged);
    }
}
