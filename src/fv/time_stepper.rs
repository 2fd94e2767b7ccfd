use super::{ContactSolver, FvState};
use crate::base::{Config, Grid, InterfaceGrid, ParameterStore};
use crate::StrError;
use russell_lab::vec_copy;

/// Implements the implicit time loop with step-size recovery
///
/// Each step refreshes the boundary values at the target time, solves the
/// nonlinear system, and commits on success. A step whose Newton
/// iterations do not converge is retried with half the step size, up to
/// the allowed number of failures; the committed state is restored before
/// every retry.
pub struct TimeStepper<'a> {
    config: &'a Config,
    pub solver: ContactSolver<'a>,
}

impl<'a> TimeStepper<'a> {
    /// Allocates a new instance
    pub fn new(
        config: &'a Config,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        state: &FvState,
    ) -> Result<Self, StrError> {
        let solver = ContactSolver::new(config, grid, interfaces, store, state)?;
        Ok(TimeStepper { config, solver })
    }

    /// Advances the state by one committed time step
    pub fn step(
        &mut self,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &mut ParameterStore,
        state: &mut FvState,
    ) -> Result<(), StrError> {
        let mut dt = (self.config.dt)(state.t);
        if dt <= 0.0 {
            return Err("Δt must be positive");
        }
        // land exactly on the final time
        if state.t + dt > self.config.t_fin {
            dt = self.config.t_fin - state.t;
        }
        let mut n_failure = 0;
        loop {
            state.dt = dt;
            if let Some(f) = store.mechanics.bc_value_fn {
                store.mechanics.bc.update_values(f(grid, state.t + dt))?;
            }
            if let Some(f) = store.flow.bc_value_fn {
                store.flow.bc.update_values(f(grid, state.t + dt))?;
            }
            match self.solver.solve(grid, interfaces, store, state) {
                Ok(()) => break,
                Err(msg) if msg == "contact mechanics iterations did not converge" => {
                    // restore the committed state and retry with half the step
                    vec_copy(&mut state.uu, &state.uu_prev)?;
                    state.modes = state.modes_prev.clone();
                    n_failure += 1;
                    if n_failure > self.config.allowed_step_n_failure {
                        return Err(msg);
                    }
                    dt *= 0.5;
                }
                Err(msg) => return Err(msg),
            }
        }
        state.t += dt;
        vec_copy(&mut state.uu_prev, &state.uu)?;
        state.modes_prev = state.modes.clone();
        store.mechanics.bc.commit();
        store.flow.bc.commit();
        Ok(())
    }

    /// Runs the time loop until the final time and returns the number of
    /// committed steps
    pub fn run(
        &mut self,
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &mut ParameterStore,
        state: &mut FvState,
    ) -> Result<usize, StrError> {
        let mut timestep = 0;
        // the tolerance absorbs roundoff in the accumulated time
        while state.t < self.config.t_fin - 1e-12 {
            if timestep >= self.config.n_max_time_steps {
                return Err("the maximum number of time steps was reached");
            }
            self.step(grid, interfaces, store, state)?;
            self.config.print_timestep(timestep, state.t, state.dt);
            if self.config.save_state_files {
                let path = format!("{}/{}-{:0>8}.json", self.config.out_dir, self.config.run_name, timestep);
                state.write_json(&path)?;
            }
            timestep += 1;
        }
        Ok(timestep)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
