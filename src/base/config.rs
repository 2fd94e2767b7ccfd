use crate::StrError;
use russell_sparse::Genie;

/// Holds the run configuration: mesh-size targets, time control, and
/// numerical parameters
///
/// The mesh-size targets are handed to the external mesher; they are not
/// used by the discretization itself. The configuration is loaded once at
/// setup and not mutated during the solve.
pub struct Config {
    /// Target mesh size as a fraction of the fracture length
    pub mesh_size_frac: f64,

    /// Minimum mesh size
    pub mesh_size_min: f64,

    /// Mesh size bound at the domain boundary
    pub mesh_size_bound: f64,

    /// Output directory for state files
    pub out_dir: String,

    /// Name of the run (prefix of state files)
    pub run_name: String,

    /// Initial time
    pub t_ini: f64,

    /// Final time
    pub t_fin: f64,

    /// Time step as a function of time
    pub dt: fn(f64) -> f64,

    /// Maximum number of time steps
    pub n_max_time_steps: usize,

    /// Maximum number of Newton iterations per time step
    pub n_max_iterations: usize,

    /// Tolerance on the scaled residual max-norm
    pub tol_rr: f64,

    /// Number of allowed time-step reductions after a non-converged step
    pub allowed_step_n_failure: usize,

    /// Linear solver kind
    pub lin_sol_genie: Genie,

    /// Prints a line per Newton iteration
    pub verbose_iterations: bool,

    /// Prints a line per time step
    pub verbose_timesteps: bool,

    /// Writes a JSON state file after every committed time step
    pub save_state_files: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Config {
        Config {
            mesh_size_frac: 0.5,
            mesh_size_min: 0.01,
            mesh_size_bound: 0.8,
            out_dir: "/tmp/porofrac".to_string(),
            run_name: "porofrac".to_string(),
            t_ini: 0.0,
            t_fin: 1.0,
            dt: |_| 0.05,
            n_max_time_steps: 1_000,
            n_max_iterations: 50,
            tol_rr: 1e-8,
            allowed_step_n_failure: 5,
            lin_sol_genie: Genie::Umfpack,
            verbose_iterations: false,
            verbose_timesteps: false,
            save_state_files: false,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), StrError> {
        if self.mesh_size_frac <= 0.0 || self.mesh_size_min <= 0.0 || self.mesh_size_bound <= 0.0 {
            return Err("mesh size targets must be positive");
        }
        if self.t_fin <= self.t_ini {
            return Err("t_fin must be greater than t_ini");
        }
        if (self.dt)(self.t_ini) <= 0.0 {
            return Err("Δt must be positive");
        }
        if self.n_max_iterations < 1 {
            return Err("at least one Newton iteration must be allowed");
        }
        if self.tol_rr <= 0.0 {
            return Err("the residual tolerance must be positive");
        }
        Ok(())
    }

    /// Prints the header of the Newton iteration table
    pub fn print_header(&self) {
        if self.verbose_iterations {
            println!("{:>10} {:>14} {:>14}", "iteration", "max(R)", "scaled max(R)");
        }
    }

    /// Prints the status of one Newton iteration
    pub fn print_iteration(&self, iteration: usize, max_rr: f64, max_rr_scaled: f64) {
        if self.verbose_iterations {
            println!("{:>10} {:>14.6e} {:>14.6e}", iteration, max_rr, max_rr_scaled);
        }
    }

    /// Prints the status of one time step
    pub fn print_timestep(&self, timestep: usize, t: f64, dt: f64) {
        if self.verbose_timesteps {
            println!("step {:>5}: t = {:>13.6e}, Δt = {:>13.6e}", timestep, t, dt);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
