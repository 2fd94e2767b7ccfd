use super::DofLayout;
use crate::base::{Config, ContactMode, InterfaceGrid, ParameterStore};
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the evolving variables of the simulation
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FvState {
    /// Current time
    pub t: f64,

    /// Current time step size
    pub dt: f64,

    /// Global unknown vector (u, p, p_f, λ)
    pub uu: Vector,

    /// Committed unknown vector of the previous time step
    pub uu_prev: Vector,

    /// Active contact mode of every interface cell
    pub modes: Vec<ContactMode>,

    /// Committed contact modes of the previous time step
    pub modes_prev: Vec<ContactMode>,
}

impl FvState {
    /// Allocates a new instance
    ///
    /// The displacement and pressure blocks start at zero. The contact
    /// traction starts at the prescribed initial normal traction of each
    /// fracture, with all interface cells in sticking mode.
    pub fn new(
        layout: &DofLayout,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        config: &Config,
    ) -> Result<FvState, StrError> {
        if store.fractures.len() != interfaces.len() {
            return Err("one parameter set per fracture is required");
        }
        let t = config.t_ini;
        let mut uu = Vector::new(layout.n_equation);
        for (ifr, ifc) in interfaces.iter().enumerate() {
            let lam_n0 = store.fractures[ifr].contact.initial_normal_traction;
            for j in 0..ifc.num_cells() {
                let k = layout.ifc_index(ifr, j);
                uu[layout.eq_lam(k, 0)] = lam_n0;
            }
        }
        Ok(FvState {
            t,
            dt: (config.dt)(t),
            uu_prev: uu.clone(),
            uu,
            modes: vec![ContactMode::Sticking; layout.n_ifc],
            modes_prev: vec![ContactMode::Sticking; layout.n_ifc],
        })
    }

    /// Reads a JSON file containing the state
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open state file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse state file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory for state file")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create state file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write state file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
