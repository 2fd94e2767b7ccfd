use super::{interface_half_transmissibility, DofLayout, OperatorBlock};
use crate::base::{Grid, InterfaceGrid, OperatorKind, ParameterStore, Variable};
use crate::StrError;
use russell_lab::Vector;

/// Returns the normal and tangential components of the displacement jump
///
/// The jump is u_high - u_low, projected onto the local frame of the
/// interface cell (normal points from the low side to the high side).
pub fn displacement_jump(ifc: &InterfaceGrid, j: usize, layout: &DofLayout, uu: &Vector) -> (f64, f64) {
    let (low, high) = ifc.cell_map[j];
    let n = ifc.normals[j];
    let t = ifc.tangent(j);
    let mut un = 0.0;
    let mut ut = 0.0;
    for a in 0..2 {
        let du = uu[layout.eq_u(high, a)] - uu[layout.eq_u(low, a)];
        un += du * n[a];
        ut += du * t[a];
    }
    (un, ut)
}

/// Holds the interface coupling operator blocks
///
/// These blocks tie the fracture unknowns (p_f, λ) to the bulk unknowns:
/// the mortar traction and the fracture pressure load the bulk momentum
/// balance, the bulk and fracture pressures exchange fluid through half
/// transmissibilities (the mortar flux is eliminated locally), the
/// fracture carries its own tangential flow and storage, and the normal
/// displacement jump changes the fracture volume. The contact conditions
/// themselves (the λ rows) are nonlinear and assembled separately.
pub struct InterfaceOperators {
    pub all: Vec<OperatorBlock>,
}

impl InterfaceOperators {
    /// Builds the interface coupling blocks
    pub fn new(
        grid: &Grid,
        interfaces: &[InterfaceGrid],
        store: &ParameterStore,
        layout: &DofLayout,
        dt: f64,
        uu_prev: &Vector,
    ) -> Result<Self, StrError> {
        if dt <= 0.0 {
            return Err("Δt must be positive");
        }
        if store.fractures.len() != interfaces.len() {
            return Err("one parameter set per fracture is required");
        }
        let ndim = grid.ndim;
        let nu = ndim * layout.n_cell;
        let np = layout.n_cell;
        let npf = layout.n_ifc;
        let alpha = store.mechanics.biot_alpha;

        let mut mortar_u = OperatorBlock::new(OperatorKind::MortarTraction, Variable::U, Variable::Lam, nu, ndim * npf);
        let mut mortar_p = OperatorBlock::new(OperatorKind::MortarTraction, Variable::U, Variable::Pf, nu, npf);
        let mut div_u = OperatorBlock::new(OperatorKind::DisplacementDivergence, Variable::P, Variable::U, np, nu);
        let mut flux_pp = OperatorBlock::new(OperatorKind::FluxContinuity, Variable::P, Variable::P, np, np);
        let mut flux_ppf = OperatorBlock::new(OperatorKind::FluxContinuity, Variable::P, Variable::Pf, np, npf);
        let mut flux_pfp = OperatorBlock::new(OperatorKind::FluxContinuity, Variable::Pf, Variable::P, npf, np);
        let mut flux_pfpf = OperatorBlock::new(OperatorKind::FluxContinuity, Variable::Pf, Variable::Pf, npf, npf);
        let mut balance = OperatorBlock::new(OperatorKind::FractureMassBalance, Variable::Pf, Variable::Pf, npf, npf);
        let mut jump = OperatorBlock::new(OperatorKind::JumpDivergence, Variable::Pf, Variable::U, npf, nu);

        for (ifr, ifc) in interfaces.iter().enumerate() {
            let params = &store.fractures[ifr];
            let visc = params.flow.viscosity;
            for j in 0..ifc.num_cells() {
                let row_pf = layout.ifc_index(ifr, j);
                let (low, high) = ifc.cell_map[j];
                let n = ifc.normals[j];
                let t = ifc.tangent(j);
                let area = ifc.areas[j];

                // contact traction and fracture pressure act on both walls:
                // force on the low cell is ((λ_n - p_f) n + λ_t t) A and the
                // high cell receives the opposite
                for a in 0..ndim {
                    mortar_u.put(low * ndim + a, row_pf * ndim, -n[a] * area);
                    mortar_u.put(low * ndim + a, row_pf * ndim + 1, -t[a] * area);
                    mortar_u.put(high * ndim + a, row_pf * ndim, n[a] * area);
                    mortar_u.put(high * ndim + a, row_pf * ndim + 1, t[a] * area);
                    mortar_p.put(low * ndim + a, row_pf, n[a] * area);
                    mortar_p.put(high * ndim + a, row_pf, -n[a] * area);
                }

                // completes the bulk div-u around cells walled by the
                // fracture; the wall moves with the cell itself
                for a in 0..ndim {
                    let c = alpha * area * n[a];
                    div_u.put(low, low * ndim + a, c);
                    div_u.rhs[low] += c * uu_prev[layout.eq_u(low, a)];
                    div_u.put(high, high * ndim + a, -c);
                    div_u.rhs[high] -= c * uu_prev[layout.eq_u(high, a)];
                }

                // fluid exchange with both walls (half transmissibilities)
                let t_low = interface_half_transmissibility(grid, ifc, low, j, &store.flow.permeability[low], visc)?;
                let t_high = interface_half_transmissibility(grid, ifc, high, j, &store.flow.permeability[high], visc)?;
                flux_pp.put(low, low, dt * t_low);
                flux_ppf.put(low, row_pf, -dt * t_low);
                flux_pp.put(high, high, dt * t_high);
                flux_ppf.put(high, row_pf, -dt * t_high);
                flux_pfp.put(row_pf, low, -dt * t_low);
                flux_pfp.put(row_pf, high, -dt * t_high);
                flux_pfpf.put(row_pf, row_pf, dt * (t_low + t_high));

                // fracture storage on the pressure increment
                let s_coeff = params.flow.storativity * area * params.flow.aperture;
                balance.put(row_pf, row_pf, s_coeff);
                balance.rhs[row_pf] += s_coeff * uu_prev[layout.eq_pf(row_pf)];

                // opening of the walls changes the fracture volume
                for a in 0..ndim {
                    let c = area * n[a];
                    jump.put(row_pf, high * ndim + a, c);
                    jump.put(row_pf, low * ndim + a, -c);
                    jump.rhs[row_pf] += c * (uu_prev[layout.eq_u(high, a)] - uu_prev[layout.eq_u(low, a)]);
                }
            }

            // tangential flow along the fracture (two-point, cubic-law style
            // transmissibility with a fixed hydraulic aperture)
            for &(ja, jb) in &ifc.neighbors {
                let row_a = layout.ifc_index(ifr, ja);
                let row_b = layout.ifc_index(ifr, jb);
                let dx = ifc.centers[jb][0] - ifc.centers[ja][0];
                let dy = ifc.centers[jb][1] - ifc.centers[ja][1];
                let dist = f64::sqrt(dx * dx + dy * dy);
                if dist <= 0.0 {
                    return Err("interface neighbor cells must have distinct centers");
                }
                let tt = dt * params.flow.aperture * params.flow.permeability / (visc * dist);
                balance.put(row_a, row_a, tt);
                balance.put(row_a, row_b, -tt);
                balance.put(row_b, row_b, tt);
                balance.put(row_b, row_a, -tt);
            }
        }

        let all = vec![
            mortar_u, mortar_p, div_u, flux_pp, flux_ppf, flux_pfp, flux_pfpf, balance, jump,
        ];
        for block in &all {
            block.check_dims(layout)?;
        }
        Ok(InterfaceOperators { all })
    }

    /// Returns the total number of matrix entries over all blocks
    pub fn nnz(&self) -> usize {
        self.all.iter().map(|b| b.nnz()).sum()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
