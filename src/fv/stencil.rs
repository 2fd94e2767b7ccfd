use crate::base::{Grid, InterfaceGrid, ParamElasticity};
use crate::StrError;
use russell_tensor::Tensor2;

/// Returns the normal projection n·K·n of a permeability tensor
pub fn normal_permeability(kk: &Tensor2, normal: &[f64; 2]) -> f64 {
    let mut res = 0.0;
    for i in 0..2 {
        for j in 0..2 {
            res += normal[i] * kk.get(i, j) * normal[j];
        }
    }
    res
}

/// Returns the harmonic average of two half coefficients
pub fn harmonic(a: f64, b: f64) -> f64 {
    if a + b > 0.0 {
        a * b / (a + b)
    } else {
        0.0
    }
}

fn normal_distance(cell_center: &[f64; 2], point: &[f64; 2], normal: &[f64; 2]) -> f64 {
    f64::abs((point[0] - cell_center[0]) * normal[0] + (point[1] - cell_center[1]) * normal[1])
}

/// Computes the half (cell-to-point) flow transmissibility
pub fn half_transmissibility_flow(
    cell_center: &[f64; 2],
    point: &[f64; 2],
    normal: &[f64; 2],
    area: f64,
    kk: &Tensor2,
    viscosity: f64,
) -> Result<f64, StrError> {
    let dist = normal_distance(cell_center, point, normal);
    if dist <= 0.0 {
        return Err("cell center must not lie on the face");
    }
    Ok(area * normal_permeability(kk, normal) / (viscosity * dist))
}

/// Computes the two-point flow transmissibility of every face
///
/// Interior faces use the harmonic average of the two half coefficients;
/// boundary faces carry the half coefficient of their single cell (used
/// by Dirichlet conditions).
pub fn flow_transmissibilities(grid: &Grid, permeability: &[Tensor2], viscosity: f64) -> Result<Vec<f64>, StrError> {
    let mut trans = Vec::with_capacity(grid.num_faces());
    for face in &grid.faces {
        let t_low = half_transmissibility_flow(
            &grid.cell_centers[face.low],
            &face.center,
            &face.normal,
            face.area,
            &permeability[face.low],
            viscosity,
        )?;
        let t = match face.high {
            Some(high) => {
                let t_high = half_transmissibility_flow(
                    &grid.cell_centers[high],
                    &face.center,
                    &face.normal,
                    face.area,
                    &permeability[high],
                    viscosity,
                )?;
                harmonic(t_low, t_high)
            }
            None => t_low,
        };
        trans.push(t);
    }
    Ok(trans)
}

/// Computes the two-point normal/tangential stress stiffness of every face
///
/// The normal stiffness uses (λ + 2G) and the tangential stiffness uses G,
/// per unit normal distance, times the face area. This stands in for the
/// multi-point stress stencil, which is consumed as a black box.
pub fn stress_stiffnesses(grid: &Grid, elasticity: &ParamElasticity) -> Result<Vec<(f64, f64)>, StrError> {
    let (lambda, shear) = elasticity.lame();
    if shear <= 0.0 {
        return Err("shear modulus must be positive");
    }
    let mut stiff = Vec::with_capacity(grid.num_faces());
    for face in &grid.faces {
        let d_low = normal_distance(&grid.cell_centers[face.low], &face.center, &face.normal);
        if d_low <= 0.0 {
            return Err("cell center must not lie on the face");
        }
        let kn_low = face.area * (lambda + 2.0 * shear) / d_low;
        let kt_low = face.area * shear / d_low;
        let (kn, kt) = match face.high {
            Some(high) => {
                let d_high = normal_distance(&grid.cell_centers[high], &face.center, &face.normal);
                if d_high <= 0.0 {
                    return Err("cell center must not lie on the face");
                }
                let kn_high = face.area * (lambda + 2.0 * shear) / d_high;
                let kt_high = face.area * shear / d_high;
                (harmonic(kn_low, kn_high), harmonic(kt_low, kt_high))
            }
            None => (kn_low, kt_low),
        };
        stiff.push((kn, kt));
    }
    Ok(stiff)
}

/// Computes the half transmissibility from a bulk cell into an interface cell
pub fn interface_half_transmissibility(
    grid: &Grid,
    ifc: &InterfaceGrid,
    cell: usize,
    j: usize,
    kk: &Tensor2,
    viscosity: f64,
) -> Result<f64, StrError> {
    half_transmissibility_flow(
        &grid.cell_centers[cell],
        &ifc.centers[j],
        &ifc.normals[j],
        ifc.areas[j],
        kk,
        viscosity,
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{flow_transmissibilities, harmonic, normal_permeability, stress_stiffnesses};
    use crate::base::{ParamElasticity, ParameterStore, SampleGrids};
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2};

    #[test]
    fn normal_permeability_works() {
        let mut kk = Tensor2::new(Mandel::Symmetric2D);
        kk.sym_set(0, 0, 2.0);
        kk.sym_set(1, 1, 3.0);
        kk.sym_set(0, 1, 0.5);
        approx_eq(normal_permeability(&kk, &[1.0, 0.0]), 2.0, 1e-15);
        approx_eq(normal_permeability(&kk, &[0.0, 1.0]), 3.0, 1e-15);
        let s = f64::sqrt(0.5);
        approx_eq(normal_permeability(&kk, &[s, s]), 0.5 * (2.0 + 3.0) + 0.5, 1e-14);
    }

    #[test]
    fn harmonic_works() {
        approx_eq(harmonic(2.0, 2.0), 1.0, 1e-15);
        assert_eq!(harmonic(0.0, 0.0), 0.0);
    }

    #[test]
    fn flow_transmissibilities_work() {
        // unit cells, k = 1, viscosity = 1: half = area * 1 / 0.5 = 2, interior = 1
        let grid = SampleGrids::cartesian_2d(2, 1, 2.0, 1.0).unwrap();
        let perm = ParameterStore::isotropic_permeability(&grid, 1.0);
        let trans = flow_transmissibilities(&grid, &perm, 1.0).unwrap();
        // face 1 is the interior vertical face
        approx_eq(trans[1], 1.0, 1e-15);
        // face 0 is the west boundary face (half coefficient)
        approx_eq(trans[0], 2.0, 1e-15);
    }

    #[test]
    fn stress_stiffnesses_work() {
        let grid = SampleGrids::cartesian_2d(2, 1, 2.0, 1.0).unwrap();
        let elast = ParamElasticity {
            young: 2.5,
            poisson: 0.25,
        };
        // λ = 1, G = 1 (see parameters tests)
        let stiff = stress_stiffnesses(&grid, &elast).unwrap();
        let (kn, kt) = stiff[1]; // interior face, harmonic of (3/0.5, 3/0.5) and (1/0.5, 1/0.5)
        approx_eq(kn, 3.0, 1e-15);
        approx_eq(kt, 1.0, 1e-15);
        let (kn, kt) = stiff[0]; // boundary face
        approx_eq(kn, 6.0, 1e-15);
        approx_eq(kt, 2.0, 1e-15);
    }
}
