use crate::base::ContactMode;

/// Holds the linearization of the contact conditions of one interface cell
///
/// The residual and its generalized derivatives are expressed in the local
/// frame: component 0 is normal and component 1 is tangential. Tractions
/// are tension-positive and the normal gap is positive when the fracture
/// is open.
#[derive(Clone, Debug)]
pub struct ContactResponse {
    /// Active mode of the complementarity function
    pub mode: ContactMode,

    /// Residual of the two contact equations
    pub rr: [f64; 2],

    /// Derivative of the residual with respect to (λ_n, λ_t)
    pub d_lam: [[f64; 2]; 2],

    /// Derivative of the residual with respect to the jump (u_n, u_t)
    pub d_jump: [[f64; 2]; 2],
}

/// Evaluates the semismooth contact complementarity function
///
/// The case split follows the augmented quantities qn = λ_n + c u_n and
/// qt = λ_t + c (u_t - u_t_prev):
///
/// * qn ≥ 0       -> open: the traction vanishes
/// * |qt| ≤ -μ qn -> sticking: the jump is frozen (no opening, no slip increment)
/// * otherwise    -> sliding: no opening and the tangential traction sits
///                   on the friction cone, aligned with qt
///
/// At a sliding point the direction qt/|qt| is frozen, which yields one
/// element of the generalized Jacobian. The sticking rows are scaled by c
/// so that all contact equations carry traction units.
pub fn eval_contact(
    lam_n: f64,
    lam_t: f64,
    un: f64,
    ut: f64,
    ut_prev: f64,
    friction: f64,
    c: f64,
) -> ContactResponse {
    let qn = lam_n + c * un;
    if qn >= 0.0 {
        return ContactResponse {
            mode: ContactMode::Open,
            rr: [lam_n, lam_t],
            d_lam: [[1.0, 0.0], [0.0, 1.0]],
            d_jump: [[0.0, 0.0], [0.0, 0.0]],
        };
    }
    let bound = -friction * qn;
    let qt = lam_t + c * (ut - ut_prev);
    if f64::abs(qt) <= bound {
        return ContactResponse {
            mode: ContactMode::Sticking,
            rr: [c * un, c * (ut - ut_prev)],
            d_lam: [[0.0, 0.0], [0.0, 0.0]],
            d_jump: [[c, 0.0], [0.0, c]],
        };
    }
    let dir = qt / f64::max(f64::abs(qt), 1e-12);
    ContactResponse {
        mode: ContactMode::Sliding,
        rr: [c * un, lam_t + friction * qn * dir],
        d_lam: [[0.0, 0.0], [friction * dir, 1.0]],
        d_jump: [[c, 0.0], [friction * c * dir, 0.0]],
    }
}

/// Returns the mode the complementarity function would select at a point
pub fn trial_mode(lam_n: f64, lam_t: f64, un: f64, ut: f64, ut_prev: f64, friction: f64, c: f64) -> ContactMode {
    eval_contact(lam_n, lam_t, un, ut, ut_prev, friction, c).mode
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{eval_contact, trial_mode};
    use crate::base::ContactMode;
    use russell_lab::approx_eq;

    #[test]
    fn open_case_works() {
        // positive gap dominates the (compressive) traction
        let res = eval_contact(-1.0, 0.3, 0.1, 0.0, 0.0, 0.5, 100.0);
        assert_eq!(res.mode, ContactMode::Open);
        approx_eq(res.rr[0], -1.0, 1e-15);
        approx_eq(res.rr[1], 0.3, 1e-15);
        assert_eq!(res.d_lam, [[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(res.d_jump, [[0.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn sticking_case_works() {
        // compressed, small tangential traction: the jump must freeze
        let res = eval_contact(-100.0, 10.0, 0.0, 2e-3, 1e-3, 0.5, 100.0);
        assert_eq!(res.mode, ContactMode::Sticking);
        approx_eq(res.rr[0], 0.0, 1e-15);
        approx_eq(res.rr[1], 100.0 * 1e-3, 1e-15);
        assert_eq!(res.d_jump, [[100.0, 0.0], [0.0, 100.0]]);
    }

    #[test]
    fn sliding_case_works() {
        // tangential traction beyond the friction bound
        let lam_n = -100.0;
        let lam_t = 80.0;
        let res = eval_contact(lam_n, lam_t, 0.0, 0.0, 0.0, 0.5, 100.0);
        assert_eq!(res.mode, ContactMode::Sliding);
        // qt = 80 > 50 = -μ qn, dir = +1: r_t = λ_t + μ qn = 80 - 50
        approx_eq(res.rr[1], 30.0, 1e-13);
        approx_eq(res.d_lam[1][0], 0.5, 1e-15);
        approx_eq(res.d_lam[1][1], 1.0, 1e-15);
        approx_eq(res.d_jump[1][0], 50.0, 1e-13);
        // negative slip flips the direction
        let res = eval_contact(lam_n, -lam_t, 0.0, 0.0, 0.0, 0.5, 100.0);
        approx_eq(res.rr[1], -30.0, 1e-13);
        approx_eq(res.d_lam[1][0], -0.5, 1e-15);
    }

    #[test]
    fn sliding_residual_sits_on_the_cone() {
        // a converged sliding point satisfies |λ_t| = μ |λ_n| with zero gap
        let friction = 0.5;
        let lam_n = -40.0;
        let lam_t = friction * 40.0;
        let res = eval_contact(lam_n, lam_t, 0.0, 1e-3, 0.0, friction, 100.0);
        assert_eq!(res.mode, ContactMode::Sliding);
        approx_eq(res.rr[0], 0.0, 1e-15);
        approx_eq(res.rr[1], 0.0, 1e-13);
    }

    #[test]
    fn trial_mode_works() {
        assert_eq!(trial_mode(1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 100.0), ContactMode::Open);
        assert_eq!(trial_mode(-1.0, 0.0, 0.0, 0.0, 0.0, 0.5, 100.0), ContactMode::Sticking);
        assert_eq!(trial_mode(-1.0, 2.0, 0.0, 0.0, 0.0, 0.5, 100.0), ContactMode::Sliding);
    }
}
