//! Internal Rate of Return (IRR) and Net Present Value (NPV)
//!
//! Used to derive the investment return from the yearly cash-flow vector.
//! The solver runs Newton-Raphson first and falls back to bisection over a
//! fixed bracket when Newton cannot converge.

use thiserror::Error;

/// Newton-Raphson starting point (10% per period)
pub const IRR_INITIAL_GUESS: f64 = 0.10;

/// Convergence threshold on the rate step
pub const IRR_TOLERANCE: f64 = 1e-10;

pub const NEWTON_MAX_ITERATIONS: usize = 50;
pub const BISECTION_MAX_ITERATIONS: usize = 100;

/// Lower end of the bisection bracket (-99% per period)
pub const BISECTION_LOW: f64 = -0.99;

/// Upper end of the bisection bracket (500% per period)
pub const BISECTION_HIGH: f64 = 5.0;

/// Reference discount rate for the reported NPV
pub const NPV_DISCOUNT_RATE: f64 = 0.06;

/// Derivatives smaller than this stop Newton-Raphson
const DERIVATIVE_EPSILON: f64 = 1e-12;

/// The NPV equation has no real root inside the bisection bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no internal rate of return in [{BISECTION_LOW}, {BISECTION_HIGH}]")]
pub struct NoRootFound;

/// Calculate the periodic IRR of a cash-flow series (index 0 = today).
///
/// # Returns
/// * `Ok(rate)` - rate as a decimal (0.05 for 5%)
/// * `Err(NoRootFound)` - Newton failed and the bracket holds no sign change
pub fn calculate_irr(cashflows: &[f64]) -> Result<f64, NoRootFound> {
    if cashflows.len() < 2 {
        return Err(NoRootFound);
    }

    if let Some(rate) = newton_raphson(cashflows) {
        return Ok(rate);
    }

    log::debug!("newton-raphson did not converge, falling back to bisection");
    bisection(cashflows)
}

fn newton_raphson(cashflows: &[f64]) -> Option<f64> {
    let mut rate = IRR_INITIAL_GUESS;

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if !dnpv.is_finite() || dnpv.abs() < DERIVATIVE_EPSILON {
            return None;
        }

        let step = npv / dnpv;
        if !step.is_finite() {
            return None;
        }

        let next = rate - step;
        if next <= -1.0 {
            // Discount factor undefined at or below -100%
            return None;
        }

        if step.abs() < IRR_TOLERANCE {
            return Some(next);
        }

        rate = next;
    }

    None
}

fn bisection(cashflows: &[f64]) -> Result<f64, NoRootFound> {
    let mut low = BISECTION_LOW;
    let mut high = BISECTION_HIGH;
    let mut npv_low = npv(low, cashflows);
    let npv_high = npv(high, cashflows);

    // Also rejects NaN
    if !(npv_low * npv_high < 0.0) {
        return Err(NoRootFound);
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(mid, cashflows);

        if npv_mid == 0.0 || (high - low) / 2.0 < IRR_TOLERANCE {
            return Ok(mid);
        }

        if npv_low * npv_mid < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Ok((low + high) / 2.0)
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Net present value of a cash-flow series at a periodic rate
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, receive 1100 one period later
        let irr = calculate_irr(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_level_annuity_irr() {
        // 1000 buys 5 payments of 250: IRR ≈ 7.93%
        let flows = [-1000.0, 250.0, 250.0, 250.0, 250.0, 250.0];
        let irr = calculate_irr(&flows).unwrap();
        assert_abs_diff_eq!(irr, 0.0793, epsilon = 1e-4);
        assert_abs_diff_eq!(npv(irr, &flows), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_irr() {
        // Only 900 of 1000 recovered
        let irr = calculate_irr(&[-1000.0, 300.0, 300.0, 300.0]).unwrap();
        assert!(irr < 0.0);
        assert_abs_diff_eq!(npv(irr, &[-1000.0, 300.0, 300.0, 300.0]), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_sign_change_has_no_root() {
        assert_eq!(calculate_irr(&[-1000.0, -100.0, -100.0]), Err(NoRootFound));
        assert_eq!(calculate_irr(&[500.0, 100.0, 100.0]), Err(NoRootFound));
    }

    #[test]
    fn test_too_few_cashflows() {
        assert_eq!(calculate_irr(&[]), Err(NoRootFound));
        assert_eq!(calculate_irr(&[-1000.0]), Err(NoRootFound));
    }

    #[test]
    fn test_high_rate() {
        // 300% in one period
        let cashflows = [-100.0, 400.0];
        let irr = calculate_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bisection_directly() {
        let irr = bisection(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_npv_at_reference_rate() {
        let value = npv(NPV_DISCOUNT_RATE, &[-1000.0, 1060.0]);
        assert_abs_diff_eq!(value, 0.0, epsilon = 1e-9);

        let value = npv(NPV_DISCOUNT_RATE, &[-100.0, 50.0, 50.0, 50.0]);
        assert_abs_diff_eq!(value, 33.651, epsilon = 1e-3);
    }
}
