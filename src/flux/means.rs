//! Face averages of cell quantities.

/// Harmonic mean `2ab / (a + b)`, or 0 when `a + b == 0`.
///
/// Used for face permeability so that a zero-permeability cell blocks flow.
///
/// # Example
///
/// ```
/// use richards_fv::flux::harmonic_mean;
///
/// assert_eq!(harmonic_mean(1.0, 1.0), 1.0);
/// assert_eq!(harmonic_mean(1.0, 0.0), 0.0);
/// assert_eq!(harmonic_mean(0.0, 0.0), 0.0);
/// ```
#[inline]
pub fn harmonic_mean(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum != 0.0 { 2.0 * a * b / sum } else { 0.0 }
}

/// Upstream selection: `up` if `a - b >= 0`, otherwise `down`.
///
/// `a` and `b` are the potentials on either side of the face; ties select
/// the first cell.
#[inline]
pub fn upstream_mean(a: f64, b: f64, up: f64, down: f64) -> f64 {
    if a - b >= 0.0 { up } else { down }
}
