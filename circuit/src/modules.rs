//! Arithmetic building blocks over little-endian bit vectors of wires.
//!
//! Every function registers its gates on `circ` and returns the wires that
//! carry the result; bit 0 is the least significant bit.

use crate::circuit::Circuit;
use crate::errors::CircuitBuildError;

fn check_widths(x: &[usize], y: &[usize]) -> Result<(), CircuitBuildError> {
    if x.len() != y.len() {
        return Err(CircuitBuildError::WidthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(CircuitBuildError::EmptyOperand);
    }
    Ok(())
}

/// Returns `(sum, carry)`.
pub fn half_adder(
    circ: &mut Circuit,
    a: usize,
    b: usize,
) -> Result<(usize, usize), CircuitBuildError> {
    let sum = circ.xor(a, b)?;
    let carry = circ.and(a, b)?;
    Ok((sum, carry))
}

/// Returns `(sum, carry)` of `a + b + carry_in`.
pub fn full_adder(
    circ: &mut Circuit,
    a: usize,
    b: usize,
    carry_in: usize,
) -> Result<(usize, usize), CircuitBuildError> {
    let (s1, c1) = half_adder(circ, a, b)?;
    let (sum, c2) = half_adder(circ, s1, carry_in)?;
    let carry = circ.or(c1, c2)?;
    Ok((sum, carry))
}

/// Ripple-carry `x + y + carry_in`; returns the sum bits and the carry out.
pub fn add_with_carry(
    circ: &mut Circuit,
    x: &[usize],
    y: &[usize],
    carry_in: Option<usize>,
) -> Result<(Vec<usize>, usize), CircuitBuildError> {
    check_widths(x, y)?;
    let mut out = Vec::with_capacity(x.len());
    let (s, mut carry) = match carry_in {
        Some(c) => full_adder(circ, x[0], y[0], c)?,
        None => half_adder(circ, x[0], y[0])?,
    };
    out.push(s);
    for (a, b) in x.iter().zip(y.iter()).skip(1) {
        let (s, c) = full_adder(circ, *a, *b, carry)?;
        out.push(s);
        carry = c;
    }
    Ok((out, carry))
}

/// `(x + y) mod 2^n`.
pub fn add(circ: &mut Circuit, x: &[usize], y: &[usize]) -> Result<Vec<usize>, CircuitBuildError> {
    add_with_carry(circ, x, y, None).map(|(sum, _)| sum)
}

/// Two's-complement negation `(-x) mod 2^n`. `one` must carry constant 1.
pub fn negate(
    circ: &mut Circuit,
    x: &[usize],
    one: usize,
) -> Result<Vec<usize>, CircuitBuildError> {
    if x.is_empty() {
        return Err(CircuitBuildError::EmptyOperand);
    }
    let mut out = Vec::with_capacity(x.len());
    let mut carry = one;
    for a in x {
        let na = circ.not(*a)?;
        let (s, c) = half_adder(circ, na, carry)?;
        out.push(s);
        carry = c;
    }
    Ok(out)
}

/// `(x - y) mod 2^n`, computed as `x + !y + 1`. `one` must carry constant 1.
pub fn subtract(
    circ: &mut Circuit,
    x: &[usize],
    y: &[usize],
    one: usize,
) -> Result<Vec<usize>, CircuitBuildError> {
    check_widths(x, y)?;
    let ny = y
        .iter()
        .map(|b| circ.not(*b))
        .collect::<Result<Vec<usize>, _>>()?;
    add_with_carry(circ, x, &ny, Some(one)).map(|(diff, _)| diff)
}

/// Unsigned `x < y`, one AND gate per bit and no constant wires.
pub fn less_than(circ: &mut Circuit, x: &[usize], y: &[usize]) -> Result<usize, CircuitBuildError> {
    check_widths(x, y)?;
    // lt_i = (x_i != y_i) ? y_i : lt_{i-1}
    let d = circ.xor(x[0], y[0])?;
    let mut lt = circ.and(d, y[0])?;
    for (a, b) in x.iter().zip(y.iter()).skip(1) {
        let d = circ.xor(*a, *b)?;
        let t = circ.xor(*b, lt)?;
        let m = circ.and(d, t)?;
        lt = circ.xor(lt, m)?;
    }
    Ok(lt)
}

/// OR of all bits of `x`, as a balanced tree.
pub fn to_bool(circ: &mut Circuit, x: &[usize]) -> Result<usize, CircuitBuildError> {
    match x.len() {
        0 => Err(CircuitBuildError::EmptyOperand),
        1 => Ok(x[0]),
        n => {
            let l = to_bool(circ, &x[..n / 2])?;
            let r = to_bool(circ, &x[n / 2..])?;
            circ.or(l, r)
        }
    }
}

/// Multiplexer: `a` when `sel` is 0, `b` when `sel` is 1.
pub fn select(
    circ: &mut Circuit,
    a: usize,
    b: usize,
    sel: usize,
) -> Result<usize, CircuitBuildError> {
    let d = circ.xor(a, b)?;
    let m = circ.and(sel, d)?;
    circ.xor(a, m)
}

/// Little-endian bits of the low `n` bits of `x`.
pub fn int_to_bits(x: u128, n: usize) -> Vec<bool> {
    (0..n).map(|i| i < 128 && (x >> i) & 1 == 1).collect()
}

/// Integer value of little-endian `bits`; bits past 128 are ignored.
pub fn bits_to_int(bits: &[bool]) -> u128 {
    bits.iter()
        .take(128)
        .enumerate()
        .fold(0u128, |acc, (i, b)| acc | ((*b as u128) << i))
}
