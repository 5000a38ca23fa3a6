//
// rotation.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use std::ops::Mul;

use anyhow::{anyhow, bail, Error};
use approx::AbsDiffEq;
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// The tolerance used when deciding whether two rotations are the same.
///
/// All the rotations used to build a particle are compositions of a handful of right angle,
/// sixth and third turns, so they are equal to within a few ulps or differ by at least
/// `1 - cos(60°)` in some element.
pub const ROTATION_TOLERANCE: f64 = 1e-8;

/// A proper rotation in three dimensions
///
/// Rotations compose like the matrices they wrap, `a * b` is the rotation which applies `b`
/// first and then `a`. Positive angles are counter-clockwise when looking down the axis
/// towards the origin.
///
/// ```
/// use nalgebra::Vector3;
/// use patchy::Rotation;
///
/// let quarter = Rotation::about_z(90.);
/// let y = quarter * Vector3::x();
/// assert!((y - Vector3::y()).norm() < 1e-12);
/// ```
///
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rotation(Rotation3<f64>);

impl From<Rotation3<f64>> for Rotation {
    fn from(rotation: Rotation3<f64>) -> Self {
        Self(rotation)
    }
}

impl From<Rotation> for Rotation3<f64> {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl AbsDiffEq for Rotation {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        ROTATION_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.matrix().abs_diff_eq(other.0.matrix(), epsilon)
    }
}

mul_impl_all!(
    self: Rotation, rhs: Rotation, Output = Rotation;
    [ref ref] => Rotation(self.0 * rhs.0);
);

mul_impl_all!(
    self: Rotation, rhs: Vector3<f64>, Output = Vector3<f64>;
    [ref ref] => self.0 * rhs;
);

impl Rotation {
    pub fn identity() -> Self {
        Self(Rotation3::identity())
    }

    /// A rotation of `degrees` about `axis`.
    pub fn about_axis(axis: &Unit<Vector3<f64>>, degrees: f64) -> Self {
        Self(Rotation3::from_axis_angle(axis, degrees.to_radians()))
    }

    pub fn about_x(degrees: f64) -> Self {
        Self::about_axis(&Vector3::x_axis(), degrees)
    }

    pub fn about_y(degrees: f64) -> Self {
        Self::about_axis(&Vector3::y_axis(), degrees)
    }

    pub fn about_z(degrees: f64) -> Self {
        Self::about_axis(&Vector3::z_axis(), degrees)
    }

    /// Compose elementary rotations about the fixed coordinate axes
    ///
    /// The axes are given as a string of `x`, `y` and `z` characters, one angle (in degrees)
    /// for each character. The first axis in the string is applied first, so `"xy"` with
    /// angles `[a, b]` gives `Ry(b) * Rx(a)`.
    ///
    /// ```
    /// use patchy::Rotation;
    /// let r = Rotation::from_euler("xz", &[180., 90.]).unwrap();
    /// assert!(r.approx_eq(&(Rotation::about_z(90.) * Rotation::about_x(180.))));
    /// ```
    ///
    pub fn from_euler(axes: &str, degrees: &[f64]) -> Result<Self, Error> {
        if axes.is_empty() {
            bail!("No rotation axes given");
        }
        if axes.chars().count() != degrees.len() {
            bail!(
                "Found {} rotation axes in '{}' but {} angles",
                axes.chars().count(),
                axes,
                degrees.len()
            );
        }
        axes.chars()
            .zip(degrees.iter())
            .try_fold(Self::identity(), |acc, (axis, &angle)| {
                let elementary = match axis {
                    'x' => Self::about_x(angle),
                    'y' => Self::about_y(angle),
                    'z' => Self::about_z(angle),
                    x => return Err(anyhow!("Invalid rotation axis '{}' in '{}'", x, axes)),
                };
                Ok(elementary * acc)
            })
    }

    /// Apply the rotation `n` times.
    pub fn powi(&self, n: u32) -> Self {
        (0..n).fold(Self::identity(), |acc, _| self * acc)
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        self.0.matrix()
    }

    /// Compare two rotations using [`ROTATION_TOLERANCE`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, ROTATION_TOLERANCE)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn quarter_turns_are_counter_clockwise() {
        assert_abs_diff_eq!(Rotation::about_z(90.) * Vector3::x(), Vector3::y());
        assert_abs_diff_eq!(Rotation::about_x(90.) * Vector3::y(), Vector3::z());
        assert_abs_diff_eq!(Rotation::about_y(90.) * Vector3::z(), Vector3::x());
    }

    #[test]
    fn composition_applies_right_first() {
        let r = Rotation::about_z(90.) * Rotation::about_x(90.);
        // x is fixed by the rotation about x, then taken to y
        assert_abs_diff_eq!(r * Vector3::x(), Vector3::y(), epsilon = 1e-12);
        // y goes to z first, which the rotation about z leaves alone
        assert_abs_diff_eq!(r * Vector3::y(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn euler_first_axis_first() -> Result<(), Error> {
        let r = Rotation::from_euler("xy", &[-90., -90.])?;
        let expected = Rotation::about_y(-90.) * Rotation::about_x(-90.);
        assert!(r.approx_eq(&expected));
        assert_abs_diff_eq!(r * Vector3::x(), Vector3::z(), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn euler_rejects_bad_input() {
        assert!(Rotation::from_euler("", &[]).is_err());
        assert!(Rotation::from_euler("xy", &[90.]).is_err());
        assert!(Rotation::from_euler("xw", &[90., 90.]).is_err());
    }

    #[test]
    fn powers_cycle() {
        let sixth = Rotation::about_z(60.);
        assert!(sixth.powi(0).approx_eq(&Rotation::identity()));
        assert!(sixth.powi(6).approx_eq(&Rotation::identity()));
        assert!(!sixth.powi(3).approx_eq(&Rotation::identity()));
        assert!(sixth.powi(3).approx_eq(&Rotation::about_z(180.)));
    }

    #[test]
    fn inverse_undoes() {
        let r = Rotation::about_axis(&Unit::new_normalize(Vector3::new(1., 1., 0.)), 180.);
        assert!((r * r.inverse()).approx_eq(&Rotation::identity()));
        assert!(r.approx_eq(&r.inverse()));
    }

    #[test]
    fn distinct_turns_not_equal() {
        assert!(!Rotation::about_z(90.).approx_eq(&Rotation::about_z(-90.)));
        assert!(!Rotation::about_x(180.).approx_eq(&Rotation::about_y(180.)));
    }
}
