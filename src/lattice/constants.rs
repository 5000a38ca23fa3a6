//
// constants.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! The fixed tables describing each lattice and the particle living on it
//!
//! Bond `b` is always ordered so that the bond rotation `b` takes the direction of bond `b` onto
//! the direction of bond 0. The bond rotations are the generators followed by the opposite
//! rotation applied to each generator, which makes the second half of the bonds the negatives
//! of the first half.

use anyhow::Error;
use nalgebra::Matrix3;

use super::LatticeName;
use crate::particle::ParticleSpec;
use crate::Rotation;

const CHAIN_BONDS: [[i64; 3]; 2] = [[1, 0, 0], [-1, 0, 0]];

const SQUARE_BONDS: [[i64; 3]; 4] = [[1, 0, 0], [0, 1, 0], [-1, 0, 0], [0, -1, 0]];

/// The engine's hexagonal neighbours, with the second lattice vector at 120° to the first.
const TRIANGULAR_BONDS: [[i64; 3]; 6] = [
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [-1, 0, 0],
    [-1, -1, 0],
    [0, -1, 0],
];

const CUBIC_BONDS: [[i64; 3]; 6] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
];

const FCC_BONDS: [[i64; 3]; 12] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, -1],
    [1, -1, 0],
    [0, 1, -1],
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [-1, 0, 1],
    [-1, 1, 0],
    [0, -1, 1],
];

/// The bond displacements of a lattice in lattice coordinates.
pub fn bonds(name: LatticeName) -> &'static [[i64; 3]] {
    match name {
        LatticeName::Chain => &CHAIN_BONDS,
        LatticeName::Square => &SQUARE_BONDS,
        LatticeName::Triangular => &TRIANGULAR_BONDS,
        LatticeName::Cubic => &CUBIC_BONDS,
        LatticeName::Fcc => &FCC_BONDS,
    }
}

/// The lattice vectors, stored as the columns of the matrix.
pub fn basis(name: LatticeName) -> Matrix3<f64> {
    match name {
        LatticeName::Chain | LatticeName::Square | LatticeName::Cubic => Matrix3::identity(),
        #[rustfmt::skip]
        LatticeName::Triangular => Matrix3::new(
            1., -0.5, 0.,
            0., f64::sqrt(3.) / 2., 0.,
            0., 0., 1.,
        ),
        #[rustfmt::skip]
        LatticeName::Fcc => Matrix3::new(
            1., 0., 1.,
            1., 1., 0.,
            0., 1., 1.,
        ),
    }
}

fn with_opposite_bonds(
    generators: Vec<Rotation>,
    stabilizers: Vec<Rotation>,
    opposite: Rotation,
) -> ParticleSpec {
    let bond_rotations = generators
        .iter()
        .copied()
        .chain(generators.iter().map(|g| opposite * g))
        .collect();
    ParticleSpec {
        generators,
        stabilizers,
        opposite,
        bond_rotations,
    }
}

/// The generator, stabilizer and bond rotations of the particle for a lattice
///
/// - chain: a rod with two ends
/// - square: a square with four sides, each side has no further symmetry
/// - triangular: a hexagon with six sides
/// - cubic: a cube, each face has four distinct spins about its normal
/// - fcc: a rhombic dodecahedron, each face has two distinct spins about its normal
///
pub fn particle_spec(name: LatticeName) -> Result<ParticleSpec, Error> {
    let opposite = Rotation::about_z(180.);
    let spec = match name {
        LatticeName::Chain => {
            with_opposite_bonds(vec![Rotation::identity()], vec![Rotation::identity()], opposite)
        }
        LatticeName::Square => with_opposite_bonds(
            vec![Rotation::identity(), Rotation::about_z(-90.)],
            vec![Rotation::identity()],
            opposite,
        ),
        LatticeName::Triangular => {
            let sixth = Rotation::about_z(-60.);
            with_opposite_bonds(
                vec![Rotation::identity(), sixth, sixth.powi(2)],
                vec![Rotation::identity()],
                opposite,
            )
        }
        LatticeName::Cubic => {
            let spin = Rotation::about_x(-90.);
            with_opposite_bonds(
                vec![
                    Rotation::identity(),
                    Rotation::about_z(-90.),
                    Rotation::about_y(90.),
                ],
                (0..4).map(|j| spin.powi(j)).collect(),
                opposite,
            )
        }
        LatticeName::Fcc => {
            // Cyclic permutations of the axes, (x, y, z) -> (y, z, x) and (x, y, z) -> (y, -z, -x)
            let a = Rotation::from_euler("xy", &[-90., -90.])?;
            let b = Rotation::from_euler("xy", &[90., 90.])?;
            with_opposite_bonds(
                vec![
                    Rotation::identity(),
                    a,
                    a.powi(2),
                    b,
                    b.powi(2),
                    Rotation::about_z(-90.),
                ],
                vec![Rotation::identity(), Rotation::from_euler("xz", &[180., 90.])?],
                opposite,
            )
        }
    };
    Ok(spec)
}
