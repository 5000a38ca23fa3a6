//
// catalog.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use anyhow::{bail, Error};
use log::debug;

use crate::Rotation;

/// The rotations realising every orientation of a particle
///
/// Each orientation is identified with the face which sits in the reference position (pointing
/// along bond 0) when the particle has that orientation. The first half of the catalog holds the
/// "front" orientations, the composition `S_j * G_i` of every stabilizer with every generator
/// stored at index `i * |S| + j`. The second half holds the back of each front orientation,
/// `opposite * front`, at index `front + n / 2`.
///
#[derive(Debug, Clone)]
pub struct RotationCatalog {
    rotations: Vec<Rotation>,
    n_generators: usize,
    n_stabilizers: usize,
}

impl RotationCatalog {
    pub fn new(
        generators: &[Rotation],
        stabilizers: &[Rotation],
        opposite: &Rotation,
    ) -> Result<Self, Error> {
        if generators.is_empty() {
            bail!("A particle needs at least one generator rotation");
        }
        if stabilizers.is_empty() {
            bail!("A particle needs at least one stabilizer rotation");
        }

        let front: Vec<Rotation> = generators
            .iter()
            .flat_map(|g| stabilizers.iter().map(move |s| s * g))
            .collect();
        let back: Vec<Rotation> = front.iter().map(|f| opposite * f).collect();

        let mut rotations = front;
        rotations.extend(back);

        for (i, a) in rotations.iter().enumerate() {
            if let Some(j) = rotations[i + 1..].iter().position(|b| a.approx_eq(b)) {
                bail!(
                    "Orientations {} and {} have the same rotation, the generator and stabilizer \
                     tables do not describe distinct orientations",
                    i,
                    i + 1 + j
                );
            }
        }
        debug!(
            "Built rotation catalog with {} orientations from {} generators and {} stabilizers",
            rotations.len(),
            generators.len(),
            stabilizers.len()
        );

        Ok(Self {
            rotations,
            n_generators: generators.len(),
            n_stabilizers: stabilizers.len(),
        })
    }

    /// Find the orientation with this rotation
    ///
    /// This is a linear scan over the catalog. A `None` result for a rotation built from the
    /// catalog itself means the particle tables are inconsistent.
    pub fn identify(&self, rotation: &Rotation) -> Option<usize> {
        self.rotations.iter().position(|r| r.approx_eq(rotation))
    }

    pub fn rotation(&self, orientation: usize) -> &Rotation {
        &self.rotations[orientation]
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn n_generators(&self) -> usize {
        self.n_generators
    }

    pub fn n_stabilizers(&self) -> usize {
        self.n_stabilizers
    }
}
