//
// particle.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use std::sync::OnceLock;

use anyhow::{anyhow, bail, Error};
use itertools::iproduct;
use log::debug;

use crate::catalog::RotationCatalog;
use crate::lattice::{constants, LatticeName};
use crate::Rotation;

/// The rotations which define a particle on a lattice
///
/// The generators take the reference face to each face pointing along a positive bond, the
/// stabilizers leave the reference face in place while spinning the particle about the bond,
/// and the opposite rotation takes a face to the face on the other side of the particle. The
/// bond rotations, one for each bond of the lattice, align the bond with the reference bond.
///
#[derive(Debug, Clone)]
pub struct ParticleSpec {
    pub generators: Vec<Rotation>,
    pub stabilizers: Vec<Rotation>,
    pub opposite: Rotation,
    pub bond_rotations: Vec<Rotation>,
}

/// The orientation algebra of one particle shape on one lattice
///
/// All the rotations are resolved to integer tables when the geometry is constructed, after
/// which every query is a table lookup. Construction fails when any composed rotation can't be
/// identified with an orientation, there is no fallback for malformed tables.
///
#[derive(Debug, Clone)]
pub struct ParticleGeometry {
    catalog: RotationCatalog,
    /// `composition[r][o]` is the orientation of `rotation(r) * rotation(o)`
    composition: Vec<Vec<usize>>,
    /// `bond_permutations[b][o]` is the face pointing along bond `b` in orientation `o`
    bond_permutations: Vec<Vec<usize>>,
    /// Indexed by `face1 * n_orientations + face2`
    equivalent_pairs: Vec<Vec<(usize, usize)>>,
}

fn identify_or_fail(
    catalog: &RotationCatalog,
    rotation: &Rotation,
    context: impl FnOnce() -> String,
) -> Result<usize, Error> {
    catalog
        .identify(rotation)
        .ok_or_else(|| anyhow!("Unable to identify the rotation of {}", context()))
}

impl ParticleGeometry {
    pub fn new(spec: &ParticleSpec) -> Result<Self, Error> {
        if !spec.stabilizers.iter().any(|s| s.approx_eq(&Rotation::identity())) {
            bail!("The stabilizer rotations have to include the identity");
        }
        if spec.bond_rotations.is_empty() {
            bail!("A particle needs at least one bond rotation");
        }

        let catalog = RotationCatalog::new(&spec.generators, &spec.stabilizers, &spec.opposite)?;
        let n = catalog.len();
        let rotations = catalog.rotations();

        let composition = rotations
            .iter()
            .enumerate()
            .map(|(r, rot)| {
                rotations
                    .iter()
                    .enumerate()
                    .map(|(o, orient)| {
                        identify_or_fail(&catalog, &(rot * orient), || {
                            format!("rotation {} applied to orientation {}", r, o)
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bond_permutations = spec
            .bond_rotations
            .iter()
            .enumerate()
            .map(|(b, bond)| {
                rotations
                    .iter()
                    .enumerate()
                    .map(|(o, orient)| {
                        identify_or_fail(&catalog, &(bond * orient), || {
                            format!("bond {} with orientation {}", b, o)
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let opposite = |face: usize| (face + n / 2) % n;
        let equivalent_pairs = iproduct!(0..n, 0..n)
            .map(|(face1, face2)| -> Result<Vec<(usize, usize)>, Error> {
                let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(spec.stabilizers.len());
                for stabilizer in spec.stabilizers.iter() {
                    let first = identify_or_fail(
                        &catalog,
                        &(stabilizer * &rotations[face1]),
                        || format!("stabilizer applied to face {}", face1),
                    )?;
                    let second = identify_or_fail(
                        &catalog,
                        &(stabilizer * &rotations[opposite(face2)]),
                        || format!("stabilizer applied to face {}", opposite(face2)),
                    )?;
                    let pair = (first, opposite(second));
                    if !pairs.contains(&pair) {
                        pairs.push(pair);
                    }
                }
                Ok(pairs)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Built particle geometry: {} orientations, {} bonds, {} stabilizers",
            n,
            bond_permutations.len(),
            spec.stabilizers.len()
        );

        Ok(Self {
            catalog,
            composition,
            bond_permutations,
            equivalent_pairs,
        })
    }

    /// Construct the particle which lives on the lattice `name`.
    pub fn from_lattice(name: LatticeName) -> Result<Self, Error> {
        Self::new(&constants::particle_spec(name)?)
    }

    /// The particle for the lattice `name`, constructed once per process
    ///
    /// The geometry is immutable so the reference can be shared freely between threads. When
    /// construction fails the error is kept and returned on every call.
    ///
    pub fn shared(name: LatticeName) -> Result<&'static Self, Error> {
        static CHAIN: OnceLock<Result<ParticleGeometry, String>> = OnceLock::new();
        static SQUARE: OnceLock<Result<ParticleGeometry, String>> = OnceLock::new();
        static TRIANGULAR: OnceLock<Result<ParticleGeometry, String>> = OnceLock::new();
        static CUBIC: OnceLock<Result<ParticleGeometry, String>> = OnceLock::new();
        static FCC: OnceLock<Result<ParticleGeometry, String>> = OnceLock::new();

        let cell = match name {
            LatticeName::Chain => &CHAIN,
            LatticeName::Square => &SQUARE,
            LatticeName::Triangular => &TRIANGULAR,
            LatticeName::Cubic => &CUBIC,
            LatticeName::Fcc => &FCC,
        };
        cell.get_or_init(|| Self::from_lattice(name).map_err(|e| format!("{:#}", e)))
            .as_ref()
            .map_err(|e| anyhow!("Invalid {} particle geometry: {}", name, e))
    }

    pub fn catalog(&self) -> &RotationCatalog {
        &self.catalog
    }

    pub fn n_orientations(&self) -> usize {
        self.catalog.len()
    }

    pub fn n_bonds(&self) -> usize {
        self.bond_permutations.len()
    }

    pub fn n_stabilizers(&self) -> usize {
        self.catalog.n_stabilizers()
    }

    /// The orientation realised by `rotation`, if there is one.
    pub fn identify_orientation(&self, rotation: &Rotation) -> Option<usize> {
        self.catalog.identify(rotation)
    }

    /// The orientation reached by applying the rotation of orientation `rotation` to
    /// `orientation`.
    ///
    /// # Panics
    ///
    /// When either index is not below `n_orientations`.
    pub fn apply_rotation(&self, rotation: usize, orientation: usize) -> usize {
        self.composition[rotation][orientation]
    }

    pub fn opposite_face(&self, orientation: usize) -> usize {
        let n = self.n_orientations();
        (orientation + n / 2) % n
    }

    /// The face pointing along `bond` for a particle in `orientation`.
    pub fn bond_permutation(&self, bond: usize, orientation: usize) -> usize {
        self.bond_permutations[bond][orientation]
    }

    /// The faces touching when a particle in `orientation1` has a neighbour in `orientation2`
    /// along `bond`
    ///
    /// An empty site (`None`) has no face in the contact.
    ///
    pub fn faces_in_contact(
        &self,
        orientation1: Option<usize>,
        orientation2: Option<usize>,
        bond: usize,
    ) -> (Option<usize>, Option<usize>) {
        let face1 = orientation1.map(|o| self.bond_permutation(bond, o));
        let face2 = orientation2.map(|o| self.opposite_face(self.bond_permutation(bond, o)));
        (face1, face2)
    }

    /// Every encoding of the contact between `face1` and `face2`
    ///
    /// These are the pairs reached by spinning both particles about the reference bond with
    /// each of the stabilizer rotations. The pair itself is always included.
    ///
    pub fn equivalent_face_pairs(&self, face1: usize, face2: usize) -> &[(usize, usize)] {
        &self.equivalent_pairs[face1 * self.n_orientations() + face2]
    }

    /// A single representative of a physical contact
    ///
    /// Two observed face pairs describe the same contact exactly when their canonical pairs
    /// are equal, regardless of which particle is listed first.
    ///
    pub fn canonical_contact(&self, face1: usize, face2: usize) -> (usize, usize) {
        self.equivalent_face_pairs(face1, face2)
            .iter()
            .chain(self.equivalent_face_pairs(face2, face1))
            .copied()
            .min()
            .unwrap_or((face1, face2))
    }
}
