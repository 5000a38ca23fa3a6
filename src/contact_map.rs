//
// contact_map.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use anyhow::{bail, Error};
use itertools::iproduct;
use log::{debug, trace, warn};
use nalgebra::DMatrix;

use crate::lattice::LatticeName;
use crate::ParticleGeometry;

/// How a matrix handed to one of the bulk setters is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatrixLayout {
    Symmetric,
    Upper,
    Lower,
    Other,
}

fn classify(matrix: &DMatrix<f64>) -> MatrixLayout {
    let n = matrix.nrows();
    let pairs = || iproduct!(0..n, 0..n).filter(|(i, j)| i < j);
    if pairs().all(|(i, j)| matrix[(i, j)] == matrix[(j, i)]) {
        MatrixLayout::Symmetric
    } else if pairs().all(|(i, j)| matrix[(j, i)] == 0.) {
        MatrixLayout::Upper
    } else if pairs().all(|(i, j)| matrix[(i, j)] == 0.) {
        MatrixLayout::Lower
    } else {
        MatrixLayout::Other
    }
}

/// Turn a symmetric or triangular matrix into the symmetric matrix it describes
///
/// A triangular matrix holds each off-diagonal contact once, so it expands to
/// `M + Mᵀ - diag(M)`. Anything else can't describe reciprocal contacts.
fn symmetrise(matrix: &DMatrix<f64>) -> Result<DMatrix<f64>, Error> {
    let layout = classify(matrix);
    debug!("Matrix classified as {:?}", layout);
    match layout {
        MatrixLayout::Symmetric => Ok(matrix.clone()),
        MatrixLayout::Upper | MatrixLayout::Lower => {
            let diagonal = DMatrix::from_diagonal(&matrix.diagonal());
            Ok(matrix + matrix.transpose() - diagonal)
        }
        MatrixLayout::Other => {
            bail!("A contact matrix has to be either symmetric or triangular")
        }
    }
}

/// The interaction energy of every pair of faces of every pair of particle types
///
/// The energies are stored in the flattened layout read by the simulation engine, the face and
/// type of each particle packed as `type * n_orientations + face`, and the first particle's
/// packed index varying fastest. Every write goes through [`ContactMap::set`], which fills in
/// every encoding of the same physical contact, so the map is always reciprocal and uniform
/// over equivalent face pairs.
///
#[derive(Debug, Clone)]
pub struct ContactMap<'a> {
    particle: &'a ParticleGeometry,
    n_types: usize,
    couplings: Vec<f64>,
}

impl<'a> ContactMap<'a> {
    /// A map with every contact set to `init_energy`.
    pub fn new(particle: &'a ParticleGeometry, n_types: usize, init_energy: f64) -> Self {
        let size = n_types * particle.n_orientations();
        Self {
            particle,
            n_types,
            couplings: vec![init_energy; size * size],
        }
    }

    pub fn particle(&self) -> &'a ParticleGeometry {
        self.particle
    }

    pub fn n_types(&self) -> usize {
        self.n_types
    }

    pub fn n_orientations(&self) -> usize {
        self.particle.n_orientations()
    }

    fn face_index(&self, face: usize, particle_type: usize) -> usize {
        particle_type * self.n_orientations() + face
    }

    fn offset(&self, face1: usize, type1: usize, face2: usize, type2: usize) -> usize {
        self.face_index(face1, type1)
            + self.face_index(face2, type2) * (self.n_types * self.n_orientations())
    }

    fn check_face(&self, face: usize) -> Result<(), Error> {
        if face >= self.n_orientations() {
            bail!(
                "Face {} is out of range for a particle with {} orientations",
                face,
                self.n_orientations()
            );
        }
        Ok(())
    }

    fn check_type(&self, particle_type: usize) -> Result<(), Error> {
        if particle_type >= self.n_types {
            bail!(
                "Type {} is out of range for a map with {} types",
                particle_type,
                self.n_types
            );
        }
        Ok(())
    }

    /// The energy of the contact between `face1` of a `type1` particle and `face2` of a `type2`
    /// particle.
    ///
    /// # Panics
    ///
    /// When a face or type is out of range.
    pub fn get(&self, face1: usize, type1: usize, face2: usize, type2: usize) -> f64 {
        assert!(face1 < self.n_orientations() && face2 < self.n_orientations());
        assert!(type1 < self.n_types && type2 < self.n_types);
        self.couplings[self.offset(face1, type1, face2, type2)]
    }

    /// Set the energy of a contact and of every equivalent encoding of it
    ///
    /// Both particle orders are written, so the contact is the same no matter which particle is
    /// considered first. Out of range faces or types are rejected without writing anything.
    ///
    pub fn set(
        &mut self,
        face1: usize,
        type1: usize,
        face2: usize,
        type2: usize,
        energy: f64,
    ) -> Result<(), Error> {
        self.check_face(face1)?;
        self.check_face(face2)?;
        self.check_type(type1)?;
        self.check_type(type2)?;

        trace!(
            "Setting ({}, {}) of types ({}, {}) to {}",
            face1,
            face2,
            type1,
            type2,
            energy
        );
        let particle = self.particle;
        for &(f1, f2) in particle.equivalent_face_pairs(face1, face2) {
            let forward = self.offset(f1, type1, f2, type2);
            let reverse = self.offset(f2, type2, f1, type1);
            self.couplings[forward] = energy;
            self.couplings[reverse] = energy;
        }
        Ok(())
    }

    /// Set every `(face1, face2)` contact in `contacts` between particles of type 0.
    pub fn set_contacts(&mut self, contacts: &[(usize, usize)], energy: f64) -> Result<(), Error> {
        for &(face1, face2) in contacts {
            self.set(face1, 0, face2, 0, energy)?;
        }
        Ok(())
    }

    /// The contact energies between two types as an `n_orientations` square matrix.
    pub fn two_species_matrix(&self, type1: usize, type2: usize) -> DMatrix<f64> {
        let n = self.n_orientations();
        DMatrix::from_fn(n, n, |face1, face2| self.get(face1, type1, face2, type2))
    }

    pub fn single_species_matrix(&self, particle_type: usize) -> DMatrix<f64> {
        self.two_species_matrix(particle_type, particle_type)
    }

    /// Set the contacts between two types from a matrix
    ///
    /// Each entry is written with [`ContactMap::set`] in row major order, so a later entry
    /// overwrites an earlier one from the same equivalence class. When both types are the same
    /// the matrix has to be symmetric or triangular. Invalid input is rejected before anything
    /// is written.
    ///
    pub fn set_two_species_matrix(
        &mut self,
        type1: usize,
        type2: usize,
        matrix: &DMatrix<f64>,
    ) -> Result<(), Error> {
        let n = self.n_orientations();
        if matrix.shape() != (n, n) {
            bail!(
                "Expected a {} x {} contact matrix, found {} x {}",
                n,
                n,
                matrix.nrows(),
                matrix.ncols()
            );
        }
        self.check_type(type1)?;
        self.check_type(type2)?;

        let matrix = if type1 == type2 {
            symmetrise(matrix)?
        } else {
            matrix.clone()
        };

        let uniform = iproduct!(0..n, 0..n).all(|(face1, face2)| {
            self.particle
                .equivalent_face_pairs(face1, face2)
                .iter()
                .all(|&(f1, f2)| matrix[(f1, f2)] == matrix[(face1, face2)])
        });
        if !uniform {
            warn!(
                "Contact matrix for types ({}, {}) differs between equivalent face pairs, \
                 the last entry of each class is kept",
                type1, type2
            );
        }

        for (face1, face2) in iproduct!(0..n, 0..n) {
            self.set(face1, type1, face2, type2, matrix[(face1, face2)])?;
        }
        Ok(())
    }

    pub fn set_single_species_matrix(
        &mut self,
        particle_type: usize,
        matrix: &DMatrix<f64>,
    ) -> Result<(), Error> {
        self.set_two_species_matrix(particle_type, particle_type, matrix)
    }

    /// Check every contact is reciprocal and uniform over its equivalence class.
    pub fn check_consistency(&self) -> Result<(), Error> {
        let n = self.n_orientations();
        for (type1, type2, face1, face2) in iproduct!(0..self.n_types, 0..self.n_types, 0..n, 0..n)
        {
            let energy = self.get(face1, type1, face2, type2);
            let reverse = self.get(face2, type2, face1, type1);
            if energy != reverse {
                bail!(
                    "Contact ({}, {}) of types ({}, {}) is {} but the reverse contact is {}",
                    face1,
                    face2,
                    type1,
                    type2,
                    energy,
                    reverse
                );
            }
            for &(f1, f2) in self.particle.equivalent_face_pairs(face1, face2) {
                let other = self.get(f1, type1, f2, type2);
                if other != energy {
                    bail!(
                        "Contact ({}, {}) of types ({}, {}) is {} but the equivalent contact \
                         ({}, {}) is {}",
                        face1,
                        face2,
                        type1,
                        type2,
                        energy,
                        f1,
                        f2,
                        other
                    );
                }
            }
        }
        Ok(())
    }

    /// The raw flattened energies.
    pub fn couplings(&self) -> &[f64] {
        &self.couplings
    }

    /// The flattened energies in the engine's layout, after checking they are consistent.
    pub fn formatted_couplings(&self) -> Result<Vec<f64>, Error> {
        self.check_consistency()?;
        Ok(self.couplings.clone())
    }
}

impl ContactMap<'static> {
    /// A map for the particle of the lattice `name`.
    pub fn from_lattice(name: LatticeName, n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Ok(Self::new(ParticleGeometry::shared(name)?, n_types, init_energy))
    }

    pub fn chain(n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Self::from_lattice(LatticeName::Chain, n_types, init_energy)
    }

    pub fn square(n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Self::from_lattice(LatticeName::Square, n_types, init_energy)
    }

    pub fn triangular(n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Self::from_lattice(LatticeName::Triangular, n_types, init_energy)
    }

    pub fn cubic(n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Self::from_lattice(LatticeName::Cubic, n_types, init_energy)
    }

    pub fn fcc(n_types: usize, init_energy: f64) -> Result<Self, Error> {
        Self::from_lattice(LatticeName::Fcc, n_types, init_energy)
    }
}
