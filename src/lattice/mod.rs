//
// mod.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use anyhow::{bail, Error};
use clap::arg_enum;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::parameters::ModelParameters;
use crate::ParticleGeometry;

pub mod constants;

arg_enum! {
    /// The lattices a simulation can run on
    ///
    /// Parsing from a string ignores case, the serialised form is the lowercase name used by
    /// the simulation engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LatticeName {
        Chain,
        Square,
        Triangular,
        Cubic,
        Fcc,
    }
}

impl LatticeName {
    pub const ALL: [LatticeName; 5] = [
        LatticeName::Chain,
        LatticeName::Square,
        LatticeName::Triangular,
        LatticeName::Cubic,
        LatticeName::Fcc,
    ];

    /// The name used in the engine's input files.
    pub fn as_str(&self) -> &'static str {
        match self {
            LatticeName::Chain => "chain",
            LatticeName::Square => "square",
            LatticeName::Triangular => "triangular",
            LatticeName::Cubic => "cubic",
            LatticeName::Fcc => "fcc",
        }
    }

    /// The number of axes along which the lattice extends.
    pub fn dimensions(&self) -> usize {
        match self {
            LatticeName::Chain => 1,
            LatticeName::Square | LatticeName::Triangular => 2,
            LatticeName::Cubic | LatticeName::Fcc => 3,
        }
    }
}

/// The faces touching across a bond between two sites
///
/// A face is `None` when its site is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceContact {
    pub face1: Option<usize>,
    pub face2: Option<usize>,
    pub bond: usize,
}

/// Fold one component of a displacement into `(-length/2, length/2]`.
fn fold_component(value: i64, length: i64) -> i64 {
    let folded = value.rem_euclid(length);
    if 2 * folded > length {
        folded - length
    } else {
        folded
    }
}

/// A periodic lattice of `lx * ly * lz` sites
///
/// Sites are numbered `x + y * lx + z * lx * ly`. All coordinate arithmetic wraps around the
/// periodic boundaries, so every site has a full set of neighbours, one per bond, in the same
/// order as the bonds of the particle geometry.
///
#[derive(Debug, Clone)]
pub struct LatticeGeometry {
    name: LatticeName,
    basis: Matrix3<f64>,
    bonds: Vec<Vector3<i64>>,
    lx: usize,
    ly: usize,
    lz: usize,
    spacing: f64,
    particle: &'static ParticleGeometry,
}

impl LatticeGeometry {
    pub fn new(name: LatticeName, lx: usize, ly: usize, lz: usize) -> Result<Self, Error> {
        if lx == 0 || ly == 0 || lz == 0 {
            bail!(
                "Lattice dimensions have to be positive, found ({}, {}, {})",
                lx,
                ly,
                lz
            );
        }
        match name.dimensions() {
            1 if ly != 1 || lz != 1 => {
                bail!("A {} lattice needs ly = lz = 1, found ({}, {})", name, ly, lz)
            }
            2 if lz != 1 => bail!("A {} lattice needs lz = 1, found {}", name, lz),
            _ => (),
        }

        let particle = ParticleGeometry::shared(name)?;
        let bonds: Vec<Vector3<i64>> = constants::bonds(name)
            .iter()
            .map(|&[x, y, z]| Vector3::new(x, y, z))
            .collect();
        if bonds.len() != particle.n_bonds() {
            bail!(
                "The {} lattice has {} bonds but the particle has {} bond rotations",
                name,
                bonds.len(),
                particle.n_bonds()
            );
        }

        Ok(Self {
            name,
            basis: constants::basis(name),
            bonds,
            lx,
            ly,
            lz,
            spacing: 1.,
            particle,
        })
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// The lattice described by a model parameters file.
    pub fn from_model(params: &ModelParameters) -> Result<Self, Error> {
        Self::new(params.lattice_name, params.lx, params.ly, params.lz)
    }

    pub fn name(&self) -> LatticeName {
        self.name
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.lx, self.ly, self.lz)
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    pub fn n_sites(&self) -> usize {
        self.lx * self.ly * self.lz
    }

    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }

    pub fn bonds(&self) -> &[Vector3<i64>] {
        &self.bonds
    }

    pub fn particle(&self) -> &'static ParticleGeometry {
        self.particle
    }

    fn lengths(&self) -> Vector3<i64> {
        Vector3::new(self.lx as i64, self.ly as i64, self.lz as i64)
    }

    /// The lattice coordinates of a site.
    pub fn site_to_coords(&self, site: usize) -> Vector3<i64> {
        let x = site % self.lx;
        let y = (site / self.lx) % self.ly;
        let z = site / (self.lx * self.ly);
        Vector3::new(x as i64, y as i64, z as i64)
    }

    /// The site at lattice coordinates `coords`, wrapping around the periodic boundaries.
    pub fn coords_to_site(&self, coords: &Vector3<i64>) -> usize {
        let lengths = self.lengths();
        let x = coords.x.rem_euclid(lengths.x) as usize;
        let y = coords.y.rem_euclid(lengths.y) as usize;
        let z = coords.z.rem_euclid(lengths.z) as usize;
        x + y * self.lx + z * self.lx * self.ly
    }

    /// The shortest periodic image of a displacement
    ///
    /// Each component ends up in `(-l/2, l/2]` for an axis of length `l`.
    pub fn fold_displacement(&self, displacement: &Vector3<i64>) -> Vector3<i64> {
        displacement.zip_map(&self.lengths(), fold_component)
    }

    /// The bond matching a displacement, once both are folded into the periodic box
    ///
    /// When the box is small enough that two bonds fold onto the same displacement the first
    /// bond wins.
    pub fn get_bond(&self, displacement: &Vector3<i64>) -> Option<usize> {
        let folded = self.fold_displacement(displacement);
        self.bonds
            .iter()
            .position(|bond| self.fold_displacement(bond) == folded)
    }

    /// The bond leading from `site1` to `site2`, if they are neighbours.
    pub fn bond_between_sites(&self, site1: usize, site2: usize) -> Option<usize> {
        self.get_bond(&(self.site_to_coords(site2) - self.site_to_coords(site1)))
    }

    /// The site reached by following `bond` from `site`.
    pub fn neighbour(&self, site: usize, bond: usize) -> usize {
        self.coords_to_site(&(self.site_to_coords(site) + self.bonds[bond]))
    }

    /// The neighbours of `site`, in bond order.
    pub fn neighbour_sites(&self, site: usize) -> Vec<usize> {
        (0..self.n_bonds())
            .map(|bond| self.neighbour(site, bond))
            .collect()
    }

    /// The faces touching between two sites, `None` when the sites are not neighbours.
    pub fn faces_in_contact_and_bond(
        &self,
        site1: usize,
        orientation1: Option<usize>,
        site2: usize,
        orientation2: Option<usize>,
    ) -> Option<FaceContact> {
        let bond = self.bond_between_sites(site1, site2)?;
        let (face1, face2) = self
            .particle
            .faces_in_contact(orientation1, orientation2, bond);
        Some(FaceContact { face1, face2, bond })
    }

    /// The Cartesian position of a point in lattice coordinates.
    pub fn lattice_to_cartesian(&self, coords: &Vector3<i64>) -> Vector3<f64> {
        self.basis * coords.map(|c| c as f64) * self.spacing
    }

    pub fn site_to_cartesian(&self, site: usize) -> Vector3<f64> {
        self.lattice_to_cartesian(&self.site_to_coords(site))
    }
}
