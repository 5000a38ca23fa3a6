//
// fcc.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Contact designs for rhombic dodecahedra on the face centred cubic lattice.

use anyhow::Error;
use itertools::iproduct;

use super::DesignEnergies;
use crate::ContactMap;

/// Each of the six pairs of opposite faces, with faces `2i` and `2i + 1` the two spins of face
/// `i`.
pub const CRYSTAL_CONTACTS: [(usize, usize); 6] =
    [(0, 12), (2, 14), (4, 16), (6, 18), (8, 20), (10, 22)];

pub const RED_MINUS_FACES: [usize; 8] = [10, 11, 12, 13, 16, 17, 20, 21];
pub const ORTHOGONAL_RED_FACES: [usize; 8] = [2, 3, 6, 7, 14, 15, 18, 19];

/// Every pair of distinct red minus faces, followed by every red minus face paired with an
/// orthogonal red face.
pub fn hedgehog_contacts() -> Vec<(usize, usize)> {
    iproduct!(RED_MINUS_FACES.iter(), RED_MINUS_FACES.iter())
        .filter(|(a, b)| a != b)
        .chain(iproduct!(RED_MINUS_FACES.iter(), ORTHOGONAL_RED_FACES.iter()))
        .map(|(&a, &b)| (a, b))
        .collect()
}

pub fn set_crystal_contacts(cmap: &mut ContactMap, crystal_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&CRYSTAL_CONTACTS, crystal_e)
}

pub fn set_hedgehog_camembert_contacts(cmap: &mut ContactMap, defect_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&hedgehog_contacts(), defect_e)
}

pub fn crystal(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = ContactMap::fcc(1, energies.mismatch)?;
    set_crystal_contacts(&mut cmap, energies.crystal)?;
    Ok(cmap)
}

pub fn hedgehog_camembert(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = crystal(energies)?;
    set_hedgehog_camembert_contacts(&mut cmap, energies.defect)?;
    Ok(cmap)
}
