//
// triangular.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Contact designs for hexagons on the triangular lattice.

use anyhow::Error;

use super::DesignEnergies;
use crate::ContactMap;

/// Opposite faces touching, the contacts of the close packed crystal.
pub const CRYSTAL_CONTACTS: [(usize, usize); 3] = [(0, 3), (1, 4), (2, 5)];

pub const VORTEX_CAMEMBERT_CONTACTS: [(usize, usize); 2] = [(0, 4), (1, 5)];

pub fn set_crystal_contacts(cmap: &mut ContactMap, crystal_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&CRYSTAL_CONTACTS, crystal_e)
}

pub fn set_vortex_camembert_contacts(cmap: &mut ContactMap, defect_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&VORTEX_CAMEMBERT_CONTACTS, defect_e)
}

pub fn crystal(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = ContactMap::triangular(1, energies.mismatch)?;
    set_crystal_contacts(&mut cmap, energies.crystal)?;
    Ok(cmap)
}

pub fn vortex_camembert(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = crystal(energies)?;
    set_vortex_camembert_contacts(&mut cmap, energies.defect)?;
    Ok(cmap)
}
