//
// cubic.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Contact designs for cubes on the cubic lattice
//!
//! Face `4i + j` is face `i` spun by `j` quarter turns about its normal, so the contacts
//! `(4i, 4i + 12)` join the three pairs of opposite faces.

use anyhow::Error;

use super::DesignEnergies;
use crate::ContactMap;

pub const CRYSTAL_CONTACTS: [(usize, usize); 3] = [(0, 12), (4, 16), (8, 20)];

/// A crystal which only grows along a single axis.
pub const CRYSTAL_CONTACTS_ONE_AXIS: [(usize, usize); 14] = [
    (0, 12),
    (0, 13),
    (0, 14),
    (0, 15),
    (4, 6),
    (4, 11),
    (4, 16),
    (4, 21),
    (8, 8),
    (8, 19),
    (8, 20),
    (16, 18),
    (16, 23),
    (20, 20),
];

pub const HEDGEHOG_CONTACTS: [(usize, usize); 16] = [
    (12, 4),
    (12, 5),
    (12, 6),
    (12, 7),
    (12, 8),
    (12, 9),
    (12, 10),
    (12, 11),
    (12, 16),
    (12, 17),
    (12, 18),
    (12, 19),
    (12, 20),
    (12, 21),
    (12, 22),
    (12, 23),
];

pub const EXTRA_HEDGEHOG_DEFECT_CONTACTS: [(usize, usize); 4] =
    [(12, 12), (12, 13), (12, 14), (12, 15)];

const CONTACTS_R_PLUS: [(usize, usize); 4] = [(4, 13), (8, 13), (12, 17), (12, 23)];
const CONTACTS_G_PLUS: [(usize, usize); 4] = [(0, 17), (8, 16), (12, 17), (16, 20)];
const CONTACTS_B_PLUS: [(usize, usize); 4] = [(0, 21), (4, 22), (12, 23), (16, 20)];
const CONTACTS_R_MINUS: [(usize, usize); 4] = [(0, 9), (0, 17), (0, 21), (0, 7)];
const CONTACTS_G_MINUS: [(usize, usize); 4] = [(4, 22), (4, 13), (4, 10), (0, 7)];
const CONTACTS_B_MINUS: [(usize, usize); 4] = [(0, 9), (4, 10), (8, 13), (8, 16)];

/// Which of the six vortex lines of the triple vortex camembert are enabled
///
/// Each flag enables the contacts of the vortex of one colour (red, green, blue) and
/// handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CamembertFlags {
    pub r_plus: bool,
    pub g_plus: bool,
    pub b_plus: bool,
    pub r_minus: bool,
    pub g_minus: bool,
    pub b_minus: bool,
}

impl Default for CamembertFlags {
    fn default() -> Self {
        Self {
            r_plus: true,
            g_plus: true,
            b_plus: true,
            r_minus: true,
            g_minus: true,
            b_minus: true,
        }
    }
}

impl CamembertFlags {
    /// The defect contacts of every enabled vortex
    ///
    /// Contacts shared between vortices are listed once for each of them.
    pub fn contacts(&self) -> Vec<(usize, usize)> {
        [
            (self.r_plus, &CONTACTS_R_PLUS),
            (self.g_plus, &CONTACTS_G_PLUS),
            (self.b_plus, &CONTACTS_B_PLUS),
            (self.r_minus, &CONTACTS_R_MINUS),
            (self.g_minus, &CONTACTS_G_MINUS),
            (self.b_minus, &CONTACTS_B_MINUS),
        ]
        .iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, contacts)| contacts.iter().copied())
        .collect()
    }
}

pub fn set_crystal_contacts(cmap: &mut ContactMap, crystal_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&CRYSTAL_CONTACTS, crystal_e)
}

pub fn set_crystal_one_axis_contacts(cmap: &mut ContactMap, crystal_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&CRYSTAL_CONTACTS_ONE_AXIS, crystal_e)
}

pub fn set_triple_vortex_camembert_contacts(
    cmap: &mut ContactMap,
    defect_e: f64,
    flags: &CamembertFlags,
) -> Result<(), Error> {
    cmap.set_contacts(&flags.contacts(), defect_e)
}

pub fn set_hedgehog_camembert_contacts(cmap: &mut ContactMap, defect_e: f64) -> Result<(), Error> {
    cmap.set_contacts(&HEDGEHOG_CONTACTS, defect_e)
}

pub fn set_hedgehog_camembert_contacts_with_extra(
    cmap: &mut ContactMap,
    defect_e: f64,
) -> Result<(), Error> {
    set_hedgehog_camembert_contacts(cmap, defect_e)?;
    cmap.set_contacts(&EXTRA_HEDGEHOG_DEFECT_CONTACTS, defect_e)
}

pub fn crystal(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = ContactMap::cubic(1, energies.mismatch)?;
    set_crystal_contacts(&mut cmap, energies.crystal)?;
    Ok(cmap)
}

pub fn triple_vortex_camembert(
    energies: &DesignEnergies,
    flags: &CamembertFlags,
) -> Result<ContactMap<'static>, Error> {
    let mut cmap = crystal(energies)?;
    set_triple_vortex_camembert_contacts(&mut cmap, energies.defect, flags)?;
    Ok(cmap)
}

pub fn hedgehog_camembert(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = crystal(energies)?;
    set_hedgehog_camembert_contacts(&mut cmap, energies.defect)?;
    Ok(cmap)
}

pub fn hedgehog_camembert_one_axis(
    energies: &DesignEnergies,
) -> Result<ContactMap<'static>, Error> {
    let mut cmap = ContactMap::cubic(1, energies.mismatch)?;
    set_crystal_one_axis_contacts(&mut cmap, energies.crystal)?;
    set_hedgehog_camembert_contacts(&mut cmap, energies.defect)?;
    Ok(cmap)
}

pub fn hedgehog_camembert_extra(energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
    let mut cmap = ContactMap::cubic(1, energies.mismatch)?;
    set_crystal_one_axis_contacts(&mut cmap, energies.crystal)?;
    set_hedgehog_camembert_contacts_with_extra(&mut cmap, energies.defect)?;
    Ok(cmap)
}
