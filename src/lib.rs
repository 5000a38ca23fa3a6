//
// lib.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Geometry of patchy particles on lattices
//!
//! A patchy particle sits on a lattice site in one of a finite set of orientations. The
//! orientation fixes which face of the particle points along each bond of the lattice, and
//! the interaction between two neighbouring particles depends only on the pair of faces in
//! contact. This crate builds the orientation tables of each particle, the contact maps which
//! assign an energy to every pair of faces, and the parameter files read by the simulation
//! engine.

#[macro_use]
mod ops_macros;

pub mod catalog;
pub mod contact_map;
pub mod designs;
pub mod lattice;
pub mod parameters;
pub mod particle;
pub mod rotation;
pub mod structure;

pub use crate::catalog::RotationCatalog;
pub use crate::contact_map::ContactMap;
pub use crate::designs::{Design, DesignEnergies};
pub use crate::lattice::{FaceContact, LatticeGeometry, LatticeName};
pub use crate::parameters::{
    BuildRun, CoolingSchedule, InitializeOption, McParameters, ModelParameters, MoveKind,
};
pub use crate::particle::{ParticleGeometry, ParticleSpec};
pub use crate::rotation::Rotation;
pub use crate::structure::{SiteContact, SiteState, Structure};
