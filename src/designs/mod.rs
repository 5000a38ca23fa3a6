//
// mod.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Named contact map recipes
//!
//! Each recipe starts from a map filled with the mismatch energy, then sets the crystal
//! contacts and finally the defect contacts which seed a particular structure.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

use crate::lattice::LatticeName;
use crate::ContactMap;

pub mod cubic;
pub mod fcc;
pub mod triangular;

/// The three energy scales of a design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignEnergies {
    pub crystal: f64,
    pub defect: f64,
    pub mismatch: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Design {
    TriangularCrystal,
    TriangularVortexCamembert,
    CubicCrystal,
    CubicTripleVortexCamembert,
    CubicHedgehogCamembert,
    CubicHedgehogCamembertOneAxis,
    CubicHedgehogCamembertExtra,
    FccCrystal,
    FccHedgehogCamembert,
}

impl Design {
    pub const ALL: [Design; 9] = [
        Design::TriangularCrystal,
        Design::TriangularVortexCamembert,
        Design::CubicCrystal,
        Design::CubicTripleVortexCamembert,
        Design::CubicHedgehogCamembert,
        Design::CubicHedgehogCamembertOneAxis,
        Design::CubicHedgehogCamembertExtra,
        Design::FccCrystal,
        Design::FccHedgehogCamembert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Design::TriangularCrystal => "triangular-crystal",
            Design::TriangularVortexCamembert => "triangular-vortex-camembert",
            Design::CubicCrystal => "cubic-crystal",
            Design::CubicTripleVortexCamembert => "cubic-triple-vortex-camembert",
            Design::CubicHedgehogCamembert => "cubic-hedgehog-camembert",
            Design::CubicHedgehogCamembertOneAxis => "cubic-hedgehog-camembert-one-axis",
            Design::CubicHedgehogCamembertExtra => "cubic-hedgehog-camembert-extra",
            Design::FccCrystal => "fcc-crystal",
            Design::FccHedgehogCamembert => "fcc-hedgehog-camembert",
        }
    }

    /// The names accepted by [`Design::from_str`].
    pub fn variants() -> Vec<&'static str> {
        Self::ALL.iter().map(Design::as_str).collect()
    }

    pub fn lattice(&self) -> LatticeName {
        match self {
            Design::TriangularCrystal | Design::TriangularVortexCamembert => {
                LatticeName::Triangular
            }
            Design::CubicCrystal
            | Design::CubicTripleVortexCamembert
            | Design::CubicHedgehogCamembert
            | Design::CubicHedgehogCamembertOneAxis
            | Design::CubicHedgehogCamembertExtra => LatticeName::Cubic,
            Design::FccCrystal | Design::FccHedgehogCamembert => LatticeName::Fcc,
        }
    }

    /// Build the single species contact map of the design.
    pub fn build(&self, energies: &DesignEnergies) -> Result<ContactMap<'static>, Error> {
        match self {
            Design::TriangularCrystal => triangular::crystal(energies),
            Design::TriangularVortexCamembert => triangular::vortex_camembert(energies),
            Design::CubicCrystal => cubic::crystal(energies),
            Design::CubicTripleVortexCamembert => {
                cubic::triple_vortex_camembert(energies, &cubic::CamembertFlags::default())
            }
            Design::CubicHedgehogCamembert => cubic::hedgehog_camembert(energies),
            Design::CubicHedgehogCamembertOneAxis => cubic::hedgehog_camembert_one_axis(energies),
            Design::CubicHedgehogCamembertExtra => cubic::hedgehog_camembert_extra(energies),
            Design::FccCrystal => fcc::crystal(energies),
            Design::FccHedgehogCamembert => fcc::hedgehog_camembert(energies),
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Design {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown design '{}', valid values: {}",
                    s,
                    Self::variants().join(", ")
                )
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_round_trip() -> Result<(), Error> {
        for design in Design::ALL.iter() {
            assert_eq!(design.as_str().parse::<Design>()?, *design);
            assert_eq!(
                serde_json::to_string(design)?,
                format!("\"{}\"", design.as_str())
            );
        }
        assert!("hedgehog".parse::<Design>().is_err());
        Ok(())
    }

    #[test]
    fn map_matches_lattice() -> Result<(), Error> {
        let energies = DesignEnergies {
            crystal: -15.,
            defect: -10.,
            mismatch: 100.,
        };
        for design in Design::ALL.iter() {
            let cmap = design.build(&energies)?;
            let n = crate::ParticleGeometry::shared(design.lattice())?.n_orientations();
            assert_eq!(cmap.n_orientations(), n);
            assert_eq!(cmap.n_types(), 1);
            cmap.check_consistency()?;
        }
        Ok(())
    }
}
