//
// structure.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! Snapshots of the lattice written by the simulation engine
//!
//! A snapshot is a text file of two whitespace separated rows with one column per site, the
//! particle type on the first row and the orientation on the second. An orientation of `-1`
//! marks an empty site, whose type is ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Error};
use log::debug;
use rand::seq::index;
use rand::Rng;

use crate::lattice::LatticeGeometry;

/// The particle occupying a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteState {
    pub particle_type: usize,
    pub orientation: usize,
}

/// Two occupied neighbouring sites and the faces they touch with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteContact {
    pub site1: usize,
    pub site2: usize,
    pub bond: usize,
    pub face1: usize,
    pub face2: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    sites: Vec<Option<SiteState>>,
}

fn parse_value(token: &str, row: usize, column: usize) -> Result<i64, Error> {
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value);
    }
    match token.parse::<f64>() {
        Ok(value) if value.fract() == 0. && value.abs() < i64::MAX as f64 => Ok(value as i64),
        _ => Err(anyhow!(
            "Invalid value '{}' in row {}, column {}",
            token,
            row,
            column
        )),
    }
}

impl Structure {
    pub fn new(sites: Vec<Option<SiteState>>) -> Self {
        Self { sites }
    }

    pub fn empty(n_sites: usize) -> Self {
        Self {
            sites: vec![None; n_sites],
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rows: Vec<Vec<i64>> = Vec::new();
        for (row, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let values = line
                .split_whitespace()
                .enumerate()
                .map(|(column, token)| parse_value(token, row, column))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(values);
        }

        if rows.len() != 2 {
            bail!(
                "A structure has a row of types and a row of orientations, found {} rows",
                rows.len()
            );
        }
        let (types, orientations) = (&rows[0], &rows[1]);
        if types.len() != orientations.len() {
            bail!(
                "Found {} types for {} orientations",
                types.len(),
                orientations.len()
            );
        }

        let sites = types
            .iter()
            .zip(orientations.iter())
            .enumerate()
            .map(|(site, (&particle_type, &orientation))| match orientation {
                -1 => Ok(None),
                o if o < -1 => Err(anyhow!("Invalid orientation {} at site {}", o, site)),
                o if particle_type < 0 => Err(anyhow!(
                    "Invalid type {} for the particle with orientation {} at site {}",
                    particle_type,
                    o,
                    site
                )),
                o => Ok(Some(SiteState {
                    particle_type: particle_type as usize,
                    orientation: o as usize,
                })),
            })
            .collect::<Result<Vec<_>, Error>>()?;

        debug!("Read a structure of {} sites", sites.len());
        Ok(Self { sites })
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Unable to read structure from {}", path.display()))
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let types: Vec<String> = self
            .sites
            .iter()
            .map(|s| s.map_or(0, |s| s.particle_type).to_string())
            .collect();
        let orientations: Vec<String> = self
            .sites
            .iter()
            .map(|s| s.map_or(-1, |s| s.orientation as i64).to_string())
            .collect();
        writeln!(writer, "{}", types.join(" "))?;
        writeln!(writer, "{}", orientations.join(" "))?;
        Ok(())
    }

    pub fn to_file(&self, path: &Path) -> Result<(), Error> {
        let file =
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// A random arrangement of `n_particles[t]` particles of each type `t`
    ///
    /// Every particle is on a distinct site with a uniformly random orientation.
    pub fn random<R: Rng + ?Sized>(
        lattice: &LatticeGeometry,
        n_particles: &[usize],
        rng: &mut R,
    ) -> Result<Self, Error> {
        let total: usize = n_particles.iter().sum();
        if total > lattice.n_sites() {
            bail!(
                "{} particles don't fit on a lattice of {} sites",
                total,
                lattice.n_sites()
            );
        }
        let n_orientations = lattice.particle().n_orientations();
        let mut structure = Self::empty(lattice.n_sites());
        let mut sites = index::sample(rng, lattice.n_sites(), total).into_iter();
        for (particle_type, &count) in n_particles.iter().enumerate() {
            for site in sites.by_ref().take(count) {
                structure.sites[site] = Some(SiteState {
                    particle_type,
                    orientation: rng.gen_range(0..n_orientations),
                });
            }
        }
        Ok(structure)
    }

    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn sites(&self) -> &[Option<SiteState>] {
        &self.sites
    }

    pub fn get(&self, site: usize) -> Option<SiteState> {
        self.sites.get(site).copied().flatten()
    }

    pub fn n_particles(&self) -> usize {
        self.sites.iter().filter(|s| s.is_some()).count()
    }

    /// Check the structure could have come from a simulation on `lattice`.
    pub fn check_lattice(&self, lattice: &LatticeGeometry) -> Result<(), Error> {
        if self.n_sites() != lattice.n_sites() {
            bail!(
                "The structure has {} sites but the lattice has {}",
                self.n_sites(),
                lattice.n_sites()
            );
        }
        let n_orientations = lattice.particle().n_orientations();
        if let Some((site, state)) = self
            .occupied_sites()
            .find(|(_, s)| s.orientation >= n_orientations)
        {
            bail!(
                "Orientation {} at site {} is out of range for a particle with {} orientations",
                state.orientation,
                site,
                n_orientations
            );
        }
        Ok(())
    }

    /// Every occupied site along with the particle on it.
    pub fn occupied_sites(&self) -> impl Iterator<Item = (usize, SiteState)> + '_ {
        self.sites
            .iter()
            .enumerate()
            .filter_map(|(site, state)| state.map(|s| (site, s)))
    }

    /// The contact between every pair of occupied neighbouring sites, each pair listed once.
    pub fn face_contacts(&self, lattice: &LatticeGeometry) -> Result<Vec<SiteContact>, Error> {
        self.check_lattice(lattice)?;

        let mut seen = BTreeSet::new();
        let mut contacts = Vec::new();
        for (site1, state1) in self.occupied_sites() {
            for site2 in lattice.neighbour_sites(site1) {
                let state2 = match self.sites[site2] {
                    Some(s) if site2 > site1 => s,
                    _ => continue,
                };
                if !seen.insert((site1, site2)) {
                    continue;
                }
                let contact = lattice
                    .faces_in_contact_and_bond(
                        site1,
                        Some(state1.orientation),
                        site2,
                        Some(state2.orientation),
                    )
                    .ok_or_else(|| anyhow!("Sites {} and {} are not neighbours", site1, site2))?;
                if let (Some(face1), Some(face2)) = (contact.face1, contact.face2) {
                    contacts.push(SiteContact {
                        site1,
                        site2,
                        bond: contact.bond,
                        face1,
                        face2,
                    });
                }
            }
        }
        Ok(contacts)
    }

    /// The number of times each physical contact appears, keyed by its canonical face pair.
    pub fn contact_histogram(
        &self,
        lattice: &LatticeGeometry,
    ) -> Result<BTreeMap<(usize, usize), usize>, Error> {
        let particle = lattice.particle();
        let mut histogram = BTreeMap::new();
        for contact in self.face_contacts(lattice)? {
            *histogram
                .entry(particle.canonical_contact(contact.face1, contact.face2))
                .or_insert(0) += 1;
        }
        Ok(histogram)
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::lattice::LatticeName;

    #[test]
    fn read_snapshot() -> Result<(), Error> {
        let text = "0 1 0 0\n2 -1 0.0 5\n";
        let structure = Structure::from_reader(text.as_bytes())?;
        assert_eq!(structure.n_sites(), 4);
        assert_eq!(structure.n_particles(), 3);
        assert_eq!(structure.get(1), None);
        assert_eq!(
            structure.get(3),
            Some(SiteState {
                particle_type: 0,
                orientation: 5
            })
        );
        Ok(())
    }

    #[test]
    fn reject_malformed() {
        assert!(Structure::from_reader("0 0\n1 1\n2 2\n".as_bytes()).is_err());
        assert!(Structure::from_reader("0 0 0\n1 1\n".as_bytes()).is_err());
        assert!(Structure::from_reader("0 0\n1 -2\n".as_bytes()).is_err());
        assert!(Structure::from_reader("0 0\n1 0.5\n".as_bytes()).is_err());
        assert!(Structure::from_reader("0 x\n1 1\n".as_bytes()).is_err());
    }

    #[test]
    fn write_read() -> Result<(), Error> {
        let structure = Structure::from_reader("1 0 0\n3 -1 2\n".as_bytes())?;
        let mut buffer = Vec::new();
        structure.to_writer(&mut buffer)?;
        assert_eq!(String::from_utf8(buffer.clone())?, "1 0 0\n3 -1 2\n");
        assert_eq!(Structure::from_reader(buffer.as_slice())?, structure);
        Ok(())
    }

    #[test]
    fn random_counts() -> Result<(), Error> {
        let lattice = LatticeGeometry::new(LatticeName::Cubic, 4, 4, 4)?;
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let structure = Structure::random(&lattice, &[10, 5], &mut rng)?;
        structure.check_lattice(&lattice)?;
        let types: Vec<usize> = structure
            .occupied_sites()
            .map(|(_, s)| s.particle_type)
            .collect();
        assert_eq!(types.iter().filter(|&&t| t == 0).count(), 10);
        assert_eq!(types.iter().filter(|&&t| t == 1).count(), 5);
        assert!(Structure::random(&lattice, &[65], &mut rng).is_err());
        Ok(())
    }

    #[test]
    fn chain_dimer() -> Result<(), Error> {
        let lattice = LatticeGeometry::new(LatticeName::Chain, 5, 1, 1)?;
        let structure = Structure::from_reader("0 0 0 0 0\n0 0 -1 -1 -1\n".as_bytes())?;
        let contacts = structure.face_contacts(&lattice)?;
        assert_eq!(
            contacts,
            vec![SiteContact {
                site1: 0,
                site2: 1,
                bond: 0,
                face1: 0,
                face2: 1
            }]
        );
        Ok(())
    }

    #[test]
    fn triangular_diagonal_contact() -> Result<(), Error> {
        let lattice = LatticeGeometry::new(LatticeName::Triangular, 4, 4, 1)?;
        // Particles at (0, 0) and (1, 1), which the engine couples
        let mut orientations = vec!["-1"; 16];
        orientations[0] = "0";
        orientations[5] = "0";
        let text = format!("{}\n{}\n", vec!["0"; 16].join(" "), orientations.join(" "));
        let structure = Structure::from_reader(text.as_bytes())?;
        assert_eq!(
            structure.face_contacts(&lattice)?,
            vec![SiteContact {
                site1: 0,
                site2: 5,
                bond: 1,
                face1: 1,
                face2: 4
            }]
        );
        Ok(())
    }

    #[test]
    fn orientation_out_of_range() -> Result<(), Error> {
        let lattice = LatticeGeometry::new(LatticeName::Chain, 3, 1, 1)?;
        let structure = Structure::from_reader("0 0 0\n0 2 -1\n".as_bytes())?;
        assert!(structure.check_lattice(&lattice).is_err());
        Ok(())
    }
}
