//
// contact_map.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use anyhow::Error;
use itertools::iproduct;
use nalgebra::DMatrix;
use proptest::prelude::*;
use proptest_attr_macro::proptest;

use patchy::designs::{cubic, triangular};
use patchy::{ContactMap, Design, DesignEnergies, LatticeName};

/// Energies kept away from the extremes of the float range.
#[derive(Debug, Clone, Copy)]
struct Energy(f64);

impl Arbitrary for Energy {
    type Parameters = ();
    type Strategy = BoxedStrategy<Energy>;

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (-100.0..=100.0).prop_map(Energy).boxed()
    }
}

#[derive(Debug, Clone, Copy)]
struct AnyLattice(LatticeName);

impl Arbitrary for AnyLattice {
    type Parameters = ();
    type Strategy = BoxedStrategy<AnyLattice>;

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (0..LatticeName::ALL.len())
            .prop_map(|index| AnyLattice(LatticeName::ALL[index]))
            .boxed()
    }
}

/// A set contact is read back from every encoding of it
#[proptest]
fn set_reaches_every_encoding(
    lattice: AnyLattice,
    face1: usize,
    face2: usize,
    type1: bool,
    type2: bool,
    energy: Energy,
) {
    let mut cmap = ContactMap::from_lattice(lattice.0, 2, 0.).unwrap();
    let n = cmap.n_orientations();
    let (face1, face2) = (face1 % n, face2 % n);
    let (type1, type2) = (type1 as usize, type2 as usize);

    cmap.set(face1, type1, face2, type2, energy.0).unwrap();

    let particle = cmap.particle();
    for &(f1, f2) in particle.equivalent_face_pairs(face1, face2) {
        assert_eq!(cmap.get(f1, type1, f2, type2), energy.0);
        assert_eq!(cmap.get(f2, type2, f1, type1), energy.0);
    }
    cmap.check_consistency().unwrap();
}

/// Setting the same contact twice leaves the map unchanged
#[proptest]
fn set_is_idempotent(lattice: AnyLattice, face1: usize, face2: usize, energy: Energy) {
    let mut cmap = ContactMap::from_lattice(lattice.0, 1, 1.).unwrap();
    let n = cmap.n_orientations();
    let (face1, face2) = (face1 % n, face2 % n);

    cmap.set(face1, 0, face2, 0, energy.0).unwrap();
    let once = cmap.couplings().to_vec();
    cmap.set(face1, 0, face2, 0, energy.0).unwrap();
    assert_eq!(cmap.couplings(), once.as_slice());
}

/// Writing a map's own matrix back leaves it unchanged
#[proptest]
fn matrix_write_read(lattice: AnyLattice, contacts: Vec<(usize, usize)>, energy: Energy) {
    let mut cmap = ContactMap::from_lattice(lattice.0, 1, 5.).unwrap();
    let n = cmap.n_orientations();
    let contacts: Vec<(usize, usize)> = contacts.iter().map(|(a, b)| (a % n, b % n)).collect();
    cmap.set_contacts(&contacts, energy.0).unwrap();

    let matrix = cmap.single_species_matrix(0);
    let mut copy = ContactMap::from_lattice(lattice.0, 1, 0.).unwrap();
    copy.set_single_species_matrix(0, &matrix).unwrap();
    assert_eq!(copy.couplings(), cmap.couplings());
}

#[test]
fn cubic_opposite_faces() -> Result<(), Error> {
    let mut cmap = ContactMap::cubic(1, 0.)?;
    cmap.set(0, 0, 12, 0, -15.)?;

    assert_eq!(cmap.get(12, 0, 0, 0), -15.);
    for j in 0..4 {
        assert_eq!(cmap.get(j, 0, j + 12, 0), -15.);
        assert_eq!(cmap.get(j + 12, 0, j, 0), -15.);
    }
    // A spin of one face without the other is a different contact
    assert_eq!(cmap.get(0, 0, 13, 0), 0.);

    let matrix = cmap.single_species_matrix(0);
    assert_eq!(matrix[(0, 12)], -15.);
    assert_eq!(matrix[(12, 0)], -15.);
    assert_eq!(matrix.iter().filter(|&&e| e != 0.).count(), 8);
    Ok(())
}

#[test]
fn triangular_vortex_camembert() -> Result<(), Error> {
    let energies = DesignEnergies {
        crystal: -15.,
        defect: -10.,
        mismatch: 100.,
    };
    let cmap = triangular::vortex_camembert(&energies)?;

    assert_eq!(cmap.get(0, 0, 3, 0), -15.);
    assert_eq!(cmap.get(2, 0, 5, 0), -15.);
    assert_eq!(cmap.get(1, 0, 4, 0), -15.);
    assert_eq!(cmap.get(4, 0, 1, 0), -15.);
    assert_eq!(cmap.get(0, 0, 4, 0), -10.);
    assert_eq!(cmap.get(4, 0, 0, 0), -10.);
    assert_eq!(cmap.get(1, 0, 5, 0), -10.);
    assert_eq!(cmap.get(5, 0, 1, 0), -10.);
    assert_eq!(cmap.get(0, 0, 0, 0), 100.);
    assert_eq!(cmap.get(2, 0, 4, 0), 100.);
    Ok(())
}

#[test]
fn later_contacts_overwrite() -> Result<(), Error> {
    let energies = DesignEnergies {
        crystal: -15.,
        defect: -10.,
        mismatch: 100.,
    };
    let cmap = cubic::hedgehog_camembert_one_axis(&energies)?;
    // (12, 4) is set by the defect after the crystal contacts
    assert_eq!(cmap.get(12, 0, 4, 0), -10.);
    assert_eq!(cmap.get(0, 0, 12, 0), -15.);
    cmap.check_consistency()?;
    Ok(())
}

#[test]
fn two_species_matrix() -> Result<(), Error> {
    let mut cmap = ContactMap::square(2, 0.)?;
    let mut matrix = DMatrix::zeros(4, 4);
    matrix[(0, 2)] = -3.;
    cmap.set_two_species_matrix(0, 1, &matrix)?;

    assert_eq!(cmap.get(0, 0, 2, 1), -3.);
    assert_eq!(cmap.get(2, 1, 0, 0), -3.);
    assert_eq!(cmap.get(2, 0, 0, 1), 0.);
    assert_eq!(cmap.two_species_matrix(0, 1), matrix);
    assert_eq!(cmap.two_species_matrix(1, 0), matrix.transpose());
    assert_eq!(cmap.single_species_matrix(0), DMatrix::zeros(4, 4));
    cmap.check_consistency()?;
    Ok(())
}

#[test]
fn triangular_matrix_input() -> Result<(), Error> {
    let mut cmap = ContactMap::square(1, 0.)?;
    let mut upper = DMatrix::zeros(4, 4);
    upper[(0, 2)] = -1.;
    upper[(1, 1)] = 2.;
    cmap.set_single_species_matrix(0, &upper)?;

    let matrix = cmap.single_species_matrix(0);
    assert_eq!(matrix[(0, 2)], -1.);
    assert_eq!(matrix[(2, 0)], -1.);
    assert_eq!(matrix[(1, 1)], 2.);
    Ok(())
}

#[test]
fn matrix_setter_rejects() -> Result<(), Error> {
    let mut cmap = ContactMap::square(1, 7.)?;

    assert!(cmap
        .set_single_species_matrix(0, &DMatrix::zeros(3, 3))
        .is_err());
    assert!(cmap
        .set_single_species_matrix(1, &DMatrix::zeros(4, 4))
        .is_err());
    let mut neither = DMatrix::zeros(4, 4);
    neither[(0, 1)] = 1.;
    neither[(1, 0)] = 2.;
    assert!(cmap.set_single_species_matrix(0, &neither).is_err());

    // Nothing is written by a rejected matrix
    assert!(cmap.couplings().iter().all(|&e| e == 7.));
    Ok(())
}

#[test]
fn designs_use_three_energies() -> Result<(), Error> {
    let energies = DesignEnergies {
        crystal: -15.,
        defect: -10.,
        mismatch: 100.,
    };
    for design in Design::ALL.iter() {
        let cmap = design.build(&energies)?;
        let n = cmap.n_orientations();
        for (f1, f2) in iproduct!(0..n, 0..n) {
            let e = cmap.get(f1, 0, f2, 0);
            assert!(
                e == -15. || e == -10. || e == 100.,
                "{} has contact ({}, {}) = {}",
                design,
                f1,
                f2,
                e
            );
        }
        assert!(cmap.couplings().contains(&-15.), "{}", design);
    }
    Ok(())
}
