//
// parameters.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Error;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde_json::{json, Value};

use patchy::{
    BuildRun, CoolingSchedule, Design, DesignEnergies, LatticeGeometry, LatticeName,
    McParameters, ModelParameters, MoveKind, Structure,
};

/// A fresh directory for the files of a single test.
fn scratch_dir(name: &str) -> Result<PathBuf, Error> {
    let dir = std::env::temp_dir().join(format!("patchy-{}-{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn energies() -> DesignEnergies {
    DesignEnergies {
        crystal: -15.,
        defect: -10.,
        mismatch: 100.,
    }
}

#[test]
fn save_load_model() -> Result<(), Error> {
    let dir = scratch_dir("model")?;
    let design = Design::CubicHedgehogCamembert;
    let cmap = design.build(&energies())?;
    // Probabilities which are exact in binary, so the comparison after parsing is exact
    let moves: BTreeMap<MoveKind, f64> = [
        (MoveKind::SwapEmptyFull, 0.5),
        (MoveKind::Rotate, 0.25),
        (MoveKind::RotateAndSwapWEmpty, 0.25),
    ]
    .iter()
    .copied()
    .collect();
    let (model, mc) = BuildRun::default()
        .lattice_size(12)
        .n_particles(vec![1000])
        .move_probas(moves)
        .output_dir(&dir.join("data"))
        .extra("crystal_e", json!(-15.))
        .extra("design", json!(design.as_str()))
        .build(design.lattice(), &cmap)?;

    let model_path = dir.join("model_params.json");
    let mc_path = dir.join("mc_params.json");
    model.save(&model_path)?;
    mc.save(&mc_path)?;

    let loaded = ModelParameters::load(&model_path)?;
    assert_eq!(loaded, model);
    assert_eq!(loaded.couplings.len(), 24 * 24);
    assert_eq!(loaded.extra["design"], json!("cubic-hedgehog-camembert"));
    loaded.validate()?;

    let loaded = McParameters::load(&mc_path)?;
    assert_eq!(loaded, mc);
    loaded.validate()?;

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn engine_key_names() -> Result<(), Error> {
    let cmap = Design::TriangularCrystal.build(&energies())?;
    let (model, mc) = BuildRun::default()
        .n_particles(vec![50])
        .cooling(CoolingSchedule::Linear, 10., 0.1, 40)
        .build(LatticeName::Triangular, &cmap)?;

    let model = serde_json::to_value(&model)?;
    for key in [
        "lattice_name",
        "lx",
        "ly",
        "lz",
        "n_types",
        "n_particles",
        "couplings",
        "initialize_option",
        "e_av_option",
        "e_av_output",
        "move_probas",
    ]
    .iter()
    {
        assert!(model.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(model["lattice_name"], "triangular");
    assert_eq!(model["lz"], 1);

    let mc = serde_json::to_value(&mc)?;
    assert_eq!(mc["Ti"], 10.);
    assert_eq!(mc["Tf"], 0.1);
    assert_eq!(mc["Nt"], 40);
    assert_eq!(mc["cooling_schedule"], "linear");
    Ok(())
}

#[test]
fn unknown_keys_are_kept() -> Result<(), Error> {
    let cmap = Design::TriangularCrystal.build(&energies())?;
    let (model, _) = BuildRun::default()
        .n_particles(vec![50])
        .build(LatticeName::Triangular, &cmap)?;

    let mut value = serde_json::to_value(&model)?;
    if let Value::Object(map) = &mut value {
        map.insert("seed".to_string(), json!(42));
        map.insert("notes".to_string(), json!({"author": "test"}));
    }
    let parsed: ModelParameters = serde_json::from_value(value)?;
    assert_eq!(parsed.extra["seed"], json!(42));

    let round_trip = serde_json::to_value(&parsed)?;
    assert_eq!(round_trip["notes"]["author"], "test");
    Ok(())
}

#[test]
fn mismatched_type_counts() -> Result<(), Error> {
    let cmap = Design::CubicCrystal.build(&energies())?;
    let result = BuildRun::default()
        .n_particles(vec![10, 10])
        .build(LatticeName::Cubic, &cmap);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn structure_on_model_lattice() -> Result<(), Error> {
    let dir = scratch_dir("structure")?;
    let cmap = Design::CubicCrystal.build(&energies())?;
    let (model, _) = BuildRun::default()
        .lattice_size(6)
        .n_particles(vec![100])
        .build(LatticeName::Cubic, &cmap)?;

    let lattice = LatticeGeometry::from_model(&model)?;
    let mut rng = Pcg64Mcg::seed_from_u64(42);
    let structure = Structure::random(&lattice, &model.n_particles, &mut rng)?;

    let path = dir.join("final_structure.dat");
    structure.to_file(&path)?;
    let loaded = Structure::from_file(&path)?;
    assert_eq!(loaded, structure);
    assert_eq!(loaded.n_particles(), 100);

    let histogram = loaded.contact_histogram(&lattice)?;
    let total: usize = histogram.values().sum();
    assert_eq!(total, loaded.face_contacts(&lattice)?.len());
    for &(face1, face2) in histogram.keys() {
        assert_eq!(
            lattice.particle().canonical_contact(face1, face2),
            (face1, face2)
        );
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn filled_cube_contacts() -> Result<(), Error> {
    // Every site occupied in the reference orientation, so every contact is a crystal contact
    let lattice = LatticeGeometry::new(LatticeName::Cubic, 3, 3, 3)?;
    let text = format!("{}\n{}\n", vec!["0"; 27].join(" "), vec!["0"; 27].join(" "));
    let structure = Structure::from_reader(text.as_bytes())?;

    let histogram = structure.contact_histogram(&lattice)?;
    assert_eq!(histogram.values().sum::<usize>(), 27 * 3);
    assert_eq!(histogram.len(), 3);
    assert_eq!(histogram.get(&(0, 12)), Some(&27));
    assert_eq!(histogram.get(&(4, 16)), Some(&27));
    assert_eq!(histogram.get(&(8, 20)), Some(&27));
    Ok(())
}
