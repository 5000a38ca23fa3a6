//
// parameters.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

//! The input files of the simulation engine

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Error};
use clap::arg_enum;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lattice::{LatticeGeometry, LatticeName};
use crate::ContactMap;

const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializeOption {
    Random,
    FromFile,
}

/// The Monte Carlo moves of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    SwapEmptyFull,
    SwapFullFull,
    Rotate,
    Mutate,
    RotateAndSwapWEmpty,
}

arg_enum! {
    /// How the temperature goes from `Ti` to `Tf`
    ///
    /// The exponential schedule takes `log10(T)` as its end points and the inverse schedule
    /// takes `1 / T`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum CoolingSchedule {
        Exponential,
        Linear,
        Inverse,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Unable to parse {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), Error> {
    let file =
        File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// The model parameters file
///
/// Keys the engine doesn't need, like the energy scales of a design, are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub lattice_name: LatticeName,
    pub lx: usize,
    pub ly: usize,
    pub lz: usize,
    pub n_types: usize,
    pub n_particles: Vec<usize>,
    pub couplings: Vec<f64>,
    pub initialize_option: InitializeOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_input: Option<String>,
    #[serde(default)]
    pub state_av_option: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_av_output: Option<String>,
    #[serde(default)]
    pub e_av_option: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_av_output: Option<String>,
    #[serde(default)]
    pub e_record_option: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_record_output: Option<String>,
    pub move_probas: BTreeMap<MoveKind, f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ModelParameters {
    pub fn load(path: &Path) -> Result<Self, Error> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        write_json(self, path)
    }

    pub fn n_sites(&self) -> usize {
        self.lx * self.ly * self.lz
    }

    /// The folders the engine writes averages and records into.
    pub fn output_dirs(&self) -> Vec<&str> {
        let mut dirs = Vec::new();
        for (enabled, dir) in vec![
            (self.state_av_option, self.state_av_output.as_deref()),
            (self.e_av_option, self.e_av_output.as_deref()),
            (self.e_record_option, self.e_record_output.as_deref()),
        ] {
            if let (true, Some(dir)) = (enabled, dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Check the file describes a simulation the engine can run.
    pub fn validate(&self) -> Result<(), Error> {
        let lattice = LatticeGeometry::from_model(self)?;

        if self.n_types == 0 {
            bail!("At least one particle type is required");
        }
        if self.n_particles.len() != self.n_types {
            bail!(
                "Found {} particle counts for {} types",
                self.n_particles.len(),
                self.n_types
            );
        }
        let total: usize = self.n_particles.iter().sum();
        if total > lattice.n_sites() {
            bail!(
                "{} particles don't fit on a lattice of {} sites",
                total,
                lattice.n_sites()
            );
        }

        let size = self.n_types * lattice.particle().n_orientations();
        if self.couplings.len() != size * size {
            bail!(
                "Expected {} couplings for {} types on a {} lattice, found {}",
                size * size,
                self.n_types,
                self.lattice_name,
                self.couplings.len()
            );
        }

        if self.move_probas.is_empty() {
            bail!("No Monte Carlo moves are enabled");
        }
        for (kind, &probability) in self.move_probas.iter() {
            if !probability.is_finite() || probability < 0. {
                bail!("Invalid probability {} for move {:?}", probability, kind);
            }
        }
        let total_probability: f64 = self.move_probas.values().sum();
        if (total_probability - 1.).abs() > PROBABILITY_TOLERANCE {
            bail!(
                "Move probabilities have to sum to 1, found {}",
                total_probability
            );
        }

        if self.initialize_option == InitializeOption::FromFile && self.state_input.is_none() {
            bail!("Initialising from a file requires state_input");
        }
        for (option, output, name) in [
            (self.state_av_option, &self.state_av_output, "state_av_output"),
            (self.e_av_option, &self.e_av_output, "e_av_output"),
            (self.e_record_option, &self.e_record_output, "e_record_output"),
        ]
        .iter()
        {
            if *option && output.is_none() {
                bail!("The option for {} is enabled without a folder", name);
            }
        }
        Ok(())
    }
}

/// The Monte Carlo parameters file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McParameters {
    pub mcs_eq: u64,
    pub mcs_av: u64,
    pub cooling_schedule: CoolingSchedule,
    #[serde(rename = "Ti")]
    pub t_initial: f64,
    #[serde(rename = "Tf")]
    pub t_final: f64,
    #[serde(rename = "Nt")]
    pub n_temperatures: u64,
    pub checkpoint_option: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_address: Option<String>,
    pub final_structure_address: String,
}

impl McParameters {
    pub fn load(path: &Path) -> Result<Self, Error> {
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        write_json(self, path)
    }

    pub fn output_dirs(&self) -> Vec<&str> {
        let mut dirs = vec![self.final_structure_address.as_str()];
        if self.checkpoint_option {
            if let Some(address) = self.checkpoint_address.as_deref() {
                if !dirs.contains(&address) {
                    dirs.push(address);
                }
            }
        }
        dirs
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.n_temperatures == 0 {
            bail!("At least one annealing step is required");
        }
        if !self.t_initial.is_finite() || !self.t_final.is_finite() {
            bail!(
                "Temperatures have to be finite, found Ti = {}, Tf = {}",
                self.t_initial,
                self.t_final
            );
        }
        match self.cooling_schedule {
            CoolingSchedule::Inverse if self.t_initial <= 0. || self.t_final <= 0. => bail!(
                "The inverse schedule takes 1 / T, which has to be positive, found Ti = {}, Tf = {}",
                self.t_initial,
                self.t_final
            ),
            CoolingSchedule::Linear if self.t_initial < 0. || self.t_final < 0. => bail!(
                "Temperatures can't be negative, found Ti = {}, Tf = {}",
                self.t_initial,
                self.t_final
            ),
            _ => (),
        }
        if self.checkpoint_option && self.checkpoint_address.is_none() {
            bail!("Checkpointing is enabled without a checkpoint_address");
        }
        Ok(())
    }
}

/// Assemble the input files for a single run
///
/// All folders are placed inside the output directory, and are written with a trailing `/`
/// since the engine appends file names directly.
///
#[derive(Debug, Clone)]
pub struct BuildRun {
    lattice_size: usize,
    dimensions: Option<(usize, usize, usize)>,
    n_particles: Vec<usize>,
    initialize_option: InitializeOption,
    state_input: Option<String>,
    state_av: bool,
    e_av: bool,
    e_record: bool,
    move_probas: BTreeMap<MoveKind, f64>,
    mcs_eq: u64,
    mcs_av: u64,
    cooling_schedule: CoolingSchedule,
    t_initial: f64,
    t_final: f64,
    n_temperatures: u64,
    checkpoint: bool,
    output_dir: PathBuf,
    extra: BTreeMap<String, Value>,
}

impl Default for BuildRun {
    fn default() -> Self {
        let move_probas = [
            (MoveKind::SwapEmptyFull, 1. / 3.),
            (MoveKind::Rotate, 1. / 3.),
            (MoveKind::RotateAndSwapWEmpty, 1. / 3.),
        ]
        .iter()
        .copied()
        .collect();
        Self {
            lattice_size: 10,
            dimensions: None,
            n_particles: vec![100],
            initialize_option: InitializeOption::Random,
            state_input: None,
            state_av: false,
            e_av: true,
            e_record: false,
            move_probas,
            mcs_eq: 1000,
            mcs_av: 10,
            cooling_schedule: CoolingSchedule::Exponential,
            t_initial: 2.,
            t_final: 0.,
            n_temperatures: 120,
            checkpoint: true,
            output_dir: PathBuf::from("data"),
            extra: BTreeMap::new(),
        }
    }
}

fn folder(base: &Path, name: &str) -> String {
    format!("{}/", base.join(name).display())
}

impl BuildRun {
    /// The number of sites along each axis the lattice extends along.
    pub fn lattice_size(&mut self, lattice_size: usize) -> &mut Self {
        self.lattice_size = lattice_size;
        self
    }

    /// Set every dimension explicitly, this takes precedence over the lattice size.
    pub fn dimensions(&mut self, lx: usize, ly: usize, lz: usize) -> &mut Self {
        self.dimensions = Some((lx, ly, lz));
        self
    }

    pub fn n_particles(&mut self, n_particles: Vec<usize>) -> &mut Self {
        self.n_particles = n_particles;
        self
    }

    pub fn from_file(&mut self, state_input: &str) -> &mut Self {
        self.initialize_option = InitializeOption::FromFile;
        self.state_input = Some(state_input.to_string());
        self
    }

    pub fn state_average(&mut self, enabled: bool) -> &mut Self {
        self.state_av = enabled;
        self
    }

    pub fn energy_average(&mut self, enabled: bool) -> &mut Self {
        self.e_av = enabled;
        self
    }

    pub fn energy_record(&mut self, enabled: bool) -> &mut Self {
        self.e_record = enabled;
        self
    }

    pub fn move_probas(&mut self, move_probas: BTreeMap<MoveKind, f64>) -> &mut Self {
        self.move_probas = move_probas;
        self
    }

    pub fn mcs_eq(&mut self, mcs_eq: u64) -> &mut Self {
        self.mcs_eq = mcs_eq;
        self
    }

    pub fn mcs_av(&mut self, mcs_av: u64) -> &mut Self {
        self.mcs_av = mcs_av;
        self
    }

    pub fn cooling(
        &mut self,
        schedule: CoolingSchedule,
        t_initial: f64,
        t_final: f64,
        n_temperatures: u64,
    ) -> &mut Self {
        self.cooling_schedule = schedule;
        self.t_initial = t_initial;
        self.t_final = t_final;
        self.n_temperatures = n_temperatures;
        self
    }

    pub fn checkpoint(&mut self, enabled: bool) -> &mut Self {
        self.checkpoint = enabled;
        self
    }

    pub fn output_dir(&mut self, output_dir: &Path) -> &mut Self {
        self.output_dir = output_dir.to_path_buf();
        self
    }

    /// An additional key for the model parameters file.
    pub fn extra(&mut self, key: &str, value: Value) -> &mut Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn build(
        &self,
        lattice: LatticeName,
        cmap: &ContactMap,
    ) -> Result<(ModelParameters, McParameters), Error> {
        let (lx, ly, lz) = self.dimensions.unwrap_or_else(|| {
            let l = self.lattice_size;
            match lattice.dimensions() {
                1 => (l, 1, 1),
                2 => (l, l, 1),
                _ => (l, l, l),
            }
        });
        if self.n_particles.len() != cmap.n_types() {
            bail!(
                "Found {} particle counts for a contact map with {} types",
                self.n_particles.len(),
                cmap.n_types()
            );
        }

        let optional = |enabled: bool, name: &str| {
            if enabled {
                Some(folder(&self.output_dir, name))
            } else {
                None
            }
        };
        let model = ModelParameters {
            lattice_name: lattice,
            lx,
            ly,
            lz,
            n_types: cmap.n_types(),
            n_particles: self.n_particles.clone(),
            couplings: cmap.formatted_couplings()?,
            initialize_option: self.initialize_option,
            state_input: self.state_input.clone(),
            state_av_option: self.state_av,
            state_av_output: optional(self.state_av, "average_state"),
            e_av_option: self.e_av,
            e_av_output: optional(self.e_av, "average_e"),
            e_record_option: self.e_record,
            e_record_output: optional(self.e_record, "e_record"),
            move_probas: self.move_probas.clone(),
            extra: self.extra.clone(),
        };
        model.validate()?;

        let structures = folder(&self.output_dir, "structures");
        let mc = McParameters {
            mcs_eq: self.mcs_eq,
            mcs_av: self.mcs_av,
            cooling_schedule: self.cooling_schedule,
            t_initial: self.t_initial,
            t_final: self.t_final,
            n_temperatures: self.n_temperatures,
            checkpoint_option: self.checkpoint,
            checkpoint_address: optional(self.checkpoint, "structures"),
            final_structure_address: structures,
        };
        mc.validate()?;

        debug!(
            "Built run on a {} lattice of {} x {} x {} with {} particles",
            lattice,
            lx,
            ly,
            lz,
            self.n_particles.iter().sum::<usize>()
        );
        Ok((model, mc))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn model() -> Result<ModelParameters, Error> {
        let cmap = ContactMap::square(1, -10.)?;
        let (model, _) = BuildRun::default()
            .lattice_size(11)
            .n_particles(vec![20])
            .build(LatticeName::Square, &cmap)?;
        Ok(model)
    }

    #[test]
    fn builder_dimensions() -> Result<(), Error> {
        let model = model()?;
        assert_eq!((model.lx, model.ly, model.lz), (11, 11, 1));
        assert_eq!(model.couplings.len(), 16);
        Ok(())
    }

    #[test]
    fn move_names() -> Result<(), Error> {
        let json = serde_json::to_value(&model()?)?;
        let moves = &json["move_probas"];
        assert!(moves.get("swap_empty_full").is_some());
        assert!(moves.get("rotate_and_swap_w_empty").is_some());
        assert_eq!(json["initialize_option"], "random");
        assert_eq!(json["lattice_name"], "square");
        Ok(())
    }

    #[test]
    fn probabilities_sum() -> Result<(), Error> {
        let mut model = model()?;
        model.move_probas.insert(MoveKind::Mutate, 0.5);
        assert!(model.validate().is_err());
        Ok(())
    }

    #[test]
    fn from_file_needs_input() -> Result<(), Error> {
        let mut model = model()?;
        model.initialize_option = InitializeOption::FromFile;
        assert!(model.validate().is_err());
        model.state_input = Some("final_structure.dat".to_string());
        model.validate()?;
        Ok(())
    }

    #[test]
    fn too_many_particles() -> Result<(), Error> {
        let mut model = model()?;
        model.n_particles = vec![122];
        assert!(model.validate().is_err());
        Ok(())
    }

    #[test]
    fn inverse_schedule() -> Result<(), Error> {
        let cmap = ContactMap::square(1, -10.)?;
        let result = BuildRun::default()
            .n_particles(vec![10])
            .cooling(CoolingSchedule::Inverse, 0., 10., 20)
            .build(LatticeName::Square, &cmap);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn output_folders() -> Result<(), Error> {
        let cmap = ContactMap::chain(1, 0.)?;
        let (model, mc) = BuildRun::default()
            .n_particles(vec![5])
            .output_dir(Path::new("run"))
            .build(LatticeName::Chain, &cmap)?;
        assert_eq!(model.e_av_output.as_deref(), Some("run/average_e/"));
        assert_eq!(model.output_dirs(), vec!["run/average_e/"]);
        assert_eq!(mc.final_structure_address, "run/structures/");
        assert_eq!(mc.checkpoint_address.as_deref(), Some("run/structures/"));
        assert_eq!(mc.output_dirs(), vec!["run/structures/"]);
        Ok(())
    }
}
