//
// main.rs
// Copyright (C) 2019 Malcolm Ramsay <malramsay64@gmail.com>
// Distributed under terms of the MIT license.
//

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Error};
use log::{debug, info, LevelFilter};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rayon::prelude::*;
use serde_json::json;
use structopt::StructOpt;

use patchy::designs::{Design, DesignEnergies};
use patchy::lattice::{constants, LatticeGeometry, LatticeName};
use patchy::parameters::{BuildRun, CoolingSchedule, ModelParameters};
use patchy::{ParticleGeometry, Structure};

#[derive(Debug, StructOpt)]
#[structopt(name = "patchy")]
struct Args {
    /// Pass many times for more log output
    ///
    /// By default, it'll report info messages. Passing `-v` one time also prints debug
    /// messages, and `-vv` enables trace logging.
    #[structopt(long, short, parse(from_occurrences))]
    verbosity: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, StructOpt)]
struct RunOptions {
    /// The number of sites along each axis of the lattice
    #[structopt(long, default_value = "20")]
    lattice_size: usize,

    /// The number of particles of each type, by default a single type filling half the sites
    #[structopt(long)]
    n_particles: Vec<usize>,

    /// Monte Carlo sweeps at each temperature before averaging
    #[structopt(long, default_value = "1000")]
    mcs_eq: u64,

    /// Monte Carlo sweeps used for averaging at each temperature
    #[structopt(long, default_value = "10")]
    mcs_av: u64,

    #[structopt(long, possible_values = &CoolingSchedule::variants(), case_insensitive = true, default_value = "Exponential")]
    cooling: CoolingSchedule,

    /// The initial temperature, as log10(T) for the exponential schedule and 1/T for the inverse
    #[structopt(long, default_value = "2")]
    t_initial: f64,

    /// The final temperature, in the same units as the initial temperature
    #[structopt(long, default_value = "0")]
    t_final: f64,

    /// The number of annealing steps
    #[structopt(long, default_value = "120")]
    n_temperatures: u64,

    /// Don't save a checkpoint structure after each temperature
    #[structopt(long)]
    no_checkpoint: bool,
}

impl RunOptions {
    fn particle_counts(&self, lattice: LatticeName) -> Vec<usize> {
        if self.n_particles.is_empty() {
            let n_sites = (0..lattice.dimensions()).fold(1, |n, _| n * self.lattice_size);
            vec![n_sites / 2]
        } else {
            self.n_particles.clone()
        }
    }

    fn builder(&self, lattice: LatticeName, output_dir: &Path) -> BuildRun {
        let mut builder = BuildRun::default();
        builder
            .lattice_size(self.lattice_size)
            .n_particles(self.particle_counts(lattice))
            .mcs_eq(self.mcs_eq)
            .mcs_av(self.mcs_av)
            .cooling(
                self.cooling,
                self.t_initial,
                self.t_final,
                self.n_temperatures,
            )
            .checkpoint(!self.no_checkpoint)
            .output_dir(output_dir);
        builder
    }
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Write the input files for a single contact map design
    #[structopt(name = "design")]
    Design {
        #[structopt(possible_values = &Design::variants())]
        design: Design,

        /// The energy of the contacts forming the crystal
        #[structopt(long, default_value = "-15")]
        crystal_e: f64,

        /// The energy of the contacts seeding the defect
        #[structopt(long, default_value = "-10")]
        defect_e: f64,

        /// The energy of every other contact
        #[structopt(long, default_value = "100")]
        mismatch_e: f64,

        #[structopt(flatten)]
        run: RunOptions,

        /// The prefix of the input files, the simulation output goes in a folder of this name
        #[structopt(long, parse(from_os_str))]
        outfile: PathBuf,
    },
    /// Write input files for a range of defect energies
    #[structopt(name = "sweep")]
    Sweep {
        #[structopt(possible_values = &Design::variants())]
        design: Design,

        /// The ratios of the crystal to the defect energy
        #[structopt(long, required = true)]
        factors: Vec<f64>,

        #[structopt(long, default_value = "-15")]
        crystal_e: f64,

        #[structopt(long, default_value = "100")]
        mismatch_e: f64,

        #[structopt(flatten)]
        run: RunOptions,

        /// The directory for the input files and simulation output
        #[structopt(long, parse(from_os_str))]
        outdir: PathBuf,
    },
    /// Count the face contacts in a structure written by the simulation
    #[structopt(name = "contacts")]
    Contacts {
        /// The model parameters the simulation was run with
        #[structopt(long, parse(from_os_str))]
        model: PathBuf,

        #[structopt(long, parse(from_os_str))]
        structure: PathBuf,
    },
    /// Write a random initial structure for the lattice and particles of a model
    #[structopt(name = "random-structure")]
    RandomStructure {
        #[structopt(long, parse(from_os_str))]
        model: PathBuf,

        /// Seed for the random number generator, so the structure can be reproduced
        #[structopt(long, default_value = "0")]
        seed: u64,

        #[structopt(long, parse(from_os_str))]
        outfile: PathBuf,
    },
    /// Print the bonds and bond permutation table of a lattice
    #[structopt(name = "inspect")]
    Inspect {
        #[structopt(possible_values = &LatticeName::variants(), case_insensitive = true)]
        lattice: LatticeName,
    },
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", prefix.display(), suffix))
}

fn write_run(
    design: Design,
    energies: &DesignEnergies,
    run: &RunOptions,
    prefix: &Path,
    output_dir: &Path,
) -> Result<(), Error> {
    let cmap = design.build(energies)?;
    let model_path = with_suffix(prefix, "_model_params.json");
    let mc_path = with_suffix(prefix, "_mc_params.json");

    let (model, mc) = run
        .builder(design.lattice(), output_dir)
        .extra("design", json!(design.as_str()))
        .extra("crystal_e", json!(energies.crystal))
        .extra("defect_e", json!(energies.defect))
        .extra("repel_e", json!(energies.mismatch))
        .extra("mc_file", json!(mc_path.display().to_string()))
        .build(design.lattice(), &cmap)?;

    for dir in model.output_dirs().into_iter().chain(mc.output_dirs()) {
        fs::create_dir_all(dir)?;
    }
    model.save(&model_path)?;
    mc.save(&mc_path)?;
    info!("Wrote {} and {}", model_path.display(), mc_path.display());
    Ok(())
}

fn run_name(design: Design, factor: f64) -> String {
    format!("{}_eced_{}", design, factor)
}

/// The names of the runs in a sweep, which must all differ as the runs are written in parallel
fn sweep_names(design: Design, factors: &[f64]) -> Result<Vec<String>, Error> {
    if let Some(factor) = factors.iter().find(|&&f| f == 0. || !f.is_finite()) {
        bail!("Invalid energy ratio {}", factor);
    }
    let names: Vec<String> = factors.iter().map(|&f| run_name(design, f)).collect();
    let mut seen = BTreeSet::new();
    if let Some(name) = names.iter().find(|name| !seen.insert(name.as_str())) {
        bail!("Duplicate run {} in sweep", name);
    }
    Ok(names)
}

fn sweep(
    design: Design,
    factors: &[f64],
    crystal_e: f64,
    mismatch_e: f64,
    run: &RunOptions,
    outdir: &Path,
) -> Result<(), Error> {
    let names = sweep_names(design, factors)?;
    let input_dir = outdir.join("input");
    fs::create_dir_all(&input_dir)?;

    factors
        .par_iter()
        .zip(names.par_iter())
        .map(|(&factor, run_name)| {
            let energies = DesignEnergies {
                crystal: crystal_e,
                defect: crystal_e / factor,
                mismatch: mismatch_e,
            };
            debug!("Building {} with {:?}", run_name, energies);
            write_run(
                design,
                &energies,
                run,
                &input_dir.join(run_name),
                &outdir.join("data").join(run_name),
            )
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(())
}

fn contacts(model: &Path, structure: &Path) -> Result<(), Error> {
    let params = ModelParameters::load(model)?;
    let lattice = LatticeGeometry::from_model(&params)?;
    let structure = Structure::from_file(structure)?;

    let histogram = structure.contact_histogram(&lattice)?;
    info!(
        "Found {} contacts between {} particles",
        histogram.values().sum::<usize>(),
        structure.n_particles()
    );
    println!("face1 face2 count");
    for ((face1, face2), count) in histogram {
        println!("{} {} {}", face1, face2, count);
    }
    Ok(())
}

fn random_structure(model: &Path, seed: u64, outfile: &Path) -> Result<(), Error> {
    let params = ModelParameters::load(model)?;
    params.validate()?;
    let lattice = LatticeGeometry::from_model(&params)?;

    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let structure = Structure::random(&lattice, &params.n_particles, &mut rng)?;
    structure.to_file(outfile)?;
    info!(
        "Wrote {} particles on {} sites to {}",
        structure.n_particles(),
        structure.n_sites(),
        outfile.display()
    );
    Ok(())
}

fn inspect(name: LatticeName) -> Result<(), Error> {
    let particle = ParticleGeometry::shared(name)?;
    println!(
        "{}: {} orientations, {} bonds, {} stabilizers",
        name.as_str(),
        particle.n_orientations(),
        particle.n_bonds(),
        particle.n_stabilizers()
    );
    for (bond, vector) in constants::bonds(name).iter().enumerate() {
        let faces: Vec<String> = (0..particle.n_orientations())
            .map(|o| particle.bond_permutation(bond, o).to_string())
            .collect();
        println!("{:>2} {:?}: {}", bond, vector, faces.join(" "));
    }
    Ok(())
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    let log_level = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(log_level).init();

    debug!("Logging Level: {}", log_level);

    match args.command {
        Command::Design {
            design,
            crystal_e,
            defect_e,
            mismatch_e,
            run,
            outfile,
        } => {
            let energies = DesignEnergies {
                crystal: crystal_e,
                defect: defect_e,
                mismatch: mismatch_e,
            };
            let output_dir = match (outfile.parent(), outfile.file_name()) {
                (Some(parent), Some(name)) => parent.join("data").join(name),
                _ => bail!("Invalid output file {}", outfile.display()),
            };
            if let Some(parent) = outfile.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            write_run(design, &energies, &run, &outfile, &output_dir)
        }
        Command::Sweep {
            design,
            factors,
            crystal_e,
            mismatch_e,
            run,
            outdir,
        } => sweep(design, &factors, crystal_e, mismatch_e, &run, &outdir),
        Command::Contacts { model, structure } => contacts(&model, &structure),
        Command::RandomStructure {
            model,
            seed,
            outfile,
        } => random_structure(&model, seed, &outfile),
        Command::Inspect { lattice } => inspect(lattice),
    }
}
