//! `calc_frechet_distance <curve1> <curve2>`: prints `d_F(P, Q)`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use frechet::io;

#[derive(Parser, Debug)]
#[command(about = "Print the Frechet distance between two curve files")]
struct Args {
    curve1: PathBuf,
    curve2: PathBuf,
}

fn run(args: Args) -> frechet::Result<()> {
    let p = io::read_curve_file(&args.curve1)?;
    let q = io::read_curve_file(&args.curve2)?;
    let distance = frechet::distance::calc_distance(&p, &q);
    log::info!("d_F({}, {}) = {distance}", p.name, q.name);
    println!("{distance}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
