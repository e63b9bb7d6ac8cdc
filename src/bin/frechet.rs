//! `frechet <curve_dir> <dataset_file> <query_file> [<results_file>]`: runs
//! the range queries of a query file against a dataset, per spec §6.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use frechet::config::DeciderFlags;
use frechet::database::Database;
use frechet::io::{self, Query};
use frechet::Metrics;

#[derive(Parser, Debug)]
#[command(about = "Run Frechet-distance range queries over a curve dataset")]
struct Args {
    curve_dir: PathBuf,
    dataset_file: PathBuf,
    query_file: PathBuf,
    results_file: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    certify: bool,

    #[arg(long, value_name = "FILE")]
    metrics_out: Option<PathBuf>,
}

fn run(args: Args) -> frechet::Result<()> {
    let curves = io::read_dataset_index(&args.curve_dir, &args.dataset_file)?;
    let names: Vec<String> = curves.iter().map(|c| c.name.clone()).collect();
    let db = Database::build(curves);
    log::info!("loaded database of {} curves", db.len());

    let queries = io::read_query_file(&args.query_file)?;
    let flags = DeciderFlags::all();
    let mut metrics = Metrics::default();
    let mut rows = Vec::with_capacity(queries.len());

    for query in queries {
        let row = match query {
            Query::Range { curve, delta } => {
                let q = io::read_curve_file(&args.curve_dir.join(&curve))?;
                let matches = db.query(&q, delta, flags, args.certify, &mut metrics);
                matches.into_iter().map(|id| names[id.get()].clone()).collect()
            }
            Query::Decider { curve1, curve2, delta } => {
                let c1 = io::read_curve_file(&args.curve_dir.join(&curve1))?;
                let c2 = io::read_curve_file(&args.curve_dir.join(&curve2))?;
                let answer = frechet::decider::decide(&c1, &c2, delta, flags, &mut metrics);
                vec![if answer { "LESS".to_string() } else { "GREATER".to_string() }]
            }
        };
        rows.push(row);
    }

    if let Some(out) = &args.results_file {
        io::write_results_file(out, &rows)?;
    } else {
        for row in &rows {
            println!("{}", row.join(" "));
        }
    }

    if let Some(metrics_path) = &args.metrics_out {
        let json = serde_json::to_string_pretty(&metrics).expect("Metrics always serializes");
        std::fs::write(metrics_path, json).map_err(|e| frechet::Error::Io {
            path: metrics_path.clone(),
            source: e,
        })?;
    }

    log::info!("query batch finished: {} queries, {} certificates checked ({} failed)",
        rows.len(), metrics.certificates_checked, metrics.certificates_failed);
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
