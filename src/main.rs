use std::env;
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use pasim::{detect_paths, DetectorConfig, IngestConfig};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: pasim <left.pas> <right.pas>");
        return ExitCode::from(2);
    }

    match run(Path::new(&args[1]), Path::new(&args[2])) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pasim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(left: &Path, right: &Path) -> Result<(), Box<dyn Error>> {
    let result = detect_paths(
        left,
        right,
        &IngestConfig::default(),
        &DetectorConfig::default(),
    )?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
