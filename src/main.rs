use std::env;
use std::error::Error;
use std::io;
use std::process;

use tracing::warn;

use fee_keeper::{logging, run, run_async, shell, Config, CsvFileBackend, Ledger};

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

const USAGE: &str = "Usage: fee-keeper [--async] [commands.csv]";

fn main() {
    if let Err(err) = run_app() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let config = Config::from_env()?;
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let backend = CsvFileBackend::new(&config.db_path);
    let (mut ledger, warnings) = Ledger::open(backend, config.payment_policy);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), path = %config.db_path.display(), "some stored records were skipped");
    }

    match args.as_slice() {
        [] => shell::run(&mut ledger, io::stdin().lock(), io::stdout()),
        [flag] if flag.starts_with('-') => Err(USAGE.into()),
        [script] => run(script, &mut ledger, io::stdout()),
        [flag, script] if flag == "--async" => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_async(script, ledger, io::stdout()))?;
            Ok(())
        }
        _ => Err(USAGE.into()),
    }
}
