use std::io::Write;
use std::process::ExitCode;

use smokegrid::{config, physics};

/// Value following `flag` in the CLI args, if any.
fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let path = parse_flag(&args, "--config").unwrap_or_else(|| config::DEFAULT_PATH.to_string());
    let mut cfg = config::load(&path);
    if let Some(steps) = parse_flag(&args, "--steps") {
        match steps.parse() {
            Ok(s) => cfg.run.steps = s,
            Err(e) => log::warn!("ignoring --steps {steps}: {e}"),
        }
    }

    match physics::run_headless(&cfg) {
        Ok(s) => {
            println!(
                "steps={} mass={:.4} KE={:.6e} max|div|={:.4e}",
                s.steps, s.total_mass, s.kinetic_energy, s.max_divergence
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("simulation failed: {e}");
            ExitCode::FAILURE
        }
    }
}
