use std::io::Write;

use clap::Parser;
use tagdelta::cli::commands::Cli;
use tagdelta::cli::handlers::{self, Reported};

fn main() {
    // Quiet by default; RUST_LOG=debug shows state transitions
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        // Tracker failures were already shown by the notifier
        if e.downcast_ref::<Reported>().is_none() {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
