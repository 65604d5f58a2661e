use std::io::{self, Write};
use std::process;

use log::LevelFilter;
use pharmacy::{commands, CliOptions};

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn main() {
    let opts = CliOptions::parse();
    init_logging(opts.debug_logs);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = commands::run(&opts, &mut out) {
        let _ = out.flush();
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}
