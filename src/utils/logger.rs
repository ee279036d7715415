use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

pub fn init_logger() {
    // Default filter, overridable through RUST_LOG
    let env = Env::default().filter_or("RUST_LOG", "warn,arascribe=info");

    let mut builder = Builder::from_env(env);

    builder
        // Suppress noisy HTTP internals unless explicitly requested
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("rustls", LevelFilter::Error)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        // Keep stdout free for results and the progress bar
        .target(env_logger::Target::Stderr)
        .init();
}
