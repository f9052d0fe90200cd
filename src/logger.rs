use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Progress goes to stdout at `Info`; `RUST_LOG` overrides the level.
pub fn init() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .filter_module("chromiumoxide", LevelFilter::Warn)
        .parse_default_env()
        .target(Target::Stdout)
        .init();
}
