//! Logger setup for the CLI.
//!
//! Lines look like `link.rs: 42; complink_linkage::engine: 2026-01-31 09:15:02 matching data...`.
//! Level defaults to `info`; `RUST_LOG` overrides it.

use std::io::Write;

use env_logger::Env;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let file = record
                .file()
                .and_then(|path| path.rsplit(['/', '\\']).next())
                .unwrap_or("?");
            writeln!(
                buf,
                "{}: {}; {}: {} {}",
                file,
                record.line().unwrap_or(0),
                record.target(),
                chrono::Local::now().format(TIMESTAMP_FORMAT),
                record.args()
            )
        })
        .init();
}
