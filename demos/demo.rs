//! A short tour: spy on a type, spy on a literal name, and let
//! everything else pass through to the console.
//!
//! Run with `cargo run --example demo`.

use std::any::type_name;

use log::{info, warn};
use logspy::{spy_on, spy_on_logger, LogSpy, SpyLogger};

struct Worker;

impl Worker {
    fn do_something(&self) {
        info!(target: type_name::<Worker>(), "something was done");
    }
}

fn main() {
    SpyLogger::new().finish().expect("failed to set logger");

    // No spy claims this record, so it is forwarded to the console.
    warn!(target: "demo", "nobody is spying on this record");

    let spy = spy_on::<Worker>(|| Worker.do_something());
    println!("captured by type: {:?}", spy.infos());

    let spy = spy_on_logger("demo::tasks", || {
        info!(target: "demo::tasks", "queued 3 tasks");
        warn!(target: "demo::tasks", "queue nearly full");
    });
    println!(
        "captured by name: infos={:?} warnings={:?}",
        spy.infos(),
        spy.warnings()
    );
}
