#[macro_use] extern crate clap;
extern crate env_logger;
#[macro_use] extern crate libregtest;
#[macro_use] extern crate log;

mod options;
mod registry_suite;
mod reporter_suite;

use libregtest::{Registry, Reporter};
use options::Options;
use std::process;

fn main() {
    env_logger::init();

    let options = match Options::from_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    let registry = Registry::global();
    info!("{} tests registered", registry.len());

    if options.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return;
    }

    let mut reporter = Reporter::stdout(options.color.enabled());
    match registry.run_all(&mut reporter, options.tests_path.as_ref().map(|path| path.as_str())) {
        Ok(summary) => process::exit(if summary.is_success() { 0 } else { 1 }),
        Err(e) => {
            error!("could not write the report: {}", e);
            process::exit(2);
        }
    }
}
