mod config;
mod ordertable;
mod organize;

use std::error::Error;

use env_logger::Env;
use structopt::StructOpt;

#[macro_use]
extern crate log;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() -> Result<()> {
    let config = config::Opt::from_args();

    // set up logging
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    organize::organize_order(&config.table, &config.file)
}
