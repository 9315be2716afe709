#![warn(clippy::all)]

use std::io::{self, Write as _};

use structopt::StructOpt;

use cffs::{Opt, Result};

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let cnsl = &mut opt.build_console();
    let stdout = &mut io::stdout();
    opt.run(stdout, cnsl).map_err(|err| {
        io::stdout().flush().unwrap_or(());
        eprintln!();
        err
    })
}
