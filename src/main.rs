use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

mod libeslestirme;

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "gui")]
mod gui;

use crate::libeslestirme::ses;
use crate::libeslestirme::soru::{Fetch, FetchError};

#[derive(Parser, Debug)]
#[command(name = "Eşleştirelim!")]
#[command(version, about, long_about = None)]
struct Args {
    /// Identifier of the matching block to open.
    matching_id: String,
    #[arg(short, long, value_name = "FILE", default_value = "sorular.json")]
    sorular: Option<PathBuf>,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("no matching block with id {0}")]
    NotFound(String),
    #[cfg(feature = "gui")]
    #[error("cannot start the gui: {0}")]
    Gui(#[from] eframe::Error),
}

fn main() -> Result<(), Error> {
    //INIT START
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let sorular = args.sorular.unwrap_or(PathBuf::from("sorular.json"));
    let fetch = Fetch::spawn(sorular);
    debug!(
        "[Setup] Question fetch dispatched, looking for matching {}.",
        args.matching_id
    );
    // INIT DONE

    cfg_if::cfg_if! {
        if #[cfg(feature = "gui")] {
            gui::init_gui(fetch, args.matching_id, Box::new(ses::SilentCues))
        } else if #[cfg(feature = "cli")] {
            cli::cli_loop(fetch, &args.matching_id, &ses::BellCues)
        } else {
            compile_error!("enable either the `gui` or the `cli` feature")
        }
    }
}
