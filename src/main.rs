use clap::{Arg, ArgAction, Command};
use log::debug;
use neon::output::Config;
use neon::{repl, runner};
use std::fs;
use std::path::Path;
use std::process;

/// Exit status for command line misuse.
const EXIT_USAGE: i32 = 64;

fn main() {
    let matches = Command::new("neon")
        .about("Tree-walking interpreter for the Neon scripting language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("extra")
                .index(2)
                .num_args(1..)
                .action(ArgAction::Append)
                .hide(true),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Print program output without color")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log interpreter stages (overridden by RUST_LOG)")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if matches.get_many::<String>("extra").is_some() {
        eprintln!("Usage: neon [FILE]");
        process::exit(EXIT_USAGE);
    }

    let config = Config {
        color: !matches.get_flag("no-color"),
    };

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, config),
        _ => {
            debug!("starting interactive session");
            repl::start(config);
        }
    }
}

fn run_file(path: &str, config: Config) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            runner::run(&source, Some(&filename), config);
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}
