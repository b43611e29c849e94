
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod compiler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs;
use std::path::{Path, PathBuf};

use compiler::diag::LogSink;
use compiler::token::Token;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tPrint Tokens: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.is_present("print-tokens"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap()
    );

    let ifile = args.value_of("INPUT").unwrap();
    let ipath = Path::new(ifile);

    let source = match fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(contents) => contents,
    };

    let mut sink = LogSink::default();
    let tokens = compiler::lexer::tokenize(&source, &mut sink);

    if args.is_present("print-tokens") {
        print_tokens(&tokens);
    }

    let program = compiler::lower::lower(tokens, &mut sink);

    if sink.count() > 0 {
        warn!("{} error(s) reported during compilation", sink.count());
    }

    let opath = if let Some(filename) = args.value_of("output") {
        PathBuf::from(filename)
    } else {
        ipath.with_extension("asm")
    };

    if let Err(err) = fs::write(&opath, program.render()) {
        error!("fatal: unable to write output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }

    info!("assembly written to `{}`", opath.display());
}

fn print_tokens(tokens: &[Token]) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for token in tokens {
        grid.add(Cell::from(format!("{}", token.kind())));
        grid.add(Cell::from(format!("{}", token.position())));
        grid.add(Cell::from(format!("'{}'", token.value())));
    }

    println!("{}", grid.fit_into_columns(3));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap())
        .version(option_env!("CARGO_PKG_VERSION").unwrap())
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap())
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap())
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write assembly to an outfile instead of <INPUT>.asm"))
        .arg(Arg::with_name("print-tokens")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the token stream to STDOUT before lowering"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}
