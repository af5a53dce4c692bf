use std::{
    env,
    error::Error,
    path::{Path, PathBuf},
};

use clap::{crate_version, App, Arg, ArgMatches};
use log::warn;
use serde::Serialize;

use compflags::{
    configuration::Configuration, database::CompilationDatabase, resolver::FlagResolver,
    FlagsForFile,
};

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("flagsfor")
        .version(crate_version!())
        .about("Prints the compiler flags to analyze source and header files with.")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Logs more details to stderr (repeat for more)"),
        )
        .arg(
            Arg::with_name("project-root")
                .long("project-root")
                .value_name("DIR")
                .takes_value(true)
                .help("Project directory; the other directories default to children of it"),
        )
        .arg(
            Arg::with_name("database")
                .long("database")
                .value_name("DIR")
                .takes_value(true)
                .help("Directory holding compile_commands.json [default: <project-root>/build]"),
        )
        .arg(
            Arg::with_name("include-root")
                .long("include-root")
                .value_name("DIR")
                .takes_value(true)
                .help("Directory of public headers [default: <project-root>/include]"),
        )
        .arg(
            Arg::with_name("source-root")
                .long("source-root")
                .value_name("DIR")
                .takes_value(true)
                .help("Directory of sources [default: <project-root>/src]"),
        )
        .arg(
            Arg::with_name("FILE")
                .required(true)
                .multiple(true)
                .help("Files to print the flags for"),
        )
        .get_matches();

    stderrlog::new()
        .module(module_path!())
        .module("compflags")
        .verbosity(matches.occurrences_of("verbose") as usize + 1)
        .init()?;

    let current_dir = env::current_dir()?;
    let configuration = configuration(&matches, &current_dir);

    let database = match CompilationDatabase::load(&configuration.layout.database_dir) {
        Ok(database) => database,
        Err(error) => {
            warn!("Continuing without a compilation database: {}", error);
            None
        }
    };

    let resolver = FlagResolver::new(configuration, database);

    for file in matches.values_of_os("FILE").into_iter().flatten() {
        let file = absolute(&current_dir, Path::new(file));
        let result = resolver.resolve(&file);

        let output = Output {
            file: file.to_string_lossy().into_owned(),
            result,
        };
        println!("{}", serde_json::to_string(&output)?);
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct Output {
    file: String,

    #[serde(flatten)]
    result: FlagsForFile,
}

fn configuration(matches: &ArgMatches, current_dir: &Path) -> Configuration {
    let directory = |name: &str| {
        matches
            .value_of_os(name)
            .map(|value| absolute(current_dir, Path::new(value)))
    };

    let project_root = directory("project-root").unwrap_or_else(|| current_dir.to_path_buf());
    let mut configuration = Configuration::for_project(project_root);

    let layout = &mut configuration.layout;
    if let Some(database_dir) = directory("database") {
        layout.database_dir = database_dir;
    }
    if let Some(include_root) = directory("include-root") {
        layout.include_root = include_root;
    }
    if let Some(source_root) = directory("source-root") {
        layout.source_root = source_root;
    }

    configuration
}

fn absolute(current_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir.join(path)
    }
}
