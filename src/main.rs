use anyhow::Result;
use clap::{App, Arg};
use diarymap::build::build_site;
use diarymap::config::Config;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("diarymap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds an interactive map edition of a diary manuscript")
        .arg(
            Arg::with_name("project")
                .help("Path to the project directory (defaults to the current directory)")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Overrides the output file path from diarymap.yaml"),
        )
        .get_matches();

    let project_dir = matches.value_of("project").unwrap_or(".");
    let output = matches.value_of("output").map(PathBuf::from);

    if let Err(err) = run(Path::new(project_dir), output) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(project_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut config = Config::from_directory(project_dir)?;
    if let Some(output) = output {
        config.output = output;
    }
    build_site(&config)?;
    Ok(())
}
