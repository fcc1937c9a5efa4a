use std::{env, path::PathBuf, process};

use clap::Parser;
use console::Style;
use env_logger::{Builder, Env, Target};
use gamepack::{CommandBuildRunner, DEFAULT_BUILD_TOOL, DEFAULT_CODE_EXTENSION, DEFAULT_MANIFEST_NAME,
    DEFAULT_MARKER, DEFAULT_SUFFIX, Gamepack, PipelineConfig, PipelineReporterSysOut};

#[derive(Parser)]
#[clap(version = "1.0", author = "Nico Hormazábal",
    about = "Copies the game directories of a source tree into a target tree, builds them and writes a manifest")]
struct Opts {
    #[clap(value_name = "DIRECTORY", help = "The source and the target directories.")]
    directories: Vec<PathBuf>,
    #[clap(short, long, default_value = DEFAULT_MARKER, help = "Directories containing this text (case insensitive) are processed.")]
    marker: String,
    #[clap(short, long, default_value = DEFAULT_SUFFIX, help = "Removed from the directory name to get the target name.")]
    suffix: String,
    #[clap(short = 't', long, default_value = DEFAULT_BUILD_TOOL, help = "The tool invoked as `<tool> build <file>`.")]
    build_tool: String,
    #[clap(short, long, default_value = DEFAULT_CODE_EXTENSION, help = "Extension of the file to build.")]
    extension: String,
    #[clap(long, default_value = DEFAULT_MANIFEST_NAME, help = "Name of the manifest written in the target directory.")]
    manifest: String,
    #[clap(short, long, help = "Keeps processing the remaining directories when one fails.")]
    keep_going: bool,
    #[clap(long, help = "Only copies the directories, doesn't build them.")]
    no_build: bool,
    #[clap(short, long, help = "Doesn't show the progress bar.")]
    quiet: bool,
}

fn main() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.target(Target::Stdout);
    builder.init();
    let opts: Opts = Opts::parse();

    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            println!("{} reading the current directory.\n{}", Style::new().red().apply_to("ERROR"), e);
            process::exit(1);
        }
    };

    let mut config = match PipelineConfig::from_arguments(&opts.directories, &cwd) {
        Ok(config) => config,
        Err(e) => {
            println!("{} {}", Style::new().red().apply_to("ERROR"), e);
            process::exit(1);
        }
    };
    config.marker = opts.marker;
    config.suffix = opts.suffix;
    config.extension = opts.extension;
    config.manifest_name = opts.manifest;
    config.keep_going = opts.keep_going;
    config.build = !opts.no_build;

    println!("Source: {}", Style::new().bold().apply_to(config.source.display()));
    println!("Target: {}", Style::new().bold().apply_to(config.target.display()));

    let mut gamepack = Gamepack::new(config, CommandBuildRunner::new(opts.build_tool));
    if !opts.quiet {
        gamepack.add_reporter(PipelineReporterSysOut::new());
    }

    match gamepack.run() {
        Ok(report) => {
            println!("{}", report);
        }
        Err(e) => {
            println!("{} processing `{}`.\n{:#}",
                Style::new().red().apply_to("ERROR"),
                Style::new().green().apply_to(gamepack.config().source.display()),
                e);
            process::exit(1);
        }
    }
}
