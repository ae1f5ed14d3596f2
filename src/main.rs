// Command-line entry point for decoprof.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use decoprof::application::InjectUsecase;
use decoprof::cli::Cli;
use decoprof::common::config::Settings;
use decoprof::common::error::InjectError;
use decoprof::common::logging::init_cli_logger;
use decoprof::infrastructure::{
    DisabledCallGraph, FsWorkspaceStager, PycgRunner, PythonTreeLoader, PythonUnparser,
    TracingReporter,
};
use decoprof::ports::CallGraphGenerator;
use tracing::error;

fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        init_cli_logger(false);
        error!("No CLI arguments passed.");
        print_help();
        return ExitCode::FAILURE;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            init_cli_logger(false);
            error!("Invalid command line arguments.");
            let _ = e.print();
            print_help();
            return ExitCode::FAILURE;
        }
    };

    init_cli_logger(cli.verbose);

    let settings = match &cli.config {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{:#}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    println!("Starting decorator injection...");

    match run(cli, &settings) {
        Ok(output_file) => {
            println!("--------------------");
            println!("Finished...");
            println!(
                "See {} for the modified copy of the original code",
                output_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            if e.is_usage_error() {
                print_help();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, settings: &Settings) -> Result<std::path::PathBuf, InjectError> {
    // Validate everything before touching the file system.
    let request = cli.into_request()?;

    let stager = FsWorkspaceStager::in_current_dir()?;
    let pycg = PycgRunner::new(settings.call_graph.program.clone());
    let call_graph: &dyn CallGraphGenerator = if settings.call_graph.enabled {
        &pycg
    } else {
        &DisabledCallGraph
    };
    let unparser = PythonUnparser::new(settings.output.indent_width);

    let usecase = InjectUsecase {
        stager: &stager,
        call_graph,
        loader: &PythonTreeLoader,
        serializer: &unparser,
        reporter: &TracingReporter,
        dump_ast: settings.output.dump_ast,
    };

    let outcome = usecase.run(&request)?;
    Ok(outcome.output_file)
}
