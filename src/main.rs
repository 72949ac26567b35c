use abi_check::{
    cli::{Cli, Mode, OutputFormat},
    commands::{AbiChecker, CheckOutcome},
    error::{CONFIGURATION_EXIT_CODE, DIVERGENCE_EXIT_CODE},
    filter::ExportFilter,
    json_output::JsonComparison,
    platform::Platform,
    readobj::ReadobjSource,
};
use anyhow::Result;
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print the check result in the requested format
fn print_outcome(outcome: &CheckOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", JsonComparison::from(&outcome.comparison()).to_json()?);
        }
        OutputFormat::Text => {
            if let CheckOutcome::Diverged(result) = outcome {
                print!("{}", result.to_report_string());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Missing mode arguments are reported before anything else is loaded or run
    if let Err(err) = args.validate() {
        println!("{}", err);
        process::exit(CONFIGURATION_EXIT_CODE);
    }

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let platform = Platform::host();
    let filter = ExportFilter::new(platform, args.ignore_list()?);
    let source = ReadobjSource::new(&args.llvm_bin_path, platform);
    let checker = AbiChecker::new(source, filter);

    match args.mode {
        Mode::DumpSymbols => {
            checker.dump_symbols(&args.target_library, args.output.as_deref())?;
        }
        Mode::CheckSymbols => {
            let outcome =
                checker.check_symbols(args.reference.as_deref(), &args.target_library)?;
            print_outcome(&outcome, args.format)?;
            if !outcome.is_compatible() {
                process::exit(DIVERGENCE_EXIT_CODE);
            }
        }
    }

    Ok(())
}
