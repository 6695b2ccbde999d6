use std::process::ExitCode;

use anyhow::Result;

use tex2svg::{cli::Cli, Converter};

fn run(cli: Cli) -> Result<()> {
    let Some(tex) = cli.tex() else {
        anyhow::bail!("texString must be provided via --tex argument");
    };

    let mut converter = Converter::with_config(cli.engine_config());
    let output = converter.convert(tex, cli.display)?;
    println!("{output}");
    Ok(())
}

fn main() -> ExitCode {
    // Logging is configured here so the library stays unopinionated.
    env_logger::init();

    match run(Cli::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // `{:#}` keeps the cause chain on the same line.
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
