use anyhow::Result;
use clap::Parser;
use ffront_core::runlog::{resolve_log_path, RunLog};
use ffront_core::{command, settings, SinglePassLoudnorm};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ffront")]
#[command(about = "Translate a JSON settings document into an ffmpeg invocation and run it", long_about = None)]
#[command(version)]
struct Args {
    /// Write a template settings file and exit.
    /// Options: template, movie, tv-normal, tv-high
    #[arg(long = "make-template", value_name = "NAME")]
    make_template: Option<String>,

    /// Print the assembled argument vector instead of executing ffmpeg
    #[arg(long = "args-only")]
    args_only: bool,

    /// File to process with ffmpeg
    #[arg(long, value_name = "FILE")]
    infile: Option<String>,

    /// File to write output to
    #[arg(long, value_name = "FILE")]
    outfile: Option<String>,

    /// Settings JSON file to read
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Log file to write to (defaults to <outfile>.log)
    #[arg(long, value_name = "FILE")]
    logfile: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    if let Some(name) = args.make_template.as_deref() {
        let template = settings::template(name);
        settings::write_settings(&template, "template.json")?;
        info!("wrote template.json ({})", name);
        return Ok(());
    }

    let (Some(infile), Some(outfile), Some(settings_path)) =
        (&args.infile, &args.outfile, &args.settings)
    else {
        anyhow::bail!(
            "need the following flags:\n\t--infile [file to process]\n\t--outfile [output target]\n\t--settings [settings json to use]\n\nor call with --make-template to write a template JSON to fill in"
        );
    };

    let mut log = if args.args_only {
        RunLog::disabled()
    } else {
        RunLog::open(&resolve_log_path(args.logfile.as_deref(), outfile))
    };

    let job = match settings::load_settings(settings_path) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            log.line(&format!("failed to load settings: {}", e));
            return Err(e.into());
        }
    };
    log.line(&format!("loaded settings: {:?}", job));

    let argv = match command::build_args(
        &job,
        infile,
        outfile,
        SinglePassLoudnorm::default(),
        &mut log,
    ) {
        Ok(v) => v,
        Err(e) => {
            error!("{}", e);
            if let Some(diag) = e.diagnostic_output() {
                log.line("measurement output follows");
                log.raw(diag);
            }
            log.line(&format!("failed to build arguments: {}", e));
            return Err(e.into());
        }
    };

    if args.args_only {
        println!("ffmpeg {}", argv.join(" "));
        return Ok(());
    }

    let status = command::run_encode(&argv, &mut log)?;
    if !status.success() {
        // A failed encode is a failed run
        std::process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}
