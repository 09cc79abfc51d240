use crate::audio::{self, SinglePassLoudnorm};
use crate::error::FrontError;
use crate::loudnorm;
use crate::runlog::RunLog;
use crate::settings::Settings;
use crate::video;
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Instant;
use tracing::info;

/// Assemble the full ffmpeg argument vector for one job.
///
/// Section order is fixed and load-bearing: input file, overwrite flag,
/// time-skip, duration limit, audio arguments, video arguments, output file.
/// -ss and -t must land after -i for output-side seeking semantics.
///
/// When two-pass loudnorm is requested this runs the measurement subprocess
/// before any arguments depending on it are built; the main encode never
/// overlaps with measurement.
pub fn build_args(
    settings: &Settings,
    infile: &str,
    outfile: &str,
    single_pass: SinglePassLoudnorm,
    log: &mut RunLog,
) -> Result<Vec<String>, FrontError> {
    let mut args = vec!["-i".to_string(), infile.to_string()];

    if !settings.ready.no_overwrite {
        args.push("-y".to_string());
    }

    if settings.time.time_skip_intro != 0 {
        args.push("-ss".to_string());
        args.push(settings.time.time_skip_intro.to_string());
    }
    if settings.time.total_time != 0 {
        args.push("-t".to_string());
        args.push(settings.time.total_time.to_string());
    }
    log.line(&format!("time options parsed, args so far: {:?}", args));

    let measured = if settings.audio.needs_measurement() {
        log.line("running loudness measurement pass");
        let stats = loudnorm::measure(Path::new(infile))?;
        log.line(&format!("measured loudness: {:?}", stats));
        Some(stats)
    } else {
        None
    };

    args.extend(audio::build_audio_args(
        &settings.audio,
        measured.as_ref(),
        single_pass,
    ));
    log.line(&format!("audio options parsed, args so far: {:?}", args));

    args.extend(video::build_video_args(
        &settings.video,
        &settings.subtitles,
        infile,
    )?);
    log.line(&format!("video options parsed, args so far: {:?}", args));

    // Output path must stay the final positional argument
    args.push(outfile.to_string());

    Ok(args)
}

/// Run the main encode subprocess, blocking until it exits. Captured output
/// and elapsed wall-clock time go to the run log; the exit status is returned
/// to the caller so a failed encode becomes a failed run.
pub fn run_encode(args: &[String], log: &mut RunLog) -> Result<ExitStatus, FrontError> {
    log.line(&format!("executing ffmpeg with arguments: {:?}", args));
    info!("starting encode");

    let start = Instant::now();
    let output = Command::new("ffmpeg")
        .args(args)
        .output()
        .map_err(|source| FrontError::Spawn {
            what: "ffmpeg",
            source,
        })?;
    let elapsed = start.elapsed();

    log.line(&format!("finished with exit status: {}", output.status));
    if !output.status.success() {
        log.line("encoder output follows");
        log.raw(&String::from_utf8_lossy(&output.stdout));
        log.raw(&String::from_utf8_lossy(&output.stderr));
    }
    log.line(&format!("time elapsed: {:.1?}", elapsed));
    info!("encode finished in {:.1?} with {}", elapsed, output.status);

    Ok(output.status)
}
