use crate::loudnorm::LoudnormStats;
use crate::settings::{Audio, AudioJob};

/// What to emit for a single-pass loudnorm request (`audioFilter` set to
/// "loudnorm" without `loudnorm2Pass`). There are no measured values in that
/// case, so either the filter flag is omitted entirely or it is emitted with
/// an empty expression as the original tool did. Callers should prefer
/// `Omit`; `EmitEmpty` exists for compatibility with existing job documents
/// that relied on the old output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinglePassLoudnorm {
    #[default]
    Omit,
    EmitEmpty,
}

/// Second-pass normalization template. The measured_* parameters interpolate
/// the analysis pass's output values; targets match the analysis filter.
fn two_pass_filter(stats: &LoudnormStats) -> String {
    format!(
        "loudnorm=I=-16:TP=-1.5:LRA=11:measured_I={}:measured_LRA={}:measured_TP={}:measured_thresh={}:offset={}:linear=true",
        stats.output_i, stats.output_lra, stats.output_tp, stats.output_thresh, stats.target_offset
    )
}

/// Build the audio section of the argument vector.
///
/// `measured` must be Some when the settings request two-pass loudnorm; the
/// orchestrator runs the measurement pass and injects the result so this
/// builder stays free of subprocess calls.
pub fn build_audio_args(
    audio: &Audio,
    measured: Option<&LoudnormStats>,
    single_pass: SinglePassLoudnorm,
) -> Vec<String> {
    let audio = match audio.job() {
        AudioJob::Copy => return vec!["-c:a".to_string(), "copy".to_string()],
        AudioJob::Encode(a) => a,
    };

    let mut args = Vec::new();

    let codec = if audio.audio_codec.is_empty() {
        "aac"
    } else {
        &audio.audio_codec
    };
    args.push("-c:a".to_string());
    args.push(codec.to_string());

    if !audio.audio_channels.is_empty() {
        args.push("-ac".to_string());
        args.push(audio.audio_channels.clone());
    }

    let bitrate = if audio.audio_bitrate.is_empty() {
        "192k"
    } else {
        &audio.audio_bitrate
    };
    args.push("-b:a".to_string());
    args.push(bitrate.to_string());

    if audio.audio_filter == "loudnorm" || audio.loudnorm_2pass {
        match (audio.loudnorm_2pass, measured) {
            (true, Some(stats)) => {
                args.push("-filter:a".to_string());
                args.push(two_pass_filter(stats));
            }
            _ => match single_pass {
                SinglePassLoudnorm::EmitEmpty => {
                    args.push("-filter:a".to_string());
                    args.push(String::new());
                }
                SinglePassLoudnorm::Omit => {}
            },
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> LoudnormStats {
        LoudnormStats {
            input_i: "-23.63".to_string(),
            input_tp: "-6.42".to_string(),
            input_lra: "14.50".to_string(),
            input_thresh: "-34.13".to_string(),
            output_i: "-16.78".to_string(),
            output_tp: "-2.31".to_string(),
            output_lra: "11.20".to_string(),
            output_thresh: "-27.21".to_string(),
            normalization_type: "dynamic".to_string(),
            target_offset: "0.78".to_string(),
        }
    }

    #[test]
    fn test_just_copy_ignores_everything_else() {
        let audio = Audio {
            just_copy: true,
            audio_codec: "flac".to_string(),
            audio_channels: "5.1".to_string(),
            audio_filter: "loudnorm".to_string(),
            audio_bitrate: "320k".to_string(),
            loudnorm_2pass: true,
        };
        let args = build_audio_args(&audio, None, SinglePassLoudnorm::Omit);
        assert_eq!(args, vec!["-c:a", "copy"]);
    }

    #[test]
    fn test_defaults() {
        let args = build_audio_args(&Audio::default(), None, SinglePassLoudnorm::Omit);
        assert_eq!(args, vec!["-c:a", "aac", "-b:a", "192k"]);
    }

    #[test]
    fn test_channels_only_when_set() {
        let audio = Audio {
            audio_codec: "vorbis".to_string(),
            audio_channels: "2".to_string(),
            audio_bitrate: "256k".to_string(),
            ..Default::default()
        };
        let args = build_audio_args(&audio, None, SinglePassLoudnorm::Omit);
        assert_eq!(args, vec!["-c:a", "vorbis", "-ac", "2", "-b:a", "256k"]);
    }

    #[test]
    fn test_no_filter_flag_without_loudnorm() {
        let audio = Audio {
            audio_filter: "aecho".to_string(),
            ..Default::default()
        };
        for policy in [SinglePassLoudnorm::Omit, SinglePassLoudnorm::EmitEmpty] {
            let args = build_audio_args(&audio, None, policy);
            assert!(!args.contains(&"-filter:a".to_string()));
        }
    }

    #[test]
    fn test_two_pass_filter_interpolation() {
        let audio = Audio {
            audio_filter: "loudnorm".to_string(),
            loudnorm_2pass: true,
            ..Default::default()
        };
        let args = build_audio_args(&audio, Some(&stats()), SinglePassLoudnorm::Omit);
        let pos = args.iter().position(|a| a == "-filter:a").unwrap();
        assert_eq!(
            args[pos + 1],
            "loudnorm=I=-16:TP=-1.5:LRA=11:measured_I=-16.78:measured_LRA=11.20:\
             measured_TP=-2.31:measured_thresh=-27.21:offset=0.78:linear=true"
        );
    }

    #[test]
    fn test_single_pass_omit() {
        let audio = Audio {
            audio_filter: "loudnorm".to_string(),
            ..Default::default()
        };
        let args = build_audio_args(&audio, None, SinglePassLoudnorm::Omit);
        assert!(!args.contains(&"-filter:a".to_string()));
    }

    #[test]
    fn test_single_pass_emit_empty() {
        let audio = Audio {
            audio_filter: "loudnorm".to_string(),
            ..Default::default()
        };
        let args = build_audio_args(&audio, None, SinglePassLoudnorm::EmitEmpty);
        assert_eq!(args.last().unwrap(), "");
        assert_eq!(&args[args.len() - 2], "-filter:a");
    }
}
