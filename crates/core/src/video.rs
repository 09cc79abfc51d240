use crate::error::FrontError;
use crate::resolution;
use crate::settings::{Subtitles, Video, VideoJob};
use tracing::warn;

/// Build the video section of the argument vector.
///
/// `input` is the primary media file; it doubles as the subtitle source when
/// burn-in is requested without an explicit subtitle file.
pub fn build_video_args(
    video: &Video,
    subtitles: &Subtitles,
    input: &str,
) -> Result<Vec<String>, FrontError> {
    let video = match video.job() {
        VideoJob::Copy => return Ok(vec!["-c:v".to_string(), "copy".to_string()]),
        VideoJob::Encode(v) => v,
    };

    let mut args = Vec::new();

    if !video.software_encode {
        // Hardware path has no further tuning knobs
        args.extend(["-c:v", "h264_omx", "-profile:v", "high"].map(String::from));
    } else {
        args.extend(["-profile:v", "high10"].map(String::from));

        if video.mode == "cbr" && !video.video_bitrate.is_empty() {
            args.push("-b:v".to_string());
            args.push(video.video_bitrate.clone());
        } else {
            if video.mode == "cbr" {
                warn!("cbr mode requested but videoBitrate is empty, falling back to crf");
            }
            args.extend([
                "-crf".to_string(),
                video.quality.to_string(),
                "-maxrate".to_string(),
                video.video_max_rate.clone(),
                "-bufsize".to_string(),
                video.video_buf_size.clone(),
                "-tune".to_string(),
                video.tune.clone(),
            ]);
        }
    }

    if let Some(filter) = build_filter(video, subtitles, input)? {
        args.push("-vf".to_string());
        args.push(filter);
    }

    Ok(args)
}

/// Scale and subtitle burn-in share one filter graph, so both clauses must
/// land in a single comma-joined -vf value.
fn build_filter(
    video: &Video,
    subtitles: &Subtitles,
    input: &str,
) -> Result<Option<String>, FrontError> {
    if video.resolution.is_empty() && !subtitles.burn_in_subtitles {
        return Ok(None);
    }

    let mut clauses = Vec::new();

    if !video.resolution.is_empty() {
        let res = resolution::resolve(&video.resolution)?;
        clauses.push(format!("scale={}", res));
    }

    if subtitles.burn_in_subtitles {
        let sub_file = if subtitles.subtitle_file.is_empty() {
            input
        } else {
            &subtitles.subtitle_file
        };
        let mut clause = format!("subtitles='{}", sub_file);
        if !subtitles.subtitle_style.is_empty() {
            clause.push_str(&format!(":force_style={}", subtitles.subtitle_style));
        }
        clause.push('\'');
        clauses.push(clause);
    }

    Ok(Some(clauses.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sw_video() -> Video {
        Video {
            software_encode: true,
            mode: "crf".to_string(),
            quality: 23,
            tune: "film".to_string(),
            video_max_rate: "2M".to_string(),
            video_buf_size: "3M".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_just_copy_ignores_everything_else() {
        let video = Video {
            just_copy: true,
            software_encode: true,
            resolution: "720p".to_string(),
            quality: 21,
            ..Default::default()
        };
        let subtitles = Subtitles {
            burn_in_subtitles: true,
            ..Default::default()
        };
        let args = build_video_args(&video, &subtitles, "in.mp4").unwrap();
        assert_eq!(args, vec!["-c:v", "copy"]);
    }

    #[test]
    fn test_hardware_path() {
        let args = build_video_args(&Video::default(), &Subtitles::default(), "in.mp4").unwrap();
        assert_eq!(args, vec!["-c:v", "h264_omx", "-profile:v", "high"]);
    }

    #[test]
    fn test_software_crf_path() {
        let args = build_video_args(&sw_video(), &Subtitles::default(), "in.mp4").unwrap();
        assert_eq!(
            args,
            vec![
                "-profile:v",
                "high10",
                "-crf",
                "23",
                "-maxrate",
                "2M",
                "-bufsize",
                "3M",
                "-tune",
                "film"
            ]
        );
    }

    #[test]
    fn test_software_cbr_path() {
        let mut video = sw_video();
        video.mode = "cbr".to_string();
        video.video_bitrate = "2000k".to_string();
        let args = build_video_args(&video, &Subtitles::default(), "in.mp4").unwrap();
        assert_eq!(args, vec!["-profile:v", "high10", "-b:v", "2000k"]);
    }

    #[test]
    fn test_cbr_without_bitrate_falls_back_to_crf() {
        let mut video = sw_video();
        video.mode = "cbr".to_string();
        let args = build_video_args(&video, &Subtitles::default(), "in.mp4").unwrap();
        assert!(args.contains(&"-crf".to_string()));
        assert!(!args.contains(&"-b:v".to_string()));
    }

    #[test]
    fn test_scale_filter_only() {
        let mut video = sw_video();
        video.resolution = "720p".to_string();
        let args = build_video_args(&video, &Subtitles::default(), "in.mp4").unwrap();
        let pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[pos + 1], "scale=1280:720");
    }

    #[test]
    fn test_subtitle_source_defaults_to_input() {
        let subtitles = Subtitles {
            burn_in_subtitles: true,
            ..Default::default()
        };
        let args = build_video_args(&sw_video(), &subtitles, "episode.mkv").unwrap();
        let pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[pos + 1], "subtitles='episode.mkv'");
    }

    #[test]
    fn test_explicit_subtitle_file_and_style() {
        let subtitles = Subtitles {
            burn_in_subtitles: true,
            subtitle_file: "subs.srt".to_string(),
            subtitle_style: "FontName=ubuntu,Fontsize=24".to_string(),
        };
        let args = build_video_args(&sw_video(), &subtitles, "in.mp4").unwrap();
        let pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(
            args[pos + 1],
            "subtitles='subs.srt:force_style=FontName=ubuntu,Fontsize=24'"
        );
    }

    #[test]
    fn test_scale_and_subtitles_share_one_filter_flag() {
        let mut video = sw_video();
        video.resolution = "1080p".to_string();
        let subtitles = Subtitles {
            burn_in_subtitles: true,
            subtitle_file: "subs.srt".to_string(),
            subtitle_style: String::new(),
        };
        let args = build_video_args(&video, &subtitles, "in.mp4").unwrap();
        let flags: Vec<_> = args.iter().filter(|a| *a == "-vf").collect();
        assert_eq!(flags.len(), 1);
        let pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[pos + 1], "scale=1920:1080,subtitles='subs.srt'");
    }

    #[test]
    fn test_unknown_resolution_propagates() {
        let mut video = sw_video();
        video.resolution = "2160p".to_string();
        let err = build_video_args(&video, &Subtitles::default(), "in.mp4").unwrap_err();
        assert!(matches!(err, FrontError::UnknownResolution(_)));
    }
}
