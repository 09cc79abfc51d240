use crate::error::FrontError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One complete transcode job specification, loaded once per run from a JSON
/// document and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub video: Video,
    pub audio: Audio,
    pub subtitles: Subtitles,
    pub time: Time,
    pub ready: Ready,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Video {
    pub software_encode: bool,
    pub just_copy: bool,
    pub resolution: String,
    pub mode: String,
    pub quality: i32,
    pub tune: String,
    pub video_bitrate: String,
    pub video_max_rate: String,
    pub video_buf_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Audio {
    pub just_copy: bool,
    pub audio_codec: String,
    pub audio_channels: String,
    pub audio_filter: String,
    pub audio_bitrate: String,
    #[serde(rename = "loudnorm2Pass")]
    pub loudnorm_2pass: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subtitles {
    pub burn_in_subtitles: bool,
    pub subtitle_file: String,
    pub subtitle_style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Time {
    pub time_skip_intro: i64,
    pub total_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ready {
    pub no_overwrite: bool,
    pub completed: bool,
    pub notes: String,
}

/// Stream-copy and encode settings are mutually exclusive; `justCopy` wins
/// when both appear in a document. The builders match on these so the
/// exclusivity is enforced structurally rather than by convention.
pub enum VideoJob<'a> {
    Copy,
    Encode(&'a Video),
}

pub enum AudioJob<'a> {
    Copy,
    Encode(&'a Audio),
}

impl Video {
    pub fn job(&self) -> VideoJob<'_> {
        if self.just_copy {
            VideoJob::Copy
        } else {
            VideoJob::Encode(self)
        }
    }
}

impl Audio {
    pub fn job(&self) -> AudioJob<'_> {
        if self.just_copy {
            AudioJob::Copy
        } else {
            AudioJob::Encode(self)
        }
    }

    /// True when building the audio arguments requires the loudness
    /// measurement pass to have run first.
    pub fn needs_measurement(&self) -> bool {
        !self.just_copy && self.loudnorm_2pass
    }
}

pub fn load_settings(path: &Path) -> Result<Settings, FrontError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FrontError::SettingsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

/// Write a settings document as pretty JSON, appending ".json" to the file
/// name when it is missing.
pub fn write_settings(settings: &Settings, file_name: &str) -> anyhow::Result<()> {
    let file_name = if file_name.ends_with(".json") {
        PathBuf::from(file_name)
    } else {
        PathBuf::from(format!("{}.json", file_name))
    };

    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&file_name, json)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", file_name.display(), e))?;
    Ok(())
}

/// Return one of the canned settings documents by name, defaulting to the
/// generic annotated template. The generic template's string fields hold
/// placeholder text documenting each field; it is meant to be edited, not run.
pub fn template(name: &str) -> Settings {
    match name {
        "movie" => Settings {
            video: Video {
                software_encode: false,
                just_copy: true,
                resolution: "unchanged".to_string(),
                mode: "none".to_string(),
                quality: 0,
                tune: "none".to_string(),
                video_bitrate: "unchanged".to_string(),
                video_max_rate: "none".to_string(),
                video_buf_size: "none".to_string(),
            },
            audio: loudnorm_audio(),
            subtitles: no_subtitles(),
            time: Time::default(),
            ready: Ready {
                no_overwrite: false,
                completed: true,
                notes: "For movies. Leaves the video track untouched while loudnorming the audio track".to_string(),
            },
        },
        "tv-normal" => Settings {
            video: tv_video("720p", 23, "2M", "3M"),
            audio: loudnorm_audio(),
            subtitles: no_subtitles(),
            time: Time::default(),
            ready: Ready {
                no_overwrite: false,
                completed: true,
                notes: "For most TV shows. Re-encodes to 720p CRF 23, useful when the source bitrate is higher than the content deserves".to_string(),
            },
        },
        "tv-high" => Settings {
            video: tv_video("1080p", 21, "4M", "6M"),
            audio: loudnorm_audio(),
            subtitles: no_subtitles(),
            time: Time::default(),
            ready: Ready {
                no_overwrite: false,
                completed: true,
                notes: "For TV shows that deserve a high-quality stream. Software 10-bit encode, much slower than the hardware path".to_string(),
            },
        },
        _ => Settings {
            video: Video {
                software_encode: true,
                just_copy: false,
                resolution: "ex- 480p, 720p, 1080p, 4k, or explicit w:h".to_string(),
                mode: "crf or cbr".to_string(),
                quality: 23,
                tune: "film, grain, animation are valid tunes".to_string(),
                video_bitrate: "ex- 2000k, used only in cbr mode".to_string(),
                video_max_rate: "ex- 4M, only needed with crf when streaming over more than a lan".to_string(),
                video_buf_size: "set to about 1x-2x your maxrate, only needed with crf".to_string(),
            },
            audio: Audio {
                just_copy: false,
                audio_codec: "ex- vorbis, lame, aac, flac".to_string(),
                audio_channels: "ex- 2, 5.1".to_string(),
                audio_filter: "ex- loudnorm, the only filter this tool knows how to parameterize".to_string(),
                audio_bitrate: "ex- 200k".to_string(),
                loudnorm_2pass: false,
            },
            subtitles: Subtitles {
                burn_in_subtitles: false,
                subtitle_file: "ex- file.srt, file.mkv. Given a video file, the first subtitle track is burned; extract the track first if you want a different one".to_string(),
                subtitle_style: "styles look like 'FontName=ubuntu,Fontsize=24,PrimaryColour=&H0000ff&'; note the hex channel order is BGR".to_string(),
            },
            time: Time::default(),
            ready: Ready {
                no_overwrite: false,
                completed: false,
                notes: "If justCopy is true on audio or video, all other settings for that stream are ignored. loudnorm2Pass is ignored unless audioFilter is 'loudnorm'".to_string(),
            },
        },
    }
}

fn loudnorm_audio() -> Audio {
    Audio {
        just_copy: false,
        audio_codec: "aac".to_string(),
        audio_channels: "2".to_string(),
        audio_filter: "loudnorm".to_string(),
        audio_bitrate: "192k".to_string(),
        loudnorm_2pass: true,
    }
}

fn no_subtitles() -> Subtitles {
    Subtitles {
        burn_in_subtitles: false,
        subtitle_file: "no file".to_string(),
        subtitle_style: "no style".to_string(),
    }
}

fn tv_video(resolution: &str, quality: i32, max_rate: &str, buf_size: &str) -> Video {
    Video {
        software_encode: true,
        just_copy: false,
        resolution: resolution.to_string(),
        mode: "crf".to_string(),
        quality,
        tune: "film".to_string(),
        video_bitrate: String::new(),
        video_max_rate: max_rate.to_string(),
        video_buf_size: buf_size.to_string(),
    }
}
