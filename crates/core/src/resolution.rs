use crate::error::FrontError;
use regex::Regex;

/// Resolve a resolution setting to an explicit "w:h" string.
///
/// Strings that already look like explicit dimensions pass through unchanged.
/// Named presets map through a fixed table. Anything else is a configuration
/// error; there is no safe default resolution.
pub fn resolve(res: &str) -> Result<String, FrontError> {
    let explicit = Regex::new(r"^[0-9]*:[0-9]*$").unwrap();
    if explicit.is_match(res) {
        return Ok(res.to_string());
    }

    let mapped = match res {
        "480p" => "640:480",
        "720p" => "1280:720",
        "1080p" => "1920:1080",
        "4k" => "3840:2160",
        other => return Err(FrontError::UnknownResolution(other.to_string())),
    };

    Ok(mapped.to_string())
}
