// Core library for the ffmpeg front-end

pub mod audio;
pub mod command;
pub mod error;
pub mod loudnorm;
pub mod resolution;
pub mod runlog;
pub mod settings;
pub mod video;

// Re-export commonly used types
pub use audio::SinglePassLoudnorm;
pub use error::FrontError;
pub use runlog::RunLog;
pub use settings::Settings;
