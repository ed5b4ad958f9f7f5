use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static BITRATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([kM]?)$").expect("bitrate pattern is valid"));

/// One output rendition of the ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub target_height: u32,
    /// Reference width, only used for the manifest RESOLUTION attribute.
    /// The encode itself keeps the source aspect ratio.
    pub target_width: u32,
    pub video_bitrate: String,
    pub maxrate: String,
    pub buffer_size: String,
    pub audio_bitrate: String,
    pub crf: u8,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        target_height: u32,
        video_bitrate: impl Into<String>,
        maxrate: impl Into<String>,
        buffer_size: impl Into<String>,
        audio_bitrate: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_height,
            target_width: width_for(target_height),
            video_bitrate: video_bitrate.into(),
            maxrate: maxrate.into(),
            buffer_size: buffer_size.into(),
            audio_bitrate: audio_bitrate.into(),
            crf: crf_for(target_height),
        }
    }

    /// The fixed 360p / 720p / 1080p ladder, in manifest order.
    pub fn ladder() -> Vec<Profile> {
        vec![
            Profile::new("360p", 360, "800k", "900k", "1200k", "64k"),
            Profile::new("720p", 720, "2500k", "3000k", "5000k", "96k"),
            Profile::new("1080p", 1080, "5000k", "6000k", "8000k", "128k"),
        ]
    }

    pub fn playlist_name(&self) -> String {
        format!("{}.m3u8", self.name)
    }

    /// ffmpeg `-hls_segment_filename` pattern, scoped to this profile.
    pub fn segment_pattern(&self) -> String {
        format!("{}_%03d.ts", self.name)
    }

    pub fn bandwidth(&self) -> Result<u64, BitrateError> {
        bitrate_to_int(&self.video_bitrate)
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.target_width, self.target_height)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid bitrate {0:?}")]
pub struct BitrateError(pub String);

/// Parse an ffmpeg style bitrate: `800k` -> 800000, `2M` -> 2000000, `64000` -> 64000.
pub fn bitrate_to_int(text: &str) -> Result<u64, BitrateError> {
    let invalid = || BitrateError(text.to_string());
    let caps = BITRATE.captures(text).ok_or_else(invalid)?;
    let value: u64 = caps[1].parse().map_err(|_| invalid())?;
    let multiplier = match &caps[2] {
        "k" => 1_000,
        "M" => 1_000_000,
        _ => 1,
    };
    value.checked_mul(multiplier).ok_or_else(invalid)
}

pub fn width_for(height: u32) -> u32 {
    match height {
        360 => 640,
        720 => 1280,
        1080 => 1920,
        _ => 1280,
    }
}

fn crf_for(height: u32) -> u8 {
    if height >= 720 {
        23
    } else {
        26
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitrate_to_int() {
        assert_eq!(bitrate_to_int("800k").unwrap(), 800_000);
        assert_eq!(bitrate_to_int("5000k").unwrap(), 5_000_000);
        assert_eq!(bitrate_to_int("128k").unwrap(), 128_000);
        assert_eq!(bitrate_to_int("2M").unwrap(), 2_000_000);
        assert_eq!(bitrate_to_int("64000").unwrap(), 64_000);
    }

    #[test]
    fn test_bitrate_to_int_rejects_garbage() {
        assert!(bitrate_to_int("").is_err());
        assert!(bitrate_to_int("k").is_err());
        assert!(bitrate_to_int("1.5M").is_err());
        assert!(bitrate_to_int("800K").is_err());
        assert!(bitrate_to_int("99999999999999999999k").is_err());
    }

    #[test]
    fn test_width_for() {
        assert_eq!(width_for(360), 640);
        assert_eq!(width_for(720), 1280);
        assert_eq!(width_for(1080), 1920);
        assert_eq!(width_for(480), 1280);
    }

    #[test]
    fn test_ladder() {
        let ladder = Profile::ladder();
        let names: Vec<_> = ladder.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["360p", "720p", "1080p"]);

        assert_eq!(ladder[0].crf, 26);
        assert_eq!(ladder[1].crf, 23);
        assert_eq!(ladder[2].crf, 23);

        assert_eq!(ladder[1].resolution(), "1280x720");
        assert_eq!(ladder[2].bandwidth().unwrap(), 5_000_000);
        assert_eq!(ladder[0].segment_pattern(), "360p_%03d.ts");
        assert_eq!(ladder[0].playlist_name(), "360p.m3u8");
    }
}
