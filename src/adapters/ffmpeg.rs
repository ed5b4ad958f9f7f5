use crate::error::PipelineError;
use crate::ports::transcoder::{EncodeRequest, TranscodeError, Transcoder, SEGMENT_SECONDS};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Fixed GOP length. With scene-cut detection off this keeps keyframes, and
/// therefore segment boundaries, on a predictable grid.
const GOP_SIZE: u32 = 48;
const AUDIO_SAMPLE_RATE: u32 = 48_000;
const AUDIO_CHANNELS: u32 = 2;

/// Runs one ffmpeg process per encode request.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `explicit` if given, otherwise look ffmpeg up on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, PipelineError> {
        let program = match explicit {
            Some(path) => which::which(path),
            None => which::which("ffmpeg"),
        }
        .map_err(|e| PipelineError::ToolNotFound {
            tool: "ffmpeg".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Argument vector for one profile encode into an HLS VOD rendition.
pub fn ffmpeg_args(request: &EncodeRequest) -> Vec<OsString> {
    let profile = &request.profile;

    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into()];
    args.push(request.source_path.clone().into_os_string());
    args.extend(
        [
            "-vf".to_string(),
            format!("scale=-2:{}", profile.target_height),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-preset".to_string(),
            "veryfast".to_string(),
            "-profile:v".to_string(),
            "main".to_string(),
            "-crf".to_string(),
            profile.crf.to_string(),
            "-g".to_string(),
            GOP_SIZE.to_string(),
            "-sc_threshold".to_string(),
            "0".to_string(),
            "-b:v".to_string(),
            profile.video_bitrate.clone(),
            "-maxrate".to_string(),
            profile.maxrate.clone(),
            "-bufsize".to_string(),
            profile.buffer_size.clone(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-ar".to_string(),
            AUDIO_SAMPLE_RATE.to_string(),
            "-b:a".to_string(),
            profile.audio_bitrate.clone(),
            "-ac".to_string(),
            AUDIO_CHANNELS.to_string(),
            "-hls_time".to_string(),
            SEGMENT_SECONDS.to_string(),
            "-hls_playlist_type".to_string(),
            "vod".to_string(),
            "-hls_segment_filename".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(request.segment_pattern().into_os_string());
    args.extend(["-hls_flags", "independent_segments"].map(OsString::from));
    args.push(request.playlist_path().into_os_string());

    args
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn encode(&self, request: &EncodeRequest) -> Result<(), TranscodeError> {
        let args = ffmpeg_args(request);
        tracing::debug!(program = %self.program.display(), ?args, "running transcoder");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(TranscodeError::Failed {
            status: output.status.to_string(),
            output: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::Profile;

    fn request(profile: &Profile) -> EncodeRequest {
        EncodeRequest::new(
            Path::new("/in/clip.mp4"),
            Path::new("/out/clip"),
            profile,
        )
    }

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_args_for_720p() {
        let ladder = Profile::ladder();
        let args = as_strings(&ffmpeg_args(&request(&ladder[1])));

        let expected: Vec<String> = [
            "-y",
            "-i",
            "/in/clip.mp4",
            "-vf",
            "scale=-2:720",
            "-c:v",
            "libx264",
            "-preset",
            "veryfast",
            "-profile:v",
            "main",
            "-crf",
            "23",
            "-g",
            "48",
            "-sc_threshold",
            "0",
            "-b:v",
            "2500k",
            "-maxrate",
            "3000k",
            "-bufsize",
            "5000k",
            "-c:a",
            "aac",
            "-ar",
            "48000",
            "-b:a",
            "96k",
            "-ac",
            "2",
            "-hls_time",
            "4",
            "-hls_playlist_type",
            "vod",
            "-hls_segment_filename",
            "/out/clip/720p_%03d.ts",
            "-hls_flags",
            "independent_segments",
            "/out/clip/720p.m3u8",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(args, expected);
    }

    #[test]
    fn test_low_resolution_profile_uses_higher_crf() {
        let ladder = Profile::ladder();
        let args = as_strings(&ffmpeg_args(&request(&ladder[0])));
        let crf = args.iter().position(|a| a == "-crf").unwrap();
        assert_eq!(args[crf + 1], "26");
        assert!(args.contains(&"scale=-2:360".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/ffmpeg_xyz_12345");
        let err = transcoder
            .encode(&request(&Profile::ladder()[0]))
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn { .. }), "unexpected: {err}");
        assert!(err.diagnostics().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_captures_output() {
        // `false` ignores its arguments and exits 1.
        let Ok(program) = which::which("false") else {
            return;
        };
        let transcoder = FfmpegTranscoder::new(program);
        let err = transcoder
            .encode(&request(&Profile::ladder()[0]))
            .await
            .unwrap_err();
        match err {
            TranscodeError::Failed { status, .. } => assert!(status.contains('1')),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_locate_missing_explicit_path() {
        let result = FfmpegTranscoder::locate(Some(Path::new("/nonexistent/ffmpeg_xyz_12345")));
        assert!(matches!(result, Err(PipelineError::ToolNotFound { .. })));
    }
}
