use super::profile::{BitrateError, Profile};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub struct VariantStream {
    pub bandwidth: u64,
    pub resolution: String,
    pub uri: String,
}

/// Top-level playlist pointing at one sub-playlist per profile.
pub struct MasterPlaylist {
    pub variants: Vec<VariantStream>,
}

impl MasterPlaylist {
    /// Build the variant list in profile order. Fails on the first profile
    /// whose video bitrate cannot be parsed, returning that profile's name.
    pub fn from_profiles(profiles: &[Profile]) -> Result<Self, (String, BitrateError)> {
        let variants = profiles
            .iter()
            .map(|profile| {
                Ok(VariantStream {
                    bandwidth: profile
                        .bandwidth()
                        .map_err(|e| (profile.name.clone(), e))?,
                    resolution: profile.resolution(),
                    uri: profile.playlist_name(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { variants })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n");
        for variant in &self.variants {
            let _ = writeln!(
                out,
                "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}",
                variant.bandwidth, variant.resolution
            );
            out.push_str(&variant.uri);
            out.push('\n');
        }
        out
    }

    /// Write next to `path` first and rename into place, so `path` only ever
    /// exists with complete contents.
    pub async fn write_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let tmp = path.with_extension("m3u8.tmp");

        let mut file = File::create(&tmp).await?;
        file.write_all(self.render().as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::fs;

    #[test]
    fn test_render_follows_profile_order() {
        let playlist = MasterPlaylist::from_profiles(&Profile::ladder()).unwrap();

        assert_eq!(
            playlist.render(),
            "#EXTM3U\n\
             #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\n\
             360p.m3u8\n\
             #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720\n\
             720p.m3u8\n\
             #EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080\n\
             1080p.m3u8\n"
        );
    }

    #[test]
    fn test_custom_profiles_keep_declared_order() {
        let profiles = vec![
            Profile::new("1080p", 1080, "2M", "3M", "4M", "128k"),
            Profile::new("360p", 360, "800k", "900k", "1200k", "64k"),
        ];
        let playlist = MasterPlaylist::from_profiles(&profiles).unwrap();
        let uris: Vec<_> = playlist.variants.iter().map(|v| v.uri.as_str()).collect();
        assert_eq!(uris, ["1080p.m3u8", "360p.m3u8"]);
        assert_eq!(playlist.variants[0].bandwidth, 2_000_000);
    }

    #[test]
    fn test_bad_bitrate_names_profile() {
        let profiles = vec![Profile::new("odd", 480, "fast", "1M", "1M", "64k")];
        let (name, _) = MasterPlaylist::from_profiles(&profiles).err().unwrap();
        assert_eq!(name, "odd");
    }

    #[tokio::test]
    async fn test_write_to_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("master.m3u8");

        let playlist = MasterPlaylist::from_profiles(&Profile::ladder()).unwrap();
        playlist.write_to(&path).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("#EXTM3U\n"));
        assert!(content.contains("#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720"));
        assert!(!dir.path().join("master.m3u8.tmp").exists());
    }
}
