//! Video URL detection and embed formatting.
//!
//! The insert-video affordance accepts whatever the user pastes; only
//! URLs from supported providers become embed nodes, rewritten to the
//! provider's player URL.

use url::Url;

/// Supported video providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoProvider {
    Youtube,
    Vimeo,
}

/// A recognized video: its provider and provider-side id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoEmbed {
    pub provider: VideoProvider,
    pub id: String,
}

impl VideoEmbed {
    /// The player URL to store on the video node.
    pub fn embed_url(&self) -> String {
        match self.provider {
            VideoProvider::Youtube => format!("https://www.youtube.com/embed/{}", self.id),
            VideoProvider::Vimeo => format!("https://player.vimeo.com/video/{}", self.id),
        }
    }
}

/// Detect a supported video URL.
///
/// Recognizes `youtube.com/watch?v=`, `youtu.be/<id>`, `youtube.com/embed/`
/// and `vimeo.com/<id>` forms. Anything else is `None`.
pub fn detect_video(href: &str) -> Option<VideoEmbed> {
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?.trim_start_matches("www.");

    let embed = match host {
        "youtube.com" | "m.youtube.com" => {
            let id = match url.path() {
                "/watch" => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())?,
                path => path
                    .strip_prefix("/embed/")
                    .or_else(|| path.strip_prefix("/shorts/"))
                    .map(str::to_string)?,
            };
            VideoEmbed {
                provider: VideoProvider::Youtube,
                id,
            }
        }
        "youtu.be" => VideoEmbed {
            provider: VideoProvider::Youtube,
            id: url.path().trim_start_matches('/').to_string(),
        },
        "vimeo.com" | "player.vimeo.com" => {
            let id = url
                .path_segments()?
                .filter(|segment| !segment.is_empty())
                .next_back()?
                .to_string();
            VideoEmbed {
                provider: VideoProvider::Vimeo,
                id,
            }
        }
        _ => return None,
    };

    if embed.id.is_empty() {
        return None;
    }
    Some(embed)
}

/// Rewrite a pasted video URL to its provider embed form.
///
/// Returns `Err` with a displayable message for unsupported providers.
pub fn format_video_url(href: &str) -> Result<String, &'static str> {
    detect_video(href)
        .map(|embed| embed.embed_url())
        .ok_or("Unsupported video provider")
}
