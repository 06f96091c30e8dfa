//! URL-based media classification.

const IMAGE_EXTENSIONS: [&str; 3] = [".gif", ".png", ".jpg"];
const IMAGE_HOSTS: [&str; 2] = ["https://i.redd.it/", "https://i.postimg.cc/"];

const VIDEO_EXTENSIONS: [&str; 3] = [".gif", ".gifv", ".mp4"];
const VIDEO_HOSTS: [&str; 5] = [
    "https://v.redd.it/",
    "http://clips.twitch.tv/",
    "https://clips.twitch.tv/",
    "https://twitter.com/",
    "https://gfycat.com/",
];

/// How an attachment URL is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Download and upload as a video file.
    Video,
    /// Download and upload as an image file.
    Image,
    /// Post the link as text.
    Link,
}

/// Classifies resolved attachment URLs.
pub struct MediaClassifier;

impl MediaClassifier {
    /// Returns true if the URL points at an image.
    #[must_use]
    pub fn is_image(url: &str) -> bool {
        let path = strip_query(url);
        IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
            || IMAGE_HOSTS.iter().any(|host| path.starts_with(host))
    }

    /// Returns true if the URL points at a video or a video host.
    #[must_use]
    pub fn is_video(url: &str) -> bool {
        let path = strip_query(url);
        VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
            || VIDEO_HOSTS.iter().any(|host| path.starts_with(host))
    }

    /// Picks the dispatch path. Video wins over image when both match.
    #[must_use]
    pub fn classify(url: &str, flagged_video: bool) -> MediaKind {
        if flagged_video || Self::is_video(url) {
            MediaKind::Video
        } else if Self::is_image(url) {
            MediaKind::Image
        } else {
            MediaKind::Link
        }
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://i.imgur.com/a.png", MediaKind::Image)]
    #[test_case("https://i.imgur.com/a.jpg?fb", MediaKind::Image)]
    #[test_case("https://i.redd.it/abcdef", MediaKind::Image)]
    #[test_case("https://i.postimg.cc/x/y", MediaKind::Image)]
    #[test_case("https://i.imgur.com/a.gif", MediaKind::Video ; "gif prefers video")]
    #[test_case("https://i.imgur.com/a.gifv", MediaKind::Video)]
    #[test_case("https://i.redd.it/clip.mp4", MediaKind::Video ; "mp4 on image host")]
    #[test_case("https://v.redd.it/abc123", MediaKind::Video)]
    #[test_case("http://clips.twitch.tv/SomeClip", MediaKind::Video)]
    #[test_case("https://twitter.com/user/status/1", MediaKind::Video)]
    #[test_case("https://example.com/article", MediaKind::Link)]
    #[test_case("https://example.com/page?file=a.png", MediaKind::Link ; "extension only in query")]
    fn test_classify(url: &str, expected: MediaKind) {
        assert_eq!(MediaClassifier::classify(url, false), expected);
    }

    #[test]
    fn test_query_string_is_ignored() {
        assert_eq!(
            MediaClassifier::is_image("a.png?x=1"),
            MediaClassifier::is_image("a.png")
        );
        assert_eq!(
            MediaClassifier::is_video("a.mp4?x=1"),
            MediaClassifier::is_video("a.mp4")
        );
    }

    #[test]
    fn test_video_flag_overrides_url() {
        assert_eq!(
            MediaClassifier::classify("https://example.com/watch", true),
            MediaKind::Video
        );
    }
}
