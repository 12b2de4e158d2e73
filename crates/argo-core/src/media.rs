// Media URL helpers
//
// The appliance cannot play YouTube watch pages directly; they are opened
// through its own portal application instead.

use url::Url;

/// Portal page on the appliance that plays a YouTube video by id.
pub const YOUTUBE_PORTAL_URL: &str = "http://tvportal.tvblob.com/apps/youtube/app.php?vid=";

/// The video id of a YouTube watch URL, if `url` is one.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if !host.ends_with(".youtube.com") {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// The portal URL playing `url` on the appliance, for YouTube watch URLs.
pub fn youtube_portal_url(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("{YOUTUBE_PORTAL_URL}{id}"))
}

const MIME_TYPES: &[(&str, &str)] = &[
    ("torrent", "application/x-bittorrent"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("ts", "video/mp2t"),
    ("mov", "video/quicktime"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("wav", "audio/x-wav"),
    ("flac", "audio/flac"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

/// Guess a MIME type from the extension of the URL path.
pub fn guess_mime_type(url: &str) -> Option<&'static str> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_owned(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}
