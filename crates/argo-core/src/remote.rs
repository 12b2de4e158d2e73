// ── Remote operations ──
//
// Convenience calls on an authenticated session: remote-control keys,
// playback, the appliance browser and the download manager.

use serde_json::{Value, json};
use tracing::{debug, info};

use argo_api::jsonrpc::RpcTransport;

use crate::error::CoreError;
use crate::media::youtube_portal_url;
use crate::session::Session;

pub const KEY_PRESSED_METHOD: &str = "keyinput.remoteControlKeyPressed";
pub const PLAY_URI_METHOD: &str = "action.playURI";
pub const BROWSER_URL_METHOD: &str = "action.browserURL";
pub const ADD_DOWNLOAD_METHOD: &str = "downloads.addDownload";

/// Key that brings the appliance back to its home screen.
pub const HOME_KEY: &str = "HOME";

/// How `play_media` handed a URL to the appliance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Sent to the media player.
    Player,
    /// Opened in the appliance browser at this URL.
    Browser(String),
}

/// JSON string quoting, as the play and download APIs expect for free text.
fn quote(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}

impl<T: RpcTransport> Session<T> {
    /// Press a remote-control key.
    pub async fn send_key(&self, key: &str) -> Result<(), CoreError> {
        debug!(key, "sending key");
        self.call(KEY_PRESSED_METHOD, vec![json!(key)]).await?;
        Ok(())
    }

    /// Press HOME. Fire-and-forget: callers are expected to discard the
    /// result, since the key only prepares the screen for what follows.
    pub async fn send_home_key(&self) -> Result<(), CoreError> {
        self.send_key(HOME_KEY).await
    }

    /// Play `uri` in the media player.
    pub async fn play_uri(
        &self,
        uri: &str,
        title: &str,
        description: &str,
    ) -> Result<(), CoreError> {
        self.call(
            PLAY_URI_METHOD,
            vec![json!(uri), json!(quote(title)), json!(quote(description))],
        )
        .await?;
        Ok(())
    }

    /// Open `url` in the appliance browser.
    pub async fn browse_url(&self, url: &str) -> Result<(), CoreError> {
        self.call(BROWSER_URL_METHOD, vec![json!(url)]).await?;
        Ok(())
    }

    /// Queue `url` in the download manager.
    pub async fn add_download(&self, url: &str, mime_type: Option<&str>) -> Result<(), CoreError> {
        let description = quote(&format!("Download {url}"));
        self.call(
            ADD_DOWNLOAD_METHOD,
            vec![
                json!(url),
                json!(mime_type),
                json!(url),
                json!(description),
            ],
        )
        .await?;
        info!(url, "download queued");
        Ok(())
    }

    /// Return to HOME, then play `url`.
    ///
    /// YouTube watch URLs open the appliance's portal page in the browser;
    /// everything else goes to the player with `title` as its title and
    /// the URL as description.
    pub async fn play_media(&self, url: &str, title: &str) -> Result<PlayOutcome, CoreError> {
        let _ = self.send_home_key().await;

        if let Some(portal) = youtube_portal_url(url) {
            self.browse_url(&portal).await?;
            return Ok(PlayOutcome::Browser(portal));
        }
        self.play_uri(url, title, url).await?;
        Ok(PlayOutcome::Player)
    }
}
