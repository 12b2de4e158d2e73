//! Remote-control command handlers: keys, playback, browser, downloads.

use argo_config::Config;
use argo_core::{PlayOutcome, guess_mime_type};

use crate::cli::{BrowseArgs, DownloadArgs, GlobalOpts, KeyArgs, PlayArgs};
use crate::error::CliError;
use crate::output;

use super::session::connect;

pub async fn key(args: KeyArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let key = args.key.to_ascii_uppercase();
    let session = connect(cfg, global).await?;
    session.send_key(&key).await?;
    output::print_done(&format!("Sent {key}"), global.quiet);
    Ok(())
}

pub async fn play(args: PlayArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let session = connect(cfg, global).await?;
    let title = args.title.as_deref().unwrap_or(&args.url);

    match session.play_media(&args.url, title).await? {
        PlayOutcome::Player => {
            output::print_done(&format!("Playing {}", args.url), global.quiet);
        }
        PlayOutcome::Browser(portal) => {
            output::print_done(&format!("Opened YouTube portal {portal}"), global.quiet);
        }
    }
    Ok(())
}

pub async fn browse(args: BrowseArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let session = connect(cfg, global).await?;
    let _ = session.send_home_key().await;
    session.browse_url(&args.url).await?;
    output::print_done(&format!("Opened {}", args.url), global.quiet);
    Ok(())
}

pub async fn download(
    args: DownloadArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mime = args
        .mime
        .as_deref()
        .or_else(|| guess_mime_type(&args.url));

    let session = connect(cfg, global).await?;
    session.add_download(&args.url, mime).await?;
    output::print_done(&format!("Queued download of {}", args.url), global.quiet);
    Ok(())
}
