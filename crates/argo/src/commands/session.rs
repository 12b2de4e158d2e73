//! Validate and login command handlers.

use serde::Serialize;

use argo_config::Config;
use argo_core::{Session, SessionEstablisher};

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ValidationReport {
    address: String,
    software_version: String,
    supported: bool,
}

#[derive(Debug, Serialize)]
struct LoginReport {
    address: String,
    user: String,
    software_version: String,
}

/// Establish an authenticated session from flags and the active profile.
pub async fn connect(cfg: &Config, global: &GlobalOpts) -> Result<Session, CliError> {
    let profile = config::active_profile(global, cfg)?;
    let establisher = SessionEstablisher::new(config::session_config(global, cfg, profile));
    let credentials = config::resolve_credentials(global, cfg)?;
    Ok(establisher.establish(&credentials).await?)
}

pub async fn validate(
    args: ValidateArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = config::active_profile(global, cfg)?;
    let address = match args.address {
        Some(address) => address,
        None => config::resolve_address(global, profile)?,
    };
    let establisher = SessionEstablisher::new(config::session_config(global, cfg, profile));

    let software_version = establisher.ensure_valid(&address).await?;
    let report = ValidationReport {
        address,
        software_version,
        supported: true,
    };

    let out = output::render_single(
        global.output,
        &report,
        |r| {
            format!(
                "{} is a supported BLOBbox (software {})",
                r.address, r.software_version
            )
        },
        |r| r.software_version.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn login(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let session = connect(cfg, global).await?;
    let report = LoginReport {
        address: session.address().to_owned(),
        user: session.authorized_user().to_owned(),
        software_version: session.software_version().to_owned(),
    };

    let out = output::render_single(
        global.output,
        &report,
        |r| {
            format!(
                "Logged in to {} as {} (software {})",
                r.address, r.user, r.software_version
            )
        },
        |r| r.user.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
