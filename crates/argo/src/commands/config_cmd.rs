//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::ExposeSecret;

use argo_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// The config as a TOML value with every plaintext password masked.
fn redacted(cfg: &Config) -> Result<toml::Value, CliError> {
    let mut value =
        toml::Value::try_from(cfg).map_err(|e| CliError::Config(format!("cannot render config: {e}")))?;
    if let Some(profiles) = value.get_mut("profiles").and_then(toml::Value::as_table_mut) {
        for (_, profile) in profiles.iter_mut() {
            if let Some(password) = profile.get_mut("password") {
                *password = toml::Value::String(REDACTED.into());
            }
        }
    }
    Ok(value)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let value = redacted(&cfg)?;
            let out = output::render_single(
                global.output,
                &value,
                |v| toml::to_string_pretty(v).unwrap_or_else(|_| format!("{v:#?}")),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let (profile_name, _) = config::required_profile(global, &cfg)?;

            let password = config::prompt_password("Password: ")?;
            if password.expose_secret().is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            argo_config::store_password(&profile_name, &password)?;
            output::print_done(
                &format!("Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
            );
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("argo -- configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Appliance address
    let address: String = Input::new()
        .with_prompt("Appliance address (host or host:port)")
        .with_initial_text(global.address.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_err)?;

    // 3. Credentials
    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;
    let password = config::prompt_password("Password: ")?;

    if username.is_empty() || password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let store_choices = &[
        "Store password in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password_field = if store_selection == 0 {
        argo_config::store_password(&profile_name, &password)?;
        eprintln!("   Password stored in system keyring");
        None
    } else {
        Some(password.expose_secret().to_owned())
    };

    // 4. Merge into the existing config
    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            address,
            username: Some(username),
            password: password_field,
            timeout_ms: None,
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    output::print_done(
        &format!("Configuration written to {}", config_path.display()),
        false,
    );
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: argo login");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lounge".into(),
            Profile {
                address: "10.0.0.2".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                timeout_ms: None,
            },
        );

        let text = toml::to_string_pretty(&redacted(&cfg).expect("redact")).expect("render");
        assert!(!text.contains("hunter2"));
        assert!(text.contains(REDACTED));
        assert!(text.contains("10.0.0.2"));
    }
}
