//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod config_cmd;
pub mod discover;
pub mod remote;
pub mod session;

use argo_config::Config;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to its handler.
pub async fn dispatch(cmd: Command, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Discover(args) => discover::handle(args, config, global).await,
        Command::Validate(args) => session::validate(args, config, global).await,
        Command::Login => session::login(config, global).await,
        Command::Key(args) => remote::key(args, config, global).await,
        Command::Play(args) => remote::play(args, config, global).await,
        Command::Browse(args) => remote::browse(args, config, global).await,
        Command::Download(args) => remote::download(args, config, global).await,
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            completions(args.shell);
            Ok(())
        }
    }
}

fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "argo", &mut std::io::stdout());
}
