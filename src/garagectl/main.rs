use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use garagectl::api::{GarageApi, Permissions, SettingsAction};
use garagectl::commands::{CmdResult, Workspace};
use garagectl::error::{GaragectlError, Result};
use garagectl::runtime::process::SystemRunner;
use garagectl::settings::Settings;
use std::io::{self, Write};
use std::path::PathBuf;

mod args;
mod cli;
use args::{AccessArgs, BucketCommand, Cli, Commands, KeyCommand};
use cli::menu::Menu;
use cli::print::print_result;

type Api = GarageApi<SystemRunner>;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = resolve_root(cli.dir.clone())?;
    log::debug!("working directory {}", root.display());
    let mut settings = Settings::load(&root)?;
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    let mut api = GarageApi::new(SystemRunner::new(), Workspace::resolve(&root)?, settings);

    let needs_docker = !matches!(
        cli.command,
        Some(Commands::Setup | Commands::Info | Commands::Config { .. })
    );
    if needs_docker {
        api.preflight()?;
    }

    match cli.command {
        None | Some(Commands::Menu) => run_menu(&mut api),
        Some(Commands::Config { key, value }) => handle_config(&mut api, key, value),
        Some(command) => handle_command(&api, command),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// `--dir` / `$GARAGECTL_HOME`, else the platform data directory.
fn resolve_root(dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir);
    }
    ProjectDirs::from("org", "garagehq", "garagectl")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            GaragectlError::Input(
                "Could not determine a data directory, pass --dir".to_string(),
            )
        })
}

fn run_menu(api: &mut Api) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(api, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn handle_command(api: &Api, command: Commands) -> Result<()> {
    let result = match command {
        Commands::Start => api.start()?,
        Commands::Stop => api.stop()?,
        Commands::Restart => api.restart()?,
        Commands::Status => api.status()?,
        Commands::Logs => api.logs()?,
        Commands::Bootstrap => api.bootstrap()?,
        Commands::Pull => api.pull_image()?,
        Commands::Remove => api.remove_container()?,
        Commands::Bucket { action } => handle_bucket(api, action)?,
        Commands::Key { action } => handle_key(api, action)?,
        Commands::Setup => api.setup()?,
        Commands::Info => api.connection_info()?,
        Commands::Cleanup { yes } => {
            if !yes && !confirm_cleanup(api)? {
                println!("{}", "Cleanup cancelled.".dimmed());
                return Ok(());
            }
            api.cleanup()?
        }
        Commands::Menu | Commands::Config { .. } => return Ok(()),
    };
    emit(result)
}

fn handle_bucket(api: &Api, action: BucketCommand) -> Result<CmdResult> {
    match action {
        BucketCommand::Create { name } => api.create_bucket(&name),
        BucketCommand::List => api.list_buckets(),
        BucketCommand::Info { name } => api.bucket_info(&name),
        BucketCommand::Delete { name } => api.delete_bucket(&name),
        BucketCommand::Allow(args) => {
            let permissions = access_permissions(&args);
            api.allow(&args.bucket, &args.key, permissions)
        }
        BucketCommand::Deny(args) => {
            let permissions = access_permissions(&args);
            api.deny(&args.bucket, &args.key, permissions)
        }
    }
}

fn access_permissions(args: &AccessArgs) -> Permissions {
    Permissions {
        read: args.read,
        write: args.write,
        owner: args.owner,
    }
}

fn handle_key(api: &Api, action: KeyCommand) -> Result<CmdResult> {
    match action {
        KeyCommand::Create { name } => api.create_key(&name),
        KeyCommand::List => api.list_keys(),
        KeyCommand::Info { name } => api.key_info(&name),
        KeyCommand::Delete { name } => api.delete_key(&name),
    }
}

fn handle_config(api: &mut Api, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => SettingsAction::ShowAll,
        (Some(key), None) => SettingsAction::ShowKey(key),
        (Some(key), Some(value)) => SettingsAction::Set(key, value),
    };
    emit(api.config(action)?)
}

fn confirm_cleanup(api: &Api) -> Result<bool> {
    print!(
        "Delete the container, garage.toml and all data in {}? Type 'yes': ",
        api.workspace().root().display()
    );
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "yes")
}

/// Print a result; a result carrying error messages exits non-zero.
fn emit(result: CmdResult) -> Result<()> {
    let stdout = io::stdout();
    print_result(&mut stdout.lock(), &result)?;
    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
