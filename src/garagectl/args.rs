use clap::{Args, Parser, Subcommand};
use garagectl::settings::DeployMode;
use std::path::PathBuf;

/// Returns the version string, with git hash and commit date appended for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "garagectl", version = get_version())]
#[command(
    about = "Set up and administer a single-node Garage object store in Docker",
    long_about = "Set up and administer a single-node Garage object store in Docker.\n\n\
                  Run without a subcommand to open the interactive menu."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Working directory holding garage.toml, the compose file and data
    #[arg(short, long, global = true, env = "GARAGECTL_HOME")]
    pub dir: Option<PathBuf>,

    /// Override the deployment mode (compose or standalone) for this run
    #[arg(short, long, global = true)]
    pub mode: Option<DeployMode>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive menu (default)
    Menu,

    /// Generate garage.toml (and the compose file) if missing
    Setup,

    /// Start the container
    #[command(alias = "up")]
    Start,

    /// Stop the container
    Stop,

    /// Restart the container
    Restart,

    /// Show container and cluster status
    #[command(alias = "st")]
    Status,

    /// Show recent container logs
    Logs,

    /// Assign the node a layout role and apply it
    Bootstrap,

    /// Print endpoints and admin credentials
    Info,

    /// Pull the configured image
    Pull,

    /// Manage buckets
    Bucket {
        #[command(subcommand)]
        action: BucketCommand,
    },

    /// Manage access keys
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Remove the container, keeping configuration and data
    #[command(alias = "rm")]
    Remove,

    /// Remove the container and delete configuration and data
    Cleanup {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Get or set tool settings
    Config {
        /// Setting key (e.g. mode, port-base, zone)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BucketCommand {
    /// Create a bucket
    Create { name: String },
    /// List buckets
    #[command(alias = "ls")]
    List,
    /// Show bucket details
    Info { name: String },
    /// Delete an empty bucket
    Delete { name: String },
    /// Grant a key access to a bucket
    Allow(AccessArgs),
    /// Revoke a key's access to a bucket
    Deny(AccessArgs),
}

#[derive(Args, Debug)]
pub struct AccessArgs {
    pub bucket: String,

    /// Key name or ID
    #[arg(long)]
    pub key: String,

    #[arg(long)]
    pub read: bool,

    #[arg(long)]
    pub write: bool,

    #[arg(long)]
    pub owner: bool,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Create an access key
    Create { name: String },
    /// List access keys
    #[command(alias = "ls")]
    List,
    /// Show a key including its secret
    Info { name: String },
    /// Delete an access key
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_bucket_allow() {
        let cli = Cli::try_parse_from([
            "garagectl", "bucket", "allow", "photos", "--key", "app", "--read", "--write",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Bucket {
                action: BucketCommand::Allow(args),
            }) => {
                assert_eq!(args.bucket, "photos");
                assert_eq!(args.key, "app");
                assert!(args.read && args.write && !args.owner);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn parses_global_mode() {
        let cli = Cli::try_parse_from(["garagectl", "status", "--mode", "standalone"]).unwrap();
        assert_eq!(cli.mode, Some(DeployMode::Standalone));
        assert!(Cli::try_parse_from(["garagectl", "--mode", "k8s"]).is_err());
    }
}
