use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaragectlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to render garage.toml: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Failed to parse garage.toml: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to render compose file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Required tool not found: {0}")]
    MissingTool(String),

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Container '{0}' is not running")]
    NotRunning(String),

    #[error(
        "Could not run garage inside container '{container}' after {attempts} attempts.\n\
         Possible causes:\n  \
         - the container uses the wrong image (expected a Garage image)\n  \
         - the container has not finished initializing (try again in a few seconds)\n  \
         - the garage binary is not at any of the known install paths\n  \
         - the image ships no shell and direct execution failed as well\n\
         Last error: {last_error}"
    )]
    ProbeExhausted {
        container: String,
        attempts: usize,
        last_error: String,
    },

    #[error("Invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, GaragectlError>;
