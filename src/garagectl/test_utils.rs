use crate::commands::Workspace;
use crate::runtime::memory::ScriptedRunner;
use crate::runtime::ExecOutput;
use crate::settings::Settings;
use tempfile::TempDir;

pub struct TestEnv {
    // Keeps the directory alive for the duration of the test
    pub _temp_dir: TempDir,
    pub workspace: Workspace,
    pub settings: Settings,
    pub runner: ScriptedRunner,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let workspace = Workspace::new(temp_dir.path().join("garage"));
        Self {
            _temp_dir: temp_dir,
            workspace,
            settings: Settings::default(),
            runner: ScriptedRunner::new().with_tool("docker"),
        }
    }

    pub fn standalone() -> Self {
        let mut env = Self::new();
        env.settings.mode = crate::settings::DeployMode::Standalone;
        env
    }

    pub fn container_status(&self, status: &str) {
        self.runner
            .respond("docker", &["inspect"], ExecOutput::ok(format!("{}\n", status)));
    }

    /// Image with `/bin/sh` and garage at `/garage`; every garage call prints `stdout`.
    pub fn garage_answers(&self, subcommand: &str, stdout: &str) {
        let script = format!("/garage {}", subcommand);
        self.runner.respond_when(
            |prog, args| prog == "docker" && args.len() == 5 && args[2] == "/bin/sh" && args[4] == "exit 0",
            ExecOutput::ok(""),
        );
        self.runner.respond_when(
            move |prog, args| prog == "docker" && args.len() == 5 && args[4] == script,
            ExecOutput::ok(stdout),
        );
    }
}
