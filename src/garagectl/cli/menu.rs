//! The interactive menu: a numbered list of actions read from stdin.
//!
//! Every action goes through the API facade; failures are printed and the loop
//! continues. Only `0`, `q` or end of input leave the menu.

use super::print::{print_error, print_result, print_settings};
use colored::Colorize;
use garagectl::api::{GarageApi, Permissions, SettingsAction};
use garagectl::commands::CmdResult;
use garagectl::error::Result;
use garagectl::runtime::CommandRunner;
use garagectl::settings::KEYS;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Setup,
    Start,
    Stop,
    Restart,
    Status,
    Logs,
    Bootstrap,
    Info,
    CreateBucket,
    ListBuckets,
    BucketInfo,
    CreateKey,
    ListKeys,
    KeyInfo,
    Grant,
    Pull,
    Remove,
    Cleanup,
    Settings,
    Quit,
}

const ENTRIES: &[(&str, &str, Action)] = &[
    ("1", "Generate configuration", Action::Setup),
    ("2", "Start container", Action::Start),
    ("3", "Stop container", Action::Stop),
    ("4", "Restart container", Action::Restart),
    ("5", "Status", Action::Status),
    ("6", "View logs", Action::Logs),
    ("7", "Bootstrap cluster layout", Action::Bootstrap),
    ("8", "Connection info", Action::Info),
    ("9", "Create bucket", Action::CreateBucket),
    ("10", "List buckets", Action::ListBuckets),
    ("11", "Bucket info", Action::BucketInfo),
    ("12", "Create access key", Action::CreateKey),
    ("13", "List access keys", Action::ListKeys),
    ("14", "Access key info", Action::KeyInfo),
    ("15", "Grant key access to bucket", Action::Grant),
    ("16", "Pull image", Action::Pull),
    ("17", "Remove container (keep data)", Action::Remove),
    ("18", "Full cleanup (delete data)", Action::Cleanup),
    ("19", "Settings", Action::Settings),
    ("0", "Exit", Action::Quit),
];

fn parse_choice(input: &str) -> Option<Action> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Some(Action::Quit);
    }
    ENTRIES
        .iter()
        .find(|(key, _, _)| *key == input)
        .map(|(_, _, action)| *action)
}

pub struct Menu<'a, R: CommandRunner, I: BufRead, W: Write> {
    api: &'a mut GarageApi<R>,
    input: I,
    out: W,
}

impl<'a, R: CommandRunner, I: BufRead, W: Write> Menu<'a, R, I, W> {
    pub fn new(api: &'a mut GarageApi<R>, input: I, out: W) -> Self {
        Self { api, input, out }
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.render()?;
            let Some(choice) = self.prompt("Choose an option")? else {
                break;
            };
            let Some(action) = parse_choice(&choice) else {
                writeln!(self.out, "{}", format!("Unknown choice: {}", choice).yellow())?;
                continue;
            };
            if action == Action::Quit {
                break;
            }

            match self.dispatch(action) {
                Ok(Some(result)) => print_result(&mut self.out, &result)?,
                Ok(None) => {}
                Err(e) => print_error(&mut self.out, &e)?,
            }
            writeln!(self.out)?;
        }
        writeln!(self.out, "Bye.")
    }

    fn render(&mut self) -> io::Result<()> {
        let settings = self.api.settings();
        writeln!(
            self.out,
            "{} ({} mode, container '{}', {})",
            "Garage".bold(),
            settings.mode,
            settings.container_name,
            self.api.workspace().root().display()
        )?;
        for (key, label, _) in ENTRIES {
            writeln!(self.out, "  {:>2}) {}", key, label)?;
        }
        Ok(())
    }

    /// Read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}: ", label)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn dispatch(&mut self, action: Action) -> Result<Option<CmdResult>> {
        let result = match action {
            Action::Setup => self.api.setup()?,
            Action::Start => {
                writeln!(self.out, "Starting, this takes a few seconds...")?;
                self.api.start()?
            }
            Action::Stop => self.api.stop()?,
            Action::Restart => self.api.restart()?,
            Action::Status => self.api.status()?,
            Action::Logs => self.api.logs()?,
            Action::Bootstrap => self.api.bootstrap()?,
            Action::Info => self.api.connection_info()?,
            Action::CreateBucket => match self.prompt("Bucket name")? {
                Some(name) => self.api.create_bucket(&name)?,
                None => return Ok(None),
            },
            Action::ListBuckets => self.api.list_buckets()?,
            Action::BucketInfo => match self.prompt("Bucket name")? {
                Some(name) => self.api.bucket_info(&name)?,
                None => return Ok(None),
            },
            Action::CreateKey => match self.prompt("Key name")? {
                Some(name) => self.api.create_key(&name)?,
                None => return Ok(None),
            },
            Action::ListKeys => self.api.list_keys()?,
            Action::KeyInfo => match self.prompt("Key name or ID")? {
                Some(name) => self.api.key_info(&name)?,
                None => return Ok(None),
            },
            Action::Grant => return self.grant(),
            Action::Pull => self.api.pull_image()?,
            Action::Remove => self.api.remove_container()?,
            Action::Cleanup => return self.cleanup(),
            Action::Settings => return self.edit_settings(),
            Action::Quit => return Ok(None),
        };
        Ok(Some(result))
    }

    fn grant(&mut self) -> Result<Option<CmdResult>> {
        let Some(bucket) = self.prompt("Bucket name")? else {
            return Ok(None);
        };
        let Some(key) = self.prompt("Key name or ID")? else {
            return Ok(None);
        };
        let Some(flags) = self.prompt("Permissions [r]ead [w]rite [o]wner (default rw)")? else {
            return Ok(None);
        };
        let permissions = parse_permissions(&flags);
        Ok(Some(self.api.allow(&bucket, &key, permissions)?))
    }

    fn cleanup(&mut self) -> Result<Option<CmdResult>> {
        writeln!(
            self.out,
            "{}",
            format!(
                "This removes the container and deletes garage.toml and all data in {}",
                self.api.workspace().root().display()
            )
            .red()
        )?;
        match self.prompt("Type 'yes' to continue")? {
            Some(answer) if answer == "yes" => Ok(Some(self.api.cleanup()?)),
            _ => {
                writeln!(self.out, "{}", "Cleanup cancelled.".dimmed())?;
                Ok(None)
            }
        }
    }

    fn edit_settings(&mut self) -> Result<Option<CmdResult>> {
        print_settings(&mut self.out, self.api.settings())?;
        let Some(key) = self.prompt("Setting to change (empty to go back)")? else {
            return Ok(None);
        };
        if key.is_empty() {
            return Ok(None);
        }
        if !KEYS.contains(&key.as_str()) {
            return Ok(Some(self.api.config(SettingsAction::ShowKey(key))?));
        }
        let Some(value) = self.prompt(&format!("New value for {}", key))? else {
            return Ok(None);
        };
        Ok(Some(self.api.config(SettingsAction::Set(key, value))?))
    }
}

/// `r`, `w` and `o` in any order; empty input means read+write.
fn parse_permissions(input: &str) -> Permissions {
    let input = input.trim().to_ascii_lowercase();
    if input.is_empty() {
        return Permissions::read_write();
    }
    Permissions {
        read: input.contains('r'),
        write: input.contains('w'),
        owner: input.contains('o'),
    }
}
