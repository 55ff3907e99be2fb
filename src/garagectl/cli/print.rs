use colored::Colorize;
use garagectl::api::{CmdMessage, MessageLevel};
use garagectl::commands::CmdResult;
use garagectl::settings::{Settings, KEYS};
use std::io::{self, Write};

pub fn print_messages<W: Write>(out: &mut W, messages: &[CmdMessage]) -> io::Result<()> {
    for message in messages {
        match message.level {
            MessageLevel::Info => writeln!(out, "{}", message.content.dimmed())?,
            MessageLevel::Success => writeln!(out, "{}", message.content.green())?,
            MessageLevel::Warning => writeln!(out, "{}", message.content.yellow())?,
            MessageLevel::Error => writeln!(out, "{}", message.content.red())?,
        }
    }
    Ok(())
}

/// Delegated command output first, then the result messages.
pub fn print_result<W: Write>(out: &mut W, result: &CmdResult) -> io::Result<()> {
    for block in &result.output {
        writeln!(out, "{}", block)?;
    }
    if let Some(settings) = &result.settings {
        print_settings(out, settings)?;
    }
    print_messages(out, &result.messages)
}

pub fn print_settings<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    for key in KEYS {
        if let Some(value) = settings.get(key) {
            writeln!(out, "{} = {}", key.bold(), value)?;
        }
    }
    Ok(())
}

pub fn print_error<W: Write>(out: &mut W, error: &dyn std::fmt::Display) -> io::Result<()> {
    writeln!(out, "{} {}", "Error:".red().bold(), error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: &CmdResult) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        print_result(&mut buf, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn output_comes_before_messages() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success("Bucket 'photos' created"));
        result.add_output("Bucket photos was created.");

        assert_eq!(
            render(&result),
            "Bucket photos was created.\nBucket 'photos' created\n"
        );
    }

    #[test]
    fn settings_are_listed_by_key() {
        let result = CmdResult::default().with_settings(Settings::default());
        let text = render(&result);
        assert!(text.contains("mode = compose"));
        assert!(text.contains("port-base = 39300"));
    }
}
