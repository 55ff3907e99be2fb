use super::{CommandRunner, ExecOutput};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

type Matcher = Box<dyn Fn(&str, &[String]) -> bool>;

struct Rule {
    matcher: Matcher,
    response: ExecOutput,
    remaining: Option<usize>,
}

/// One recorded call to [`CommandRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// The invocation as a single space-separated line.
    pub fn line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// In-memory runner for testing.
///
/// Responses are scripted up front; the most recently added matching rule wins.
/// Calls that match no rule fail with exit status 1. Uses `RefCell` for interior
/// mutability since the tool is single-threaded.
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<Invocation>>,
    tools: RefCell<HashSet<String>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self {
            rules: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            tools: RefCell::new(HashSet::new()),
            sleeps: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable through [`CommandRunner::locate`].
    pub fn with_tool(self, program: &str) -> Self {
        self.tools.borrow_mut().insert(program.to_string());
        self
    }

    /// Answer every call to `program` whose arguments start with `prefix`.
    pub fn respond(&self, program: &str, prefix: &[&str], response: ExecOutput) {
        self.push_rule(program, prefix, response, None);
    }

    /// Like [`respond`](Self::respond) but the rule is consumed after one use.
    pub fn respond_once(&self, program: &str, prefix: &[&str], response: ExecOutput) {
        self.push_rule(program, prefix, response, Some(1));
    }

    /// Answer every call for which `matcher` returns true.
    pub fn respond_when<F>(&self, matcher: F, response: ExecOutput)
    where
        F: Fn(&str, &[String]) -> bool + 'static,
    {
        self.rules.borrow_mut().push(Rule {
            matcher: Box::new(matcher),
            response,
            remaining: None,
        });
    }

    fn push_rule(
        &self,
        program: &str,
        prefix: &[&str],
        response: ExecOutput,
        remaining: Option<usize>,
    ) {
        let program = program.to_string();
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        self.rules.borrow_mut().push(Rule {
            matcher: Box::new(move |prog, args| {
                prog == program && args.len() >= prefix.len() && args[..prefix.len()] == prefix[..]
            }),
            response,
            remaining,
        });
    }

    /// All invocations so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// All invocations rendered with [`Invocation::line`].
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::line).collect()
    }

    /// Durations passed to [`CommandRunner::sleep`].
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });

        let mut rules = self.rules.borrow_mut();
        for rule in rules.iter_mut().rev() {
            if rule.remaining == Some(0) || !(rule.matcher)(program, args) {
                continue;
            }
            if let Some(n) = rule.remaining.as_mut() {
                *n -= 1;
            }
            return Ok(rule.response.clone());
        }

        Ok(ExecOutput::failed(1, "no scripted response"))
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        if self.tools.borrow().contains(program) {
            Some(PathBuf::from("/usr/bin").join(program))
        } else {
            None
        }
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
