//! Line intake for the shell. Interactive sessions run through rustyline;
//! script mode drains stdin without prompts or confirmations.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::context::{CliError, CliMode, CommandSpec, ShellContext, COMMANDS};
use crate::cli::output;

/// Entry point for the `fintrack_cli` binary. Script mode is selected by
/// setting `FINTRACK_CLI_SCRIPT` in the environment.
pub fn run_cli() -> Result<(), CliError> {
    Shell::from_env()?.run()
}

struct Shell {
    context: ShellContext,
}

impl Shell {
    fn from_env() -> Result<Self, CliError> {
        let mode = if std::env::var_os("FINTRACK_CLI_SCRIPT").is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        };
        Ok(Self {
            context: ShellContext::new(mode)?,
        })
    }

    fn run(mut self) -> Result<(), CliError> {
        match self.context.mode {
            CliMode::Interactive => self.run_interactive(),
            CliMode::Script => self.run_script(),
        }
    }

    fn run_interactive(&mut self) -> Result<(), CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(COMMANDS)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

        while self.context.running {
            match editor.readline(&self.context.prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    self.feed(trimmed)?;
                }
                Err(ReadlineError::Interrupted) => {
                    if self.context.confirm_exit()? {
                        break;
                    }
                }
                Err(ReadlineError::Eof) => {
                    output::info("Exiting shell.");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn run_script(&mut self) -> Result<(), CliError> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        while self.context.running {
            let Some(line) = lines.next() else { break };
            self.feed(&line?)?;
        }
        Ok(())
    }

    /// Runs one line through the context, reporting command failures
    /// without leaving the shell.
    fn feed(&mut self, line: &str) -> Result<(), CliError> {
        if let Err(err) = self.context.process(line) {
            self.context.report_error(err)?;
        }
        Ok(())
    }
}

/// Completes command and subcommand words from the dispatch table. Bound
/// to both tab and `?`.
struct CommandHelper {
    table: &'static [CommandSpec],
}

impl CommandHelper {
    fn new(table: &'static [CommandSpec]) -> Self {
        Self { table }
    }

    fn candidates(&self, completed: &[&str], needle: &str) -> Vec<String> {
        match completed {
            [] => self
                .table
                .iter()
                .map(|spec| spec.name)
                .filter(|name| name.starts_with(needle))
                .map(str::to_string)
                .collect(),
            [command] => self
                .table
                .iter()
                .find(|spec| spec.name.eq_ignore_ascii_case(command))
                .map(|spec| {
                    spec.subcommands
                        .iter()
                        .filter(|sub| sub.starts_with(needle))
                        .map(|sub| sub.to_string())
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = before[start..].to_ascii_lowercase();
        let completed: Vec<&str> = before[..start].split_whitespace().collect();

        let pairs = self
            .candidates(&completed, &needle)
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(COMMANDS)
    }

    #[test]
    fn first_word_completion_matches_command_prefixes() {
        assert_eq!(helper().candidates(&[], "su"), vec!["sub", "summary"]);
        assert_eq!(helper().candidates(&[], "config"), vec!["config"]);
        assert!(helper().candidates(&[], "z").is_empty());
    }

    #[test]
    fn second_word_completion_lists_the_matched_subcommands() {
        assert_eq!(helper().candidates(&["tx"], "r"), vec!["remove"]);
        assert_eq!(
            helper().candidates(&["config"], ""),
            vec!["show", "currency", "period"]
        );
        assert!(helper().candidates(&["help"], "").is_empty());
    }

    #[test]
    fn completion_stops_after_the_second_word() {
        assert!(helper().candidates(&["tx", "remove"], "1").is_empty());
    }

    #[test]
    fn complete_reports_the_current_word_start() {
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);
        let (start, pairs) = helper().complete("tx re", 5, &ctx).expect("complete");
        assert_eq!(start, 3);
        let words: Vec<String> = pairs.into_iter().map(|pair| pair.replacement).collect();
        assert_eq!(words, vec!["remove"]);
    }
}
