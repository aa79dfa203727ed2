use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::{self, OutputPreferences};

/// Set to run commands from stdin without prompts or colors.
pub const SCRIPT_ENV: &str = "POCKET_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain: mode == CliMode::Script,
    });

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Pocket Ledger. Type `help` to list commands.");
    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::hint("Type `exit` to leave the shell.");
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

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    run_lines(context, io::stdin().lock())
}

/// Runs newline-separated commands; lines that are not UTF-8 are skipped.
fn run_lines(context: &mut ShellContext, reader: impl BufRead) -> Result<(), CliError> {
    for (position, bytes) in reader.split(b'\n').enumerate() {
        if !context.running {
            break;
        }
        let bytes = bytes?;
        let Ok(line) = String::from_utf8(bytes) else {
            output::warning(format!(
                "Skipped input line {}: not valid UTF-8.",
                position + 1
            ));
            continue;
        };
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match split(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(format!("Could not parse input: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    /// Completes the word ending at the end of `prefix`; only the command word completes.
    fn completions(&self, prefix: &str) -> (usize, Vec<Pair>) {
        let start = prefix
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(idx, ch)| idx + ch.len_utf8())
            .unwrap_or(0);

        if !prefix[..start].trim().is_empty() {
            return (start, Vec::new());
        }
        let needle = prefix[start..].to_ascii_lowercase();
        (start, self.candidates(&needle))
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
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
        let prefix = line.get(..pos).unwrap_or(line);
        Ok(self.completions(prefix))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::LedgerManager;

    fn script_context() -> ShellContext {
        ShellContext::with_manager(CliMode::Script, Config::default(), LedgerManager::in_memory())
    }

    #[test]
    fn helper_completes_command_prefixes() {
        let helper = CommandHelper::new(vec!["undo", "update", "list", "update"]);
        let names: Vec<String> = helper
            .candidates("u")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, vec!["undo", "update"]);
    }

    #[test]
    fn completion_handles_multibyte_whitespace() {
        let helper = CommandHelper::new(vec!["list", "add"]);

        let (start, pairs) = helper.completions("add\u{a0}li");
        assert_eq!(start, "add\u{a0}".len());
        assert!(pairs.is_empty());

        let (start, pairs) = helper.completions("\u{3000}li");
        assert_eq!(start, "\u{3000}".len());
        let names: Vec<String> = pairs.into_iter().map(|pair| pair.replacement).collect();
        assert_eq!(names, vec!["list"]);
    }

    #[test]
    fn script_lines_skip_invalid_utf8_and_continue() {
        let mut context = script_context();
        let input: &[u8] = b"add 2024-03-01 100 income Salary\n\
                             add 2024-02-15 40 expense Caf\xe9\n\
                             add 2024-02-16 5 expense Food\n";

        run_lines(&mut context, io::Cursor::new(input)).unwrap();

        let categories: Vec<&str> = context
            .manager()
            .list()
            .iter()
            .map(|txn| txn.category())
            .collect();
        assert_eq!(categories, vec!["Food", "Salary"]);
    }

    #[test]
    fn lines_dispatch_with_quoted_categories() {
        let mut context = script_context();
        let control = handle_line(
            &mut context,
            "add 2024-02-15 40 expense \"Eating out\"",
        )
        .unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(context.manager().list()[0].category(), "Eating out");
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let mut context = script_context();
        assert_eq!(handle_line(&mut context, "   ").unwrap(), LoopControl::Continue);
        assert_eq!(handle_line(&mut context, "# note").unwrap(), LoopControl::Continue);
        assert!(context.manager().list().is_empty());
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut context = script_context();
        assert_eq!(handle_line(&mut context, "QUIT").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn command_errors_propagate_to_the_caller() {
        let mut context = script_context();
        let err = handle_line(&mut context, "delete 3").unwrap_err();
        assert!(matches!(err, CommandError::Core(_)));
    }
}
