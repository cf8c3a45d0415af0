use std::io::{self, BufRead, Lines, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, Validator,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

const SCRIPT_ENV: &str = "FUEL_CORE_CLI_SCRIPT";

/// Runs the shell, reading commands from stdin when `FUEL_CORE_CLI_SCRIPT` is set.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    let mut input = LineSource::open(&context)?;

    while context.running {
        match input.next_line(&context.prompt())? {
            Line::Text(line) => {
                if let Err(err) = handle_line(&mut context, &line) {
                    context.report_error(err)?;
                }
            }
            Line::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Line::Closed => {
                if mode == CliMode::Interactive {
                    cli_io::print_info("Exiting shell.");
                }
                break;
            }
        }
    }
    Ok(())
}

enum Line {
    Text(String),
    Interrupted,
    Closed,
}

/// Where command lines come from: a line editor at a terminal, raw stdin for scripts.
enum LineSource {
    Editor(Box<Editor<CommandCompleter, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        match context.mode {
            CliMode::Script => Ok(Self::Script(io::stdin().lock().lines())),
            CliMode::Interactive => {
                let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
                editor.set_helper(Some(CommandCompleter {
                    commands: context.command_names(),
                }));
                Ok(Self::Editor(Box::new(editor)))
            }
        }
    }

    fn next_line(&mut self, prompt: &str) -> Result<Line, CliError> {
        match self {
            Self::Script(lines) => match lines.next() {
                Some(line) => Ok(Line::Text(line?)),
                None => Ok(Line::Closed),
            },
            Self::Editor(editor) => match editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    Ok(Line::Text(line))
                }
                Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
                Err(ReadlineError::Eof) => Ok(Line::Closed),
                Err(err) => Err(err.into()),
            },
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<(), CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(format!("Could not read that line: {}", err));
            return Ok(());
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(());
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    if context.dispatch(&raw.to_lowercase(), raw, &args)? == LoopControl::Exit {
        context.running = false;
    }
    Ok(())
}

/// Completes the first word of a line against the registered command names.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        let start = typed.len() - typed.trim_start().len();
        let word = &typed[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let needle = word.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_names_with_spaces_stay_one_argument() {
        let tokens =
            shell_words::split(r#"add-fuel 2024-05-01 1000 40 60 --station "Shell A1""#).unwrap();
        assert_eq!(tokens.last().map(String::as_str), Some("Shell A1"));
        assert!(shell_words::split("open \"unterminated").is_err());
    }

    #[test]
    fn completer_only_offers_command_words() {
        let completer = CommandCompleter {
            commands: vec!["add-fuel", "add-vehicle", "average"],
        };
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);

        let (start, found) = completer.complete("  add-", 6, &ctx).unwrap();
        assert_eq!(start, 2);
        let names: Vec<_> = found.iter().map(|pair| pair.replacement.as_str()).collect();
        assert_eq!(names, vec!["add-fuel", "add-vehicle"]);

        let (_, none) = completer.complete("add-fuel 20", 11, &ctx).unwrap();
        assert!(none.is_empty());
    }
}
