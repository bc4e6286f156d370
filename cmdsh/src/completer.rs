use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// Completes the first word of the line from the registered command names.
#[derive(Default)]
pub struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    pub fn set_commands(&mut self, commands: Vec<String>) {
        self.commands = commands;
    }
}

/// Candidates for the word under the cursor. Only the first word names a
/// command; arguments are the handlers' business and get no completion.
fn completions_for(line_to_cursor: &str, commands: &[String]) -> (usize, Vec<String>) {
    let (start, word) = find_word_start(line_to_cursor);

    let is_first_word = !line_to_cursor[..start].contains(|c: char| !c.is_whitespace());
    if !is_first_word || word.is_empty() {
        return (line_to_cursor.len(), vec![]);
    }

    let matches = commands
        .iter()
        .filter(|c| c.starts_with(word))
        .cloned()
        .collect();
    (start, matches)
}

fn find_word_start(line: &str) -> (usize, &str) {
    let mut start = line.len();
    for (i, c) in line.char_indices().rev() {
        if c.is_whitespace() {
            break;
        }
        start = i;
    }
    (start, &line[start..])
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = completions_for(&line[..pos], &self.commands);
        let pairs = matches
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands() -> Vec<String> {
        vec!["echo".to_string(), "exit".to_string(), "help".to_string()]
    }

    #[test]
    fn completes_first_word_by_prefix() {
        let (start, matches) = completions_for("e", &commands());
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["echo", "exit"]);
    }

    #[test]
    fn exact_prefix_narrows_matches() {
        let (start, matches) = completions_for("he", &commands());
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["help"]);
    }

    #[test]
    fn arguments_are_not_completed() {
        let (_, matches) = completions_for("echo e", &commands());
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_word_yields_nothing() {
        let (_, matches) = completions_for("", &commands());
        assert!(matches.is_empty());
    }

    #[test]
    fn leading_whitespace_still_counts_as_first_word() {
        let (start, matches) = completions_for("  ec", &commands());
        assert_eq!(start, 2);
        assert_eq!(matches, vec!["echo"]);
    }
}
