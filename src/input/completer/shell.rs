use std::borrow::Cow;

use super::{command::CommandCompleter, path::PathCompleter};
use crate::core::commands::{lookup, CommandKind};
use crate::highlight::SyntaxHighlighter;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

/// Line editor helper: builtin and directory completion plus highlighting.
#[derive(Clone, Debug, Default)]
pub struct ShellHelper {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellHelper {
    pub fn new(highlighter: SyntaxHighlighter) -> Self {
        ShellHelper {
            command_completer: CommandCompleter::new(),
            path_completer: PathCompleter::new(),
            highlighter,
        }
    }

    /// Completion start offset and candidates for the text before the cursor.
    fn candidates(&self, line_up_to_cursor: &str) -> (usize, Vec<Pair>) {
        let mut words: Vec<&str> = line_up_to_cursor.split_whitespace().collect();
        if line_up_to_cursor.is_empty() || line_up_to_cursor.ends_with(char::is_whitespace) {
            words.push("");
        }

        let last_word = words.last().copied().unwrap_or("");
        let start = line_up_to_cursor.len() - last_word.len();

        match words.as_slice() {
            [word] => (start, self.command_completer.complete_command(word)),
            [command, word] if is_movetodir(command) => {
                (start, self.path_completer.complete_dir(word))
            }
            _ => (start, Vec::new()),
        }
    }
}

fn is_movetodir(word: &str) -> bool {
    lookup(word).is_some_and(|descriptor| descriptor.kind == CommandKind::MoveToDir)
}

impl Helper for ShellHelper {}

impl Highlighter for ShellHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Validator for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_up_to_cursor = line.get(..pos).unwrap_or(line);
        Ok(self.candidates(line_up_to_cursor))
    }
}
