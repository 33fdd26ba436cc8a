#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    MoveToDir,
    WhereAmI,
    History,
    ByeBye,
    Replay,
    Repeat,
    Start,
    Background,
    Dalek,
    DalekAll,
    ListBackground,
    Set,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub synopsis: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub kind: CommandKind,
    /// Aliases carry no usage of their own and are left out of `help`.
    pub usage: Option<Usage>,
}

const fn entry(
    name: &'static str,
    kind: CommandKind,
    synopsis: &'static str,
    summary: &'static str,
) -> CommandDescriptor {
    CommandDescriptor {
        name,
        kind,
        usage: Some(Usage { synopsis, summary }),
    }
}

const fn alias(name: &'static str, kind: CommandKind) -> CommandDescriptor {
    CommandDescriptor {
        name,
        kind,
        usage: None,
    }
}

pub static COMMANDS: &[CommandDescriptor] = &[
    entry(
        "movetodir",
        CommandKind::MoveToDir,
        "movetodir <dir>",
        "change the working directory",
    ),
    entry(
        "whereami",
        CommandKind::WhereAmI,
        "whereami",
        "print the working directory",
    ),
    entry(
        "history",
        CommandKind::History,
        "history [-c]",
        "print history, -c to clear it",
    ),
    entry(
        "byebye",
        CommandKind::ByeBye,
        "byebye",
        "exit the shell, also 'exit'",
    ),
    entry(
        "replay",
        CommandKind::Replay,
        "replay <n>",
        "re-run the n-th previous command",
    ),
    entry(
        "repeat",
        CommandKind::Repeat,
        "repeat <n> <program> [param]",
        "start n copies of a program in the background",
    ),
    entry(
        "start",
        CommandKind::Start,
        "start <program> [param]",
        "run a program and wait for it",
    ),
    entry(
        "background",
        CommandKind::Background,
        "background <program> [param]",
        "start a program in the background",
    ),
    entry(
        "dalek",
        CommandKind::Dalek,
        "dalek <pid>",
        "kill the process with pid <pid>, also 'kill'",
    ),
    entry(
        "dalekall",
        CommandKind::DalekAll,
        "dalekall",
        "kill every background process, also 'killall'",
    ),
    entry(
        "lsbg",
        CommandKind::ListBackground,
        "lsbg",
        "list background processes",
    ),
    entry(
        "set",
        CommandKind::Set,
        "set <key> [value]",
        "set a variable, or unset it when no value is given",
    ),
    entry(
        "help",
        CommandKind::Help,
        "help",
        "print this message",
    ),
    alias("exit", CommandKind::ByeBye),
    alias("kill", CommandKind::Dalek),
    alias("killall", CommandKind::DalekAll),
];

pub fn lookup(name: &str) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|descriptor| descriptor.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|descriptor| descriptor.name)
}

impl CommandKind {
    pub fn usage(self) -> Usage {
        COMMANDS
            .iter()
            .filter(|descriptor| descriptor.kind == self)
            .find_map(|descriptor| descriptor.usage)
            .unwrap_or(Usage {
                synopsis: "",
                summary: "",
            })
    }
}
