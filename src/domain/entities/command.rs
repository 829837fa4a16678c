/// Prefix that marks a message as a command
pub const COMMAND_MARKER: char = '!';

/// A parsed command: lower-cased name (marker included) and the raw argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub argument: String,
}

impl Command {
    pub fn new(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: argument.into(),
        }
    }

    /// The built-in command this name refers to, if any
    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_name(&self.name)
    }

    pub fn has_argument(&self) -> bool {
        !self.argument.is_empty()
    }
}

/// The fixed set of commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Hello,
    Ask,
    Search,
    Help,
}

impl CommandKind {
    /// All commands, in the order they are listed in the help text
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Hello,
        CommandKind::Ask,
        CommandKind::Search,
        CommandKind::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Hello => "!hello",
            CommandKind::Ask => "!ask",
            CommandKind::Search => "!search",
            CommandKind::Help => "!help",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::Hello => "!hello",
            CommandKind::Ask => "!ask <question>",
            CommandKind::Search => "!search <query>",
            CommandKind::Help => "!help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::Hello => "Greets the user.",
            CommandKind::Ask => "Ask a question to the Gemini AI.",
            CommandKind::Search => "Search the web using Tavily.",
            CommandKind::Help => "Shows this help message.",
        }
    }

    /// Exact match on an already lower-cased name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}
