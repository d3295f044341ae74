use crate::error::Error;
use levenshtein::levenshtein;
use mathedit_editor::CATALOG;

/// Moves of the selection, named after the keys that trigger them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Child,
    Parent,
    Previous,
    Next,
    GrowPrevious,
    GrowNext,
    First,
    Last,
}

/// The navigation keys and the moves they trigger.
pub const NAVIGATION_KEYS: [(&str, Navigation); 8] = [
    ("ArrowUp", Navigation::Child),
    ("ArrowDown", Navigation::Parent),
    ("ArrowLeft", Navigation::Previous),
    ("ArrowRight", Navigation::Next),
    ("Ctrl+ArrowLeft", Navigation::GrowPrevious),
    ("Ctrl+ArrowRight", Navigation::GrowNext),
    ("Home", Navigation::First),
    ("End", Navigation::Last),
];

/// The colon commands, with a description of each.
pub const COLON_COMMANDS: [(&str, &str); 5] = [
    (":set EXPR", "replace the whole expression"),
    (":edit EXPR", "replace the selected element"),
    (":text", "print the expression as text"),
    (":help", "print this help"),
    (":quit", "exit"),
];

/// A line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Navigate(Navigation),
    Action(&'static str),
    Set(&'a str),
    Edit(&'a str),
    Text,
    Help,
    Quit,
}

impl<'a> Command<'a> {
    /// Parses a line of input into a command.
    pub fn parse(line: &'a str) -> Result<Self, Error> {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(':') {
            let (name, arg) = rest.split_once(char::is_whitespace)
                .map_or((rest, ""), |(name, arg)| (name, arg.trim()));
            return match name {
                "set" => Ok(Self::Set(arg)),
                "edit" => Ok(Self::Edit(arg)),
                "text" => Ok(Self::Text),
                "help" => Ok(Self::Help),
                "quit" | "q" => Ok(Self::Quit),
                _ => Err(unknown(line)),
            };
        }

        if let Some((_, navigation)) = NAVIGATION_KEYS.iter().find(|(key, _)| *key == line) {
            return Ok(Self::Navigate(*navigation));
        }
        CATALOG.get(line)
            .map(|action| Self::Action(action.key_binding))
            .ok_or_else(|| unknown(line))
    }
}

/// Returns every command the user can type, without arguments.
fn known_commands() -> impl Iterator<Item = &'static str> {
    NAVIGATION_KEYS.iter()
        .map(|(key, _)| *key)
        .chain(CATALOG.iter().map(|action| action.key_binding))
        .chain(COLON_COMMANDS.iter().map(|&(usage, _)| {
            usage.split_whitespace().next().unwrap_or(usage)
        }))
}

/// Builds the error for an unknown command, suggesting the closest known one.
fn unknown(command: &str) -> Error {
    let name = command.split_whitespace().next().unwrap_or(command);
    let suggestion = known_commands()
        .map(|known| (levenshtein(known, name), known))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, known)| known);
    Error::UnknownCommand { command: command.to_string(), suggestion }
}

/// Returns the help text.
pub fn help() -> String {
    let mut help = String::from("navigation:\n");
    for (key, navigation) in NAVIGATION_KEYS {
        help.push_str(&format!("  {:<18} {:?}\n", key, navigation));
    }
    help.push_str("actions:\n");
    for action in CATALOG.iter() {
        help.push_str(&format!("  {:<18} {}\n", action.key_binding, action.name));
    }
    help.push_str("commands:\n");
    for (usage, description) in COLON_COMMANDS {
        help.push_str(&format!("  {:<18} {}\n", usage, description));
    }
    help
}
