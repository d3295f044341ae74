use mathedit_editor::SelectError;
use mathedit_error::Error as ParseError;

/// Utility enum to package errors that can occur while running a command.
#[derive(Debug)]
pub enum Error {
    /// The text given to `:set` or `:edit` could not be parsed.
    Parse(ParseError),

    /// The selection could not be changed.
    Select(SelectError),

    /// The command is not known. Holds the closest known command, if one is close enough.
    UnknownCommand {
        command: String,
        suggestion: Option<&'static str>,
    },
}

impl Error {
    /// Report this error to stderr. `input` is the text that was being parsed, if any.
    pub fn report_to_stderr(&self, input: &str) {
        match self {
            Self::Parse(err) => {
                if let Err(io_err) = err.report_to_stderr("input", input) {
                    eprintln!("error: could not write the report: {}", io_err);
                }
            },
            Self::Select(err) => eprintln!("error: {}", err),
            Self::UnknownCommand { command, suggestion } => {
                eprintln!("error: unknown command `{}`", command);
                if let Some(suggestion) = suggestion {
                    eprintln!("help: did you mean `{}`?", suggestion);
                }
            },
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<SelectError> for Error {
    fn from(err: SelectError) -> Self {
        Self::Select(err)
    }
}
