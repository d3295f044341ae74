mod command;
mod error;
mod render;

use command::{help, Command, Navigation};
use error::Error;
use mathedit_editor::{Direction, Session, CATALOG};
use render::render;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, BufRead, IsTerminal};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// The expression edited when none is given on the command line.
const DEFAULT_EXPRESSION: &str = "(x^2)^(y^2) - 2*x - (x^2 - 1^(-2)) + (x + y)*(x - y)";

/// What to do after running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Moves the selection of the session.
fn navigate(session: &mut Session, navigation: Navigation) -> Result<(), Error> {
    match navigation {
        Navigation::Child => session.select_child(),
        Navigation::Parent => session.select_parent(),
        Navigation::Previous => session.select_previous_or_next_sibling(Direction::Previous),
        Navigation::Next => session.select_previous_or_next_sibling(Direction::Next),
        Navigation::GrowPrevious => session.grow(Direction::Previous),
        Navigation::GrowNext => session.grow(Direction::Next),
        Navigation::First => session.select_first_or_last_sibling(false),
        Navigation::Last => session.select_first_or_last_sibling(true),
    }?;
    Ok(())
}

/// Runs one line of input against the session, printing its outcome.
fn execute(session: &mut Session, command: Command) -> Result<Flow, Error> {
    match command {
        Command::Navigate(navigation) => navigate(session, navigation)?,
        Command::Action(binding) => {
            if session.run_binding(binding) == Some(false) {
                let name = CATALOG.get(binding).map_or(binding, |action| action.name);
                println!("{} does not apply to the selection", name);
            }
        },
        Command::Set(text) => session.set_expression(text)?,
        Command::Edit(text) => {
            if !session.edit_selected_as_text(text)? {
                println!("select a single element to edit it");
            }
        },
        Command::Text => {
            let tree = session.tree();
            println!("{}", tree.display(tree.content()));
            return Ok(Flow::Continue);
        },
        Command::Help => {
            print!("{}", help());
            return Ok(Flow::Continue);
        },
        Command::Quit => return Ok(Flow::Quit),
    }

    println!("{}", render(session.tree(), session.selected()));
    Ok(Flow::Continue)
}

/// Parses and runs one line of input, reporting any error to stderr.
fn read_execute(session: &mut Session, line: &str) -> Flow {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Flow::Continue;
    }

    debug!(line, "running command");
    match Command::parse(line).and_then(|command| execute(session, command)) {
        Ok(flow) => flow,
        Err(err) => {
            // parse errors point into the text after the command name
            let input = line.split_once(char::is_whitespace).map_or("", |(_, rest)| rest.trim());
            err.report_to_stderr(input);
            Flow::Continue
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let source = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_EXPRESSION.to_string());
    let mut session = match Session::parse(&source) {
        Ok(session) => session,
        Err(err) => {
            Error::from(err).report_to_stderr(&source);
            std::process::exit(1);
        },
    };
    println!("{}", render(session.tree(), session.selected()));

    if !io::stdin().is_terminal() {
        // run the commands from stdin as a script
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    eprintln!("error: {}", err);
                    break;
                },
            };
            if read_execute(&mut session, &line) == Flow::Quit {
                break;
            }
        }
        return;
    }

    // run the repl / interactive mode
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        },
    };

    fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<Flow, ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        rl.add_history_entry(&input)?;
        Ok(read_execute(session, &input))
    }

    loop {
        match process_line(&mut rl, &mut session) {
            Ok(Flow::Continue) => (),
            Ok(Flow::Quit) => break,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            },
        }
    }
}
