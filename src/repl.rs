//! Interactive session: read commands, issue requests, redraw as responses land.
//!
//! Input lines and request completions are multiplexed on one task with
//! `tokio::select!`, so typing `search` twice quickly really does put two
//! searches in flight, and whichever settles is drawn as soon as it arrives.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `category <name>` | Select a category (empty selects `general`) |
//! | `query <text>` | Set the search text (empty clears it) |
//! | `search` | Search with the current selection |
//! | `categories` | Reload the category list |
//! | `show` | Redraw the whole view |
//! | `help` | List commands |
//! | `quit` | Leave, dropping anything still in flight |

use crate::api::NewsApi;
use crate::render::TextRenderer;
use crate::view::{Applied, NewsSearchView};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

const HELP: &str = "commands: category <name> | query <text> | search | categories | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Category(String),
    Query(String),
    Search,
    Categories,
    Show,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Ok(Command::Empty),
            "category" | "c" => Ok(Command::Category(rest.to_string())),
            "query" | "q" => Ok(Command::Query(rest.to_string())),
            "search" | "s" => Ok(Command::Search),
            "categories" => Ok(Command::Categories),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command `{}`; {}", other, HELP)),
        }
    }
}

/// Run until `quit`, or until input ends and every request has settled.
pub async fn run<A, R, W>(
    view: &mut NewsSearchView<A>,
    renderer: &TextRenderer,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    A: NewsApi + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;
    writeln!(out, "{}", HELP)?;

    loop {
        if !input_open && !view.has_pending() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    debug!("Input closed; draining outstanding requests");
                    input_open = false;
                    continue;
                };

                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(view, renderer, command, out)?,
                    Err(message) => writeln!(out, "{}", message)?,
                }
            }
            Some(completion) = view.next_completion(), if view.has_pending() => {
                match view.apply(completion) {
                    Applied::Results { .. } => write!(out, "{}", renderer.render_view(view.state()))?,
                    _ => writeln!(out, "{}", renderer.render_controls(view.state()))?,
                }
            }
            else => break,
        }
        out.flush()?;
    }

    info!("Interactive session finished");
    Ok(())
}

fn handle<A, W>(
    view: &mut NewsSearchView<A>,
    renderer: &TextRenderer,
    command: Command,
    out: &mut W,
) -> io::Result<()>
where
    A: NewsApi + 'static,
    W: Write,
{
    match command {
        Command::Category(category) => {
            view.set_category(&category);
            writeln!(out, "{}", renderer.render_controls(view.state()))?;
        }
        Command::Query(query) => {
            view.set_query(&query);
            writeln!(out, "{}", renderer.render_controls(view.state()))?;
        }
        Command::Search => {
            view.search();
            writeln!(out, "{}", renderer.render_controls(view.state()))?;
        }
        Command::Categories => view.load_categories(),
        Command::Show => write!(out, "{}", renderer.render_view(view.state()))?,
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit | Command::Empty => {}
    }
    Ok(())
}
