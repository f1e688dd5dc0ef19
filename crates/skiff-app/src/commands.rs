//! Console commands: parsing input lines into user intents and applying
//! them to the session.

use std::io::{self, Write};

use skiff_browser::Session;
use skiff_browser::nav::normalize_address;
use skiff_engine::{Chrome, WebEngine, WebView};
use skiff_types::error::{Result, SkiffError};

use crate::console::ConsoleChrome;

pub const HELP: &str = "\
go <address>    load address in the current tab
back | forward | reload | home
new [address]   open a tab (home page by default)
close [n]       close tab n (current tab by default)
tab <n>         switch to tab n
tabs            list open tabs
history         list the history menu
open <n>        open history item n in a new tab
clear-cache | clear-cookies | about
quit";

/// A user intent entered at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Go(String),
    Back,
    Forward,
    Reload,
    Home,
    NewTab(Option<String>),
    Close(Option<usize>),
    Switch(usize),
    Tabs,
    History,
    OpenHistory(usize),
    ClearCache,
    ClearCookies,
    About,
    Help,
    Quit,
}

fn parse_index(arg: Option<&str>, usage: &str) -> Result<usize> {
    arg.and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .ok_or_else(|| SkiffError::Command(format!("usage: {usage}")))
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    let Some((name, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .or((!line.is_empty()).then_some((line, "")))
    else {
        return Ok(None);
    };
    let arg = (!rest.is_empty()).then_some(rest);

    let cmd = match name {
        "go" => ShellCommand::Go(
            arg.ok_or_else(|| SkiffError::Command("usage: go <address>".into()))?
                .to_string(),
        ),
        "back" => ShellCommand::Back,
        "forward" => ShellCommand::Forward,
        "reload" => ShellCommand::Reload,
        "home" => ShellCommand::Home,
        "new" => ShellCommand::NewTab(arg.map(str::to_string)),
        "close" => match arg {
            None => ShellCommand::Close(None),
            some => ShellCommand::Close(Some(parse_index(some, "close [n]")?)),
        },
        "tab" => ShellCommand::Switch(parse_index(arg, "tab <n>")?),
        "tabs" => ShellCommand::Tabs,
        "history" => ShellCommand::History,
        "open" => ShellCommand::OpenHistory(parse_index(arg, "open <n>")?),
        "clear-cache" => ShellCommand::ClearCache,
        "clear-cookies" => ShellCommand::ClearCookies,
        "about" => ShellCommand::About,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(SkiffError::Command(format!("unknown command '{other}'"))),
    };
    Ok(Some(cmd))
}

/// Apply `cmd` to the session. Returns text to print, if any.
pub fn execute<E, C>(cmd: ShellCommand, session: &mut Session<E, C>) -> Result<Option<String>>
where
    E: WebEngine,
    C: Chrome,
{
    match cmd {
        ShellCommand::Go(text) => {
            session.navigate(&text);
        },
        ShellCommand::Back => session.back(),
        ShellCommand::Forward => session.forward(),
        ShellCommand::Reload => session.reload(),
        ShellCommand::Home => session.go_home(),
        ShellCommand::NewTab(address) => {
            let url = address.as_deref().map(normalize_address);
            session.open_tab(url.as_deref())?;
        },
        ShellCommand::Close(None) => session.close_active_tab(),
        ShellCommand::Close(Some(n)) => {
            let id = session
                .tabs()
                .id_at(n - 1)
                .ok_or_else(|| SkiffError::Command(format!("no tab {n}")))?;
            session.close_tab(id);
        },
        ShellCommand::Switch(n) => {
            let id = session
                .tabs()
                .id_at(n - 1)
                .ok_or_else(|| SkiffError::Command(format!("no tab {n}")))?;
            session.switch_to(id);
        },
        ShellCommand::Tabs => return Ok(Some(list_tabs(session))),
        ShellCommand::History => return Ok(Some(list_history(session))),
        ShellCommand::OpenHistory(n) => {
            if session.open_history_item(n - 1)?.is_none() {
                return Err(SkiffError::Command(format!("no history item {n}")));
            }
        },
        ShellCommand::ClearCache => session.clear_cache(),
        ShellCommand::ClearCookies => session.clear_cookies(),
        ShellCommand::About => session.about(),
        ShellCommand::Help => return Ok(Some(HELP.to_string())),
        ShellCommand::Quit => session.quit(),
    }
    Ok(None)
}

/// Drive `session` from a line source until it stops running. Each line is
/// parsed, executed and followed by an event pump. End of input quits.
pub fn run<E, W, F>(session: &mut Session<E, ConsoleChrome<W>>, mut read_line: F) -> io::Result<()>
where
    E: WebEngine,
    W: Write,
    F: FnMut(&mut String) -> io::Result<usize>,
{
    let mut line = String::new();
    while session.is_running() {
        line.clear();
        if read_line(&mut line)? == 0 {
            session.quit();
            break;
        }
        let outcome = parse(&line).and_then(|cmd| match cmd {
            Some(cmd) => execute(cmd, session),
            None => Ok(None),
        });
        match outcome {
            Ok(Some(text)) => session.chrome_mut().line(&text),
            Ok(None) => {},
            Err(e) => session.chrome_mut().line(&format!("error: {e}")),
        }
        session.pump();
    }
    Ok(())
}

fn list_tabs<E: WebEngine, C: Chrome>(session: &Session<E, C>) -> String {
    session
        .tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let marker = if session.tabs().is_active(tab.id()) { "*" } else { " " };
            format!(
                "{marker}{:>2}  {:<20}  {}",
                i + 1,
                tab.displayed_title(),
                tab.view().url()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_history<E: WebEngine, C: Chrome>(session: &Session<E, C>) -> String {
    let menu = session.history_menu();
    if menu.is_empty() {
        return "(no history)".to_string();
    }
    menu.iter()
        .enumerate()
        .map(|(i, item)| format!("{:>2}  {}", i + 1, item.label))
        .collect::<Vec<_>>()
        .join("\n")
}
