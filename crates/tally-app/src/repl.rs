//! Terminal front end: renders turns and drives a chat session from stdin.

use std::io::Write;

use tally_chat::{AskBackend, ChatRole, ChatSession, ChatTurn};
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "> ";

/// Format one turn for the terminal, indenting continuation lines under
/// the speaker label.
pub fn render_turn(turn: &ChatTurn) -> String {
    let label = match turn.role {
        ChatRole::User => "you",
        ChatRole::Assistant | ChatRole::Status => "tally",
    };
    let indent = " ".repeat(label.len() + 2);
    let mut out = String::new();
    for (i, line) in turn.content.lines().enumerate() {
        if i == 0 {
            out.push_str(&format!("{}: {}", label, line));
        } else {
            out.push('\n');
            out.push_str(&indent);
            out.push_str(line);
        }
    }
    if out.is_empty() {
        out = format!("{}:", label);
    }
    out
}

/// Local commands understood by the REPL.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    History,
    Clear,
    Help,
    Say(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/quit" | "/exit" => Command::Quit,
            "/history" => Command::History,
            "/clear" => Command::Clear,
            "/help" => Command::Help,
            _ => Command::Say(line.to_string()),
        }
    }
}

fn print_turns(turns: &[ChatTurn]) {
    for turn in turns {
        println!("{}", render_turn(turn));
    }
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}

/// Send one message, print the reply, and return.
pub async fn run_once<B: AskBackend>(session: &ChatSession<B>, text: &str) {
    print_turns(&session.send(text).await);
}

/// Read messages from stdin until EOF or `/quit`.
pub async fn run_interactive<B: AskBackend>(session: &ChatSession<B>) -> std::io::Result<()> {
    println!("Tell me about an expense, or ask about your spending. /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::History => print_turns(&session.transcript()),
            Command::Clear => session.clear(),
            Command::Help => {
                println!("/history  show the conversation so far");
                println!("/clear    forget the conversation");
                println!("/quit     leave");
            }
            Command::Say(text) => {
                if let Some(submission) = session.submit(&text) {
                    if let Some(status) = session.transcript().iter().rev().find(|t| {
                        t.role == ChatRole::Status && t.request == Some(submission.request)
                    }) {
                        println!("{}", render_turn(status));
                    }
                    print_turns(&session.dispatch(submission).await);
                }
            }
        }
        prompt();
    }
    println!();
    Ok(())
}
