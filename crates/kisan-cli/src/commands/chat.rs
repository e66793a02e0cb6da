use anyhow::Result;
use colored::Colorize;
use kisan_ai::{ChatSession, Language, Role, SpeechCapability};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::stream_answer;
use crate::error::print_error;

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Quit,
    Clear,
    Help,
    Listen,
    Speak,
    Language(String),
    Quick(usize),
    Message(String),
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name.as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        "clear" => Input::Clear,
        "help" | "?" => Input::Help,
        "listen" => Input::Listen,
        "speak" => Input::Speak,
        "lang" | "language" => Input::Language(arg.to_string()),
        "quick" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Quick(n),
            _ => Input::Unknown(line.to_string()),
        },
        _ => Input::Unknown(line.to_string()),
    }
}

pub async fn run(mut session: ChatSession, speech: &dyn SpeechCapability) -> Result<()> {
    println!("{}", "Kisan Mitra 🌾".green().bold());
    println!("{}", "Type a question, /help for commands, /quit to exit.".dimmed());
    print_quick_questions(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", format!("[{}]>", session.language().code()).green());
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Clear => {
                session.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            Input::Help => print_help(),
            Input::Language(code) => match code.parse::<Language>() {
                Ok(language) => {
                    session.set_language(language);
                    print_quick_questions(&session);
                }
                Err(err) => print_error(err),
            },
            Input::Quick(n) => match session.quick_questions().get(n - 1) {
                Some(question) => {
                    println!("{} {}", "You:".bold(), question);
                    reply(&mut session, question).await;
                }
                None => print_error(format!("There is no quick question {n}")),
            },
            Input::Listen => match speech.start_listening(session.language()) {
                Some(text) => {
                    println!("{} {}", "You:".bold(), text);
                    reply(&mut session, &text).await;
                }
                None => println!("{}", "Speech input is not available.".dimmed()),
            },
            Input::Speak => speak_last_reply(&session, speech),
            Input::Message(text) => reply(&mut session, &text).await,
            Input::Unknown(command) => {
                print_error(format!("Unknown command: {command} (try /help)"))
            }
        }
    }

    Ok(())
}

async fn reply(session: &mut ChatSession, text: &str) {
    if let Err(err) = stream_answer(session, text).await {
        print_error(err);
    }
}

fn speak_last_reply(session: &ChatSession, speech: &dyn SpeechCapability) {
    if !speech.is_available() {
        println!("{}", "Speech output is not available.".dimmed());
        return;
    }
    match session.conversation().last() {
        Some(message) if message.role == Role::Assistant => {
            speech.speak(&message.content, session.language())
        }
        _ => println!("{}", "Nothing to read aloud yet.".dimmed()),
    }
}

fn print_quick_questions(session: &ChatSession) {
    let language = session.language();
    println!(
        "\n{} {} {}",
        "Language:".bold(),
        language.flag(),
        language.label()
    );
    for (i, question) in session.quick_questions().iter().enumerate() {
        println!("  {} {}", format!("/quick {}", i + 1).cyan(), question);
    }
    println!();
}

fn print_help() {
    println!("  {}  switch reply language (en, hi, te, ta, kn)", "/lang <code>".cyan());
    println!("  {}     ask a suggested question", "/quick <n>".cyan());
    println!("  {}         start a new conversation", "/clear".cyan());
    println!("  {}        speak your question", "/listen".cyan());
    println!("  {}         read the last answer aloud", "/speak".cyan());
    println!("  {}          exit", "/quit".cyan());
    println!("  Ctrl-C while a reply is streaming stops it.");
}
