//! Question answering handlers (one-shot and interactive)

use std::io::stdin;

use crate::cli::output::*;
use crate::rag::Orchestrator;
use crate::AppConfig;
use crate::Result;

/// Questions suggested when an interactive session starts
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "Tell me about your professional background",
    "What are your technical skills?",
    "What is your educational background?",
    "Tell me about your achievements and certifications",
];

/// Interactive session commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput<'a> {
    Question(&'a str),
    History,
    Stats,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

impl<'a> ReplInput<'a> {
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Question(line);
        }
        match line.to_ascii_lowercase().as_str() {
            "/history" => Self::History,
            "/stats" => Self::Stats,
            "/clear" => Self::Clear,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(line),
        }
    }
}

pub async fn handle_ask_command(config: &AppConfig, question: Option<String>, json: bool) -> Result<()> {
    let orchestrator = Orchestrator::load(config).await?;

    match question {
        Some(question) if !question.trim().is_empty() => {
            let result = orchestrator.process_query(question.trim()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_query_result(&result);
            }
            Ok(())
        }
        Some(_) => {
            print_warning("Please enter a question!");
            Ok(())
        }
        None => run_repl(&orchestrator).await,
    }
}

async fn run_repl(orchestrator: &Orchestrator) -> Result<()> {
    println!("🤖 {}", orchestrator.system_name());
    println!("Ask me anything. Type /help for commands, /quit to leave.");
    println!();
    println!("💡 Example questions:");
    for question in EXAMPLE_QUESTIONS {
        println!("   - {question}");
    }
    println!();

    loop {
        print_prompt("❯ ");
        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match ReplInput::parse(&line) {
            ReplInput::Question(question) => match orchestrator.process_query(question).await {
                Ok(result) => print_query_result(&result),
                // One failed call should not end the session
                Err(e) => print_error(&format!("Failed to answer: {e}")),
            },
            ReplInput::History => print_history(&orchestrator.history().await),
            ReplInput::Stats => print_stats(&orchestrator.stats().await),
            ReplInput::Clear => {
                orchestrator.clear_history().await;
                print_success("History cleared");
            }
            ReplInput::Help => print_repl_help(),
            ReplInput::Quit => break,
            ReplInput::Empty => {}
            ReplInput::Unknown(command) => {
                print_warning(&format!("Unknown command: {command} (try /help)"));
            }
        }
    }

    print_info("Goodbye!");
    Ok(())
}

fn print_repl_help() {
    println!("Commands:");
    println!("  /history  show the questions asked so far");
    println!("  /stats    show query statistics");
    println!("  /clear    clear the history");
    println!("  /quit     leave the session");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_input_parsing() {
        assert_eq!(
            ReplInput::parse("What are your skills?\n"),
            ReplInput::Question("What are your skills?")
        );
        assert_eq!(ReplInput::parse("/history"), ReplInput::History);
        assert_eq!(ReplInput::parse(" /STATS "), ReplInput::Stats);
        assert_eq!(ReplInput::parse("/clear"), ReplInput::Clear);
        assert_eq!(ReplInput::parse("/exit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("   \n"), ReplInput::Empty);
        assert_eq!(ReplInput::parse("/joke"), ReplInput::Unknown("/joke"));
    }
}
