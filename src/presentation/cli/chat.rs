use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::use_cases::ChatSessionUseCase;
use crate::config::AppConfig;
use crate::infrastructure::AppContainer;

use super::format::{format_sources, is_exit_command, rule};

const PREVIEW_CHARS: usize = 100;
const FAREWELL: &str = "Thanks for using WorkSafe NZ AI Assistant!";

fn print_header() {
    println!("\n{}", rule('='));
    println!("WorkSafe NZ AI Assistant - HSWA 2015 Q&A");
    println!("{}", rule('='));
    println!("\nAsk questions about the Health and Safety at Work Act 2015.");
    println!("Type 'quit' or 'exit' to stop.\n");
    println!("Example questions:");
    println!("  - What is a PCBU's primary duty of care?");
    println!("  - What are the penalties for violations?");
    println!("  - Who is responsible for workplace safety?");
    println!("\n{}\n", rule('='));
}

fn prompt() -> std::io::Result<()> {
    print!("You: ");
    std::io::stdout().flush()
}

/// Reads lines on a plain OS thread. A read blocked on the terminal never
/// holds up runtime shutdown; the thread dies with the process.
fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in reader.lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Forwards every Ctrl-C for as long as the receiver lives.
fn spawn_interrupt_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs the question loop until exit, end of input or an interrupt.
/// Returns the number of questions answered.
async fn converse(
    chat: &ChatSessionUseCase,
    mut lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    mut interrupts: mpsc::Receiver<()>,
) -> std::io::Result<usize> {
    let mut session_id: Option<Uuid> = None;
    let mut answered = 0usize;

    loop {
        prompt()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            Some(()) = interrupts.recv() => {
                println!("\n\n{}", FAREWELL);
                break;
            }
        };

        let line = match line {
            Some(line) => line?,
            None => {
                println!("\n{}", FAREWELL);
                break;
            }
        };

        let question = line.trim();
        if is_exit_command(question) {
            println!("\n{}", FAREWELL);
            break;
        }
        if question.is_empty() {
            continue;
        }

        println!("\nThinking...\n");
        let outcome = tokio::select! {
            outcome = chat.send_message(session_id, question) => outcome,
            Some(()) = interrupts.recv() => {
                println!("\n\n{}", FAREWELL);
                break;
            }
        };

        match outcome {
            Ok(reply) => {
                session_id = Some(reply.session_id);
                println!("Assistant: {}\n", reply.turn.text());
                println!("Sources:");
                println!("{}", format_sources(reply.turn.sources(), PREVIEW_CHARS));
                println!("\n{}\n", rule('-'));
                answered += 1;
            }
            Err(e) => {
                println!("\nError: {}\n", e);
            }
        }
    }

    Ok(answered)
}

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nInitializing WorkSafe NZ AI Assistant...");
    let container = AppContainer::new(config).await?;

    print_header();

    let lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let interrupts = spawn_interrupt_listener();
    let answered = converse(&container.chat_session_use_case, lines, interrupts).await?;

    println!("\nTotal questions answered: {}", answered);
    Ok(())
}
