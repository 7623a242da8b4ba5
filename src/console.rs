use anyhow::Result;
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::models::{ClassLabel, SessionReport, TrialGenerator};
use crate::window::{TriggerResult, WindowController, WindowEvent, WindowPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Go,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "go" | "g" => Some(Command::Go),
            "next" | "n" => Some(Command::Next),
            "status" | "s" => Some(Command::Status),
            "help" | "h" | "?" => Some(Command::Help),
            "quit" | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "commands: <enter>/go = classify, next = new problem, status, quit";

/// Line-oriented front end: reads commands from stdin and prints prompts,
/// gate openings and verdicts.
pub async fn run_console(controller: WindowController, mut generator: TrialGenerator) -> Result<()> {
    let mut events = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    arm_next(&controller, &mut generator).await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Some(Command::Go) => show_trigger(controller.trigger().await, &controller).await,
                    Some(Command::Next) => arm_next(&controller, &mut generator).await,
                    Some(Command::Status) => {
                        let snapshot = controller.snapshot().await;
                        println!("{:?} ({} ms left)", snapshot.phase, snapshot.remaining_ms);
                    }
                    Some(Command::Help) => println!("{HELP}"),
                    Some(Command::Quit) => break,
                    None => println!("unknown command {:?}; {HELP}", line.trim()),
                }
            }
            event = events.recv() => match event {
                Ok(WindowEvent::Opened { .. }) => println!("acquisition window open, press enter to classify"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("console missed {} window events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    }

    controller.cancel().await;
    Ok(())
}

async fn arm_next(controller: &WindowController, generator: &mut TrialGenerator) {
    let trial = generator.next();
    let snapshot = controller.arm_window(trial).await;
    println!("{trial} = ?   (think for {} ms)", snapshot.remaining_ms);
}

async fn show_trigger(result: TriggerResult, controller: &WindowController) {
    match result {
        TriggerResult::Finalized(report) | TriggerResult::AlreadyFinalized(report) => {
            println!("{}", describe(&report));
        }
        TriggerResult::Rejected(WindowPhase::Armed) => {
            let snapshot = controller.snapshot().await;
            println!("still acquiring, {} ms left", snapshot.remaining_ms);
        }
        TriggerResult::Rejected(WindowPhase::Error) => println!("Error, press next for a new problem"),
        TriggerResult::Rejected(phase) => println!("nothing to classify ({phase:?})"),
        TriggerResult::Failed(_) => println!("Error"),
        TriggerResult::Superseded => {}
    }
}

pub fn describe(report: &SessionReport) -> String {
    let result = report
        .verdict
        .computed_result
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".into());
    let judgement = match (report.verdict.is_correct, report.outcome.label) {
        (true, ClassLabel::AdditionClass) => "Correct (Addition)!",
        (true, ClassLabel::SubtractionClass) => "Correct (Subtraction)!",
        _ => "Incorrect!",
    };
    format!("{} = {}   {}", report.trial, result, judgement)
}
