//! Interactive live session on the terminal.
//!
//! Stdin is read on its own thread; the main loop pumps the controller at
//! a fixed frame interval and reprints the dashboard when it changes.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::export;
use crate::live::{FocusTarget, KeyCode, LiveController, iter_actions};
use crate::widgets::DashboardView;

use super::{CliError, Context, LiveArgs, print_lines, render};

const FRAME: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Input {
    Key(KeyCode),
    Start,
    Pause,
    Resume,
    Stop,
    Save,
    Csv,
    Report,
    ClearDrawing,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Key(KeyCode::Space);
    }
    let mut chars = trimmed.chars();
    if let (Some(ch), None) = (chars.next(), chars.next())
        && let Some(key) = KeyCode::from_char(ch)
    {
        return Input::Key(key);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "space" => Input::Key(KeyCode::Space),
        "start" => Input::Start,
        "pause" => Input::Pause,
        "resume" => Input::Resume,
        "restart" => Input::Key(KeyCode::KeyR),
        "stop" => Input::Stop,
        "save" => Input::Save,
        "csv" => Input::Csv,
        "report" => Input::Report,
        "clear" => Input::ClearDrawing,
        "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

fn help_lines() -> Vec<String> {
    let mut lines =
        vec!["Commands: start pause resume stop save csv report clear quit".to_string()];
    lines.push("Shortcuts: Enter toggles pause".to_string());
    for action in iter_actions() {
        lines.push(format!("  {:<6} {}", action.key.label(), action.label));
    }
    lines
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub(super) fn run(ctx: &Context, args: &LiveArgs) -> Result<(), CliError> {
    let mut controller = ctx.controller();
    controller.set_source(args.source());
    controller.start();
    info!(source = controller.source().label(), "Live session requested");
    print_lines(&help_lines());

    let deadline = args.seconds.map(|secs| Instant::now() + Duration::from_secs(secs));
    let input = spawn_stdin_reader();
    let mut last_frame: Vec<String> = Vec::new();
    loop {
        match input.recv_timeout(FRAME) {
            Ok(line) => {
                if !apply_input(ctx, &mut controller, parse_input(&line)) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) if deadline.is_none() => break,
            Err(RecvTimeoutError::Disconnected) => thread::sleep(FRAME),
        }
        controller.pump();
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            info!("Live session time limit reached");
            break;
        }
        let frame = render::dashboard(&DashboardView::build(&controller));
        if frame != last_frame {
            println!();
            print_lines(&frame);
            last_frame = frame;
        }
    }
    controller.shutdown();
    Ok(())
}

/// Returns false when the session should end.
fn apply_input(ctx: &Context, controller: &mut LiveController<ApiClient>, input: Input) -> bool {
    match input {
        Input::Key(key) => {
            controller.handle_key(key, FocusTarget::Body);
        }
        Input::Start => controller.start(),
        Input::Pause => controller.pause(),
        Input::Resume => controller.resume(),
        Input::Stop => controller.stop(),
        Input::Save => controller.save_session(),
        Input::Csv => {
            if let Some(url) = controller.export_csv() {
                println!("CSV: {url}");
                if let Err(err) = export::open_url(&url) {
                    warn!("{err}");
                }
            }
        }
        Input::Report => {
            let out_dir = ctx.output_dir(None);
            controller.export_report(ctx.session.identity(), &out_dir);
        }
        Input::ClearDrawing => controller.telestrator_mut().clear(),
        Input::Help => print_lines(&help_lines()),
        Input::Quit => return false,
        Input::Unknown(text) => println!("Unknown command {text:?}; type help"),
    }
    true
}
