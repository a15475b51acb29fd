use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use kidsafe_core::{update, AppState, Msg};
use kidsafe_logging::{kidsafe_debug, kidsafe_info, kidsafe_trace, set_dispatch_seq};

use super::effects::{EffectRunner, ResultsViewport};
use super::logging;
use super::ui::constants::HELP;
use super::ui::input::{blocked, parse_command, Command};
use super::ui::render::TerminalRenderer;
use crate::config::Args;

/// Everything the single-threaded loop reacts to.
#[derive(Debug, PartialEq, Eq)]
pub enum LoopEvent {
    Msg(Msg),
    Line(String),
    Reveal,
    InputClosed,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(args.log_destination, args.log_level.filter());
    kidsafe_info!("kidsafe_app starting");

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(args.engine_config(), loop_tx.clone())
        .context("failed to start the analysis engine")?;
    spawn_input_reader(loop_tx);

    let mut app = App {
        state: AppState::new(),
        dispatch_seq: 0,
        runner,
        renderer: TerminalRenderer::new(io::stdout().lock()),
    };
    app.renderer.banner()?;
    app.dispatch(Msg::Started)?;
    app.renderer.prompt()?;

    while let Ok(event) = loop_rx.recv() {
        if !app.handle_event(event)? {
            break;
        }
    }

    kidsafe_info!("kidsafe_app exiting");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if loop_tx.send(LoopEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

struct App<W: Write> {
    state: AppState,
    dispatch_seq: u64,
    runner: EffectRunner,
    renderer: TerminalRenderer<W>,
}

impl<W: Write> App<W> {
    /// Returns false once the loop should stop. Output arriving between
    /// keystrokes is followed by a fresh prompt.
    fn handle_event(&mut self, event: LoopEvent) -> io::Result<bool> {
        let printed = match event {
            LoopEvent::Msg(msg) => self.dispatch(msg)?,
            LoopEvent::Reveal => self.reveal()?,
            LoopEvent::Line(line) => {
                if !self.handle_line(&line)? {
                    return Ok(false);
                }
                true
            }
            LoopEvent::InputClosed => return Ok(false),
        };
        if printed {
            self.renderer.prompt()?;
        }
        Ok(true)
    }

    /// Returns whether the render printed anything.
    fn dispatch(&mut self, msg: Msg) -> io::Result<bool> {
        self.dispatch_seq += 1;
        set_dispatch_seq(self.dispatch_seq);
        kidsafe_trace!("Dispatch {}", msg_label(&msg));

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if !effects.is_empty() {
            kidsafe_debug!("Running {} effect(s)", effects.len());
        }
        self.runner.run(effects);

        if !was_dirty {
            return Ok(false);
        }
        self.renderer.render(&self.state.view())
    }

    fn reveal(&mut self) -> io::Result<bool> {
        let view = self.state.view();
        let viewport: &mut dyn ResultsViewport = &mut self.renderer;
        self.runner.reveal(viewport, &view)
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let view = self.state.view();
        match parse_command(line, &view.catalog) {
            Command::Dispatch(msgs) => {
                for msg in msgs {
                    if let Some(reason) = blocked(&self.state.view(), &msg) {
                        self.renderer.line(reason)?;
                        break;
                    }
                    self.dispatch(msg)?;
                }
            }
            Command::List => {
                let catalog = self.state.catalog();
                self.renderer
                    .catalog(&view, |brand| catalog.lookup(brand).is_some())?;
            }
            Command::Help => self.renderer.line(HELP)?,
            Command::Unknown(reason) => self.renderer.line(&format!("{reason}; try `help`"))?,
            Command::Empty => {}
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn msg_label(msg: &Msg) -> &'static str {
    match msg {
        Msg::Started => "Started",
        Msg::CatalogLoaded(_) => "CatalogLoaded",
        Msg::PrecomputedLoaded(_) => "PrecomputedLoaded",
        Msg::BackendStatusChanged(_) => "BackendStatusChanged",
        Msg::CatalogSelected(_) => "CatalogSelected",
        Msg::SearchInputChanged(_) => "SearchInputChanged",
        Msg::SearchSubmitted => "SearchSubmitted",
        Msg::SearchCompleted { .. } => "SearchCompleted",
        Msg::ManualIngredientsChanged(_) => "ManualIngredientsChanged",
        Msg::ManualAnalyzeSubmitted => "ManualAnalyzeSubmitted",
        Msg::AnalyzeCompleted { .. } => "AnalyzeCompleted",
        Msg::ChatInputChanged(_) => "ChatInputChanged",
        Msg::ChatSubmitted => "ChatSubmitted",
        Msg::ChatCompleted { .. } => "ChatCompleted",
        Msg::NotificationExpired(_) => "NotificationExpired",
    }
}
