use crate::output::{card_line, print_json_line, print_snapshot, progress_bar};
use anyhow::Context;
use recipe_core::{
    config::Config,
    countdown::CountdownTime,
    multiplier::{display_title, parse_multiplier},
    recipe::Recipe,
    sim::{Simulator, TimedEvent},
    walkthrough::{SourceId, TimerState, WalkthroughController, WalkthroughEvent},
};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

#[derive(clap::Args)]
pub struct PlayArgs {
    slug: String,

    /// Scale ingredient quantities, e.g. 2 or 0.5
    #[arg(long, short = 'm')]
    multiplier: Option<String>,

    /// Override the configured auto-advance setting
    #[arg(long, value_name = "BOOL", value_parser = clap::builder::BoolishValueParser::new())]
    auto_advance: Option<bool>,

    /// Override the configured auto-advance delay, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<u32>,

    /// Run on a virtual clock: `wait N` returns immediately
    #[arg(long)]
    simulate: bool,
}

// ---------------------------------------------------------------------------
// Commands read from stdin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    Next,
    Prev,
    Toggle,
    Wait(u64),
    Status,
    Quit,
}

const COMMAND_HELP: &str = "n(ext), p(rev), t(oggle), w(ait) N, s(tatus), q(uit)";

/// `Ok(None)` for a blank line.
fn parse_command(line: &str) -> Result<Option<PlayCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let command = match word {
        "n" | "next" => PlayCommand::Next,
        "p" | "prev" | "previous" => PlayCommand::Prev,
        "t" | "toggle" => PlayCommand::Toggle,
        "s" | "status" => PlayCommand::Status,
        "q" | "quit" => PlayCommand::Quit,
        "w" | "wait" => {
            let secs: u64 = words
                .next()
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| format!("'{}' needs a number of seconds", word))?;
            let limit = CountdownTime::MAX_SECONDS;
            u32::try_from(secs)
                .ok()
                .and_then(CountdownTime::from_seconds)
                .ok_or_else(|| format!("wait is limited to {limit} seconds at a time"))?;
            PlayCommand::Wait(secs)
        }
        other => return Err(format!("unknown command '{other}'; expected {COMMAND_HELP}")),
    };
    Ok(Some(command))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, args: PlayArgs, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::load(root, &args.slug)
        .with_context(|| format!("recipe '{}' not found", args.slug))?;
    recipe.ensure_playable()?;
    if let Some(m) = &args.multiplier {
        parse_multiplier(m)?;
    }

    let mut config = Config::load_or_default(root)
        .context("failed to load config")?
        .walkthrough;
    if let Some(auto_advance) = args.auto_advance {
        config.auto_advance = auto_advance;
    }
    if let Some(delay) = args.delay {
        config.auto_advance_delay_seconds = delay;
    }

    info!(
        slug = %recipe.slug,
        steps = recipe.total_steps(),
        auto_advance = config.auto_advance,
        delay = config.auto_advance_delay_seconds,
        simulate = args.simulate,
        "starting walkthrough"
    );

    let multiplier = args.multiplier.as_deref();
    let printer = EventPrinter { json };
    if !json {
        println!("{}", display_title(&recipe.title, multiplier));
    }
    let controller = WalkthroughController::new(&recipe, multiplier, config);

    if args.simulate {
        let stdin = std::io::stdin();
        run_simulated(controller, &printer, stdin.lock())
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start runtime")?;
        runtime.block_on(run_realtime(controller, &printer))
    }
}

// ---------------------------------------------------------------------------
// Event output
// ---------------------------------------------------------------------------

struct EventPrinter {
    json: bool,
}

impl EventPrinter {
    fn event(&self, controller: &WalkthroughController, timed: &TimedEvent) -> anyhow::Result<()> {
        if self.json {
            return print_json_line(timed);
        }
        if let Some(line) = human_line(controller, &timed.event) {
            println!("[{:>4}s] {line}", timed.at);
        }
        Ok(())
    }

    fn status(&self, controller: &WalkthroughController) -> anyhow::Result<()> {
        let snapshot = controller.snapshot();
        if self.json {
            print_json_line(&serde_json::json!({ "event": "status", "status": snapshot }))
        } else {
            print_snapshot(&snapshot);
            Ok(())
        }
    }
}

/// Human rendering of an event; `None` for host plumbing and affordance
/// changes, which `status` shows instead.
fn human_line(controller: &WalkthroughController, event: &WalkthroughEvent) -> Option<String> {
    match event {
        WalkthroughEvent::StepChanged { position, .. } => Some(format!(
            "Step {}/{}  {}",
            position + 1,
            controller.total_steps(),
            card_line(&controller.cards()[*position])
        )),
        WalkthroughEvent::ProgressChanged {
            category,
            completed,
            total,
        } => Some(format!(
            "  {:<12} {}",
            category.label(),
            progress_bar(&recipe_core::walkthrough::Progress {
                completed: *completed,
                total: *total,
            })
        )),
        WalkthroughEvent::TimerChanged { timer } => match timer {
            TimerState::Idle => None,
            TimerState::Running(r) => Some(format!("  timer {r}")),
            TimerState::Paused(r) => Some(format!("  timer {r} (paused)")),
            TimerState::Expired => Some("  timer 00:00:00  time's up!".to_string()),
        },
        WalkthroughEvent::FinalCountdown { remaining } => {
            Some(format!("  ... {}", remaining.seconds()))
        }
        WalkthroughEvent::PauseIndicator { paused } => {
            Some(if *paused { "  || paused" } else { "  > playing" }.to_string())
        }
        WalkthroughEvent::AutoAdvanceScheduled { delay_seconds, .. } => {
            Some(format!("  next step in {delay_seconds}s"))
        }
        WalkthroughEvent::PreviousAffordance { .. }
        | WalkthroughEvent::NextAffordance { .. }
        | WalkthroughEvent::TickSourceStarted { .. }
        | WalkthroughEvent::TickSourceCancelled { .. }
        | WalkthroughEvent::AutoAdvanceCancelled { .. } => None,
    }
}

// ---------------------------------------------------------------------------
// Simulated host
// ---------------------------------------------------------------------------

fn run_simulated(
    controller: WalkthroughController,
    printer: &EventPrinter,
    input: impl BufRead,
) -> anyhow::Result<()> {
    let mut sim = Simulator::new(controller);
    flush_log(&mut sim, printer)?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        match command {
            PlayCommand::Next => {
                sim.advance();
            }
            PlayCommand::Prev => {
                sim.retreat();
            }
            PlayCommand::Toggle => {
                if !sim.toggle_pause() {
                    eprintln!("no timer on this step");
                }
            }
            PlayCommand::Wait(secs) => sim.wait(secs),
            PlayCommand::Status => printer.status(sim.controller())?,
            PlayCommand::Quit => break,
        }
        flush_log(&mut sim, printer)?;
    }

    sim.teardown();
    flush_log(&mut sim, printer)?;
    info!(elapsed = sim.now(), "walkthrough finished");
    Ok(())
}

fn flush_log(sim: &mut Simulator, printer: &EventPrinter) -> anyhow::Result<()> {
    for timed in sim.take_log() {
        printer.event(sim.controller(), &timed)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Real-time host
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum HostMsg {
    Tick(SourceId),
    AutoAdvance(SourceId),
}

/// Owns the tokio tasks backing the controller's timer sources. Every task
/// is aborted when its source is cancelled and when the host is dropped.
struct TimerHost {
    tx: mpsc::UnboundedSender<HostMsg>,
    ticks: HashMap<SourceId, JoinHandle<()>>,
    auto_advance: HashMap<SourceId, JoinHandle<()>>,
}

impl TimerHost {
    fn new(tx: mpsc::UnboundedSender<HostMsg>) -> Self {
        Self {
            tx,
            ticks: HashMap::new(),
            auto_advance: HashMap::new(),
        }
    }

    fn apply(&mut self, event: &WalkthroughEvent) {
        match *event {
            WalkthroughEvent::TickSourceStarted { source } => {
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    let period = Duration::from_secs(1);
                    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        if tx.send(HostMsg::Tick(source)).is_err() {
                            break;
                        }
                    }
                });
                self.ticks.insert(source, handle);
            }
            WalkthroughEvent::TickSourceCancelled { source } => {
                if let Some(handle) = self.ticks.remove(&source) {
                    handle.abort();
                }
            }
            WalkthroughEvent::AutoAdvanceScheduled {
                source,
                delay_seconds,
            } => {
                let tx = self.tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(u64::from(delay_seconds))).await;
                    let _ = tx.send(HostMsg::AutoAdvance(source));
                });
                self.auto_advance.insert(source, handle);
            }
            WalkthroughEvent::AutoAdvanceCancelled { source } => {
                if let Some(handle) = self.auto_advance.remove(&source) {
                    handle.abort();
                }
            }
            _ => {}
        }
    }
}

impl Drop for TimerHost {
    fn drop(&mut self) {
        for (_, handle) in self.ticks.drain().chain(self.auto_advance.drain()) {
            handle.abort();
        }
    }
}

struct RealtimeSession<'a> {
    controller: WalkthroughController,
    host: TimerHost,
    printer: &'a EventPrinter,
    started: Instant,
}

impl RealtimeSession<'_> {
    /// Hand queued events to the timer host and the printer.
    fn dispatch(&mut self) -> anyhow::Result<()> {
        let at = self.started.elapsed().as_secs();
        for event in self.controller.drain_events() {
            self.host.apply(&event);
            self.printer
                .event(&self.controller, &TimedEvent { at, event })?;
        }
        Ok(())
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_realtime(controller: WalkthroughController, printer: &EventPrinter) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = RealtimeSession {
        controller,
        host: TimerHost::new(tx),
        printer,
        started: Instant::now(),
    };
    session.dispatch()?;

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    // While set, stdin is not read so timers can run.
    let mut waiting: Option<Instant> = None;

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                match msg {
                    HostMsg::Tick(source) => {
                        session.controller.on_tick(source);
                    }
                    HostMsg::AutoAdvance(source) => {
                        session.controller.fire_auto_advance(source);
                    }
                }
                session.dispatch()?;
            }
            () = wait_until(waiting), if waiting.is_some() => {
                waiting = None;
            }
            line = lines.next_line(), if waiting.is_none() => {
                let Some(line) = line.context("failed to read command")? else {
                    break;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(msg) => {
                        eprintln!("{msg}");
                        continue;
                    }
                };
                match command {
                    PlayCommand::Next => {
                        session.controller.advance();
                    }
                    PlayCommand::Prev => {
                        session.controller.retreat();
                    }
                    PlayCommand::Toggle => {
                        if !session.controller.toggle_timer_pause() {
                            eprintln!("no timer on this step");
                        }
                    }
                    PlayCommand::Wait(secs) => {
                        match Instant::now().checked_add(Duration::from_secs(secs)) {
                            Some(deadline) => waiting = Some(deadline),
                            None => eprintln!("wait of {secs}s is too long"),
                        }
                    }
                    PlayCommand::Status => session.printer.status(&session.controller)?,
                    PlayCommand::Quit => break,
                }
                session.dispatch()?;
            }
        }
    }

    session.controller.teardown();
    session.dispatch()?;
    info!(
        elapsed = session.started.elapsed().as_secs(),
        "walkthrough finished"
    );
    Ok(())
}
