// Copyright (c) 2026 rezky_nightky

mod art;
mod cell;
mod charset;
mod config;
mod error;
mod field;
mod frame;
mod logging;
mod palette;
mod phrase;
mod renderer;
mod runtime;
mod terminal;

use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::Event;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::flag;

use crate::art::Art;
use crate::charset::print_list_charsets;
use crate::config::Args;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::frame::Frame;
use crate::palette::print_list_themes;
use crate::phrase::{BuzzPhrases, FixedPhrases, PhraseSource};
use crate::renderer::Renderer;
use crate::runtime::{action_for_key, Action, ColorMode, RunState};
use crate::terminal::{
    check_size, clamp_size, restore_terminal_best_effort, stdout_is_terminal, Terminal,
};

/// Simulated time before a static frame is taken, so the rain has reached
/// the screen.
const STATIC_WARMUP: Duration = Duration::from_secs(3);

const HELP_TEMPLATE: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let mut cmd = Args::command()
        .styles(clap_styles())
        .help_template(HELP_TEMPLATE);
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Termination signals raise `quit`; the tick loop sees it and winds down
/// through the normal drop path. A second signal exits at once.
fn install_signal_handlers(quit: &Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        for sig in [SIGINT, SIGTERM, SIGHUP] {
            let registered =
                flag::register_conditional_shutdown(sig, 128 + sig, Arc::clone(quit))
                    .and_then(|_| flag::register(sig, Arc::clone(quit)));
            if let Err(e) = registered {
                eprintln!("failed to install handler for signal {}: {}", sig, e);
            }
        }
    }

    #[cfg(windows)]
    {
        let quit = Arc::clone(quit);
        if let Err(e) = ctrlc::set_handler(move || {
            if quit.swap(true, Ordering::SeqCst) {
                restore_terminal_best_effort();
                std::process::exit(130);
            }
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn phrase_source(args: &Args, rng: StdRng) -> Box<dyn PhraseSource> {
    match FixedPhrases::new(args.phrase.clone()) {
        Some(fixed) => Box::new(fixed),
        None => Box::new(BuzzPhrases::new(rng)),
    }
}

/// Renders one frame without touching terminal modes and prints it as plain
/// text. Used for `--once` and when stdout is not a terminal.
fn print_static_frame(
    args: &Args,
    field_rng: StdRng,
    phrases: &mut dyn PhraseSource,
) -> Result<()> {
    let (width, height) = args.frame_size();
    let opts = args.field_options(ColorMode::Mono);

    let mut field = Field::new(width, height, &opts, field_rng);
    let step = field.throttle();
    while field.clock() < STATIC_WARMUP {
        field.update(step);
    }

    let mut renderer = Renderer::new(Art::robot(), ColorMode::Mono, args.caption_interval());
    let writes = renderer.render(&field, field.clock(), phrases);
    let mut frame = Frame::new(field.width, field.height);
    frame.apply(&writes, true);

    let mut out = stdout().lock();
    for line in frame.to_plain_lines() {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

fn run_animation(
    args: &Args,
    mut term: Terminal,
    field_rng: StdRng,
    phrases: &mut dyn PhraseSource,
    quit: &AtomicBool,
) -> Result<()> {
    let color_mode = args.color_mode();
    let mono = color_mode == ColorMode::Mono;
    let tick = args.tick_period();
    let (tw, th) = term.size()?;
    logging::log_startup(tw, th);
    let (w, h) = clamp_size(tw, th);

    let opts = args.field_options(color_mode);
    let mut field = Field::new(w, h, &opts, field_rng);
    let mut renderer = Renderer::new(Art::robot(), color_mode, args.caption_interval());
    let mut frame = Frame::new(w, h);

    let start_time = Instant::now();
    let end_time = args.run_duration().map(|d| start_time + d);
    let mut next_frame = Instant::now();
    let mut paused = false;
    let mut frames: u64 = 0;

    let mut state = RunState::Idle.start();
    while state.is_running() {
        if quit.load(Ordering::Relaxed) {
            tracing::info!("termination signal received");
            state = state.quit();
            continue;
        }
        if end_time.is_some_and(|end| Instant::now() >= end) {
            state = state.quit();
            continue;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::ZERO)? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) => match action_for_key(&k) {
                        Some(Action::Quit) => state = state.quit(),
                        Some(Action::Pause) => {
                            paused = !paused;
                            tracing::debug!(paused, "pause toggled");
                        }
                        Some(Action::Reseed) => field.reseed(),
                        Some(Action::NextCaption) => renderer.refresh_caption(),
                        None => {}
                    },
                    _ => {}
                }
            }

            if !state.is_running() || pending_resize.is_some() || quit.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !state.is_running() || quit.load(Ordering::Relaxed) {
            continue;
        }

        if let Some((nw, nh)) = pending_resize {
            if let Err(e) = check_size(nw, nh) {
                tracing::warn!(error = %e, "terminal shrank below the minimum");
            }
            tracing::debug!(width = nw, height = nh, "resized");
            let (nw, nh) = clamp_size(nw, nh);
            field.resize(nw, nh);
            frame = Frame::new(nw, nh);
        }

        let work_start = Instant::now();
        if !paused {
            field.update(tick);
        }
        frame.begin();
        let writes = renderer.render(&field, field.clock(), phrases);
        frame.apply(&writes, mono);
        if frame.is_dirty_all() || !frame.dirty_indices().is_empty() {
            term.draw(&mut frame)?;
        }
        logging::log_tick_work(work_start.elapsed(), tick);
        frames = frames.saturating_add(1);

        next_frame += tick;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    let stats = field.stats();
    tracing::info!(
        frames,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        columns = stats.total_columns,
        active_columns = stats.active_columns,
        drops = stats.total_drops,
        caption = renderer.caption().unwrap_or_default(),
        "shutting down"
    );
    Ok(())
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));
    let quit = Arc::new(AtomicBool::new(false));
    install_signal_handlers(&quit);

    let args = parse_args();

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if args.list_themes {
        print_list_themes();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let _log_guard = match &args.log_file {
        Some(path) => Some(logging::init_file_logging(path)?),
        None => None,
    };

    let mut master = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let field_rng = StdRng::from_rng(&mut master);
    let mut phrases = phrase_source(&args, StdRng::from_rng(&mut master));

    if args.once || !stdout_is_terminal() {
        return print_static_frame(&args, field_rng, phrases.as_mut());
    }

    match Terminal::new() {
        Ok(term) => run_animation(&args, term, field_rng, phrases.as_mut(), &quit),
        Err(Error::NotATerminal) => print_static_frame(&args, field_rng, phrases.as_mut()),
        Err(e) => {
            tracing::error!(error = %e, "cannot start");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn hangup_raises_the_quit_flag_instead_of_exiting() {
        let quit = Arc::new(AtomicBool::new(false));
        install_signal_handlers(&quit);
        signal_hook::low_level::raise(SIGHUP).unwrap();
        assert!(quit.load(Ordering::SeqCst));
    }
}
