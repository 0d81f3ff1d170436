// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The runtime loop: ties together the input reader task, the resize
//! watcher task, a periodic tick, and a command-executor task around a
//! single serialized call into the application's `view`/`handle_event`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::Instrument;

use crate::command::Command;
use crate::error::{Result, TermError};
use crate::event::Event;
use crate::input::types::{MouseButton, MouseEvent, MouseKind};
use crate::registry::InteractiveRegistry;
use crate::runtime::app::Application;
use crate::runtime::options::RuntimeOptions;
use crate::style::ColorSupport;
use crate::terminal::{RuntimeCapabilities, TerminalDriver};

/// Run `app` until it issues [`Command::Quit`], the terminal driver hits a
/// fatal error, or the input stream closes. The terminal is fully restored
/// — cursor shown, alternate screen left, raw mode disabled — before this
/// returns, whichever way it ends.
pub async fn run<A: Application + 'static>(mut app: A, options: RuntimeOptions) -> Result<()> {
    let _span = tracing::info_span!("event-loop").entered();
    let caps = RuntimeCapabilities {
        color_support: ColorSupport::detect(),
        alt_screen: options.alt_screen,
        hide_cursor: options.hide_cursor,
        mouse_tracking: options.mouse_tracking,
        bracketed_paste: options.bracketed_paste,
    };
    let mut driver = TerminalDriver::open(caps)?;
    let registry = Arc::new(InteractiveRegistry::new());

    let (event_tx, mut event_rx) = unbounded_channel::<Event>();
    let (cmd_tx, cmd_rx) = unbounded_channel::<Command>();
    let (retick_tx, mut retick_rx) = unbounded_channel::<Duration>();

    crate::input::spawn_input_reader(event_tx.clone()).map_err(TermError::Io)?;
    crate::terminal::resize::spawn_resize_watcher(event_tx.clone()).map_err(TermError::Io)?;
    tokio::spawn(
        command_executor(cmd_rx, event_tx.clone(), retick_tx)
            .instrument(tracing::info_span!("command-executor")),
    );

    let mut ticker = tokio::time::interval(options.tick_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut tick_frame: u64 = 0;

    let mut pending_press: Option<(u64, MouseButton)> = None;

    if let Err(e) = render(&mut driver, &registry, &app) {
        driver.restore().ok();
        return Err(e);
    }

    'outer: loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cmd = app.handle_event(Event::Tick { frame: tick_frame, time: Instant::now() });
                tick_frame += 1;
                let _ = cmd_tx.send(cmd);
            }
            Some(interval) = retick_rx.recv() => {
                ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else { break 'outer };
                match event {
                    Event::Quit => break 'outer,
                    Event::Error(err) => {
                        app.handle_event(Event::Error(err));
                        break 'outer;
                    }
                    Event::Resize(size) => {
                        driver.resize(size);
                        let cmd = app.handle_event(Event::Resize(size));
                        let _ = cmd_tx.send(cmd);
                    }
                    Event::Mouse(mut mouse) => {
                        mouse.region = registry.hit_test(mouse.pos);
                        let synthesized = synthesize_click(&mut pending_press, &mouse);
                        let cmd = app.handle_event(Event::Mouse(mouse));
                        let _ = cmd_tx.send(cmd);
                        if let Some(click) = synthesized {
                            let cmd = app.handle_event(click);
                            let _ = cmd_tx.send(cmd);
                        }
                    }
                    other => {
                        let cmd = app.handle_event(other);
                        let _ = cmd_tx.send(cmd);
                    }
                }
            }
        }
        if let Err(e) = render(&mut driver, &registry, &app) {
            driver.restore().ok();
            return Err(e);
        }
    }

    driver.restore()
}

fn render<A: Application>(driver: &mut TerminalDriver, registry: &InteractiveRegistry, app: &A) -> Result<()> {
    registry.clear();
    let view = app.view();
    let mut frame = driver.begin_frame()?;
    view.render(&mut frame, registry);
    drop(frame);
    driver.end_frame()
}

/// Press-then-release on the same interactive region with no drag in
/// between synthesizes a [`Event::Mouse`] with [`MouseKind::Click`] carrying
/// that region's id, in addition to the press and release themselves being
/// delivered normally. Any drag or move clears the pending press, since a
/// click requires the pointer to stay put. `mouse.region` must already be
/// hit-tested by the caller against the current frame's registry.
fn synthesize_click(pending_press: &mut Option<(u64, MouseButton)>, mouse: &MouseEvent) -> Option<Event> {
    match mouse.kind {
        MouseKind::Press => {
            *pending_press = mouse.region.map(|id| (id, mouse.button));
            None
        }
        MouseKind::Release => {
            let (press_id, press_button) = pending_press.take()?;
            if press_button != mouse.button {
                return None;
            }
            let release_id = mouse.region?;
            (release_id == press_id).then(|| Event::synthetic_click(mouse.pos, mouse.button, Some(press_id)))
        }
        MouseKind::Drag | MouseKind::Move => {
            *pending_press = None;
            None
        }
        MouseKind::Click => None,
    }
}

/// Consumes [`Command`]s produced by `handle_event` calls, running each to
/// completion (recursing through [`Command::Batch`] and
/// [`Command::Sequence`]) and forwarding whatever [`Event`] it produces
/// back to the event loop. Runs as its own task so a slow command never
/// blocks the next tick or the next keystroke from being handled.
async fn command_executor(
    mut cmd_rx: UnboundedReceiver<Command>,
    event_tx: UnboundedSender<Event>,
    retick_tx: UnboundedSender<Duration>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        tokio::spawn(execute(cmd, event_tx.clone(), retick_tx.clone()));
    }
}

fn execute(
    cmd: Command,
    event_tx: UnboundedSender<Event>,
    retick_tx: UnboundedSender<Duration>,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        match cmd {
            Command::None => {}
            Command::Quit => {
                let _ = event_tx.send(Event::Quit);
            }
            Command::Run(thunk) => {
                let event = thunk.await;
                let _ = event_tx.send(event);
            }
            Command::After(delay, event) => {
                tokio::time::sleep(delay).await;
                let _ = event_tx.send(event);
            }
            Command::Tick(interval) => {
                let _ = retick_tx.send(interval);
            }
            Command::Batch(cmds) => {
                let mut set = tokio::task::JoinSet::new();
                for c in cmds {
                    set.spawn(execute(c, event_tx.clone(), retick_tx.clone()));
                }
                while set.join_next().await.is_some() {}
            }
            Command::Sequence(cmds) => {
                for c in cmds {
                    execute(c, event_tx.clone(), retick_tx.clone()).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Pos, Rect};
    use crate::input::types::KeyModifiers;

    fn mouse(kind: MouseKind, button: MouseButton, x: u16, y: u16, region: Option<u64>) -> MouseEvent {
        MouseEvent { kind, button, pos: Pos::new(x, y), modifiers: KeyModifiers::default(), region }
    }

    #[test]
    fn press_then_release_on_same_region_synthesizes_click() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::new(0, 0, 5, 5), 1);
        let mut pending = None;

        let press = mouse(MouseKind::Press, MouseButton::Left, 1, 1, registry.hit_test(Pos::new(1, 1)));
        assert!(synthesize_click(&mut pending, &press).is_none());

        let release = mouse(MouseKind::Release, MouseButton::Left, 2, 2, registry.hit_test(Pos::new(2, 2)));
        let click = synthesize_click(&mut pending, &release);
        assert!(matches!(click, Some(Event::Mouse(m)) if m.kind == MouseKind::Click && m.region == Some(1)));
    }

    #[test]
    fn drag_between_press_and_release_suppresses_click() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::new(0, 0, 5, 5), 1);
        let mut pending = None;

        synthesize_click(&mut pending, &mouse(MouseKind::Press, MouseButton::Left, 1, 1, registry.hit_test(Pos::new(1, 1))));
        synthesize_click(&mut pending, &mouse(MouseKind::Drag, MouseButton::Left, 3, 3, registry.hit_test(Pos::new(3, 3))));
        let click = synthesize_click(&mut pending, &mouse(MouseKind::Release, MouseButton::Left, 3, 3, registry.hit_test(Pos::new(3, 3))));
        assert!(click.is_none());
    }

    #[test]
    fn release_outside_press_region_suppresses_click() {
        let registry = InteractiveRegistry::new();
        registry.register(Rect::new(0, 0, 2, 2), 1);
        registry.register(Rect::new(10, 10, 2, 2), 2);
        let mut pending = None;

        synthesize_click(&mut pending, &mouse(MouseKind::Press, MouseButton::Left, 0, 0, registry.hit_test(Pos::new(0, 0))));
        let click = synthesize_click(&mut pending, &mouse(MouseKind::Release, MouseButton::Left, 10, 10, registry.hit_test(Pos::new(10, 10))));
        assert!(click.is_none());
    }
}
