//! Tokio driver.
//!
//! Each machine runs in its own task and sleeps until its next deadline.
//! Host inputs reach the cursor engine over an mpsc channel. Tasks stop
//! when the page's `CancellationToken` fires and hand the machine back.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::clock::{Clock, TokioClock};
use crate::cursor::{Attachment, CursorEngine, EffectSurface, HoverTarget, Point};
use crate::typewriter::{TextSink, Typewriter};

use super::Timed;
use super::simulation::InputAction;

/// Host input forwarded to a running cursor engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorInput {
    /// Pointer moved.
    Move(Point),
    /// Primary button clicked.
    Click(Point),
    /// Pointer entered (`entering = true`) or left an element.
    Hover {
        /// Element under the pointer.
        target: HoverTarget,
        /// Enter or leave.
        entering: bool,
    },
}

/// Scroll actions are not cursor input and come back as the error.
impl TryFrom<InputAction> for CursorInput {
    type Error = InputAction;

    fn try_from(action: InputAction) -> Result<Self, Self::Error> {
        match action {
            InputAction::Move { x, y } => Ok(Self::Move(Point::new(x, y))),
            InputAction::Click { x, y } => Ok(Self::Click(Point::new(x, y))),
            InputAction::HoverEnter(target) => Ok(Self::Hover {
                target,
                entering: true,
            }),
            InputAction::HoverLeave(target) => Ok(Self::Hover {
                target,
                entering: false,
            }),
            scroll @ InputAction::Scroll { .. } => Err(scroll),
        }
    }
}

/// Runs the typewriter until `cancel` fires.
///
/// The task returns the typewriter so callers can inspect its final state.
pub fn spawn_typewriter<S>(
    mut typewriter: Typewriter<S>,
    clock: TokioClock,
    cancel: CancellationToken,
) -> JoinHandle<Typewriter<S>>
where
    S: TextSink + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(deadline) = typewriter.next_deadline() {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("typewriter cancelled");
                    break;
                }
                () = tokio::time::sleep_until(clock.instant_at(deadline)) => {
                    typewriter.advance(clock.now());
                }
            }
        }
        typewriter
    })
}

/// Runs an attached cursor engine until `cancel` fires.
///
/// Returns `None` without spawning when the engine declined to attach.
/// The task also ends once the input channel is closed and no effect or
/// idle deadline is pending, since nothing could change after that.
pub fn spawn_cursor<S, R>(
    attachment: Attachment<S, R>,
    mut inputs: mpsc::Receiver<CursorInput>,
    clock: TokioClock,
    cancel: CancellationToken,
) -> Option<JoinHandle<CursorEngine<S, R>>>
where
    S: EffectSurface + Send + 'static,
    R: Rng + Send + 'static,
{
    let mut engine = attachment.into_engine()?;
    info!("cursor driver started");

    Some(tokio::spawn(async move {
        let mut inputs_open = true;
        loop {
            let deadline = engine.next_deadline();
            if !inputs_open && deadline.is_none() {
                debug!("cursor inputs closed and nothing pending");
                break;
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("cursor driver cancelled");
                    break;
                }
                input = inputs.recv(), if inputs_open => match input {
                    Some(input) => apply(&mut engine, input, clock.now()),
                    None => inputs_open = false,
                },
                () = sleep_until(clock, deadline) => {
                    engine.advance(clock.now());
                }
            }
        }
        engine
    }))
}

fn apply<S: EffectSurface, R: Rng>(
    engine: &mut CursorEngine<S, R>,
    input: CursorInput,
    now: Duration,
) {
    match input {
        CursorInput::Move(position) => engine.on_pointer_move(position, now),
        CursorInput::Click(position) => engine.on_click(position, now),
        CursorInput::Hover { target, entering } => engine.on_hover(&target, entering, now),
    }
}

async fn sleep_until(clock: TokioClock, deadline: Option<Duration>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(clock.instant_at(at)).await,
        None => std::future::pending().await,
    }
}
