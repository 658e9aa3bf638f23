#![forbid(unsafe_code)]

//! Elm-style update/view runtime.
//!
//! The [`Program`] owns the loop: poll input, convert it to the model's
//! message type, run `update`, execute the returned [`Cmd`], and redraw
//! through the diff presenter. Side effects live in commands; `update`
//! itself never blocks. Background work runs on task threads that feed
//! their result message back through a channel.

use std::io;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::buffer::Buffer;
use crate::event::Event;
use crate::terminal::{Presenter, TerminalSession};

/// Application state plus its transition and render functions.
pub trait Model: Sized {
    /// Message type; every input event must convert into one.
    type Message: From<Event> + Send + 'static;

    /// Startup command, executed once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// State transition for one message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state into the frame buffer.
    fn view(&self, buffer: &mut Buffer);
}

/// A side effect requested by `init` or `update`.
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program.
    Quit,
    /// Feed a message back into `update`.
    Msg(M),
    /// Execute several commands.
    Batch(Vec<Cmd<M>>),
    /// Deliver [`Event::Tick`] after the duration.
    Tick(Duration),
    /// Run a closure on a background thread; its return value is
    /// delivered as a message.
    Task(Box<dyn FnOnce() -> M + Send + 'static>),
}

impl<M> Cmd<M> {
    /// No-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Batch command; empty and single-element batches collapse.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Tick command.
    #[inline]
    pub fn tick(duration: Duration) -> Self {
        Self::Tick(duration)
    }

    /// Background task command.
    pub fn task(f: impl FnOnce() -> M + Send + 'static) -> Self {
        Self::Task(Box::new(f))
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

impl<M> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("Cmd::None"),
            Self::Quit => f.write_str("Cmd::Quit"),
            Self::Msg(_) => f.write_str("Cmd::Msg(..)"),
            Self::Batch(cmds) => write!(f, "Cmd::Batch(len={})", cmds.len()),
            Self::Tick(d) => write!(f, "Cmd::Tick({d:?})"),
            Self::Task(_) => f.write_str("Cmd::Task(..)"),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Input poll timeout; bounds latency of task-result delivery.
    pub poll_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(50),
        }
    }
}

/// The update/view loop driver.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    running: bool,
    tick_deadline: Option<Instant>,
    dirty: bool,
}

impl<M: Model> Program<M> {
    /// Create a program with default configuration.
    pub fn new(model: M) -> Self {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program with explicit configuration.
    pub fn with_config(model: M, config: ProgramConfig) -> Self {
        Self {
            model,
            config,
            running: true,
            tick_deadline: None,
            dirty: true,
        }
    }

    /// Run until the model returns [`Cmd::Quit`].
    ///
    /// Takes over the terminal for the duration; the session restores it
    /// on exit or panic.
    pub fn run(mut self) -> io::Result<()> {
        let session = TerminalSession::new()?;
        let mut presenter = Presenter::stdout();
        let (tx, rx) = mpsc::channel::<M::Message>();

        let (mut width, mut height) = session.size()?;
        let mut prev = Buffer::new(width, height);
        let mut first_frame = true;

        let init = self.model.init();
        self.execute(init, &tx);
        // Seed the model with the real terminal size.
        self.dispatch(M::Message::from(Event::Resize { width, height }), &tx);

        while self.running {
            // Background task results.
            while let Ok(msg) = rx.try_recv() {
                self.dispatch(msg, &tx);
            }

            // Scheduled tick.
            if let Some(deadline) = self.tick_deadline
                && Instant::now() >= deadline
            {
                self.tick_deadline = None;
                self.dispatch(M::Message::from(Event::Tick), &tx);
            }

            // Terminal input.
            let timeout = self.input_timeout();
            if session.poll_event(timeout)? {
                if let Some(event) = session.read_event()? {
                    if let Event::Resize {
                        width: w,
                        height: h,
                    } = event
                    {
                        width = w;
                        height = h;
                        prev = Buffer::new(width, height);
                        first_frame = true;
                    }
                    self.dispatch(M::Message::from(event), &tx);
                }
            }

            if self.dirty && self.running {
                let mut next = Buffer::new(width, height);
                self.model.view(&mut next);
                let runs = if first_frame {
                    next.full_repaint_runs()
                } else {
                    next.diff(&prev)
                };
                presenter.present(&next, &runs)?;
                prev = next;
                first_frame = false;
                self.dirty = false;
            }
        }

        Ok(())
    }

    fn input_timeout(&self) -> Duration {
        match self.tick_deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(self.config.poll_timeout),
            None => self.config.poll_timeout,
        }
    }

    fn dispatch(&mut self, msg: M::Message, tx: &Sender<M::Message>) {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.execute(cmd, tx);
    }

    fn execute(&mut self, cmd: Cmd<M::Message>, tx: &Sender<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => self.dispatch(m, tx),
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute(c, tx);
                }
            }
            Cmd::Tick(duration) => {
                self.tick_deadline = Some(Instant::now() + duration);
            }
            Cmd::Task(f) => {
                let tx = tx.clone();
                thread::spawn(move || {
                    // Receiver gone means the program already exited.
                    let _ = tx.send(f());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_collapses_to_none() {
        let cmd: Cmd<u8> = Cmd::batch(vec![]);
        assert!(matches!(cmd, Cmd::None));
    }

    #[test]
    fn single_element_batch_unwraps() {
        let cmd: Cmd<u8> = Cmd::batch(vec![Cmd::None, Cmd::quit()]);
        assert!(matches!(cmd, Cmd::Quit));
    }

    #[test]
    fn batch_keeps_multiple_commands() {
        let cmd: Cmd<u8> = Cmd::batch(vec![Cmd::quit(), Cmd::msg(1)]);
        assert!(matches!(cmd, Cmd::Batch(ref v) if v.len() == 2));
    }

    #[test]
    fn debug_never_requires_message_debug() {
        struct Opaque;
        let cmd: Cmd<Opaque> = Cmd::task(|| Opaque);
        assert_eq!(format!("{cmd:?}"), "Cmd::Task(..)");
    }
}
