#![forbid(unsafe_code)]

//! Raw-mode terminal session and diff presenter.
//!
//! [`TerminalSession`] owns the terminal state transitions: raw mode,
//! alternate screen, mouse capture, cursor visibility. Everything it
//! enables is disabled again on drop (a panic hook covers unwinds), so
//! a crash never strands the shell in raw mode.
//!
//! [`Presenter`] turns changed-cell runs into ANSI output. It tracks the
//! current style and only emits color/attribute sequences on change,
//! wrapping each frame in a synchronized-update block to avoid tearing.

use std::io::{self, BufWriter, Stdout, Write};
use std::sync::Once;
use std::time::Duration;

use crossterm::{cursor, event as ct_event, execute, queue, style, terminal};

use bioscatter_core::palette::Rgb;

use crate::buffer::{Buffer, ChangeRun};
use crate::event::Event;

/// Internal write buffer size.
const WRITE_CAPACITY: usize = 32 * 1024;

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

/// Best-effort restoration used by both `Drop` and the panic hook.
fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        ct_event::DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

/// Raw-mode terminal session with cleanup on drop.
#[derive(Debug)]
pub struct TerminalSession {
    // Marker: restoration happens in Drop.
    _private: (),
}

impl TerminalSession {
    /// Enter raw mode, the alternate screen, and mouse capture.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide,
            ct_event::EnableMouseCapture
        )?;
        tracing::info!("terminal session started");
        Ok(Self { _private: () })
    }

    /// Current terminal size in cells.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Whether an input event is ready within `timeout`.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        ct_event::poll(timeout)
    }

    /// Read one input event, converted to the canonical type.
    ///
    /// Returns `None` for event kinds the viewer ignores.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        Ok(Event::from_crossterm(ct_event::read()?))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        tracing::info!("terminal session restored");
    }
}

/// Tracked style state; `None` means unknown (forces emission).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StyleState {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
}

/// State-tracked ANSI emitter for changed-cell runs.
pub struct Presenter<W: Write = Stdout> {
    writer: BufWriter<W>,
    current: Option<StyleState>,
}

impl Presenter<Stdout> {
    /// Presenter writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Presenter<W> {
    /// Presenter writing to an arbitrary sink (tests use `Vec<u8>`).
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITE_CAPACITY, writer),
            current: None,
        }
    }

    /// Emit the given runs from `buffer` and flush.
    ///
    /// An empty run list writes nothing at all.
    pub fn present(&mut self, buffer: &Buffer, runs: &[ChangeRun]) -> io::Result<()> {
        if runs.is_empty() {
            return Ok(());
        }

        queue!(self.writer, terminal::BeginSynchronizedUpdate)?;
        for run in runs {
            queue!(self.writer, cursor::MoveTo(run.x, run.y))?;
            for x in run.x..run.x + run.len {
                let Some(cell) = buffer.get(x, run.y) else {
                    break;
                };
                self.apply_style(StyleState {
                    fg: cell.fg,
                    bg: cell.bg,
                    bold: cell.bold,
                })?;
                queue!(self.writer, style::Print(cell.symbol))?;
            }
        }
        // Leave a clean state for whatever writes next.
        queue!(
            self.writer,
            style::SetAttribute(style::Attribute::Reset),
            terminal::EndSynchronizedUpdate
        )?;
        self.current = None;
        self.writer.flush()
    }

    fn apply_style(&mut self, next: StyleState) -> io::Result<()> {
        if self.current == Some(next) {
            return Ok(());
        }
        // Bold has no clean single-attribute off switch across terminals,
        // so any style change starts from a reset.
        queue!(self.writer, style::SetAttribute(style::Attribute::Reset))?;
        if next.bold {
            queue!(self.writer, style::SetAttribute(style::Attribute::Bold))?;
        }
        if let Some(fg) = next.fg {
            queue!(
                self.writer,
                style::SetForegroundColor(style::Color::Rgb {
                    r: fg.r,
                    g: fg.g,
                    b: fg.b
                })
            )?;
        }
        if let Some(bg) = next.bg {
            queue!(
                self.writer,
                style::SetBackgroundColor(style::Color::Rgb {
                    r: bg.r,
                    g: bg.g,
                    b: bg.b
                })
            )?;
        }
        self.current = Some(next);
        Ok(())
    }
}
