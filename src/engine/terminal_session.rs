use std::io::{self, Stdout, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;

use crate::error::{AppError, AppResult};

/// Where the terminal page draws. Lets drawing code run against a test backend.
pub trait TerminalSurface {
    fn size(&self) -> io::Result<Size>;

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>);
}

type PageTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen and mouse capture for as long as the page is mounted.
pub struct TerminalSession {
    terminal: PageTerminal,
    mounted: bool,
}

impl TerminalSession {
    /// Takes over the terminal and titles the window after the page.
    pub fn enter(page_title: &str) -> AppResult<Self> {
        enable_raw_mode().map_err(|err| AppError::io_with_context(err, "enable raw mode"))?;

        let mut stdout = io::stdout();
        let screen = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            SetTitle(page_title)
        );
        if let Err(err) = screen {
            abandon(&mut stdout);
            return Err(AppError::io_with_context(err, "enter alternate screen"));
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .and_then(|mut terminal| terminal.clear().map(|()| terminal));
        match terminal {
            Ok(terminal) => Ok(Self {
                terminal,
                mounted: true,
            }),
            Err(err) => {
                abandon(&mut io::stdout());
                Err(AppError::io_with_context(err, "prepare page terminal"))
            }
        }
    }

    /// Hands the terminal back. Safe to call more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.mounted {
            return Ok(());
        }
        self.mounted = false;

        disable_raw_mode()?;
        leave_screen(self.terminal.backend_mut())?;
        self.terminal.show_cursor()
    }
}

impl TerminalSurface for TerminalSession {
    fn size(&self) -> io::Result<Size> {
        self.terminal.size()
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, DisableMouseCapture, LeaveAlternateScreen)
}

/// Best-effort unwind of a half-entered session.
fn abandon<W: Write>(out: &mut W) {
    let _ = leave_screen(out);
    let _ = disable_raw_mode();
}
