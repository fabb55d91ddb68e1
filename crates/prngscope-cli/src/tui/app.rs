//! Heat-map viewer state and event loop.
//!
//! The grids are computed before the terminal is touched. The loop only
//! redraws and waits for a quit key.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use prngscope_core::HeatmapGrid;

/// One titled grid.
pub struct Panel {
    pub title: &'static str,
    pub grid: HeatmapGrid,
}

pub struct App {
    panels: Vec<Panel>,
    running: bool,
}

impl App {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            panels,
            running: true,
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        if let KeyCode::Char('q') | KeyCode::Esc = key {
            self.running = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prngscope_core::BitStream;

    fn app() -> App {
        App::new(vec![Panel {
            title: "Binary Sequence LCG",
            grid: HeatmapGrid::render(&BitStream::from_bits([1, 0, 1])),
        }])
    }

    #[test]
    fn test_quit_keys() {
        for key in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            app.handle_key(key);
            assert!(!app.running);
        }
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Enter);
        assert!(app.running);
        assert_eq!(app.panels().len(), 1);
    }
}
