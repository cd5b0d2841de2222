use std::io;
use std::io::Stdout;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;

use crate::camera::Camera;
use crate::events::Event;
use crate::game::Frontend;
use crate::grid::Grid;

/// Draws the grid as braille in the terminal.
///
/// Raw mode and the alternate screen are held for as long as this value lives.
pub struct Terminal {
    stdout: Stdout,
    camera: Camera,
    cell_size: usize,
}

impl Terminal {
    pub fn new(cell_size: usize) -> io::Result<Self> {
        let camera = Camera::for_grid(cell_size);

        terminal::enable_raw_mode()?;

        // From here on, dropping `term` restores the terminal
        let mut term = Self {
            stdout: io::stdout(),
            camera,
            cell_size,
        };
        execute!(term.stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(term)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Frontend for Terminal {
    fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        self.camera.reset();
        self.camera.draw_grid(grid, self.cell_size);

        let frame = self.camera.render();

        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        for line in frame.lines() {
            queue!(self.stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        queue!(
            self.stdout,
            style::Print(format!("population {}", grid.population())),
            cursor::MoveToNextLine(1),
            style::Print("q to quit"),
        )?;

        self.stdout.flush()
    }

    fn wait(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        let deadline = Instant::now() + timeout;

        loop {
            let left = deadline.saturating_duration_since(Instant::now());

            // Poll event for as long as there is time left
            if !event::poll(left)? {
                return Ok(None);
            }

            if let Some(event) = convert_event(event::read()?) {
                return Ok(Some(event));
            }
        }
    }
}

/// Converts a crossterm event into a loop event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CrossTermEvent::Key(
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            },
        ) => Some(Event::Exit),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::Event as CrossTermEvent;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyModifiers;

    use super::convert_event;
    use crate::events::Event;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrossTermEvent {
        CrossTermEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            convert_event(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Event::Exit)
        );
        assert_eq!(
            convert_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Event::Exit)
        );
        assert_eq!(
            convert_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Exit)
        );
    }

    #[test]
    fn other_input_is_ignored() {
        assert_eq!(convert_event(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(convert_event(CrossTermEvent::Resize(80, 24)), None);
        assert_eq!(convert_event(CrossTermEvent::FocusLost), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );

        assert_eq!(convert_event(CrossTermEvent::Key(release)), None);
    }
}
