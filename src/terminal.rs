use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self::with_size(width, height, alternate_screen))
    }

    /// Off-screen buffer of a fixed size; nothing is sent to the tty
    pub fn headless(width: u16, height: u16) -> Self {
        Self::with_size(width, height, false)
    }

    fn with_size(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Resize the back buffer (contents are cleared)
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            row.fill(Cell::default());
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Set a character at position with optional colors
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bg, bold);
        }
    }

    /// Paint the background of every cell in a rectangle
    pub fn fill_bg(&mut self, x: u16, y: u16, w: u16, h: u16, bg: Color) {
        for row in self.buffer.iter_mut().skip(y as usize).take(h as usize) {
            for cell in row.iter_mut().skip(x as usize).take(w as usize) {
                cell.bg = Some(bg);
            }
        }
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if let Some(bg) = cell.bg {
                    queue!(out, SetBackgroundColor(bg))?;
                }
                if let Some(fg) = cell.fg {
                    queue!(out, SetForegroundColor(fg))?;
                }

                queue!(out, Print(cell.ch))?;

                if cell.bold || cell.fg.is_some() || cell.bg.is_some() {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Wait up to `timeout` for a key press
    pub fn poll_key(&self, timeout: Duration) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(timeout)? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some((key_event.code, key_event.modifiers)));
                }
            }
        }
        Ok(None)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        Ok(self.poll_key(Duration::from_millis(timeout_ms))?.map(|(code, _)| code))
    }

    /// Write the buffer as ANSI-colored text (for print mode)
    pub fn write_ansi<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.buffer {
            for cell in row {
                let styled = cell.bold || cell.fg.is_some() || cell.bg.is_some();

                if cell.bold {
                    write!(out, "\x1b[1m")?;
                }
                if let Some(bg) = cell.bg {
                    write!(out, "{}", ansi_color(bg, true))?;
                }
                if let Some(fg) = cell.fg {
                    write!(out, "{}", ansi_color(fg, false))?;
                }

                write!(out, "{}", cell.ch)?;

                if styled {
                    write!(out, "\x1b[0m")?;
                }
            }
            writeln!(out)?;
        }
        out.flush()
    }

    pub fn print_to_stdout(&self) -> io::Result<()> {
        self.write_ansi(&mut stdout().lock())
    }
}

/// SGR escape for a color, foreground or background
fn ansi_color(color: Color, background: bool) -> String {
    let base = if background { 10 } else { 0 };
    match color {
        Color::Rgb { r, g, b } => format!("\x1b[{};2;{};{};{}m", 38 + base, r, g, b),
        Color::AnsiValue(v) => format!("\x1b[{};5;{}m", 38 + base, v),
        // Standard colors (0-7)
        Color::Black => format!("\x1b[{}m", 30 + base),
        Color::DarkRed => format!("\x1b[{}m", 31 + base),
        Color::DarkGreen => format!("\x1b[{}m", 32 + base),
        Color::DarkYellow => format!("\x1b[{}m", 33 + base),
        Color::DarkBlue => format!("\x1b[{}m", 34 + base),
        Color::DarkMagenta => format!("\x1b[{}m", 35 + base),
        Color::DarkCyan => format!("\x1b[{}m", 36 + base),
        Color::Grey => format!("\x1b[{}m", 37 + base),
        // Bright colors (8-15)
        Color::DarkGrey => format!("\x1b[{}m", 90 + base),
        Color::Red => format!("\x1b[{}m", 91 + base),
        Color::Green => format!("\x1b[{}m", 92 + base),
        Color::Yellow => format!("\x1b[{}m", 93 + base),
        Color::Blue => format!("\x1b[{}m", 94 + base),
        Color::Magenta => format!("\x1b[{}m", 95 + base),
        Color::Cyan => format!("\x1b[{}m", 96 + base),
        Color::White => format!("\x1b[{}m", 97 + base),
        _ => String::new(),
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
