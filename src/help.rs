use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Position and size of the help box, centered on the screen
fn overlay_rect(width: u16, height: u16, lines: &[&str]) -> (usize, usize, usize, usize) {
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2; // 1 row padding top/bottom

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;
    (start_x, start_y, box_width, box_height)
}

/// Show a modal help overlay without modifying the back buffer.
/// Returns true if the user requested quit (q/Esc) while the overlay is open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    render_help_overlay_direct(width, height, help_text)?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // Restore previous frame from back buffer.
    term.render()?;
    Ok(false)
}

fn render_help_overlay_direct(width: u16, height: u16, help_text: &str) -> io::Result<()> {
    let lines: Vec<&str> = help_text.lines().collect();
    let (start_x, start_y, box_width, box_height) = overlay_rect(width, height, &lines);
    let max_width = box_width - 4;

    let border_color = Color::White;
    let text_color = Color::Grey;

    let mut out = stdout();
    queue!(out, SetBackgroundColor(Color::Black))?;

    // Top border
    queue!(out, MoveTo(start_x as u16, start_y as u16), SetForegroundColor(border_color))?;
    queue!(out, Print(format!("┌{}┐", "─".repeat(box_width - 2))))?;

    // Content rows
    for (i, line) in lines.iter().enumerate() {
        let y = (start_y + 1 + i) as u16;
        let padding = max_width.saturating_sub(line.chars().count());
        queue!(out, MoveTo(start_x as u16, y), SetForegroundColor(border_color), Print('│'))?;
        queue!(out, SetForegroundColor(text_color), Print(format!(" {}{} ", line, " ".repeat(padding))))?;
        queue!(out, SetForegroundColor(border_color), Print('│'))?;
    }

    // Bottom border
    let bottom_y = (start_y + box_height - 1) as u16;
    queue!(out, MoveTo(start_x as u16, bottom_y), Print(format!("└{}┘", "─".repeat(box_width - 2))))?;

    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::overlay_rect;

    #[test]
    fn overlay_is_centered() {
        let lines = ["abcd", "ab"];
        assert_eq!(overlay_rect(20, 10, &lines), (6, 3, 8, 4));
    }

    #[test]
    fn overlay_larger_than_screen_starts_at_origin() {
        let lines = ["a very long line of help text"];
        let (x, y, w, _) = overlay_rect(10, 2, &lines);
        assert_eq!((x, y), (0, 0));
        assert_eq!(w, 33);
    }
}
