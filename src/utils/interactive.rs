use crate::utils::error::{AppError, AppResult};
use crate::utils::output::OutputStyle;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, style,
    terminal::{self, ClearType},
};
use std::io::{self, Write};

pub fn prompt_input(prompt: &str) -> AppResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Prompt showing the current value; an empty answer keeps it
pub fn prompt_with_default(prompt: &str, current: &str) -> AppResult<String> {
    let hint = if current.is_empty() {
        String::new()
    } else {
        format!(" [{}]", OutputStyle::muted(current))
    };
    let input = prompt_input(&format!("{}{}: ", prompt, hint))?;
    if input.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(input)
    }
}

pub fn prompt_yes_no(prompt: &str) -> AppResult<bool> {
    loop {
        let input = prompt_input(&format!("{} [y/N]: ", prompt))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Draw the selection list, highlighting `selected`
fn render_list(out: &mut impl Write, items: &[String], selected: usize) -> AppResult<()> {
    execute!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    write!(out, "Use arrow keys to navigate, Enter to select, q to quit:\r\n\r\n")?;

    for (i, item) in items.iter().enumerate() {
        if i == selected {
            execute!(
                out,
                style::SetForegroundColor(style::Color::Blue),
                style::Print("> "),
                style::Print(item),
                style::ResetColor
            )?;
        } else {
            execute!(out, style::Print("  "), style::Print(item))?;
        }
        write!(out, "\r\n")?;
    }
    out.flush()?;
    Ok(())
}

pub fn select_from_list(items: &[String]) -> AppResult<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();

    // Raw mode must be left on every path out of the loop
    let mut selected = 0;
    let result: AppResult<Option<usize>> = loop {
        if let Err(e) = render_list(&mut stdout, items, selected) {
            break Err(e);
        }

        match event::read() {
            Ok(Event::Key(KeyEvent { code: KeyCode::Up, .. })) => {
                selected = selected.saturating_sub(1);
            }
            Ok(Event::Key(KeyEvent { code: KeyCode::Down, .. })) => {
                if selected < items.len() - 1 {
                    selected += 1;
                }
            }
            Ok(Event::Key(KeyEvent { code: KeyCode::Enter, .. })) => break Ok(Some(selected)),
            Ok(Event::Key(KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            })) => break Ok(None),
            Ok(_) => {}
            Err(e) => break Err(AppError::Io(e.to_string())),
        }
    };

    terminal::disable_raw_mode()?;
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn items() -> Vec<String> {
        vec!["Datenbanken 1".to_string(), "Softwaretechnik".to_string()]
    }

    #[test]
    fn test_render_list_marks_selected_item() {
        let mut out = Vec::new();
        render_list(&mut out, &items(), 1).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("  Datenbanken 1"));
        assert!(text.contains("> Softwaretechnik"));
    }

    #[test]
    fn test_render_list_returns_write_errors() {
        assert!(render_list(&mut BrokenPipe, &items(), 0).is_err());
    }
}
