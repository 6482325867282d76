use std::io::{self, BufRead, Write};

pub const WINDOW_TITLE: &str = "News Stream API";
pub const TOPIC_LABEL: &str = "Type any news topic:";
pub const SUBMIT_BUTTON: &str = "Get News";

/// One user action on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// "Get News" pressed with whatever is in the topic field.
    Submit(String),
    /// The window was closed.
    Closed,
}

/// The form surface the event loop drives.
pub trait Window {
    /// Blocks until the next event.
    fn read(&mut self) -> io::Result<Event>;

    /// Modal error message.
    fn popup_error(&mut self, message: &str) -> io::Result<()>;

    /// Notice that dismisses itself.
    fn popup_auto_close(&mut self, message: &str) -> io::Result<()>;
}

/// The form rendered on a terminal. A line of input is a submit, end of input
/// closes the window.
pub struct TerminalWindow<R, W> {
    input: R,
    output: W,
    title: String,
    drawn: bool,
}

impl<R: BufRead, W: Write> TerminalWindow<R, W> {
    pub fn new(input: R, output: W, title: impl Into<String>) -> Self {
        Self {
            input,
            output,
            title: title.into(),
            drawn: false,
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        writeln!(self.output, "== {} ==", self.title)?;
        writeln!(self.output, "{TOPIC_LABEL}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Window for TerminalWindow<R, W> {
    fn read(&mut self) -> io::Result<Event> {
        if !self.drawn {
            self.draw()?;
            self.drawn = true;
        }
        write!(self.output, "[{SUBMIT_BUTTON}] > ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(Event::Closed);
        }

        let topic = line.trim_end_matches(['\r', '\n']).to_owned();
        Ok(Event::Submit(topic))
    }

    fn popup_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "[error] {message}")?;
        self.output.flush()
    }

    fn popup_auto_close(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "[notice] {message}")?;
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn lines_are_submits_and_eof_closes() {
        let mut window = TerminalWindow::new(Cursor::new("markets\r\n\nfed\n"), Vec::new(), WINDOW_TITLE);

        assert_eq!(window.read().unwrap(), Event::Submit("markets".into()));
        assert_eq!(window.read().unwrap(), Event::Submit(String::new()));
        assert_eq!(window.read().unwrap(), Event::Submit("fed".into()));
        assert_eq!(window.read().unwrap(), Event::Closed);
    }

    #[test]
    fn form_is_drawn_once_and_popups_are_tagged() {
        let mut window = TerminalWindow::new(Cursor::new("a\nb\n"), Vec::new(), WINDOW_TITLE);
        window.read().unwrap();
        window.popup_error("No News Found").unwrap();
        window.read().unwrap();
        window.popup_auto_close("Data Inserted topic: b").unwrap();

        let screen = String::from_utf8(window.into_output()).unwrap();
        assert_eq!(screen.matches("== News Stream API ==").count(), 1);
        assert!(screen.contains("Type any news topic:"));
        assert!(screen.contains("[error] No News Found"));
        assert!(screen.contains("[notice] Data Inserted topic: b"));
    }
}
