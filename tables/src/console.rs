// tables/src/console.rs
//
// Terminal ports and gesture-line parsing for the `braille-tables` driver.

use anyhow::{bail, Context, Result};
use braille_input_core::{
    BrailleInputGesture, Cell, DisplayPort, InputHandler, OutputPort, RegionKind, TranslationPort,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::{BufRead, Write};

// "space", "space+1 2", "1-2-3", "145"
static GESTURE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(space)(?:\+|\s+|$))?([1-8](?:[- ]*[1-8])*)?$").expect("valid gesture regex")
});

/// Parse one line of typed input into a gesture.
///
/// Blank lines and `#` comments yield `None`.
pub fn parse_gesture(line: &str) -> Result<Option<BrailleInputGesture>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let lower = line.to_ascii_lowercase();
    let Some(caps) = GESTURE_LINE.captures(&lower) else {
        bail!("unrecognised gesture '{}'", line);
    };
    let space = caps.get(1).is_some();
    let dots = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse::<Cell>()
            .with_context(|| format!("gesture '{}'", line))?,
        None => Cell::SPACE,
    };
    Ok(Some(BrailleInputGesture::new(dots, space)))
}

/// What the driver does with a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `bk:dot7`: erase the last cell
    Erase,
    /// `bk:dot8`: drop buffered input
    Flush,
    /// A space chord with no binding in the driver
    Unbound(String),
    /// `bk:dots`: type the cell
    Input(Cell),
    /// Nothing pressed
    Ignore,
}

/// Route a gesture by its most specific identifier.
pub fn action_for(gesture: &BrailleInputGesture) -> Action {
    let ids = gesture.identifiers();
    match ids.first().map(String::as_str) {
        Some("bk:dot7") => Action::Erase,
        Some("bk:dot8") => Action::Flush,
        Some(id) if id.starts_with("bk:space+") => Action::Unbound(id.to_string()),
        Some(_) => Action::Input(gesture.pressed_dots()),
        None => Action::Ignore,
    }
}

/// Drive `handler` with gesture lines until `input` ends.
///
/// Bad lines and failed gestures are printed as `error` events and the
/// session continues; only read and write failures end it. Pending composed
/// cells are printed after each gesture.
pub fn run_session<T, W, R>(
    handler: &mut InputHandler<T, ConsoleOutput<W>, ConsoleDisplay>,
    input: R,
) -> Result<()>
where
    T: TranslationPort,
    W: Write,
    R: BufRead,
{
    for line in input.lines() {
        let line = line?;
        let gesture = match parse_gesture(&line) {
            Ok(Some(gesture)) => gesture,
            Ok(None) => continue,
            Err(e) => {
                handler.output_mut().note("error", &format!("{:#}", e))?;
                continue;
            }
        };

        let result = match action_for(&gesture) {
            Action::Erase => handler.erase_last_cell().map(|_| ()),
            Action::Flush => {
                handler.flush();
                Ok(())
            }
            Action::Unbound(id) => handler.output_mut().note("unbound", &id),
            Action::Input(cell) => handler.input(cell).map(|_| ()),
            Action::Ignore => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "gesture failed");
            handler.output_mut().note("error", &format!("{:#}", e))?;
        }

        if !handler.composed().is_empty() {
            let composed = handler.composed().to_string();
            handler.output_mut().note("composed", &composed)?;
        }
    }
    handler.output_mut().flush()
}

#[derive(Debug, Serialize)]
struct Event<'a> {
    event: &'a str,
    value: &'a str,
}

/// Output port that prints every effect as a line.
///
/// Plain lines look like `type: hi`; with `json` each effect is an object
/// `{"event":"type","value":"hi"}`.
pub struct ConsoleOutput<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    /// Print a driver event that is not a host effect (e.g. an unbound gesture).
    pub fn note(&mut self, event: &str, value: &str) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(&Event { event, value })?;
            writeln!(self.out, "{}", line)?;
        } else {
            writeln!(self.out, "{}: {}", event, value)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputPort for ConsoleOutput<W> {
    fn inject_characters(&mut self, text: &str) -> Result<()> {
        self.note("type", text)
    }

    fn emulate_key(&mut self, name: &str) -> Result<()> {
        self.note("key", name)
    }

    fn speak(&mut self, message: &str) -> Result<()> {
        self.note("speak", message)
    }
}

/// Display port standing in for a braille display showing an edit field.
#[derive(Debug, Clone, Default)]
pub struct ConsoleDisplay {
    refreshes: usize,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl DisplayPort for ConsoleDisplay {
    fn active_region(&self) -> Option<RegionKind> {
        Some(RegionKind::TextCursor)
    }

    fn refresh_cursor(&mut self) {
        self.refreshes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gesture(line: &str) -> BrailleInputGesture {
        parse_gesture(line).unwrap().unwrap()
    }

    #[test]
    fn test_parses_dot_notations() {
        let expected = BrailleInputGesture::dots(Cell::new(0x0D));
        assert_eq!(gesture("1 3 4"), expected);
        assert_eq!(gesture("134"), expected);
        assert_eq!(gesture("1-3-4"), expected);
        assert_eq!(gesture("  143 "), expected);
    }

    #[test]
    fn test_parses_space_chords() {
        assert_eq!(gesture("space"), BrailleInputGesture::space());
        assert_eq!(gesture("Space"), BrailleInputGesture::space());
        assert_eq!(
            gesture("space+1 2"),
            BrailleInputGesture::new(Cell::new(0x03), true)
        );
        assert_eq!(
            gesture("space 7").identifiers(),
            vec!["bk:space+dot7", "bk:space+dots"]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        assert!(parse_gesture("").unwrap().is_none());
        assert!(parse_gesture("   ").unwrap().is_none());
        assert!(parse_gesture("# hello").unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(parse_gesture("9").is_err());
        assert!(parse_gesture("spacebar").is_err());
        assert!(parse_gesture("1+2").is_err());
        let err = parse_gesture("1 1").unwrap_err();
        assert!(format!("{:#}", err).contains("gesture '1 1'"));
    }

    #[test]
    fn test_routes_by_first_identifier() {
        assert_eq!(action_for(&gesture("7")), Action::Erase);
        assert_eq!(action_for(&gesture("8")), Action::Flush);
        assert_eq!(
            action_for(&gesture("space+1 2")),
            Action::Unbound("bk:space+dot1+dot2".to_string())
        );
        assert_eq!(action_for(&gesture("7 8")), Action::Input(Cell::new(0xC0)));
        assert_eq!(action_for(&gesture("space")), Action::Input(Cell::SPACE));
        assert_eq!(
            action_for(&BrailleInputGesture::new(Cell::SPACE, false)),
            Action::Ignore
        );
    }

    #[test]
    fn test_plain_and_json_output() {
        let mut plain = ConsoleOutput::new(Vec::new(), false);
        plain.inject_characters("hi").unwrap();
        plain.emulate_key("backspace").unwrap();
        plain.speak("dot 1").unwrap();
        assert_eq!(
            String::from_utf8(plain.into_inner()).unwrap(),
            "type: hi\nkey: backspace\nspeak: dot 1\n"
        );

        let mut json = ConsoleOutput::new(Vec::new(), true);
        json.inject_characters("\"a\"").unwrap();
        json.note("unbound", "bk:space+dot1").unwrap();
        assert_eq!(
            String::from_utf8(json.into_inner()).unwrap(),
            "{\"event\":\"type\",\"value\":\"\\\"a\\\"\"}\n{\"event\":\"unbound\",\"value\":\"bk:space+dot1\"}\n"
        );
    }

    #[test]
    fn test_display_counts_refreshes() {
        let mut d = ConsoleDisplay::new();
        assert_eq!(d.active_region(), Some(RegionKind::TextCursor));
        d.refresh_cursor();
        assert_eq!(d.refreshes(), 1);
    }
}
