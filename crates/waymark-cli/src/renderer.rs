//! Writes command output to the terminal.
//!
//! Output is markdown from [`crate::display`]. With styling on, inline markup
//! is rendered through a termimad skin line by line, headers keep their `#`
//! prefix and are coloured whole. With `--no-color` the markdown is written
//! as is, which is also what the integration tests match against.

use std::io::{self, Write};

use log::{debug, warn};
use termimad::{crossterm::style::Color, MadSkin};

const HEADER_STYLE: &str = "\x1b[1;36m";
const RESET: &str = "\x1b[0m";

pub struct TerminalRenderer {
    /// `None` means plain output.
    skin: Option<MadSkin>,
}

impl TerminalRenderer {
    pub fn new(styled: bool) -> Self {
        Self {
            skin: styled.then(waymark_skin),
        }
    }

    /// Prints `markdown` to stdout. A closed pipe (`wm list | head`) is not an error.
    pub fn render(&self, markdown: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = self.write_markdown(&mut out, markdown) {
            if e.kind() == io::ErrorKind::BrokenPipe {
                debug!("Stdout closed before output was written");
            } else {
                warn!("Failed to write output: {e}");
            }
        }
    }

    fn write_markdown<W: Write>(&self, out: &mut W, markdown: &str) -> io::Result<()> {
        let Some(skin) = &self.skin else {
            return out.write_all(markdown.as_bytes());
        };

        for line in markdown.lines() {
            if line.starts_with('#') {
                writeln!(out, "{HEADER_STYLE}{line}{RESET}")?;
            } else {
                writeln!(out, "{}", skin.inline(line))?;
            }
        }
        out.flush()
    }
}

fn waymark_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.bold.set_fg(Color::Yellow);
    skin.inline_code.set_fg(Color::Green);
    skin.inline_code.set_bg(Color::Reset);
    skin
}
