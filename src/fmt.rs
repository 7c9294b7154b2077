use std::io::Write;

use log::Level;
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

/// Defines the output style for records forwarded to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    /// Outputs records using ANSI color codes for a terminal.
    Color,
    /// Outputs records in a plain ASCII format.
    NoColor,
}

impl LogFormat {
    pub(crate) fn fmt(
        self,
        target: &str,
        level: Level,
        msg: &str,
        out: &mut Buffer,
    ) -> std::io::Result<()> {
        match self {
            Self::Color => {
                out.set_color(ColorSpec::new().set_fg(Some(level_color(level))))?;
                write!(out, "[ {level:>5} ] ")?;

                out.set_color(
                    ColorSpec::new()
                        .set_fg(Some(level_color(level)))
                        .set_bold(true),
                )?;
                write!(out, "{target}: ")?;

                out.reset()?;
                writeln!(out, "{msg}")?;

                Ok(())
            }
            Self::NoColor => {
                write!(out, "[ {level:>5} ] ")?;
                write!(out, "{target}: ")?;
                writeln!(out, "{msg}")?;

                Ok(())
            }
        }
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::Magenta,
        Level::Trace => Color::Cyan,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}
