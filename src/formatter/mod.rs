use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::midi_event::MidiDocument;

mod cairo_formatter;
mod json_formatter;

pub use cairo_formatter::CairoFormatter;
pub use json_formatter::JsonFormatter;

pub trait MidiFormatter {
    fn format(&self, document: &MidiDocument) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Cairo,
    Json,
}

impl OutputFormat {
    pub fn formatter(self) -> Box<dyn MidiFormatter> {
        match self {
            OutputFormat::Cairo => Box::new(CairoFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Cairo => "Cairo",
            OutputFormat::Json => "JSON",
        }
    }
}

/// Replaces whatever is at `path` with `contents`.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("create output file {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("write output file {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush output file {}", path.display()))?;
    Ok(())
}
