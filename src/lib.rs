//! Converts Standard MIDI Files into Cairo source (an array of `Message` variants) or into a
//! JSON event list.

pub mod extractor;
pub mod formatter;
pub mod midi_event;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use midly::Smf;

pub use extractor::Extractor;
pub use formatter::{write_output, CairoFormatter, JsonFormatter, MidiFormatter, OutputFormat};
pub use midi_event::{Message, MidiDocument};

pub fn load_midi_document<P: AsRef<Path>>(path: P) -> Result<MidiDocument> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("read midi file {}", path.display()))?;
    let smf = Smf::parse(&bytes).with_context(|| format!("parse midi file {}", path.display()))?;

    Ok(Extractor::new(smf)?.run())
}

pub fn write_document<P: AsRef<Path>>(
    document: &MidiDocument,
    output_path: P,
    format: OutputFormat,
) -> Result<()> {
    let contents = format.formatter().format(document)?;
    write_output(output_path.as_ref(), &contents)
}

pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    midi_path: P,
    output_path: Q,
    format: OutputFormat,
) -> Result<()> {
    let document = load_midi_document(midi_path)?;
    write_document(&document, output_path, format)
}

pub fn midi_to_cairo<P: AsRef<Path>, Q: AsRef<Path>>(midi_path: P, output_path: Q) -> Result<()> {
    convert(midi_path, output_path, OutputFormat::Cairo)
}

pub fn midi_to_json<P: AsRef<Path>, Q: AsRef<Path>>(midi_path: P, output_path: Q) -> Result<()> {
    convert(midi_path, output_path, OutputFormat::Json)
}
