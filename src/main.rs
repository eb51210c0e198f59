use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use log::info;

use midi2cairo::{load_midi_document, write_document, OutputFormat};

#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("output").required(true).multiple(true).args(["cairo", "json"])))]
struct Args {
    #[arg(short, long)]
    midi_file: PathBuf,

    #[arg(short, long, help = "Write the events as a Cairo midi() function to this path")]
    cairo: Option<PathBuf>,

    #[arg(short, long, help = "Write the events as a JSON document to this path")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("MIDI FILE: {}", args.midi_file.display());

    let document = load_midi_document(&args.midi_file)?;

    let outputs = [
        (OutputFormat::Cairo, args.cairo),
        (OutputFormat::Json, args.json),
    ];
    for (format, path) in outputs {
        if let Some(path) = path {
            write_document(&document, &path, format)?;
            println!(
                "MIDI file converted to {} and saved to {}",
                format.label(),
                path.display()
            );
        }
    }

    Ok(())
}
