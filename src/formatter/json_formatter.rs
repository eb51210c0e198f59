use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::formatter::MidiFormatter;
use crate::midi_event::{Message, MidiDocument, SetTempo};

#[derive(Serialize)]
struct Events {
    events: Vec<Message>,
}

/// Renders a document as `{"events": [...]}`, one single-key object per event.
///
/// The header, program changes and sysex dumps are not part of this output, and tempo changes
/// are written without their delta time.
pub struct JsonFormatter {}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiFormatter for JsonFormatter {
    fn format(&self, document: &MidiDocument) -> Result<String> {
        let events = Events {
            events: document.events.iter().filter_map(json_event).collect(),
        };

        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        events
            .serialize(&mut serializer)
            .context("serialize events to json")?;

        String::from_utf8(buf).context("json output is not utf-8")
    }
}

fn json_event(message: &Message) -> Option<Message> {
    match message {
        Message::Header(_) | Message::ProgramChange(_) | Message::SystemExclusive(_) => None,
        Message::SetTempo(tempo) => Some(Message::SetTempo(SetTempo {
            time: None,
            ..*tempo
        })),
        other => Some(other.clone()),
    }
}
