use anyhow::Result;

use crate::formatter::MidiFormatter;
use crate::midi_event::{Header, Message, MidiDocument};

const PREAMBLE: &str = "use koji::midi::types::{Midi, Message, NoteOn, NoteOff, SetTempo, TimeSignature, ControlChange, PitchWheel, AfterTouch, PolyTouch, Modes };\nuse koji::math::Time;\n\nfn midi() -> Midi {\n    Midi {\n        events: array![\n";
const SUFFIX: &str = "\n        ].span()\n    }\n}";
const INDENT: &str = "            ";

/// Renders a document as a Cairo `midi()` function returning every event in one array literal.
pub struct CairoFormatter {}

impl CairoFormatter {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CairoFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiFormatter for CairoFormatter {
    fn format(&self, document: &MidiDocument) -> Result<String> {
        let header = Message::Header(Header {
            ticks_per_beat: document.ticks_per_beat,
        });

        let mut out = String::from(PREAMBLE);
        // the header line is synthesized once from ticks_per_beat
        let events = document
            .events
            .iter()
            .filter(|message| !matches!(message, Message::Header(_)));
        for message in std::iter::once(&header).chain(events) {
            out.push_str(INDENT);
            out.push_str(&format_message(message));
            out.push_str(",\n");
        }
        out.push_str(SUFFIX);

        Ok(out)
    }
}

fn format_message(message: &Message) -> String {
    // Message::NOTE_ON(NoteOn { channel: 0, note: 60, velocity: 100, time: 0 })
    let fields = match message {
        Message::Header(h) => format!("ticksPerBeat: {}", h.ticks_per_beat),
        Message::NoteOn(n) | Message::NoteOff(n) => format!(
            "channel: {}, note: {}, velocity: {}, time: {}",
            n.channel, n.note, n.velocity, n.time
        ),
        Message::SetTempo(t) => format!(
            "tempo: {}, time: {}",
            t.tempo,
            format_optional(t.time)
        ),
        Message::TimeSignature(ts) => format!(
            "numerator: {}, denominator: {}, clocks_per_click: {}, time: {}",
            ts.numerator,
            ts.denominator,
            ts.clocks_per_click,
            format_optional(ts.time)
        ),
        Message::ControlChange(cc) => format!(
            "channel: {}, control: {}, value: {}, time: {}",
            cc.channel, cc.control, cc.value, cc.time
        ),
        Message::PitchWheel(pw) => format!(
            "channel: {}, pitch: {}, time: {}",
            pw.channel, pw.pitch, pw.time
        ),
        Message::AfterTouch(at) => format!(
            "channel: {}, value: {}, time: {}",
            at.channel, at.value, at.time
        ),
        Message::PolyTouch(pt) => format!(
            "channel: {}, note: {}, value: {}, time: {}",
            pt.channel, pt.note, pt.value, pt.time
        ),
        Message::ProgramChange(pc) => format!(
            "channel: {}, program: {}, time: {}",
            pc.channel, pc.program, pc.time
        ),
        Message::SystemExclusive(sysex) => format!(
            "data: [{}], time: {}",
            sysex
                .data
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            sysex.time
        ),
    };

    format!(
        "Message::{tag}({type_name} {{ {fields} }})",
        tag = message.tag(),
        type_name = message.type_name(),
        fields = fields
    )
}

fn format_optional(value: Option<u32>) -> String {
    match value {
        Some(v) => format!("Option::Some({})", v),
        None => "None".to_string(),
    }
}
