use serde::Serialize;

/// Everything the formatters need from one MIDI file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiDocument {
    pub ticks_per_beat: u16,
    pub events: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Header(Header),
    NoteOn(Note),
    NoteOff(Note),
    SetTempo(SetTempo),
    TimeSignature(TimeSignature),
    ControlChange(ControlChange),
    PitchWheel(PitchWheel),
    AfterTouch(AfterTouch),
    PolyTouch(PolyTouch),
    ProgramChange(ProgramChange),
    SystemExclusive(SystemExclusive),
}

impl Message {
    /// Variant name as it appears in both output grammars.
    pub fn tag(&self) -> &'static str {
        match self {
            Message::Header(_) => "HEADER",
            Message::NoteOn(_) => "NOTE_ON",
            Message::NoteOff(_) => "NOTE_OFF",
            Message::SetTempo(_) => "SET_TEMPO",
            Message::TimeSignature(_) => "TIME_SIGNATURE",
            Message::ControlChange(_) => "CONTROL_CHANGE",
            Message::PitchWheel(_) => "PITCH_WHEEL",
            Message::AfterTouch(_) => "AFTER_TOUCH",
            Message::PolyTouch(_) => "POLY_TOUCH",
            Message::ProgramChange(_) => "PROGRAM_CHANGE",
            Message::SystemExclusive(_) => "SYSTEM_EXCLUSIVE",
        }
    }

    /// Name of the payload struct on the Cairo side.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Header(_) => "Header",
            Message::NoteOn(_) => "NoteOn",
            Message::NoteOff(_) => "NoteOff",
            Message::SetTempo(_) => "SetTempo",
            Message::TimeSignature(_) => "TimeSignature",
            Message::ControlChange(_) => "ControlChange",
            Message::PitchWheel(_) => "PitchWheel",
            Message::AfterTouch(_) => "AfterTouch",
            Message::PolyTouch(_) => "PolyTouch",
            Message::ProgramChange(_) => "ProgramChange",
            Message::SystemExclusive(_) => "SystemExclusive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub ticks_per_beat: u16,
}

// `time` is always the delta in ticks since the previous event of the same track.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub channel: u8,
    pub note: u8,
    pub velocity: u8,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetTempo {
    /// microseconds per quarter note
    pub tempo: u32,
    pub time: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
    pub clocks_per_click: u8,
    pub time: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlChange {
    pub channel: u8,
    pub control: u8,
    pub value: u8,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PitchWheel {
    pub channel: u8,
    /// -8192..=8191, 0 is centre
    pub pitch: i16,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AfterTouch {
    pub channel: u8,
    pub value: u8,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolyTouch {
    pub channel: u8,
    pub note: u8,
    pub value: u8,
    pub time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramChange {
    pub channel: u8,
    pub program: u8,
    pub time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemExclusive {
    pub data: Vec<u8>,
    pub time: u32,
}
