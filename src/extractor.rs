use anyhow::{bail, Result};
use log::{debug, info};

use crate::midi_event::{
    AfterTouch, ControlChange, Message, MidiDocument, Note, PitchWheel, PolyTouch, ProgramChange,
    SetTempo, SystemExclusive, TimeSignature,
};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

// MIDI clocks per metronome click, written out regardless of what the file says
const CLOCKS_PER_CLICK: u8 = 24;
const PITCH_BEND_CENTER: i16 = 0x2000;
const SYSEX_TERMINATOR: u8 = 0xF7;

pub struct Extractor<'a> {
    smf: Smf<'a>,
    ticks_per_beat: u16,
}

impl<'a> Extractor<'a> {
    pub fn new(smf: Smf<'a>) -> Result<Self> {
        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int(),
            Timing::Timecode(fps, subframe) => {
                bail!(
                    "SMPTE division ({:?}, {} subframes) has no ticks per beat",
                    fps,
                    subframe
                )
            }
        };

        info!(
            "Ticks per beat: {}, format: {:?}, tracks: {}",
            ticks_per_beat,
            smf.header.format,
            smf.tracks.len()
        );

        Ok(Self {
            smf,
            ticks_per_beat,
        })
    }

    pub fn run(&self) -> MidiDocument {
        let mut events: Vec<Message> = Vec::new();
        for (track_idx, track) in self.smf.tracks.iter().enumerate() {
            let before = events.len();
            events.extend(
                track
                    .iter()
                    .filter_map(|event| map_event(&event.kind, event.delta.as_int())),
            );
            debug!(
                "Track {}: kept {} of {} events",
                track_idx,
                events.len() - before,
                track.len()
            );
        }

        info!("Extracted {} events", events.len());

        MidiDocument {
            ticks_per_beat: self.ticks_per_beat,
            events,
        }
    }
}

/// Maps one track event to its message, or `None` for event kinds with no counterpart.
pub fn map_event(kind: &TrackEventKind, time: u32) -> Option<Message> {
    match kind {
        TrackEventKind::Midi { channel, message } => {
            Some(map_midi_msg(channel.as_int(), message, time))
        }

        TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => Some(Message::SetTempo(SetTempo {
            tempo: tempo.as_int(),
            time: Some(time),
        })),

        TrackEventKind::Meta(MetaMessage::TimeSignature(numerator, denominator_pow, _, _)) => {
            Some(Message::TimeSignature(TimeSignature {
                numerator: *numerator,
                denominator: denominator_from_power(*denominator_pow),
                clocks_per_click: CLOCKS_PER_CLICK,
                time: None,
            }))
        }

        // F0 dumps and F7 continuation/escape packets both carry raw sysex bytes
        TrackEventKind::SysEx(data) | TrackEventKind::Escape(data) => {
            Some(Message::SystemExclusive(SystemExclusive {
                data: sysex_payload(data),
                time,
            }))
        }

        _ => {
            debug!("-- skipped: {:?} {:?}", time, kind);
            None
        }
    }
}

fn map_midi_msg(channel: u8, msg: &MidiMessage, time: u32) -> Message {
    match msg {
        MidiMessage::NoteOn { key, vel } => Message::NoteOn(Note {
            channel,
            note: key.as_int(),
            velocity: vel.as_int(),
            time,
        }),
        MidiMessage::NoteOff { key, vel } => Message::NoteOff(Note {
            channel,
            note: key.as_int(),
            velocity: vel.as_int(),
            time,
        }),
        MidiMessage::Controller { controller, value } => Message::ControlChange(ControlChange {
            channel,
            control: controller.as_int(),
            value: value.as_int(),
            time,
        }),
        MidiMessage::PitchBend { bend } => Message::PitchWheel(PitchWheel {
            channel,
            // raw 14-bit value, 0x2000 is centre
            pitch: bend.0.as_int() as i16 - PITCH_BEND_CENTER,
            time,
        }),
        MidiMessage::ChannelAftertouch { vel } => Message::AfterTouch(AfterTouch {
            channel,
            value: vel.as_int(),
            time,
        }),
        MidiMessage::Aftertouch { key, vel } => Message::PolyTouch(PolyTouch {
            channel,
            note: key.as_int(),
            value: vel.as_int(),
            time,
        }),
        MidiMessage::ProgramChange { program } => Message::ProgramChange(ProgramChange {
            channel,
            program: program.as_int(),
            time,
        }),
    }
}

// midly leaves the closing 0xF7 in place; the payload is everything between the framing bytes
fn sysex_payload(data: &[u8]) -> Vec<u8> {
    data.strip_suffix(&[SYSEX_TERMINATOR])
        .unwrap_or(data)
        .to_vec()
}

// the file stores the denominator as a power of two
fn denominator_from_power(power: u8) -> u8 {
    1u32.checked_shl(power.into())
        .and_then(|value| u8::try_from(value).ok())
        .unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::u14;
    use midly::{Format, Header, PitchBend, TrackEvent};

    fn midi(channel: u8, message: MidiMessage) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: channel.into(),
            message,
        }
    }

    #[test]
    fn test_note_on_keeps_fields_in_order() {
        let kind = midi(
            3,
            MidiMessage::NoteOn {
                key: 60.into(),
                vel: 100.into(),
            },
        );

        assert_eq!(
            map_event(&kind, 12),
            Some(Message::NoteOn(Note {
                channel: 3,
                note: 60,
                velocity: 100,
                time: 12,
            }))
        );
    }

    #[test]
    fn test_note_on_velocity_zero_stays_note_on() {
        let kind = midi(
            0,
            MidiMessage::NoteOn {
                key: 60.into(),
                vel: 0.into(),
            },
        );

        match map_event(&kind, 0) {
            Some(Message::NoteOn(note)) => assert_eq!(note.velocity, 0),
            other => panic!("Expected NoteOn, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_messages() {
        let cases = vec![
            (
                midi(
                    1,
                    MidiMessage::NoteOff {
                        key: 61.into(),
                        vel: 64.into(),
                    },
                ),
                Message::NoteOff(Note {
                    channel: 1,
                    note: 61,
                    velocity: 64,
                    time: 5,
                }),
            ),
            (
                midi(
                    2,
                    MidiMessage::Controller {
                        controller: 7.into(),
                        value: 90.into(),
                    },
                ),
                Message::ControlChange(ControlChange {
                    channel: 2,
                    control: 7,
                    value: 90,
                    time: 5,
                }),
            ),
            (
                midi(4, MidiMessage::ChannelAftertouch { vel: 33.into() }),
                Message::AfterTouch(AfterTouch {
                    channel: 4,
                    value: 33,
                    time: 5,
                }),
            ),
            (
                midi(
                    5,
                    MidiMessage::Aftertouch {
                        key: 62.into(),
                        vel: 44.into(),
                    },
                ),
                Message::PolyTouch(PolyTouch {
                    channel: 5,
                    note: 62,
                    value: 44,
                    time: 5,
                }),
            ),
            (
                midi(6, MidiMessage::ProgramChange { program: 19.into() }),
                Message::ProgramChange(ProgramChange {
                    channel: 6,
                    program: 19,
                    time: 5,
                }),
            ),
        ];

        for (kind, expected) in cases {
            assert_eq!(map_event(&kind, 5), Some(expected));
        }
    }

    #[test]
    fn test_pitch_bend_is_centred() {
        let cases = [(0u16, -8192i16), (0x2000, 0), (0x3FFF, 8191)];
        for (raw, pitch) in cases {
            let kind = midi(
                0,
                MidiMessage::PitchBend {
                    bend: PitchBend(u14::new(raw)),
                },
            );
            match map_event(&kind, 0) {
                Some(Message::PitchWheel(wheel)) => assert_eq!(wheel.pitch, pitch),
                other => panic!("Expected PitchWheel, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_tempo_time_is_present() {
        let kind = TrackEventKind::Meta(MetaMessage::Tempo(500_000.into()));
        assert_eq!(
            map_event(&kind, 240),
            Some(Message::SetTempo(SetTempo {
                tempo: 500_000,
                time: Some(240),
            }))
        );
    }

    #[test]
    fn test_time_signature_is_normalized() {
        let kind = TrackEventKind::Meta(MetaMessage::TimeSignature(6, 3, 36, 8));
        assert_eq!(
            map_event(&kind, 960),
            Some(Message::TimeSignature(TimeSignature {
                numerator: 6,
                denominator: 8,
                clocks_per_click: 24,
                time: None,
            }))
        );
    }

    #[test]
    fn test_denominator_from_power() {
        assert_eq!(denominator_from_power(0), 1);
        assert_eq!(denominator_from_power(2), 4);
        assert_eq!(denominator_from_power(7), 128);
        assert_eq!(denominator_from_power(8), u8::MAX);
        assert_eq!(denominator_from_power(200), u8::MAX);
    }

    #[test]
    fn test_sysex_payload_drops_terminator_only() {
        let data = [0x7E, 0x7F, 0x09, 0x01, 0xF7];
        let kind = TrackEventKind::SysEx(&data);
        assert_eq!(
            map_event(&kind, 7),
            Some(Message::SystemExclusive(SystemExclusive {
                data: vec![0x7E, 0x7F, 0x09, 0x01],
                time: 7,
            }))
        );

        let unterminated = [0x41, 0x10];
        match map_event(&TrackEventKind::SysEx(&unterminated), 0) {
            Some(Message::SystemExclusive(sysex)) => assert_eq!(sysex.data, vec![0x41, 0x10]),
            other => panic!("Expected SystemExclusive, got {:?}", other),
        }
    }

    #[test]
    fn test_escape_packet_is_sysex() {
        let data = [0x00, 0x01, 0xF7];
        assert_eq!(
            map_event(&TrackEventKind::Escape(&data), 4),
            Some(Message::SystemExclusive(SystemExclusive {
                data: vec![0x00, 0x01],
                time: 4,
            }))
        );
    }

    #[test]
    fn test_unhandled_events_are_skipped() {
        let kinds = [
            TrackEventKind::Meta(MetaMessage::EndOfTrack),
            TrackEventKind::Meta(MetaMessage::TrackName(b"lead")),
            TrackEventKind::Meta(MetaMessage::KeySignature(0, false)),
        ];
        for kind in kinds {
            assert_eq!(map_event(&kind, 10), None, "{:?}", kind);
        }
    }

    #[test]
    fn test_run_preserves_track_order() {
        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing: Timing::Metrical(96.into()),
            },
            tracks: vec![
                vec![
                    TrackEvent {
                        delta: 0.into(),
                        kind: TrackEventKind::Meta(MetaMessage::Tempo(600_000.into())),
                    },
                    TrackEvent {
                        delta: 0.into(),
                        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
                    },
                ],
                vec![
                    TrackEvent {
                        delta: 10.into(),
                        kind: midi(
                            0,
                            MidiMessage::NoteOn {
                                key: 64.into(),
                                vel: 80.into(),
                            },
                        ),
                    },
                    TrackEvent {
                        delta: 20.into(),
                        kind: midi(
                            0,
                            MidiMessage::NoteOff {
                                key: 64.into(),
                                vel: 0.into(),
                            },
                        ),
                    },
                ],
            ],
        };

        let document = Extractor::new(smf).unwrap().run();
        assert_eq!(document.ticks_per_beat, 96);

        let tags: Vec<&str> = document.events.iter().map(Message::tag).collect();
        assert_eq!(tags, vec!["SET_TEMPO", "NOTE_ON", "NOTE_OFF"]);
        match &document.events[2] {
            Message::NoteOff(note) => assert_eq!(note.time, 20),
            other => panic!("Expected NoteOff, got {:?}", other),
        }
    }

    #[test]
    fn test_smpte_division_is_rejected() {
        let smf = Smf {
            header: Header {
                format: Format::SingleTrack,
                timing: Timing::Timecode(midly::Fps::Fps25, 40),
            },
            tracks: vec![],
        };

        assert!(Extractor::new(smf).is_err());
    }
}
