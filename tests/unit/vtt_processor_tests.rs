/*!
 * Tests for WebVTT parsing and serialization
 */

use vtt_translate::errors::VttError;
use vtt_translate::vtt_processor::{Cue, CueTrack, parse_cue, parse_track, serialize_track};
use crate::common;

/// Test a cue block parses into its fields
#[test]
fn test_parse_cue_withValidBlock_shouldParseFields() {
    let cue = parse_cue("7\n00:00:01.000 --> 00:00:02.500\nHello there.").unwrap();
    assert_eq!(cue, Cue::new(7, 1.0, 2.5, "Hello there."));
}

/// Test multi-line caption text is joined with spaces
#[test]
fn test_parse_cue_withMultipleTextLines_shouldJoinWithSpaces() {
    let cue = parse_cue("1\n00:00:01.000 --> 00:00:02.000\nfirst line\nsecond line").unwrap();
    assert_eq!(cue.content, "first line second line");
}

/// Test a cue block without caption text has empty content
#[test]
fn test_parse_cue_withoutText_shouldHaveEmptyContent() {
    let cue = parse_cue("3\n00:00:01.000 --> 00:00:02.000").unwrap();
    assert_eq!(cue.content, "");
}

/// Test a bad identifier line is reported
#[test]
fn test_parse_cue_withNonNumericIndex_shouldFail() {
    let err = parse_cue("intro\n00:00:01.000 --> 00:00:02.000\nHi.").unwrap_err();
    assert_eq!(err, VttError::MalformedCueIndex { input: "intro".to_string() });

    let err = parse_cue("0\n00:00:01.000 --> 00:00:02.000\nHi.").unwrap_err();
    assert!(matches!(err, VttError::MalformedCueIndex { .. }));
}

/// Test a block with only an identifier is reported
#[test]
fn test_parse_cue_withoutTimeRange_shouldFail() {
    let err = parse_cue("4").unwrap_err();
    assert_eq!(err, VttError::MissingTimeRange { cue: 4 });
}

/// Test a bad timecode inside the range is reported
#[test]
fn test_parse_cue_withMalformedTimecode_shouldFail() {
    let err = parse_cue("1\n00:00:01 --> 00:00:02.000\nHi.").unwrap_err();
    assert!(matches!(err, VttError::MalformedTimecode { .. }));
}

/// Test a full track parses with its header
#[test]
fn test_parse_track_withSampleTrack_shouldParseAllCues() {
    let track = parse_track(common::SAMPLE_VTT).unwrap();

    assert_eq!(track.header, "WEBVTT");
    assert_eq!(track.len(), 4);
    assert_eq!(track.cues[2], Cue::new(3, 2.0, 4.0, "Hello world. How are you"));
}

/// Test CRLF line endings and extra blank lines are tolerated
#[test]
fn test_parse_track_withCrlfAndExtraBlankLines_shouldParse() {
    let raw = "WEBVTT\r\nKind: captions\r\n\r\n\r\n\r\n1\r\n00:00:00.000 --> 00:00:01.000\r\nHi.\r\n\r\n";
    let track = parse_track(raw).unwrap();

    assert_eq!(track.header, "WEBVTT\nKind: captions");
    assert_eq!(track.cues, vec![Cue::new(1, 0.0, 1.0, "Hi.")]);
}

/// Test a header-only document has no cues
#[test]
fn test_parse_track_withHeaderOnly_shouldBeEmpty() {
    let track = parse_track("WEBVTT\n").unwrap();
    assert!(track.is_empty());
}

/// Test serialization layout
#[test]
fn test_serialize_track_withCues_shouldRenderBlocks() {
    let cues = vec![
        Cue::new(1, 0.0, 1.5, "One."),
        Cue::new(2, 1.5, 3.0, "Two."),
    ];

    assert_eq!(
        serialize_track(&cues),
        "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.500\nOne.\n\n2\n00:00:01.500 --> 00:00:03.000\nTwo.\n"
    );
}

/// Test an empty cue list still renders the magic line
#[test]
fn test_serialize_track_withNoCues_shouldRenderHeaderOnly() {
    assert_eq!(serialize_track(&[]), "WEBVTT\n");
}

/// Test serializing a parsed track reproduces it
#[test]
fn test_track_withSampleTrack_shouldSurviveParseAndSerialize() {
    let track = CueTrack::parse(common::SAMPLE_VTT).unwrap();
    assert_eq!(track.to_vtt(), common::SAMPLE_VTT);

    let reparsed = CueTrack::parse(&track.to_vtt()).unwrap();
    assert_eq!(reparsed.cues, track.cues);
}
