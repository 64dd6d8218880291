/*!
 * Tests for sentence consolidation
 */

use vtt_translate::app_config::{ConsolidationConfig, TrailingPolicy};
use vtt_translate::consolidator::{Accumulator, Consolidator, StepKind, consolidate, renumber};
use vtt_translate::errors::VttError;
use vtt_translate::vtt_processor::Cue;

fn consolidator(trailing: TrailingPolicy, max_pending_fragments: Option<usize>) -> Consolidator {
    Consolidator::new(ConsolidationConfig {
        trailing,
        max_pending_fragments,
    })
}

/// Test a terminated cue becomes its own sentence
#[test]
fn test_step_withTerminatedCue_shouldCut() {
    let step = Consolidator::default()
        .step(Accumulator::default(), &Cue::new(1, 1.0, 3.0, "Hello there."))
        .unwrap();

    assert_eq!(step.kind, StepKind::Cut);
    assert_eq!(step.emitted, Some(Cue::new(1, 1.0, 3.0, "Hello there.")));
    assert!(!step.state.is_pending());
}

/// Test a cue holding a sentence boundary is split at a quarter of its duration
#[test]
fn test_step_withSentenceBoundary_shouldSplitAndCarryTail() {
    let step = Consolidator::default()
        .step(Accumulator::default(), &Cue::new(1, 0.0, 4.0, "Hi. How are you"))
        .unwrap();

    assert_eq!(step.kind, StepKind::Split);
    assert_eq!(step.emitted, Some(Cue::new(1, 0.0, 1.0, "Hi.")));
    assert_eq!(step.state.number, 1);
    assert_eq!(step.state.start, 1.001);
    assert_eq!(step.state.content, " How are you");
    assert_eq!(step.state.pending_length, 1);
}

/// Test an unterminated cue is carried forward
#[test]
fn test_step_withUnterminatedCue_shouldCarry() {
    let step = Consolidator::default()
        .step(Accumulator::default(), &Cue::new(4, 0.0, 1.0, "The cat"))
        .unwrap();

    assert_eq!(step.kind, StepKind::Carry);
    assert_eq!(step.emitted, None);
    assert_eq!(step.state.number, 4);
    assert_eq!(step.state.start, 0.0);
    assert_eq!(step.state.pending_length, 1);
}

/// Test a carried sentence keeps the start of the cue it began in
#[test]
fn test_consolidate_withSentenceAcrossCues_shouldMerge() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "The cat"),
        Cue::new(2, 1.0, 2.0, "sat down."),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, vec![Cue::new(1, 0.0, 2.0, "The cat sat down.")]);
}

/// Test a sentence spread over many cues is merged into one
#[test]
fn test_consolidate_withLongCarry_shouldMergeAllFragments() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "one"),
        Cue::new(2, 1.0, 2.0, "two"),
        Cue::new(3, 2.0, 3.0, "three"),
        Cue::new(4, 3.0, 4.0, "four."),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, vec![Cue::new(1, 0.0, 4.0, "one two three four.")]);
}

/// Test the holdover of a split cue joins the next sentence
#[test]
fn test_consolidate_withMidCueBoundary_shouldCarryHoldover() {
    let cues = vec![
        Cue::new(1, 0.0, 4.0, "Hi. How are you"),
        Cue::new(2, 4.0, 5.0, "today?"),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, vec![
        Cue::new(1, 0.0, 1.0, "Hi."),
        Cue::new(2, 1.001, 5.0, "How are you today?"),
    ]);
}

/// Test a split cue closes the sentence pending from earlier cues
#[test]
fn test_consolidate_withPendingBeforeSplit_shouldCloseIt() {
    let cues = vec![
        Cue::new(1, 0.0, 2.0, "So then"),
        Cue::new(2, 2.0, 4.0, "it ended. And next"),
        Cue::new(3, 4.0, 6.0, "came this."),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, vec![
        Cue::new(1, 0.0, 2.5, "So then it ended."),
        Cue::new(2, 2.501, 6.0, "And next came this."),
    ]);
}

/// Test a cue with several sentences keeps all but the last in the emitted cue
#[test]
fn test_consolidate_withThreeSentencesInCue_shouldEmitFirstTwo() {
    let cues = vec![
        Cue::new(1, 0.0, 8.0, "One. Two. Three"),
        Cue::new(2, 8.0, 9.0, "more."),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, vec![
        Cue::new(1, 0.0, 2.0, "One. Two."),
        Cue::new(2, 2.001, 9.0, "Three more."),
    ]);
}

/// Test every cue already ending a sentence is kept as is
#[test]
fn test_consolidate_withAlignedCues_shouldKeepTiming() {
    let cues = vec![
        Cue::new(1, 1.0, 3.0, "Hello there."),
        Cue::new(2, 3.0, 5.0, "Nice day!"),
    ];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result, cues);
}

/// Test output is renumbered from 1 regardless of input identifiers
#[test]
fn test_consolidate_withOffsetNumbers_shouldRenumberFromOne() {
    let cues = vec![
        Cue::new(7, 0.0, 1.0, "First."),
        Cue::new(8, 1.0, 2.0, "Second"),
        Cue::new(9, 2.0, 3.0, "part."),
        Cue::new(12, 3.0, 4.0, "Third."),
    ];

    let result = consolidate(&cues).unwrap();
    let numbers: Vec<u64> = result.iter().map(|cue| cue.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

/// Test an empty track is rejected
#[test]
fn test_consolidate_withNoCues_shouldFail() {
    assert_eq!(consolidate(&[]).unwrap_err(), VttError::EmptyTrack);
}

/// Test an unterminated final sentence is flushed by default
#[test]
fn test_consolidate_withTrailingTextAndFlush_shouldEmitIt() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "Done."),
        Cue::new(2, 1.0, 2.0, "and then"),
        Cue::new(3, 2.0, 3.0, "nothing"),
    ];

    let result = consolidator(TrailingPolicy::Flush, None).consolidate(&cues).unwrap();
    assert_eq!(result, vec![
        Cue::new(1, 0.0, 1.0, "Done."),
        Cue::new(2, 1.0, 3.0, "and then nothing"),
    ]);
}

/// Test an unterminated final sentence can be dropped
#[test]
fn test_consolidate_withTrailingTextAndDrop_shouldDiscardIt() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "Done."),
        Cue::new(2, 1.0, 2.0, "and then"),
    ];

    let result = consolidator(TrailingPolicy::Drop, None).consolidate(&cues).unwrap();
    assert_eq!(result, vec![Cue::new(1, 0.0, 1.0, "Done.")]);
}

/// Test a track with no terminal punctuation at all
#[test]
fn test_consolidate_withNoPunctuationAndDrop_shouldEmitNothing() {
    let cues = vec![Cue::new(1, 0.0, 1.0, "la la la")];

    let dropped = consolidator(TrailingPolicy::Drop, None).consolidate(&cues).unwrap();
    assert!(dropped.is_empty());

    let flushed = consolidator(TrailingPolicy::Flush, None).consolidate(&cues).unwrap();
    assert_eq!(flushed, vec![Cue::new(1, 0.0, 1.0, "la la la")]);
}

/// Test a long unterminated run is cut at the fragment limit
#[test]
fn test_consolidate_withPendingLimit_shouldForceCut() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, "one"),
        Cue::new(2, 1.0, 2.0, "two"),
        Cue::new(3, 2.0, 3.0, "three"),
        Cue::new(4, 3.0, 4.0, "four."),
    ];

    let consolidator = consolidator(TrailingPolicy::Flush, Some(2));
    let step = consolidator
        .step(consolidator.step(Accumulator::default(), &cues[0]).unwrap().state, &cues[1])
        .unwrap();
    assert_eq!(step.kind, StepKind::ForcedCut);

    let result = consolidator.consolidate(&cues).unwrap();
    assert_eq!(result, vec![
        Cue::new(1, 0.0, 2.0, "one two"),
        Cue::new(2, 2.0, 4.0, "three four."),
    ]);
}

/// Test punctuation runs are one boundary
#[test]
fn test_consolidate_withEllipsis_shouldNotSplitInsideRun() {
    let cues = vec![Cue::new(1, 0.0, 2.0, "Well... okay?!")];

    let result = consolidate(&cues).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].content, "Well...");
    assert_eq!(result[1].content, "okay?!");
}

/// Test renumbering keeps timing and text
#[test]
fn test_renumber_withCues_shouldOnlyChangeNumbers() {
    let renumbered = renumber(vec![
        Cue::new(5, 0.0, 1.0, "a."),
        Cue::new(9, 1.0, 2.0, "b."),
    ]);

    assert_eq!(renumbered, vec![
        Cue::new(1, 0.0, 1.0, "a."),
        Cue::new(2, 1.0, 2.0, "b."),
    ]);
}

/// Test a forced cut over blank cues emits nothing
#[test]
fn test_consolidate_withPendingLimitOnBlankCues_shouldNotEmitEmptyCue() {
    let cues = vec![
        Cue::new(1, 0.0, 1.0, ""),
        Cue::new(2, 1.0, 2.0, "  "),
        Cue::new(3, 2.0, 3.0, "Then words."),
    ];

    let consolidator = consolidator(TrailingPolicy::Flush, Some(2));
    let step = consolidator
        .step(consolidator.step(Accumulator::default(), &cues[0]).unwrap().state, &cues[1])
        .unwrap();
    assert_eq!(step.kind, StepKind::ForcedCut);
    assert_eq!(step.emitted, None);

    let result = consolidator.consolidate(&cues).unwrap();
    assert_eq!(result, vec![Cue::new(1, 2.0, 3.0, "Then words.")]);
}
