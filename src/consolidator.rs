/*!
 * Sentence consolidation for caption tracks.
 *
 * Caption encoders cut cues by display time, so a sentence is often spread
 * over several cues and a cue often holds the end of one sentence and the
 * start of the next. Translating those chunks one by one produces broken
 * output. The consolidator walks the cue stream once and re-segments it so
 * every emitted cue ends on `.`, `?` or `!`:
 *
 * - a cue whose single fragment is terminated closes the pending sentence;
 * - a cue holding a sentence boundary is split, the emitted cue ending a
 *   quarter of the way through it and the trailing fragment carried over;
 * - an unterminated cue is folded into the pending sentence.
 *
 * The walk is a fold over an explicit [`Accumulator`] value; [`Consolidator::step`]
 * is pure so each transition can be tested on its own.
 */

use log::{debug, error, warn};

use crate::app_config::{ConsolidationConfig, TrailingPolicy};
use crate::errors::VttError;
use crate::vtt_processor::Cue;

/// Gap between a split cue's end and the start of its holdover, in seconds
pub const SPLIT_GAP_SECS: f64 = 0.001;

/// In-progress sentence carried from one cue to the next
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accumulator {
    /// Number of the cue the sentence began in
    pub number: u64,

    /// Second at which the sentence began
    pub start: f64,

    /// Text gathered so far
    pub content: String,

    /// Cue fragments folded in so far; zero means nothing is pending
    pub pending_length: usize,
}

impl Accumulator {
    /// Start a fresh sentence at `cue`
    fn begin(cue: &Cue) -> Self {
        Self {
            number: cue.number,
            start: cue.start,
            content: String::new(),
            pending_length: 0,
        }
    }

    /// Whether a sentence is pending
    pub fn is_pending(&self) -> bool {
        self.pending_length > 0
    }

    // Fragments are trimmed and joined with one space
    fn push(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.content.trim().is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(text);
    }

    fn emit(&self, end: f64) -> Cue {
        Cue {
            number: self.number,
            start: self.start,
            end,
            content: self.content.trim().to_string(),
        }
    }
}

/// Which transition a cue triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Terminated single fragment: pending sentence closed at the cue's end
    Cut,
    /// Sentence boundary inside the cue: emitted early, tail carried over
    Split,
    /// Unterminated cue folded into the pending sentence
    Carry,
    /// Carry that hit the fragment limit and was emitted anyway
    ForcedCut,
}

/// Result of feeding one cue to the consolidator
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// State to feed the next cue
    pub state: Accumulator,

    /// Cue completed by this step, if any
    pub emitted: Option<Cue>,

    /// Transition taken
    pub kind: StepKind,
}

/// Whether `ch` ends a sentence
pub fn is_terminal(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!')
}

/// Split text after every run of terminal punctuation.
///
/// The punctuation stays attached to the fragment it ends, and the leading
/// whitespace of the next sentence stays with that sentence. A trailing
/// whitespace-only remainder is not a fragment. Always returns at least one
/// fragment, possibly empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut begin = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_terminal(ch) {
            continue;
        }
        if chars.peek().is_some_and(|(_, next)| is_terminal(*next)) {
            continue;
        }
        let end = idx + ch.len_utf8();
        if end < text.len() {
            fragments.push(&text[begin..end]);
            begin = end;
        }
    }

    let rest = &text[begin..];
    if fragments.is_empty() || !rest.trim().is_empty() {
        fragments.push(rest);
    }

    fragments
}

/// Regroups cues into sentence-aligned cues
#[derive(Debug, Clone, Default)]
pub struct Consolidator {
    config: ConsolidationConfig,
}

impl Consolidator {
    /// Create a consolidator with the given settings
    pub fn new(config: ConsolidationConfig) -> Self {
        Self { config }
    }

    /// Settings in use
    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Feed one cue to the state machine
    pub fn step(&self, state: Accumulator, cue: &Cue) -> Result<Step, VttError> {
        let mut acc = if state.is_pending() {
            state
        } else {
            Accumulator::begin(cue)
        };

        let mut fragments = split_sentences(&cue.content);
        let terminated = cue.content.chars().any(is_terminal);

        match fragments.len() {
            1 if terminated => {
                acc.push(&cue.content);
                debug!("Cue {}: cut, sentence from cue {} closed", cue.number, acc.number);
                Ok(Step {
                    emitted: Some(acc.emit(cue.end)),
                    state: Accumulator::default(),
                    kind: StepKind::Cut,
                })
            },
            n if n > 1 => {
                let holdover = fragments.pop().unwrap_or_default();
                for fragment in &fragments {
                    acc.push(fragment);
                }

                let half = cue.duration() / 2.0;
                let split_at = cue.start + half / 2.0;
                debug!("Cue {}: split into {} fragments at {:.3}s", cue.number, n, split_at);

                Ok(Step {
                    emitted: Some(acc.emit(split_at)),
                    state: Accumulator {
                        number: cue.number,
                        start: split_at + SPLIT_GAP_SECS,
                        content: holdover.to_string(),
                        pending_length: 1,
                    },
                    kind: StepKind::Split,
                })
            },
            1 => {
                acc.push(&cue.content);
                acc.pending_length += 1;

                if let Some(limit) = self.config.max_pending_fragments {
                    if acc.pending_length >= limit {
                        debug!("Cue {}: forced cut after {} fragments", cue.number, acc.pending_length);
                        let has_text = !acc.content.trim().is_empty();
                        return Ok(Step {
                            emitted: has_text.then(|| acc.emit(cue.end)),
                            state: Accumulator::default(),
                            kind: StepKind::ForcedCut,
                        });
                    }
                }

                debug!("Cue {}: carried ({} pending)", cue.number, acc.pending_length);
                Ok(Step {
                    state: acc,
                    emitted: None,
                    kind: StepKind::Carry,
                })
            },
            n => {
                error!("Cue {}: unexpected fragment count {}", cue.number, n);
                Err(VttError::InvariantViolation(format!(
                    "cue {} split into {} fragments",
                    cue.number, n
                )))
            },
        }
    }

    /// Regroup `cues` into sentence-aligned cues numbered from 1.
    ///
    /// Fails on an empty stream. What happens to a sentence still pending at
    /// the end depends on the configured [`TrailingPolicy`].
    pub fn consolidate(&self, cues: &[Cue]) -> Result<Vec<Cue>, VttError> {
        let last = cues.last().ok_or(VttError::EmptyTrack)?;

        let (state, mut emitted) = cues.iter().try_fold(
            (Accumulator::default(), Vec::new()),
            |(state, mut out), cue| {
                let step = self.step(state, cue)?;
                out.extend(step.emitted);
                Ok::<_, VttError>((step.state, out))
            },
        )?;

        if state.is_pending() && !state.content.trim().is_empty() {
            match self.config.trailing {
                TrailingPolicy::Flush => {
                    debug!("Flushing trailing sentence from cue {}", state.number);
                    emitted.push(state.emit(last.end));
                },
                TrailingPolicy::Drop => {
                    warn!("Dropping unterminated trailing text: '{}'", state.content.trim());
                },
            }
        }

        debug!("Consolidated {} cues into {}", cues.len(), emitted.len());
        Ok(renumber(emitted))
    }
}

/// Renumber cues consecutively from 1
pub fn renumber(cues: Vec<Cue>) -> Vec<Cue> {
    cues.into_iter()
        .enumerate()
        .map(|(idx, cue)| Cue {
            number: idx as u64 + 1,
            ..cue
        })
        .collect()
}

/// Consolidate with default settings
pub fn consolidate(cues: &[Cue]) -> Result<Vec<Cue>, VttError> {
    Consolidator::default().consolidate(cues)
}
