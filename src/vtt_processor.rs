use std::fmt;
use log::{debug, warn};

use crate::errors::VttError;
use crate::timecode::{format_timecode, parse_timecode};

// @module: WebVTT cue parsing and serialization

// @const: Magic first line of every WebVTT file
pub const WEBVTT_MAGIC: &str = "WEBVTT";

// @const: Separator between the start and end timecodes
const TIME_RANGE_SEPARATOR: &str = "-->";

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: 1-based position in its track
    pub number: u64,

    // @field: Start time in seconds, inclusive
    pub start: f64,

    // @field: End time in seconds, exclusive
    pub end: f64,

    // @field: Caption text on a single line
    pub content: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(number: u64, start: f64, end: f64, content: impl Into<String>) -> Self {
        Cue {
            number,
            start,
            end,
            content: content.into(),
        }
    }

    /// Start time as a WebVTT timecode
    pub fn format_start_time(&self) -> String {
        format_timecode(self.start)
    }

    /// End time as a WebVTT timecode
    pub fn format_end_time(&self) -> String {
        format_timecode(self.end)
    }

    /// Length of the cue in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        write!(f, "{}", self.content)
    }
}

/// A parsed caption track: the header block and its cues in file order
#[derive(Debug, Clone, Default)]
pub struct CueTrack {
    /// Header block (magic line plus any metadata); never re-emitted
    pub header: String,

    /// Cues in appearance order
    pub cues: Vec<Cue>,
}

impl CueTrack {
    /// Parse a raw WebVTT document
    pub fn parse(raw: &str) -> Result<Self, VttError> {
        parse_track(raw)
    }

    /// Render the cues back to WebVTT
    pub fn to_vtt(&self) -> String {
        serialize_track(&self.cues)
    }

    /// Number of cues in the track
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the track has no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Split a WebVTT document into its header block and cues.
///
/// Blocks are separated by blank lines. The first block is the header; every
/// following block must be a numbered cue.
pub fn parse_track(raw: &str) -> Result<CueTrack, VttError> {
    let normalized = raw.replace("\r\n", "\n");

    let mut blocks = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty());

    let header = blocks.next().unwrap_or_default().to_string();
    if !header.starts_with(WEBVTT_MAGIC) {
        warn!("Caption header does not start with {}: '{}'", WEBVTT_MAGIC, header.lines().next().unwrap_or_default());
    }

    let cues = blocks.map(parse_cue).collect::<Result<Vec<_>, _>>()?;
    debug!("Parsed {} cues", cues.len());

    Ok(CueTrack { header, cues })
}

/// Parse one cue block: identifier line, time range line, then caption lines.
///
/// Caption lines are joined with single spaces. Cue settings after the end
/// timecode are ignored.
pub fn parse_cue(block: &str) -> Result<Cue, VttError> {
    let mut lines = block.lines();

    let id_line = lines.next().unwrap_or_default().trim();
    let number = id_line
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| VttError::MalformedCueIndex {
            input: id_line.to_string(),
        })?;

    let time_line = lines
        .next()
        .ok_or(VttError::MissingTimeRange { cue: number })?;
    let (start, end) = parse_time_range(time_line)?;

    if end <= start {
        warn!("Cue {} ends at or before it starts ({} --> {})", number, start, end);
    }

    let content = lines
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Cue {
        number,
        start,
        end,
        content,
    })
}

// @parses: `<start> --> <end> [settings]`
fn parse_time_range(line: &str) -> Result<(f64, f64), VttError> {
    let (start_text, rest) = line
        .split_once(TIME_RANGE_SEPARATOR)
        .ok_or_else(|| VttError::MalformedTimeRange {
            input: line.to_string(),
        })?;

    let mut rest_tokens = rest.split_whitespace();
    let end_text = rest_tokens.next().unwrap_or_default();

    let settings: Vec<&str> = rest_tokens.collect();
    if !settings.is_empty() {
        debug!("Ignoring cue settings: {}", settings.join(" "));
    }

    Ok((parse_timecode(start_text)?, parse_timecode(end_text)?))
}

/// Render cues as a WebVTT document.
///
/// Emits the magic line, then one three-line block per cue, blank-line
/// separated, with a single trailing newline.
pub fn serialize_track(cues: &[Cue]) -> String {
    let mut blocks = Vec::with_capacity(cues.len() + 1);
    blocks.push(WEBVTT_MAGIC.to_string());
    blocks.extend(cues.iter().map(|cue| cue.to_string()));

    format!("{}\n", blocks.join("\n\n"))
}
