// src/srt.rs
//! SubRip (SRT) caption tracks: parsing, validation and rendering

use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static::lazy_static! {
    static ref TIMING_LINE: Regex = Regex::new(
        r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})$"
    ).expect("valid SRT timing regex");
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrtError {
    #[error("Caption track is empty")]
    Empty,
    #[error("Block {block}: expected index {expected}, found '{found}'")]
    BadIndex { block: usize, expected: usize, found: String },
    #[error("Block {block}: malformed timing line '{line}'")]
    BadTiming { block: usize, line: String },
    #[error("Block {block}: end time {end} is not after start time {start}")]
    NonPositiveDuration { block: usize, start: Timestamp, end: Timestamp },
    #[error("Block {block}: starts at {start}, before the previous block ends at {previous_end}")]
    Overlap { block: usize, start: Timestamp, previous_end: Timestamp },
    #[error("Block {block}: has no caption text")]
    MissingText { block: usize },
}

/// A caption timestamp with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        if minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0 % 1000;
        let total_seconds = self.0 / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            total_seconds / 3600,
            (total_seconds / 60) % 60,
            total_seconds % 60,
            millis
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub index: usize,
    pub start: Timestamp,
    pub end: Timestamp,
    pub lines: Vec<String>,
}

/// Parse and validate a caption track.
///
/// Cues must be numbered from 1 without gaps, each must have a positive
/// duration and may not start before the previous cue ends.
pub fn parse(input: &str) -> Result<Vec<Cue>, SrtError> {
    let normalized = input.replace("\r\n", "\n");
    let mut cues: Vec<Cue> = Vec::new();

    for (position, block) in split_blocks(&normalized).into_iter().enumerate() {
        let block_number = position + 1;
        let mut lines = block.into_iter();

        let index_line = lines.next().unwrap_or_default();
        match index_line.trim().parse::<usize>() {
            Ok(index) if index == block_number => {}
            _ => {
                return Err(SrtError::BadIndex {
                    block: block_number,
                    expected: block_number,
                    found: index_line.trim().to_string(),
                })
            }
        }

        let timing_line = lines.next().unwrap_or_default();
        let (start, end) = parse_timing(timing_line.trim()).ok_or_else(|| SrtError::BadTiming {
            block: block_number,
            line: timing_line.trim().to_string(),
        })?;

        if end <= start {
            return Err(SrtError::NonPositiveDuration { block: block_number, start, end });
        }
        if let Some(previous) = cues.last() {
            if start < previous.end {
                return Err(SrtError::Overlap {
                    block: block_number,
                    start,
                    previous_end: previous.end,
                });
            }
        }

        let text: Vec<String> = lines.map(|line| line.trim_end().to_string()).collect();
        if text.is_empty() {
            return Err(SrtError::MissingText { block: block_number });
        }

        cues.push(Cue { index: block_number, start, end, lines: text });
    }

    if cues.is_empty() {
        return Err(SrtError::Empty);
    }
    Ok(cues)
}

/// Render cues back into SRT text, renumbering from 1
pub fn render(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!("{}\n{} --> {}\n", i + 1, cue.start, cue.end));
        for line in &cue.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Total span covered by a track (end of the last cue)
pub fn duration(cues: &[Cue]) -> Timestamp {
    cues.last().map(|cue| cue.end).unwrap_or(Timestamp(0))
}

fn split_blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_timing(line: &str) -> Option<(Timestamp, Timestamp)> {
    let caps = TIMING_LINE.captures(line)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    let start = Timestamp::from_parts(field(1)?, field(2)?, field(3)?, field(4)?)?;
    let end = Timestamp::from_parts(field(5)?, field(6)?, field(7)?, field(8)?)?;
    Some((start, end))
}
