//! Code fence tracking for the directive pre-pass.
//!
//! Directive and role syntax inside fenced code blocks is literal text, so the
//! pre-pass has to know when it is inside a fence.

/// Classification of a line relative to fenced code blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FenceLine {
    /// Line opens a fence.
    Open,
    /// Line closes the current fence.
    Close,
    /// Line is inside a fence (content).
    Inside,
    /// Line is regular markdown.
    Outside,
}

impl FenceLine {
    /// Whether the line must be passed through untouched.
    pub(crate) fn is_verbatim(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

#[derive(Clone, Copy, Debug)]
struct Fence {
    marker: char,
    len: usize,
}

/// Tracks code fence state during line-by-line processing.
///
/// Fences use three or more backticks or tildes. A closing fence must use the
/// same character, be at least as long as the opener, and carry no info string.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Fence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether the last classified line left us inside a fence.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Classify a line and advance the fence state.
    pub(crate) fn classify(&mut self, line: &str) -> FenceLine {
        let trimmed = line.trim_start();

        match self.open {
            Some(fence) => {
                if closes(trimmed, fence) {
                    self.open = None;
                    FenceLine::Close
                } else {
                    FenceLine::Inside
                }
            }
            None => match opener(trimmed) {
                Some(fence) => {
                    self.open = Some(fence);
                    FenceLine::Open
                }
                None => FenceLine::Outside,
            },
        }
    }
}

/// Detect a fence opener.
fn opener(trimmed: &str) -> Option<Fence> {
    let marker = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    // Backtick info strings may not contain backticks (inline code otherwise).
    if marker == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes(trimmed: &str, fence: Fence) -> bool {
    let len = trimmed.chars().take_while(|&c| c == fence.marker).count();
    len >= fence.len && trimmed[len..].trim().is_empty()
}
