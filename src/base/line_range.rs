/// Line tracking for structural keywords
///
/// Stores the text location (line span) of model elements, used to drive
/// selection, highlighting, and cursor-to-keyword lookup.
///
/// Lines are one-based and the range is inclusive at both ends, matching how
/// editors number lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Create a range covering `start..=end`. Invariant: `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start >= 1 && start <= end);
        Self { start, end }
    }

    /// Create a range covering exactly one line.
    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    /// Check if a line falls within this range.
    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }

    /// Number of lines covered.
    pub fn line_count(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Check if this range shares any line with another.
    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "line {}", self.start)
        } else {
            write!(f, "lines {}-{}", self.start, self.end)
        }
    }
}
