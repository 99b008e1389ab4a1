//! Source spans and byte positions.
//! 源码范围与字节位置。

use std::fmt;

/// A byte offset into a source string.
/// 源码字符串中的字节偏移。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BytePos(pub u32);

impl BytePos {
    pub const ZERO: BytePos = BytePos(0);

    pub fn offset(self, by: u32) -> BytePos {
        BytePos(self.0 + by)
    }
}

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<usize> for BytePos {
    fn from(pos: usize) -> Self {
        BytePos(pos as u32)
    }
}

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0 as usize
    }
}

/// A half-open byte range `[start, end)` in source text.
/// 源码中的半开字节区间 `[start, end)`。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: BytePos,
    pub end: BytePos,
}

impl Span {
    /// Placeholder for values that did not come from source text.
    pub const DUMMY: Span = Span {
        start: BytePos::ZERO,
        end: BytePos::ZERO,
    };

    pub fn new(start: BytePos, end: BytePos) -> Self {
        Span { start, end }
    }

    pub fn from_usize(start: usize, end: usize) -> Self {
        Span::new(BytePos::from(start), BytePos::from(end))
    }

    /// Smallest span covering both `self` and `other`.
    /// 覆盖 `self` 与 `other` 的最小范围。
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        usize::from(self.start)..usize::from(self.end)
    }

    /// The source text this span covers, if it lies within `source`.
    /// 此范围对应的源码片段。
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.range())
    }

    /// One-based line and column of the span start.
    /// 范围起点的行号与列号（从 1 开始）。
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let offset = usize::from(self.start).min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let a = Span::from_usize(4, 8);
        let b = Span::from_usize(1, 5);
        assert_eq!(a.merge(b), Span::from_usize(1, 8));
        assert_eq!(a.merge(b).len(), 7);
    }

    #[test]
    fn line_col_counts_chars() {
        let source = "a = 1\nbé = 2";
        let span = Span::from_usize(source.find('=').unwrap(), source.len());
        assert_eq!(span.line_col(source), (1, 3));
        let second = source.rfind('=').unwrap();
        assert_eq!(Span::from_usize(second, second + 1).line_col(source), (2, 4));
    }

    #[test]
    fn slice_out_of_range() {
        assert_eq!(Span::from_usize(0, 3).slice("abcdef"), Some("abc"));
        assert_eq!(Span::from_usize(4, 40).slice("abc"), None);
    }
}
