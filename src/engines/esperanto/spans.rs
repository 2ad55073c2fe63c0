use std::ops::Range;

/// Where a piece of the working text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Untouched input; every stage may rewrite it.
    Source,
    /// Fragment output; later fragments may rewrite it, letters may not.
    Rewritten,
    /// Override or numeral output; never rewritten again.
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    text: String,
    origin: Origin,
}

/// A replacement of `range` (byte offsets into the flattened text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Working text of the conversion pipeline, tagged by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SpanText {
    spans: Vec<Span>,
}

/// Flattened view of a [`SpanText`] used for matching.
pub(crate) struct Snapshot {
    pub text: String,
    finals: Vec<Range<usize>>,
}

impl Snapshot {
    /// True if rewriting `range` would change final text.
    ///
    /// An empty range only counts when it falls strictly inside final text.
    pub fn touches_final(&self, range: &Range<usize>) -> bool {
        // finals are sorted and disjoint; only the first one ending after
        // `range.start` can overlap
        let idx = self.finals.partition_point(|f| f.end <= range.start);
        match self.finals.get(idx) {
            Some(f) if range.is_empty() => f.start < range.start,
            Some(f) => f.start < range.end,
            None => false,
        }
    }
}

impl SpanText {
    /// Append text, merging it into the last span when the origin matches.
    pub fn push(&mut self, text: &str, origin: Origin) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.origin == origin => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                origin,
            }),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut text = String::with_capacity(self.spans.iter().map(|s| s.text.len()).sum());
        let mut finals = Vec::new();
        for span in &self.spans {
            let start = text.len();
            text.push_str(&span.text);
            if span.origin == Origin::Final {
                finals.push(start..text.len());
            }
        }
        Snapshot { text, finals }
    }

    /// Apply sorted, non-overlapping edits; replacements are tagged `origin`.
    ///
    /// An edit may cover several adjacent spans. Unedited parts keep the
    /// origin of the span they came from.
    pub fn splice(self, edits: Vec<Edit>, origin: Origin) -> SpanText {
        if edits.is_empty() {
            return self;
        }

        let mut out = SpanText::default();
        let mut edits = edits.into_iter().peekable();
        let mut cursor = 0usize;
        let mut offset = 0usize;

        for span in self.spans {
            let start = offset;
            let end = start + span.text.len();
            offset = end;
            cursor = cursor.max(start);

            while let Some(edit) = edits.next_if(|e| e.range.start < end) {
                if edit.range.start > cursor {
                    out.push(&span.text[cursor - start..edit.range.start - start], span.origin);
                }
                out.push(&edit.replacement, origin);
                cursor = cursor.max(edit.range.end);
            }

            if cursor < end {
                out.push(&span.text[cursor - start..], span.origin);
            }
        }

        // insertions at the very end of the text
        for edit in edits {
            out.push(&edit.replacement, origin);
        }

        out
    }

    /// Concatenate all spans, passing each through `map` with its origin.
    pub fn render<F>(&self, mut map: F) -> String
    where
        F: FnMut(&str, Origin, &mut String),
    {
        let mut out = String::new();
        for span in &self.spans {
            map(&span.text, span.origin, &mut out);
        }
        out
    }

    #[cfg(test)]
    fn parts(&self) -> Vec<(&str, Origin)> {
        self.spans.iter().map(|s| (s.text.as_str(), s.origin)).collect()
    }
}
