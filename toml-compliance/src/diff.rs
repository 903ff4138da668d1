//! Line-oriented diffs between JSON values.
//!
//! Values are pretty-printed with two-space indentation and sorted keys, then
//! compared line by line. Shared leading and trailing lines are kept as
//! context and the differing middle is aligned by longest common subsequence.
//! A middle too large to align is shown as one removed block followed by one
//! added block. Each output line carries a two-character marker: `"  "` for
//! context, `"- "` for lines only in the expected value and `"+ "` for lines
//! only in the actual value.

use std::fmt;

use serde_json::Value;

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    /// Present on both sides.
    Context,
    /// Present only in the expected value.
    Removed,
    /// Present only in the actual value.
    Added,
}

impl DiffTag {
    const fn marker(self) -> &'static str {
        match self {
            Self::Context => "  ",
            Self::Removed => "- ",
            Self::Added => "+ ",
        }
    }
}

/// One line of a rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    /// Whether the line was kept, removed or added.
    pub tag: DiffTag,
    /// Line content without its marker.
    pub text: String,
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag.marker(), self.text)
    }
}

/// Diff between an expected and an actual JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDiff {
    lines: Vec<DiffLine>,
}

impl JsonDiff {
    /// Renders both values and aligns their lines.
    #[must_use]
    pub fn new(expected: &Value, actual: &Value) -> Self {
        let expected_text = render(expected);
        let actual_text = render(actual);
        Self {
            lines: line_diff(&expected_text, &actual_text),
        }
    }

    /// Diff lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }
}

impl fmt::Display for JsonDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for line in &self.lines {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            line.fmt(f)?;
        }
        Ok(())
    }
}

fn render(value: &Value) -> String {
    let sorted = sort_keys(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| sorted.to_string())
}

// Rebuilt explicitly so output stays sorted even if `preserve_order` is
// enabled somewhere in the dependency graph.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key.clone(), sort_keys(inner)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Largest alignment table built for the differing middle of two texts.
pub const MAX_ALIGNED_CELLS: usize = 1 << 22;

/// Aligns two texts line by line.
#[must_use]
pub fn line_diff(expected: &str, actual: &str) -> Vec<DiffLine> {
    let left: Vec<&str> = expected.lines().collect();
    let right: Vec<&str> = actual.lines().collect();

    let prefix = left
        .iter()
        .zip(&right)
        .take_while(|(l, r)| l == r)
        .count();
    let left_rest = left.get(prefix..).unwrap_or_default();
    let right_rest = right.get(prefix..).unwrap_or_default();
    let suffix = left_rest
        .iter()
        .rev()
        .zip(right_rest.iter().rev())
        .take_while(|(l, r)| l == r)
        .count();
    let left_middle = left_rest
        .get(..left_rest.len().saturating_sub(suffix))
        .unwrap_or_default();
    let right_middle = right_rest
        .get(..right_rest.len().saturating_sub(suffix))
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(left.len().max(right.len()));
    let head = left.get(..prefix).unwrap_or_default();
    lines.extend(head.iter().map(|l| line(DiffTag::Context, l)));
    align(left_middle, right_middle, &mut lines);
    let tail = left_rest.get(left_middle.len()..).unwrap_or_default();
    lines.extend(tail.iter().map(|l| line(DiffTag::Context, l)));
    lines
}

fn align(left: &[&str], right: &[&str], lines: &mut Vec<DiffLine>) {
    let cells = left
        .len()
        .saturating_add(1)
        .saturating_mul(right.len().saturating_add(1));
    if cells > MAX_ALIGNED_CELLS {
        lines.extend(left.iter().map(|l| line(DiffTag::Removed, l)));
        lines.extend(right.iter().map(|r| line(DiffTag::Added, r)));
        return;
    }

    let table = lcs_table(left, right);
    let (mut i, mut j) = (0, 0);
    loop {
        match (left.get(i), right.get(j)) {
            (Some(l), Some(r)) if l == r => {
                lines.push(line(DiffTag::Context, l));
                i += 1;
                j += 1;
            }
            (Some(l), Some(r)) => {
                if cell(&table, i + 1, j) >= cell(&table, i, j + 1) {
                    lines.push(line(DiffTag::Removed, l));
                    i += 1;
                } else {
                    lines.push(line(DiffTag::Added, r));
                    j += 1;
                }
            }
            (Some(l), None) => {
                lines.push(line(DiffTag::Removed, l));
                i += 1;
            }
            (None, Some(r)) => {
                lines.push(line(DiffTag::Added, r));
                j += 1;
            }
            (None, None) => break,
        }
    }
}

fn line(tag: DiffTag, text: &str) -> DiffLine {
    DiffLine {
        tag,
        text: text.to_owned(),
    }
}

/// `table[i][j]` holds the LCS length of `left[i..]` and `right[j..]`.
fn lcs_table(left: &[&str], right: &[&str]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0_usize; right.len() + 1]; left.len() + 1];
    for (i, l) in left.iter().enumerate().rev() {
        for (j, r) in right.iter().enumerate().rev() {
            let value = if l == r {
                cell(&table, i + 1, j + 1) + 1
            } else {
                cell(&table, i + 1, j).max(cell(&table, i, j + 1))
            };
            if let Some(slot) = table.get_mut(i).and_then(|row| row.get_mut(j)) {
                *slot = value;
            }
        }
    }
    table
}

fn cell(table: &[Vec<usize>], i: usize, j: usize) -> usize {
    table
        .get(i)
        .and_then(|row| row.get(j))
        .copied()
        .unwrap_or_default()
}
