//! Line diff with a time budget
//!
//! Lines are interned to integer tokens, the token sequences are diffed with
//! Myers' bisection (linear space, middle-snake recursion), and the edit
//! script is mapped back to line ranges of the new text. Working on tokens
//! keeps large files tractable: the cost depends on the number of lines,
//! never on the number of characters.

use std::collections::HashMap;
use std::ops::Range;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors produced by the line diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The diff ran past its deadline
    #[error("diff exceeded its time budget of {0:?}")]
    Timeout(Duration),
}

/// One step of an edit script, counted in lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Lines present in both texts
    Equal(usize),
    /// Lines only in the old text
    Delete(usize),
    /// Lines only in the new text
    Insert(usize),
}

/// Split text into lines, keeping each line's terminator
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Compute a line edit script turning `old` into `new`
pub fn diff_lines(old: &str, new: &str, timeout: Duration) -> Result<Vec<Edit>, DiffError> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let (a, b) = tokenize(&old_lines, &new_lines);

    let mut ctx = Context {
        deadline: Instant::now().checked_add(timeout),
        timeout,
        edits: Vec::new(),
    };
    diff_tokens(&a, &b, &mut ctx)?;
    Ok(ctx.edits)
}

/// Line ranges of `new` that were inserted relative to `old`
///
/// Each range is a maximal block of consecutive new lines; deleted lines
/// between two inserted runs do not split the block.
pub fn inserted_ranges(
    old: &str,
    new: &str,
    timeout: Duration,
) -> Result<Vec<Range<usize>>, DiffError> {
    let edits = diff_lines(old, new, timeout)?;

    let mut ranges = Vec::new();
    let mut current: Option<Range<usize>> = None;
    let mut line = 0;

    for edit in edits {
        match edit {
            Edit::Equal(n) => {
                ranges.extend(current.take());
                line += n;
            },
            Edit::Delete(_) => {},
            Edit::Insert(n) => {
                let range = current.get_or_insert(line..line);
                range.end += n;
                line += n;
            },
        }
    }
    ranges.extend(current);

    Ok(ranges)
}

/// Text of every inserted block of `new`, in file order
pub fn inserted_text(old: &str, new: &str, timeout: Duration) -> Result<Vec<String>, DiffError> {
    let ranges = inserted_ranges(old, new, timeout)?;
    let lines = split_lines(new);
    Ok(ranges.into_iter().map(|r| lines[r].concat()).collect())
}

/// Map both line lists onto a shared token alphabet
fn tokenize<'a>(old: &[&'a str], new: &[&'a str]) -> (Vec<usize>, Vec<usize>) {
    let mut table: HashMap<&'a str, usize> = HashMap::new();
    let mut intern = |line: &'a str| -> usize {
        let next = table.len();
        *table.entry(line).or_insert(next)
    };
    let a = old.iter().map(|&line| intern(line)).collect();
    let b = new.iter().map(|&line| intern(line)).collect();
    (a, b)
}

struct Context {
    deadline: Option<Instant>,
    timeout: Duration,
    edits: Vec<Edit>,
}

impl Context {
    fn check_deadline(&self) -> Result<(), DiffError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DiffError::Timeout(self.timeout)),
            _ => Ok(()),
        }
    }

    /// Append an edit, merging it into the previous one when the kind matches
    fn push(&mut self, edit: Edit) {
        let count = match edit {
            Edit::Equal(n) | Edit::Delete(n) | Edit::Insert(n) => n,
        };
        if count == 0 {
            return;
        }
        match (self.edits.last_mut(), edit) {
            (Some(Edit::Equal(prev)), Edit::Equal(n))
            | (Some(Edit::Delete(prev)), Edit::Delete(n))
            | (Some(Edit::Insert(prev)), Edit::Insert(n)) => *prev += n,
            _ => self.edits.push(edit),
        }
    }
}

fn diff_tokens(a: &[usize], b: &[usize], ctx: &mut Context) -> Result<(), DiffError> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    ctx.push(Edit::Equal(prefix));

    if a.is_empty() {
        ctx.push(Edit::Insert(b.len()));
    } else if b.is_empty() {
        ctx.push(Edit::Delete(a.len()));
    } else {
        ctx.check_deadline()?;
        match bisect(a, b, ctx)? {
            Some((x, y)) if (x, y) != (0, 0) && (x, y) != (a.len(), b.len()) => {
                diff_tokens(&a[..x], &b[..y], ctx)?;
                diff_tokens(&a[x..], &b[y..], ctx)?;
            },
            _ => {
                ctx.push(Edit::Delete(a.len()));
                ctx.push(Edit::Insert(b.len()));
            },
        }
    }

    ctx.push(Edit::Equal(suffix));
    Ok(())
}

/// Find the middle snake of the shortest edit script between `a` and `b`
///
/// Returns the split point where the forward and reverse searches overlap.
/// Checks the deadline once per edit distance step.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::many_single_char_names)]
fn bisect(a: &[usize], b: &[usize], ctx: &Context) -> Result<Option<(usize, usize)>, DiffError> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let v_offset = max_d;
    let v_len = 2 * max_d + 2;
    let mut v1 = vec![-1_isize; v_len as usize];
    let mut v2 = vec![-1_isize; v_len as usize];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = n - m;
    // With an odd delta the forward search detects the overlap, otherwise the reverse one.
    let front = delta % 2 != 0;
    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0, 0, 0, 0);

    let forward_eq = |x: isize, y: isize| a[x as usize] == b[y as usize];
    let reverse_eq = |x: isize, y: isize| a[(n - x - 1) as usize] == b[(m - y - 1) as usize];

    for d in 0..max_d {
        ctx.check_deadline()?;

        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 >= 0 && y1 >= 0 && x1 < n && y1 < m && forward_eq(x1, y1) {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if (0..v_len).contains(&k2_offset) && v2[k2_offset as usize] != -1 {
                    let x2 = n - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return Ok(Some((x1 as usize, y1 as usize)));
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 >= 0 && y2 >= 0 && x2 < n && y2 < m && reverse_eq(x2, y2) {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if (0..v_len).contains(&k1_offset) && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    if x1 >= n - x2 && x1 >= 0 && y1 >= 0 {
                        return Ok(Some((x1 as usize, y1 as usize)));
                    }
                }
            }
            k2 += 2;
        }
    }

    Ok(None)
}
