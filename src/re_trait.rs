use crate::{classify::EngineKind, error::Error, exec::Exec};

/// Slot is a single saved capture location. Note that there are two slots for
/// every capture in a regular expression (one slot each for the start and end
/// of the capture).
pub(crate) type Slot = Option<usize>;

/// The haystack of a search, tagged with its flavor. A `&str` haystack is
/// known to be valid UTF-8, which lets engines skip validation and makes
/// character boundaries meaningful.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Input<'h> {
    Str(&'h str),
    Bytes(&'h [u8]),
}

impl<'h> Input<'h> {
    pub(crate) fn as_bytes(&self) -> &'h [u8] {
        match *self {
            Input::Str(s) => s.as_bytes(),
            Input::Bytes(b) => b,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if a search may start at `i`.
    pub(crate) fn is_valid_start(&self, i: usize) -> bool {
        match *self {
            Input::Str(s) => s.is_char_boundary(i),
            Input::Bytes(b) => i <= b.len(),
        }
    }
}

/// Engine describes a compiled program that can run searches.
///
/// This exists so that the lifecycle manager and the iterators below can be
/// written once for both the simple and the extended engine.
pub(crate) trait Engine: Send + Sync + core::fmt::Debug {
    /// Which engine this is.
    fn kind(&self) -> EngineKind;

    /// The number of groups, including the implicit group for the overall
    /// match. There are always two slots per group.
    fn captures_len(&self) -> usize;

    /// Returns the name of each group, indexed by group. Unnamed groups
    /// (including group 0) are `None`.
    fn group_names(&self) -> Vec<Option<String>>;

    /// Returns the position of the next character after `i`.
    ///
    /// For a `&str` haystack this is `i` plus the length of the UTF-8
    /// sequence at `i`. For bytes it is `i + 1`, unless the engine treats the
    /// haystack as UTF-8.
    fn next_after_empty(&self, input: Input<'_>, i: usize) -> usize {
        match input {
            Input::Str(s) => {
                i + s[i..].chars().next().map_or(1, |c| c.len_utf8())
            }
            Input::Bytes(_) => i + 1,
        }
    }

    /// Returns the leftmost-first match at or after `start`, if one exists,
    /// and fills in the capture slots. When `slots` is empty, only the
    /// overall match is reported. Otherwise it has exactly two slots per
    /// group.
    ///
    /// Callers guarantee that `start` is a valid start for `input`.
    fn search(
        &self,
        input: Input<'_>,
        start: usize,
        slots: &mut [Slot],
    ) -> Result<Option<(usize, usize)>, Error>;
}

/// An iterator over all non-overlapping successive leftmost-first matches.
///
/// A search that fails is yielded as an error once, after which the iterator
/// is exhausted.
#[derive(Debug)]
pub(crate) struct FindMatches<'r, 'h> {
    exec: &'r Exec,
    input: Input<'h>,
    last_end: usize,
    last_match: Option<usize>,
    done: bool,
}

impl<'r, 'h> FindMatches<'r, 'h> {
    pub(crate) fn new(exec: &'r Exec, input: Input<'h>) -> FindMatches<'r, 'h> {
        FindMatches { exec, input, last_end: 0, last_match: None, done: false }
    }

    /// Runs the next search, filling `slots`, and advances past its match.
    /// Returns `None` when the iterator is exhausted.
    fn advance(
        &mut self,
        slots: &mut [Slot],
    ) -> Option<Result<(usize, usize), Error>> {
        loop {
            if self.done || self.last_end > self.input.len() {
                return None;
            }
            let (s, e) =
                match self.exec.search(self.input, self.last_end, slots) {
                    Ok(None) => {
                        self.done = true;
                        return None;
                    }
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                    Ok(Some((s, e))) => (s, e),
                };
            if s == e {
                // This is an empty match. To ensure we make progress, start
                // the next search at the smallest possible starting position
                // of the next match following this one.
                self.last_end = self.exec.next_after_empty(self.input, e);
                // Don't accept empty matches immediately following a match.
                // Just move on to the next match.
                if Some(e) == self.last_match {
                    continue;
                }
            } else {
                self.last_end = e;
            }
            self.last_match = Some(e);
            return Some(Ok((s, e)));
        }
    }
}

impl<'r, 'h> Iterator for FindMatches<'r, 'h> {
    type Item = Result<(usize, usize), Error>;

    fn next(&mut self) -> Option<Result<(usize, usize), Error>> {
        self.advance(&mut [])
    }
}

impl<'r, 'h> core::iter::FusedIterator for FindMatches<'r, 'h> {}

/// An iterator over all non-overlapping successive leftmost-first matches with
/// captures.
#[derive(Debug)]
pub(crate) struct FindCaptures<'r, 'h>(FindMatches<'r, 'h>);

impl<'r, 'h> FindCaptures<'r, 'h> {
    pub(crate) fn new(exec: &'r Exec, input: Input<'h>) -> FindCaptures<'r, 'h> {
        FindCaptures(FindMatches::new(exec, input))
    }
}

impl<'r, 'h> Iterator for FindCaptures<'r, 'h> {
    type Item = Result<Vec<Slot>, Error>;

    fn next(&mut self) -> Option<Result<Vec<Slot>, Error>> {
        let mut slots = vec![None; 2 * self.0.exec.captures_len()];
        match self.0.advance(&mut slots)? {
            Err(err) => Some(Err(err)),
            Ok(_) => Some(Ok(slots)),
        }
    }
}

impl<'r, 'h> core::iter::FusedIterator for FindCaptures<'r, 'h> {}
