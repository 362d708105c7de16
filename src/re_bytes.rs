use std::{borrow::Cow, collections::HashMap, sync::Arc};

use bstr::BStr;

use crate::{
    classify::EngineKind,
    error::Error,
    exec::Exec,
    expand::expand_bytes,
    re_builder::bytes::RegexBuilder,
    re_trait::{FindCaptures, FindMatches, Input, Slot},
};

/// A compiled regular expression for searching arbitrary bytes.
///
/// This has the same API as [`crate::Regex`], except haystacks,
/// replacements and matches are `&[u8]`. The haystack doesn't need to be
/// valid UTF-8. With Unicode mode enabled (the default), patterns running on
/// the extended engine treat the haystack as UTF-8 and skip over invalid
/// sequences. Disable Unicode mode to match arbitrary bytes, e.g. with
/// `(?-u:\xFF)` on the simple engine or `\xFF` on the extended engine.
///
/// # Example
///
/// ```
/// use regex_pcre::bytes::Regex;
///
/// let re = Regex::new(r"(?<=\$)\d+")?;
/// let m = re.find(b"price: $42\xFF")?.unwrap();
/// assert_eq!(b"42", m.as_bytes());
/// # Ok::<(), regex_pcre::Error>(())
/// ```
pub struct Regex(Exec);

impl core::fmt::Display for Regex {
    /// Shows the original regular expression.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Debug for Regex {
    /// Shows the original regular expression.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl core::str::FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    fn from_str(s: &str) -> Result<Regex, Error> {
        Regex::new(s)
    }
}

impl TryFrom<&str> for Regex {
    type Error = Error;

    /// Attempts to parse a string into a regular expression
    fn try_from(s: &str) -> Result<Regex, Error> {
        Regex::new(s)
    }
}

impl TryFrom<String> for Regex {
    type Error = Error;

    /// Attempts to parse a string into a regular expression
    fn try_from(s: String) -> Result<Regex, Error> {
        Regex::new(&s)
    }
}

/// Core regular expression methods.
impl Regex {
    /// Compiles a regular expression. Once compiled, it can be used
    /// repeatedly to search, split or replace substrings in a haystack.
    ///
    /// To configure flags or limits, use [`RegexBuilder`].
    pub fn new(re: &str) -> Result<Regex, Error> {
        RegexBuilder::new(re).build()
    }

    /// Compiles a regular expression, panicking if it's invalid.
    ///
    /// # Panics
    ///
    /// If the pattern fails to compile.
    pub fn must_compile(re: &str) -> Regex {
        match Regex::new(re) {
            Ok(re) => re,
            Err(err) => panic!("regex `{}` failed to compile: {}", re, err),
        }
    }

    pub(crate) fn from_exec(exec: Exec) -> Regex {
        Regex(exec)
    }

    /// Returns true if and only if there is a match for the regex anywhere
    /// in the haystack given.
    pub fn is_match(&self, haystack: &[u8]) -> Result<bool, Error> {
        self.is_match_at(haystack, 0)
    }

    /// Returns the leftmost-first match in the haystack, if one exists.
    pub fn find<'h>(
        &self,
        haystack: &'h [u8],
    ) -> Result<Option<Match<'h>>, Error> {
        self.find_at(haystack, 0)
    }

    /// Returns an iterator over all non-overlapping matches in the haystack.
    ///
    /// Each item is a `Result`. If a search fails, the error is yielded and
    /// the iterator stops.
    pub fn find_iter<'r, 'h>(&'r self, haystack: &'h [u8]) -> Matches<'r, 'h> {
        Matches { haystack, it: self.0.find_iter(Input::Bytes(haystack)) }
    }

    /// Returns the capture groups of the leftmost-first match, if one
    /// exists.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::bytes::Regex;
    ///
    /// let re = Regex::new(r"(?<key>\w+)=(?<value>\w+)")?;
    /// let caps = re.captures(b"\xFFname=pcre")?.unwrap();
    /// assert_eq!(b"name", &caps["key"]);
    /// assert_eq!(b"pcre", &caps["value"]);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn captures<'h>(
        &self,
        haystack: &'h [u8],
    ) -> Result<Option<Captures<'h>>, Error> {
        self.captures_at(haystack, 0)
    }

    /// Returns an iterator over the capture groups of all non-overlapping
    /// matches in the haystack.
    pub fn captures_iter<'r, 'h>(
        &'r self,
        haystack: &'h [u8],
    ) -> CaptureMatches<'r, 'h> {
        CaptureMatches {
            haystack,
            names: Arc::clone(self.0.capture_names()),
            name_idx: Arc::clone(self.0.capture_name_idx()),
            it: self.0.captures_iter(Input::Bytes(haystack)),
        }
    }

    /// Replaces the leftmost-first match with the replacement provided. The
    /// replacement can be a regular byte string (where `$N` and `$name` are
    /// expanded to match capture groups) or a function that takes a
    /// [`Captures`] and returns the replaced byte string.
    ///
    /// If no match is found, then the haystack is returned unchanged as a
    /// borrowed `Cow`.
    pub fn replace<'h, R: Replacer>(
        &self,
        haystack: &'h [u8],
        rep: R,
    ) -> Result<Cow<'h, [u8]>, Error> {
        self.replacen(haystack, 1, rep)
    }

    /// Replaces all non-overlapping matches in the haystack with the
    /// replacement provided. This is the same as calling `replacen` with
    /// `limit` set to `0`.
    pub fn replace_all<'h, R: Replacer>(
        &self,
        haystack: &'h [u8],
        rep: R,
    ) -> Result<Cow<'h, [u8]>, Error> {
        self.replacen(haystack, 0, rep)
    }

    /// Replaces at most `limit` non-overlapping matches in the haystack with
    /// the replacement provided. If `limit` is `0`, then all non-overlapping
    /// matches are replaced.
    ///
    /// If any search fails, the error is returned and nothing is replaced.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::bytes::Regex;
    ///
    /// let re = Regex::new(r"(\w)\1")?;
    /// let out = re.replacen(b"aa bb cc", 2, |caps: &regex_pcre::bytes::Captures| {
    ///     caps[1].to_ascii_uppercase()
    /// })?;
    /// assert_eq!(&b"A B cc"[..], &*out);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn replacen<'h, R: Replacer>(
        &self,
        haystack: &'h [u8],
        limit: usize,
        mut rep: R,
    ) -> Result<Cow<'h, [u8]>, Error> {
        // Without `$` expansion, we don't need capture groups at all.
        if let Some(rep) = rep.no_expansion() {
            let mut new: Option<Vec<u8>> = None;
            let mut last_match = 0;
            for (i, m) in self.find_iter(haystack).enumerate() {
                let m = m?;
                let new = new
                    .get_or_insert_with(|| Vec::with_capacity(haystack.len()));
                new.extend_from_slice(&haystack[last_match..m.start()]);
                new.extend_from_slice(&rep);
                last_match = m.end();
                if limit > 0 && i + 1 >= limit {
                    break;
                }
            }
            return Ok(match new {
                None => Cow::Borrowed(haystack),
                Some(mut new) => {
                    new.extend_from_slice(&haystack[last_match..]);
                    Cow::Owned(new)
                }
            });
        }

        let mut new: Option<Vec<u8>> = None;
        let mut last_match = 0;
        for (i, caps) in self.captures_iter(haystack).enumerate() {
            let caps = caps?;
            // unwrap on 0 is OK because captures only reports matches
            let m = caps.get(0).unwrap();
            let new =
                new.get_or_insert_with(|| Vec::with_capacity(haystack.len()));
            new.extend_from_slice(&haystack[last_match..m.start()]);
            rep.replace_append(&caps, new);
            last_match = m.end();
            if limit > 0 && i + 1 >= limit {
                break;
            }
        }
        Ok(match new {
            None => Cow::Borrowed(haystack),
            Some(mut new) => {
                new.extend_from_slice(&haystack[last_match..]);
                Cow::Owned(new)
            }
        })
    }
}

/// Advanced or "lower level" search methods.
impl Regex {
    /// Returns the same as [`Regex::is_match`], but starts the search at the
    /// given offset.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()`.
    pub fn is_match_at(
        &self,
        haystack: &[u8],
        start: usize,
    ) -> Result<bool, Error> {
        Ok(self.0.search(Input::Bytes(haystack), start, &mut [])?.is_some())
    }

    /// Returns the same as [`Regex::find`], but starts the search at the
    /// given offset.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()`.
    pub fn find_at<'h>(
        &self,
        haystack: &'h [u8],
        start: usize,
    ) -> Result<Option<Match<'h>>, Error> {
        let m = self.0.search(Input::Bytes(haystack), start, &mut [])?;
        Ok(m.map(|(s, e)| Match::new(haystack, s, e)))
    }

    /// Returns the same as [`Regex::captures`], but starts the search at the
    /// given offset.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()`.
    pub fn captures_at<'h>(
        &self,
        haystack: &'h [u8],
        start: usize,
    ) -> Result<Option<Captures<'h>>, Error> {
        let mut slots = self.0.alloc_slots();
        let m = self.0.search(Input::Bytes(haystack), start, &mut slots)?;
        Ok(m.map(|_| Captures {
            haystack,
            slots,
            names: Arc::clone(self.0.capture_names()),
            name_idx: Arc::clone(self.0.capture_name_idx()),
        }))
    }
}

/// Auxiliary methods.
impl Regex {
    /// Returns the original string of this regex.
    pub fn as_str(&self) -> &str {
        self.0.pattern()
    }

    /// Returns the engine this regex was routed to.
    pub fn engine_kind(&self) -> EngineKind {
        self.0.kind()
    }

    /// Returns true if this regex runs on the extended (PCRE2) engine.
    pub fn is_extended(&self) -> bool {
        self.0.kind().is_extended()
    }

    /// Returns an iterator over the capture names, indexed by group.
    pub fn capture_names(&self) -> CaptureNames<'_> {
        CaptureNames(self.0.capture_names().iter())
    }

    /// Returns the number of capture groups in this regex, including the
    /// implicit group of the overall match.
    pub fn captures_len(&self) -> usize {
        self.0.captures_len()
    }

    /// Releases the compiled program and its native resources.
    ///
    /// See [`crate::Regex::close`].
    pub fn close(&self) -> bool {
        self.0.release()
    }

    /// Returns true if this regex has been closed.
    pub fn is_closed(&self) -> bool {
        self.0.is_released()
    }
}

/// Represents a single match of a regex in a haystack.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Match<'h> {
    haystack: &'h [u8],
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    #[inline]
    fn new(haystack: &'h [u8], start: usize, end: usize) -> Match<'h> {
        Match { haystack, start, end }
    }

    /// Returns the byte offset of the start of the match in the haystack.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the byte offset of the end of the match in the haystack.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns true if and only if this match has a length of zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the length, in bytes, of this match.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns the range over the starting and ending byte offsets of the
    /// match in the haystack.
    #[inline]
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }

    /// Returns the bytes of the haystack that matched.
    #[inline]
    pub fn as_bytes(&self) -> &'h [u8] {
        &self.haystack[self.range()]
    }
}

impl<'h> core::fmt::Debug for Match<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Match")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("bytes", &BStr::new(self.as_bytes()))
            .finish()
    }
}

impl<'h> From<Match<'h>> for &'h [u8] {
    fn from(m: Match<'h>) -> &'h [u8] {
        m.as_bytes()
    }
}

impl<'h> From<Match<'h>> for core::ops::Range<usize> {
    fn from(m: Match<'h>) -> core::ops::Range<usize> {
        m.range()
    }
}

/// Represents the capture groups for a single match.
///
/// A group that didn't participate in the match is `None`, which is distinct
/// from a group that matched the empty string.
pub struct Captures<'h> {
    haystack: &'h [u8],
    slots: Vec<Slot>,
    names: Arc<[Option<String>]>,
    name_idx: Arc<HashMap<String, usize>>,
}

impl<'h> Captures<'h> {
    /// Returns the `Match` associated with the capture group at index `i`.
    /// If `i` does not correspond to a capture group, or if the capture group
    /// did not participate in the match, then `None` is returned.
    pub fn get(&self, i: usize) -> Option<Match<'h>> {
        let (s, e) = match (self.slots.get(i * 2), self.slots.get(i * 2 + 1)) {
            (Some(&Some(s)), Some(&Some(e))) => (s, e),
            _ => return None,
        };
        Some(Match::new(self.haystack, s, e))
    }

    /// Returns the `Match` associated with the capture group named `name`.
    pub fn name(&self, name: &str) -> Option<Match<'h>> {
        self.name_idx.get(name).and_then(|&i| self.get(i))
    }

    /// Expands all instances of `$ref` in `replacement` to the corresponding
    /// capture group, and writes them to the `dst` buffer given.
    ///
    /// See [`crate::Captures::expand`] for the syntax.
    pub fn expand(&self, replacement: &[u8], dst: &mut Vec<u8>) {
        expand_bytes(self, replacement, dst);
    }

    /// Returns an iterator over all capture groups. This includes both
    /// matching and non-matching groups.
    pub fn iter<'c>(&'c self) -> SubCaptureMatches<'c, 'h> {
        SubCaptureMatches { caps: self, idx: 0 }
    }

    /// Returns the total number of capture groups. This includes both
    /// matching and non-matching groups.
    pub fn len(&self) -> usize {
        self.slots.len() / 2
    }
}

impl<'h> core::fmt::Debug for Captures<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct CapturesDebugMap<'a> {
            caps: &'a Captures<'a>,
        }

        impl<'a> core::fmt::Debug for CapturesDebugMap<'a> {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                let mut map = f.debug_map();
                for (group_index, maybe_name) in self.caps.names.iter().enumerate() {
                    let key = Key(group_index, maybe_name.as_deref());
                    match self.caps.get(group_index) {
                        None => map.entry(&key, &None::<()>),
                        Some(mat) => map.entry(&key, &Value(mat)),
                    };
                }
                map.finish()
            }
        }

        struct Key<'a>(usize, Option<&'a str>);

        impl<'a> core::fmt::Debug for Key<'a> {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}", self.0)?;
                if let Some(name) = self.1 {
                    write!(f, "/{:?}", name)?;
                }
                Ok(())
            }
        }

        struct Value<'a>(Match<'a>);

        impl<'a> core::fmt::Debug for Value<'a> {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(
                    f,
                    "{}..{}/{:?}",
                    self.0.start(),
                    self.0.end(),
                    BStr::new(self.0.as_bytes())
                )
            }
        }

        f.debug_tuple("Captures")
            .field(&CapturesDebugMap { caps: self })
            .finish()
    }
}

/// Get a matching capture group's haystack bytes by index.
///
/// # Panics
///
/// If there is no matching group at the given index.
impl<'h> core::ops::Index<usize> for Captures<'h> {
    type Output = [u8];

    fn index<'a>(&'a self, i: usize) -> &'a [u8] {
        self.get(i)
            .map(|m| m.as_bytes())
            .unwrap_or_else(|| panic!("no group at index '{}'", i))
    }
}

/// Get a matching capture group's haystack bytes by name.
///
/// # Panics
///
/// If there is no matching group with the given name.
impl<'h, 'n> core::ops::Index<&'n str> for Captures<'h> {
    type Output = [u8];

    fn index<'a>(&'a self, name: &'n str) -> &'a [u8] {
        self.name(name)
            .map(|m| m.as_bytes())
            .unwrap_or_else(|| panic!("no group named '{}'", name))
    }
}

/// An iterator over all non-overlapping matches in a haystack.
///
/// This iterator yields `Result<Match, Error>` values. It stops after the
/// first error.
#[derive(Debug)]
pub struct Matches<'r, 'h> {
    haystack: &'h [u8],
    it: FindMatches<'r, 'h>,
}

impl<'r, 'h> Iterator for Matches<'r, 'h> {
    type Item = Result<Match<'h>, Error>;

    fn next(&mut self) -> Option<Result<Match<'h>, Error>> {
        let haystack = self.haystack;
        self.it.next().map(|r| r.map(|(s, e)| Match::new(haystack, s, e)))
    }
}

impl<'r, 'h> core::iter::FusedIterator for Matches<'r, 'h> {}

/// An iterator over all non-overlapping capture matches in a haystack.
///
/// This iterator yields `Result<Captures, Error>` values. It stops after the
/// first error.
#[derive(Debug)]
pub struct CaptureMatches<'r, 'h> {
    haystack: &'h [u8],
    names: Arc<[Option<String>]>,
    name_idx: Arc<HashMap<String, usize>>,
    it: FindCaptures<'r, 'h>,
}

impl<'r, 'h> Iterator for CaptureMatches<'r, 'h> {
    type Item = Result<Captures<'h>, Error>;

    fn next(&mut self) -> Option<Result<Captures<'h>, Error>> {
        let slots = match self.it.next()? {
            Err(err) => return Some(Err(err)),
            Ok(slots) => slots,
        };
        Some(Ok(Captures {
            haystack: self.haystack,
            slots,
            names: Arc::clone(&self.names),
            name_idx: Arc::clone(&self.name_idx),
        }))
    }
}

impl<'r, 'h> core::iter::FusedIterator for CaptureMatches<'r, 'h> {}

/// An iterator over the names of all capture groups in a regex.
///
/// `None` is yielded for groups with no name, including the implicit group
/// for the overall match.
#[derive(Clone, Debug)]
pub struct CaptureNames<'r>(core::slice::Iter<'r, Option<String>>);

impl<'r> Iterator for CaptureNames<'r> {
    type Item = Option<&'r str>;

    fn next(&mut self) -> Option<Option<&'r str>> {
        self.0.next().map(|name| name.as_deref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }

    fn count(self) -> usize {
        self.0.count()
    }
}

impl<'r> ExactSizeIterator for CaptureNames<'r> {}

impl<'r> core::iter::FusedIterator for CaptureNames<'r> {}

/// An iterator over all group matches in a [`Captures`] value.
#[derive(Clone, Debug)]
pub struct SubCaptureMatches<'c, 'h> {
    caps: &'c Captures<'h>,
    idx: usize,
}

impl<'c, 'h> Iterator for SubCaptureMatches<'c, 'h> {
    type Item = Option<Match<'h>>;

    fn next(&mut self) -> Option<Option<Match<'h>>> {
        if self.idx >= self.caps.len() {
            return None;
        }
        let m = self.caps.get(self.idx);
        self.idx += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.caps.len() - self.idx;
        (len, Some(len))
    }
}

impl<'c, 'h> ExactSizeIterator for SubCaptureMatches<'c, 'h> {}

impl<'c, 'h> core::iter::FusedIterator for SubCaptureMatches<'c, 'h> {}

/// A trait for types that can be used to replace matches in a haystack.
///
/// Implementations are provided for `&[u8]` and other byte string types, as
/// well as `FnMut(&Captures) -> T` where `T: AsRef<[u8]>`.
pub trait Replacer {
    /// Appends possibly empty data to `dst` to replace the current match.
    ///
    /// The current match is represented by `caps`, which is guaranteed to
    /// have a match at capture group `0`.
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>);

    /// Return a fixed unchanging replacement byte string.
    ///
    /// When doing replacements, if access to [`Captures`] is not needed
    /// (e.g., the replacement byte string does not need `$` expansion), then
    /// it can be beneficial to avoid finding sub-captures.
    fn no_expansion<'r>(&'r mut self) -> Option<Cow<'r, [u8]>> {
        None
    }

    /// Returns a type that implements `Replacer`, but that borrows and wraps
    /// this `Replacer`.
    fn by_ref<'r>(&'r mut self) -> ReplacerRef<'r, Self> {
        ReplacerRef(self)
    }
}

impl<'a> Replacer for &'a [u8] {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        caps.expand(*self, dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl<'a, const N: usize> Replacer for &'a [u8; N] {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        caps.expand(&self[..], dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for &'a Vec<u8> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        self.as_slice().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl Replacer for Vec<u8> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        self.as_slice().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for Cow<'a, [u8]> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        self.as_ref().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for &'a Cow<'a, [u8]> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        self.as_ref().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        no_expansion(self)
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&Captures<'_>) -> T,
    T: AsRef<[u8]>,
{
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        dst.extend_from_slice((*self)(caps).as_ref());
    }
}

/// A by-reference adaptor for a [`Replacer`].
///
/// This type is created by [`Replacer::by_ref`].
#[derive(Debug)]
pub struct ReplacerRef<'a, R: ?Sized>(&'a mut R);

impl<'a, R: Replacer + ?Sized + 'a> Replacer for ReplacerRef<'a, R> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut Vec<u8>) {
        self.0.replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        self.0.no_expansion()
    }
}

/// A helper type for forcing literal byte string replacement.
///
/// It can be used with routines like [`Regex::replace`] and
/// [`Regex::replace_all`] to do a literal replacement without expanding
/// `$name` to their corresponding capture groups.
#[derive(Clone, Debug)]
pub struct NoExpand<'t>(pub &'t [u8]);

impl<'t> Replacer for NoExpand<'t> {
    fn replace_append(&mut self, _: &Captures<'_>, dst: &mut Vec<u8>) {
        dst.extend_from_slice(self.0);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(self.0))
    }
}

/// Returns the replacement as a borrowed `Cow` if it contains no `$`, and
/// therefore needs no expansion.
fn no_expansion<T: AsRef<[u8]>>(replacement: &T) -> Option<Cow<'_, [u8]>> {
    let replacement = replacement.as_ref();
    match memchr::memchr(b'$', replacement) {
        Some(_) => None,
        None => Some(Cow::Borrowed(replacement)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_match_uses_escapes() {
        let re = Regex::new(r"(?-u:\xFF)a").unwrap();
        let m = re.find(b"\xFFa").unwrap().unwrap();
        assert_eq!(
            r#"Match { start: 0, end: 2, bytes: "\xFFa" }"#,
            format!("{:?}", m)
        );
    }

    #[test]
    fn array_replacer() {
        let re = Regex::new(r"(?<=x)y").unwrap();
        assert_eq!(&b"xz"[..], &*re.replace(b"xy", b"z").unwrap());
    }
}
