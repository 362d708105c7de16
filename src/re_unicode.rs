use std::{borrow::Cow, collections::HashMap, sync::Arc};

use crate::{
    classify::EngineKind,
    error::Error,
    exec::Exec,
    expand::expand_str,
    re_builder::unicode::RegexBuilder,
    re_trait::{FindCaptures, FindMatches, Input, Slot},
};

/// A compiled regular expression for searching Unicode haystacks.
///
/// A `Regex` can be used to search haystacks, split haystacks into substrings
/// or replace substrings in a haystack with a different substring. All
/// searching is done with an implicit `(?s:.)*?` at the beginning and end of
/// a pattern. To force an expression to match the whole string (or a prefix
/// or a suffix), you must use an anchor like `^` or `$` (or `\A` and `\z`).
///
/// Patterns are routed to one of two engines when compiled. Patterns the
/// `regex` crate supports run on it in linear time. Patterns using
/// lookaround, backreferences, atomic groups, recursion or any other
/// backtracking-only syntax run on PCRE2. See [`classify`](crate::classify()).
///
/// Since a search on the extended engine may fail (for example, by
/// exceeding the configured [`MatchLimits`](crate::MatchLimits)), and since a
/// regex may be [closed](Regex::close), every search returns a `Result`.
///
/// # Example
///
/// ```
/// use regex_pcre::Regex;
///
/// let re = Regex::new(r"(\w+)\s+\1")?;
/// assert!(re.is_extended());
/// let m = re.find("it is is a test")?.unwrap();
/// assert_eq!("is is", m.as_str());
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
    ///
    /// # Errors
    ///
    /// If an invalid pattern is given, then an error is returned. The error
    /// says which engine rejected the pattern.
    pub fn new(re: &str) -> Result<Regex, Error> {
        RegexBuilder::new(re).build()
    }

    /// Compiles a regular expression, panicking if it's invalid.
    ///
    /// This is meant for patterns known at compile time, typically stored in
    /// a `static`.
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
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"foo(?=bar)")?;
    /// assert!(re.is_match("foobar")?);
    /// assert!(!re.is_match("foobaz")?);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn is_match(&self, haystack: &str) -> Result<bool, Error> {
        self.is_match_at(haystack, 0)
    }

    /// Returns the leftmost-first match in the haystack, if one exists.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"(?<=foo)bar")?;
    /// let m = re.find("barfoobar")?.unwrap();
    /// assert_eq!(6..9, m.range());
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn find<'h>(&self, haystack: &'h str) -> Result<Option<Match<'h>>, Error> {
        self.find_at(haystack, 0)
    }

    /// Returns an iterator over all non-overlapping matches in the haystack.
    ///
    /// Each item is a `Result`. If a search fails, the error is yielded and
    /// the iterator stops. Matches yielded before the error stay valid.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"\b\w+\b")?;
    /// let words = re
    ///     .find_iter("one two three")
    ///     .map(|m| m.map(|m| m.as_str()))
    ///     .collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(vec!["one", "two", "three"], words);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn find_iter<'r, 'h>(&'r self, haystack: &'h str) -> Matches<'r, 'h> {
        Matches { haystack, it: self.0.find_iter(Input::Str(haystack)) }
    }

    /// Returns the capture groups of the leftmost-first match, if one
    /// exists.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"(foo)(?=bar)")?;
    /// let caps = re.captures("foobar")?.unwrap();
    /// assert_eq!("foo", &caps[0]);
    /// assert_eq!("foo", &caps[1]);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn captures<'h>(
        &self,
        haystack: &'h str,
    ) -> Result<Option<Captures<'h>>, Error> {
        self.captures_at(haystack, 0)
    }

    /// Returns an iterator over the capture groups of all non-overlapping
    /// matches in the haystack.
    ///
    /// Errors are reported the same way as [`Regex::find_iter`].
    pub fn captures_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> CaptureMatches<'r, 'h> {
        CaptureMatches {
            haystack,
            names: Arc::clone(self.0.capture_names()),
            name_idx: Arc::clone(self.0.capture_name_idx()),
            it: self.0.captures_iter(Input::Str(haystack)),
        }
    }

    /// Replaces the leftmost-first match with the replacement provided.
    /// The replacement can be a regular string (where `$N` and `$name` are
    /// expanded to match capture groups) or a function that takes a
    /// [`Captures`] and returns the replaced string.
    ///
    /// If no match is found, then the haystack is returned unchanged. In
    /// that case, this implementation will likely return a `Cow::Borrowed`
    /// value such that no allocation is performed.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"(foo)(bar)")?;
    /// assert_eq!("barfoo", re.replace("foobar", "$2$1")?);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn replace<'h, R: Replacer>(
        &self,
        haystack: &'h str,
        rep: R,
    ) -> Result<Cow<'h, str>, Error> {
        self.replacen(haystack, 1, rep)
    }

    /// Replaces all non-overlapping matches in the haystack with the
    /// replacement provided. This is the same as calling `replacen` with
    /// `limit` set to `0`.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::{NoExpand, Regex};
    ///
    /// let re = Regex::new(r"(?<=\d)(?=(\d{3})+\b)")?;
    /// assert_eq!("1,234,567", re.replace_all("1234567", NoExpand(","))?);
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn replace_all<'h, R: Replacer>(
        &self,
        haystack: &'h str,
        rep: R,
    ) -> Result<Cow<'h, str>, Error> {
        self.replacen(haystack, 0, rep)
    }

    /// Replaces at most `limit` non-overlapping matches in the haystack with
    /// the replacement provided. If `limit` is `0`, then all non-overlapping
    /// matches are replaced.
    ///
    /// If any search fails, the error is returned and nothing is replaced.
    pub fn replacen<'h, R: Replacer>(
        &self,
        haystack: &'h str,
        limit: usize,
        mut rep: R,
    ) -> Result<Cow<'h, str>, Error> {
        // If we know that the replacement doesn't have any capture
        // expansions, then we can use the fast path. The fast path can make
        // a tremendous difference:
        //
        //   1) We use `find_iter` instead of `captures_iter`. Not asking for
        //      captures generally makes the regex engines faster.
        //   2) We don't need to look up all of the capture groups and do
        //      replacements inside the replacement string. We just push it
        //      at each match and be done with it.
        if let Some(rep) = rep.no_expansion() {
            let mut new: Option<String> = None;
            let mut last_match = 0;
            for (i, m) in self.find_iter(haystack).enumerate() {
                let m = m?;
                let new = new
                    .get_or_insert_with(|| String::with_capacity(haystack.len()));
                new.push_str(&haystack[last_match..m.start()]);
                new.push_str(&rep);
                last_match = m.end();
                if limit > 0 && i + 1 >= limit {
                    break;
                }
            }
            return Ok(match new {
                None => Cow::Borrowed(haystack),
                Some(mut new) => {
                    new.push_str(&haystack[last_match..]);
                    Cow::Owned(new)
                }
            });
        }

        // The slower path, which we use if the replacement needs access to
        // capture groups.
        let mut new: Option<String> = None;
        let mut last_match = 0;
        for (i, caps) in self.captures_iter(haystack).enumerate() {
            let caps = caps?;
            // unwrap on 0 is OK because captures only reports matches
            let m = caps.get(0).unwrap();
            let new = new
                .get_or_insert_with(|| String::with_capacity(haystack.len()));
            new.push_str(&haystack[last_match..m.start()]);
            rep.replace_append(&caps, new);
            last_match = m.end();
            if limit > 0 && i + 1 >= limit {
                break;
            }
        }
        Ok(match new {
            None => Cow::Borrowed(haystack),
            Some(mut new) => {
                new.push_str(&haystack[last_match..]);
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
    /// The significance of the starting point is that it takes the
    /// surrounding context into consideration. For example, the `\A` anchor
    /// can only match when `start == 0`, and a lookbehind may look at the
    /// haystack before `start`.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()` or `start` isn't on a character boundary.
    pub fn is_match_at(
        &self,
        haystack: &str,
        start: usize,
    ) -> Result<bool, Error> {
        Ok(self.0.search(Input::Str(haystack), start, &mut [])?.is_some())
    }

    /// Returns the same as [`Regex::find`], but starts the search at the
    /// given offset.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()` or `start` isn't on a character boundary.
    pub fn find_at<'h>(
        &self,
        haystack: &'h str,
        start: usize,
    ) -> Result<Option<Match<'h>>, Error> {
        let m = self.0.search(Input::Str(haystack), start, &mut [])?;
        Ok(m.map(|(s, e)| Match::new(haystack, s, e)))
    }

    /// Returns the same as [`Regex::captures`], but starts the search at the
    /// given offset.
    ///
    /// # Errors
    ///
    /// If `start > haystack.len()` or `start` isn't on a character boundary.
    pub fn captures_at<'h>(
        &self,
        haystack: &'h str,
        start: usize,
    ) -> Result<Option<Captures<'h>>, Error> {
        let mut slots = self.0.alloc_slots();
        let m = self.0.search(Input::Str(haystack), start, &mut slots)?;
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
    ///
    /// The first item is always `None`, for the implicit group of the
    /// overall match. Unnamed groups are also `None`.
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
    /// Returns true if this call released the regex and false if it was
    /// already closed. Searches started after this fail with
    /// [`Error::Closed`]. Searches already running on other threads finish
    /// normally, and the resources are freed when the last one does.
    ///
    /// Dropping a regex closes it, so calling this is only needed to free
    /// resources early.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::{Error, Regex};
    ///
    /// let re = Regex::new(r"(?<=a)b")?;
    /// assert!(re.close());
    /// assert!(!re.close());
    /// assert!(re.is_closed());
    /// assert_eq!(Err(Error::Closed), re.is_match("ab"));
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn close(&self) -> bool {
        self.0.release()
    }

    /// Returns true if this regex has been closed.
    pub fn is_closed(&self) -> bool {
        self.0.is_released()
    }
}

/// Represents a single match of a regex in a haystack.
///
/// A `Match` contains both the start and end byte offsets of the match and
/// the actual substring corresponding to the range of those byte offsets.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Match<'h> {
    haystack: &'h str,
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    #[inline]
    fn new(haystack: &'h str, start: usize, end: usize) -> Match<'h> {
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

    /// Returns the substring of the haystack that matched.
    #[inline]
    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.range()]
    }
}

impl<'h> core::fmt::Debug for Match<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Match")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("string", &self.as_str())
            .finish()
    }
}

impl<'h> From<Match<'h>> for &'h str {
    fn from(m: Match<'h>) -> &'h str {
        m.as_str()
    }
}

impl<'h> From<Match<'h>> for core::ops::Range<usize> {
    fn from(m: Match<'h>) -> core::ops::Range<usize> {
        m.range()
    }
}

/// Represents the capture groups for a single match.
///
/// Capture groups refer to parts of a regex enclosed in parentheses. A group
/// that didn't participate in the match is `None`, which is distinct from a
/// group that matched the empty string.
///
/// `'h` is the lifetime of the haystack.
pub struct Captures<'h> {
    haystack: &'h str,
    slots: Vec<Slot>,
    names: Arc<[Option<String>]>,
    name_idx: Arc<HashMap<String, usize>>,
}

impl<'h> Captures<'h> {
    /// Returns the `Match` associated with the capture group at index `i`.
    /// If `i` does not correspond to a capture group, or if the capture group
    /// did not participate in the match, then `None` is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use regex_pcre::Regex;
    ///
    /// let re = Regex::new(r"[a-z]+(?:([0-9]+)|([A-Z]+))")?;
    /// let caps = re.captures("abc123")?.unwrap();
    /// assert_eq!(Some("123"), caps.get(1).map(|m| m.as_str()));
    /// assert!(caps.get(2).is_none());
    /// # Ok::<(), regex_pcre::Error>(())
    /// ```
    pub fn get(&self, i: usize) -> Option<Match<'h>> {
        let (s, e) = match (self.slots.get(i * 2), self.slots.get(i * 2 + 1)) {
            (Some(&Some(s)), Some(&Some(e))) => (s, e),
            _ => return None,
        };
        Some(Match::new(self.haystack, s, e))
    }

    /// Returns the `Match` associated with the capture group named `name`.
    /// If `name` isn't a valid capture group or it refers to a group that
    /// didn't match, then `None` is returned.
    pub fn name(&self, name: &str) -> Option<Match<'h>> {
        self.name_idx.get(name).and_then(|&i| self.get(i))
    }

    /// Expands all instances of `$ref` in `replacement` to the corresponding
    /// capture group, and writes them to the `dst` buffer given. A `ref` can
    /// be a capture group index or a name. If `ref` doesn't refer to a
    /// capture group that participated in the match, then it is replaced
    /// with the empty string.
    ///
    /// The longest possible name is used. For example, `$1a` looks up the
    /// capture group named `1a` and not the capture group at index `1`. To
    /// exert more precise control over the name, use braces, e.g., `${1}a`.
    /// To write a literal `$`, use `$$`.
    pub fn expand(&self, replacement: &str, dst: &mut String) {
        expand_str(self, replacement, dst);
    }

    /// Returns an iterator over all capture groups. This includes both
    /// matching and non-matching groups.
    pub fn iter<'c>(&'c self) -> SubCaptureMatches<'c, 'h> {
        SubCaptureMatches { caps: self, idx: 0 }
    }

    /// Returns the total number of capture groups. This includes both
    /// matching and non-matching groups.
    ///
    /// The length returned is always equivalent to the number of elements
    /// yielded by [`Captures::iter`]. Consequently, the length is always
    /// greater than zero since every `Captures` value always includes the
    /// match for the entire regex.
    pub fn len(&self) -> usize {
        self.slots.len() / 2
    }
}

impl<'h> core::fmt::Debug for Captures<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        /// A little helper type to provide a nice map-like debug
        /// representation for our capturing group spans.
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
                    self.0.as_str()
                )
            }
        }

        f.debug_tuple("Captures")
            .field(&CapturesDebugMap { caps: self })
            .finish()
    }
}

/// Get a matching capture group's haystack substring by index.
///
/// # Panics
///
/// If there is no matching group at the given index.
impl<'h> core::ops::Index<usize> for Captures<'h> {
    type Output = str;

    // The lifetime is written out to make it clear that the &str returned
    // does NOT have a lifetime equivalent to 'h.
    fn index<'a>(&'a self, i: usize) -> &'a str {
        self.get(i)
            .map(|m| m.as_str())
            .unwrap_or_else(|| panic!("no group at index '{}'", i))
    }
}

/// Get a matching capture group's haystack substring by name.
///
/// # Panics
///
/// If there is no matching group with the given name.
impl<'h, 'n> core::ops::Index<&'n str> for Captures<'h> {
    type Output = str;

    fn index<'a>(&'a self, name: &'n str) -> &'a str {
        self.name(name)
            .map(|m| m.as_str())
            .unwrap_or_else(|| panic!("no group named '{}'", name))
    }
}

/// An iterator over all non-overlapping matches in a haystack.
///
/// This iterator yields `Result<Match, Error>` values. It stops after the
/// first error.
///
/// `'r` is the lifetime of the compiled regular expression and `'h` is the
/// lifetime of the haystack.
#[derive(Debug)]
pub struct Matches<'r, 'h> {
    haystack: &'h str,
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
///
/// `'r` is the lifetime of the compiled regular expression and `'h` is the
/// lifetime of the haystack.
#[derive(Debug)]
pub struct CaptureMatches<'r, 'h> {
    haystack: &'h str,
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
/// This iterator yields values of type `Option<&str>` in order of the opening
/// capture group parenthesis in the regex pattern. `None` is yielded for
/// groups with no name. The first element always corresponds to the implicit
/// and unnamed group for the overall match.
///
/// `'r` is the lifetime of the compiled regular expression.
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
///
/// This iterator yields values of type `Option<Match>`, where `None`
/// indicates that the group did not participate in the match.
///
/// `'c` is the lifetime of the captures value and `'h` is the lifetime of
/// the haystack.
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
/// In general, users of this crate shouldn't need to implement this trait,
/// since implementations are already provided for `&str` along with other
/// variants of string types, as well as `FnMut(&Captures) -> String` (or any
/// `FnMut(&Captures) -> T` where `T: AsRef<str>`). Those cover most use
/// cases, but callers can implement this trait directly if necessary.
///
/// # Example
///
/// ```
/// use regex_pcre::{Captures, Regex, Replacer};
///
/// struct NameSwapper;
///
/// impl Replacer for NameSwapper {
///     fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
///         dst.push_str(&caps["first"]);
///         dst.push_str(" ");
///         dst.push_str(&caps["last"]);
///     }
/// }
///
/// let re = Regex::new(r"(?<last>[^,\s]+),\s+(?<first>\S+)")?;
/// let result = re.replace("Springsteen, Bruce", NameSwapper)?;
/// assert_eq!(result, "Bruce Springsteen");
/// # Ok::<(), regex_pcre::Error>(())
/// ```
pub trait Replacer {
    /// Appends possibly empty data to `dst` to replace the current match.
    ///
    /// The current match is represented by `caps`, which is guaranteed to
    /// have a match at capture group `0`.
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String);

    /// Return a fixed unchanging replacement string.
    ///
    /// When doing replacements, if access to [`Captures`] is not needed
    /// (e.g., the replacement string does not need `$` expansion), then it
    /// can be beneficial to avoid finding sub-captures.
    fn no_expansion<'r>(&'r mut self) -> Option<Cow<'r, str>> {
        None
    }

    /// Returns a type that implements `Replacer`, but that borrows and wraps
    /// this `Replacer`.
    ///
    /// This is useful when you want to take a generic `Replacer` (which might
    /// not be cloneable) and use it without consuming it, so it can be used
    /// more than once.
    fn by_ref<'r>(&'r mut self) -> ReplacerRef<'r, Self> {
        ReplacerRef(self)
    }
}

impl<'a> Replacer for &'a str {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        caps.expand(*self, dst);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for &'a String {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.as_str().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl Replacer for String {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.as_str().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for Cow<'a, str> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.as_ref().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl<'a> Replacer for &'a Cow<'a, str> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.as_ref().replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        no_expansion(self)
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&Captures<'_>) -> T,
    T: AsRef<str>,
{
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        dst.push_str((*self)(caps).as_ref());
    }
}

/// A by-reference adaptor for a [`Replacer`].
///
/// This permits reusing the same `Replacer` value in multiple calls to a
/// replacement routine like [`Regex::replace_all`].
///
/// This type is created by [`Replacer::by_ref`].
#[derive(Debug)]
pub struct ReplacerRef<'a, R: ?Sized>(&'a mut R);

impl<'a, R: Replacer + ?Sized + 'a> Replacer for ReplacerRef<'a, R> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        self.0.replace_append(caps, dst)
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        self.0.no_expansion()
    }
}

/// A helper type for forcing literal string replacement.
///
/// It can be used with routines like [`Regex::replace`] and
/// [`Regex::replace_all`] to do a literal string replacement without
/// expanding `$name` to their corresponding capture groups.
///
/// # Example
///
/// ```
/// use regex_pcre::{NoExpand, Regex};
///
/// let re = Regex::new(r"(?<last>[^,\s]+),\s+(\S+)")?;
/// let result = re.replace("Springsteen, Bruce", NoExpand("$2 $last"))?;
/// assert_eq!(result, "$2 $last");
/// # Ok::<(), regex_pcre::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct NoExpand<'t>(pub &'t str);

impl<'t> Replacer for NoExpand<'t> {
    fn replace_append(&mut self, _: &Captures<'_>, dst: &mut String) {
        dst.push_str(self.0);
    }

    fn no_expansion(&mut self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.0))
    }
}

/// Quickly checks the given replacement string for whether interpolation
/// should be done on it. It returns `None` if a `$` was found anywhere in the
/// given string, which suggests interpolation needs to be done. But if there's
/// no `$` anywhere, then interpolation definitely does not need to be done. In
/// that case, the given string is returned as a borrowed `Cow`.
///
/// This is meant to be used to implement the `Replacer::no_expansion` method
/// in its various trait impls.
fn no_expansion<T: AsRef<str>>(replacement: &T) -> Option<Cow<'_, str>> {
    let replacement = replacement.as_ref();
    match memchr::memchr(b'$', replacement.as_bytes()) {
        Some(_) => None,
        None => Some(Cow::Borrowed(replacement)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_captures() {
        let re = Regex::new(r"(?<word>\w+)(?=!)|(\d)").unwrap();
        let caps = re.captures("hi!").unwrap().unwrap();
        assert_eq!(
            r#"Captures({0: 0..2/"hi", 1/"word": 0..2/"hi", 2: None})"#,
            format!("{:?}", caps)
        );
    }

    #[test]
    fn regex_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }
}
