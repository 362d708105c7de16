/*!
Decides which engine a pattern needs.

The simple engine (the `regex` crate) handles literals, classes, repetitions,
anchors and alternation. Anything built on backtracking (lookaround,
backreferences, atomic groups, recursion, possessive repetition, conditionals,
backtracking verbs) and a handful of escapes the simple engine doesn't know
about force the extended engine (PCRE2).

The scan is a single left-to-right pass over the pattern's bytes. It does not
validate the pattern: it only looks for the presence of extended constructs.
Whether a `\1` refers to a group that actually exists, for example, is left to
the compiler of whichever engine is chosen.
*/

/// The engine a pattern is routed to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EngineKind {
    /// The pattern only uses syntax the finite automata engine supports.
    Simple,
    /// The pattern uses syntax that requires the backtracking engine.
    Extended,
}

impl EngineKind {
    /// Returns true if this is [`EngineKind::Extended`].
    pub fn is_extended(self) -> bool {
        self == EngineKind::Extended
    }
}

/// Classify the given pattern.
///
/// # Example
///
/// ```
/// use regex_pcre::{classify, EngineKind};
///
/// assert_eq!(EngineKind::Simple, classify(r"\d{4}-\d{2}-\d{2}"));
/// assert_eq!(EngineKind::Extended, classify(r"foo(?=bar)"));
/// // A backslash-digit inside a class isn't a backreference.
/// assert_eq!(EngineKind::Simple, classify(r"[\1]"));
/// ```
pub fn classify(pattern: &str) -> EngineKind {
    if Scanner::new(pattern.as_bytes()).scan() {
        EngineKind::Extended
    } else {
        EngineKind::Simple
    }
}

/// Returns true if and only if the given pattern requires the extended
/// engine.
///
/// This is a convenience for `classify(pattern).is_extended()`.
pub fn needs_extended(pattern: &str) -> bool {
    classify(pattern).is_extended()
}

/// A cursor over a pattern that stops as soon as an extended construct is
/// seen.
struct Scanner<'p> {
    pat: &'p [u8],
    pos: usize,
    /// Set immediately after a repetition operator, so that a following `+`
    /// can be recognized as a possessive quantifier.
    after_repetition: bool,
}

/// The result of scanning a single item. `None` means the pattern ended
/// before the item did (an unterminated class or a trailing escape).
type Step = Option<bool>;

impl<'p> Scanner<'p> {
    fn new(pat: &'p [u8]) -> Scanner<'p> {
        Scanner { pat, pos: 0, after_repetition: false }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.pat.get(self.pos + offset).copied()
    }

    fn scan(mut self) -> bool {
        while let Some(b) = self.peek(0) {
            let step = match b {
                b'\\' => self.escape(),
                b'[' => self.class(),
                b'(' => Some(self.group()),
                b'*' | b'+' | b'?' => Some(self.repetition(b)),
                b'{' => Some(self.counted_repetition()),
                _ => {
                    self.pos += 1;
                    self.after_repetition = false;
                    Some(false)
                }
            };
            match step {
                // Nothing extended was seen before the pattern was cut
                // short. The compiler reports the actual error.
                None => return false,
                Some(true) => return true,
                Some(false) => {}
            }
        }
        false
    }

    /// Scans an escape sequence outside of a class.
    fn escape(&mut self) -> Step {
        self.after_repetition = false;
        let c = self.peek(1)?;
        let extended = match c {
            // Backreferences and PCRE octal escapes.
            b'0'..=b'9' => true,
            // Named/relative backreferences and subroutine calls.
            b'g' | b'k' => true,
            // Match start reset, anchors and single code units.
            b'K' | b'G' | b'C' | b'Z' => true,
            // Extended grapheme clusters, newline sequences and the
            // horizontal/vertical space classes.
            b'X' | b'R' | b'h' | b'H' | b'v' | b'V' | b'N' => true,
            // Quoting and escapes the simple engine has no syntax for.
            b'Q' | b'E' | b'e' | b'c' | b'o' => true,
            b'p' | b'P' => return self.property(),
            b'x' | b'u' | b'U' if self.peek(2) == Some(b'{') => {
                return self.braced_codepoint();
            }
            _ => false,
        };
        self.pos += 2;
        Some(extended)
    }

    /// Scans `\x{...}`, `\u{...}` or `\U{...}` as a single literal so that
    /// the braces aren't mistaken for a counted repetition.
    fn braced_codepoint(&mut self) -> Step {
        let start = self.pos + 3;
        let len = self.pat.get(start..)?.iter().position(|&b| b == b'}')?;
        self.pos = start + len + 1;
        Some(false)
    }

    /// Scans an escape sequence inside of a class. Only escapes that change
    /// the meaning of the class matter here. In particular, `[\1]` is an
    /// octal escape (or an error) and never a backreference.
    fn class_escape(&mut self) -> Step {
        let c = self.peek(1)?;
        let extended = match c {
            b'h' | b'H' | b'v' | b'V' | b'N' => true,
            b'p' | b'P' => return self.property(),
            _ => false,
        };
        self.pos += 2;
        Some(extended)
    }

    /// Scans `\p{...}`, `\P{...}` or the one letter form `\pL`. The PCRE
    /// specific properties (`Xan`, `Xps`, `Xsp`, `Xuc`, `Xwd` and `L&`)
    /// aren't supported by the simple engine.
    fn property(&mut self) -> Step {
        // Skip `\p`.
        self.pos += 2;
        if self.peek(0)? != b'{' {
            self.pos += 1;
            return Some(false);
        }
        let start = self.pos + 1;
        let len = self.pat[start..].iter().position(|&b| b == b'}')?;
        let name = &self.pat[start..start + len];
        self.pos = start + len + 1;
        let name = match name.first() {
            Some(b'^') => &name[1..],
            _ => name,
        };
        Some(name.first() == Some(&b'X') || name == b"L&")
    }

    /// Scans a bracketed character class. A `]` immediately after an opening
    /// `[` (or `[^`) is a literal, as are escaped `]`. POSIX classes like
    /// `[:alpha:]` are skipped as a unit. Any other `[` opens a nested class.
    fn class(&mut self) -> Step {
        self.after_repetition = false;
        self.class_open();
        let mut depth = 1;
        loop {
            match self.peek(0)? {
                b'\\' => {
                    if self.class_escape()? {
                        return Some(true);
                    }
                }
                b'[' => match self.posix_class_len() {
                    Some(len) => self.pos += len,
                    None => {
                        self.class_open();
                        depth += 1;
                    }
                },
                b']' => {
                    self.pos += 1;
                    depth -= 1;
                    if depth == 0 {
                        return Some(false);
                    }
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skips a `[`, along with a negation and a leading literal `]`.
    fn class_open(&mut self) {
        self.pos += 1;
        if self.peek(0) == Some(b'^') {
            self.pos += 1;
        }
        if self.peek(0) == Some(b']') {
            self.pos += 1;
        }
    }

    /// Returns the length of a POSIX class like `[:alpha:]` or `[:^space:]`
    /// starting at the current position, if there is one.
    fn posix_class_len(&self) -> Option<usize> {
        if self.peek(1) != Some(b':') {
            return None;
        }
        let rest = &self.pat[self.pos + 2..];
        let end = rest.windows(2).position(|w| w == b":]")?;
        let name = &rest[..end];
        let name = name.strip_prefix(b"^").unwrap_or(name);
        if name.is_empty() || !name.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(2 + end + 2)
    }

    /// Scans the opening of a group. Plain, non-capturing and named groups,
    /// and flag groups like `(?i)` or `(?-u:...)`, are supported by both
    /// engines. Everything else that starts with `(?` or `(*` is extended.
    fn group(&mut self) -> bool {
        self.after_repetition = false;
        let extended = match self.peek(1) {
            // Backtracking control verbs like (*SKIP) or (*UTF).
            Some(b'*') => true,
            Some(b'?') => match self.peek(2) {
                // Lookahead, atomic groups, branch reset, comments,
                // conditionals, callouts, recursion and subroutine calls.
                Some(b'=' | b'!' | b'>' | b'|' | b'#' | b'(') => true,
                Some(b'R' | b'&' | b'C' | b'+' | b'\'') => true,
                Some(b'0'..=b'9') => true,
                // (?-1) is a relative subroutine call, (?-i) clears a flag.
                Some(b'-') => matches!(self.peek(3), Some(b'0'..=b'9')),
                // Lookbehind, as opposed to a named group (?<name>...).
                Some(b'<') => matches!(self.peek(3), Some(b'=' | b'!')),
                // Named backreference and subroutine call, as opposed to a
                // named group (?P<name>...).
                Some(b'P') => matches!(self.peek(3), Some(b'=' | b'>')),
                _ => false,
            },
            _ => false,
        };
        // Any flags or names that follow are scanned as ordinary bytes.
        self.pos += if self.peek(1) == Some(b'?') { 2 } else { 1 };
        extended
    }

    /// Scans one of `*`, `+` or `?`.
    fn repetition(&mut self, op: u8) -> bool {
        self.pos += 1;
        if !self.after_repetition {
            self.after_repetition = true;
            return false;
        }
        match op {
            // a*+, a++, a?+ and a{2}+ are possessive.
            b'+' => true,
            // a*? and friends are lazy. Nothing may follow them.
            b'?' => {
                self.after_repetition = false;
                false
            }
            _ => false,
        }
    }

    /// Scans `{n}`, `{n,}`, `{n,m}` or `{,m}`. A `{` that doesn't start a
    /// counted repetition is a literal.
    fn counted_repetition(&mut self) -> bool {
        let rest = &self.pat[self.pos + 1..];
        let end = match rest.iter().position(|&b| b == b'}') {
            None => None,
            Some(end) => {
                let body = &rest[..end];
                let digits = body.iter().filter(|b| b.is_ascii_digit()).count();
                let commas = body.iter().filter(|&&b| b == b',').count();
                let valid = digits > 0
                    && commas <= 1
                    && digits + commas == body.len();
                if valid {
                    Some(end)
                } else {
                    None
                }
            }
        };
        match end {
            None => {
                self.pos += 1;
                self.after_repetition = false;
                false
            }
            Some(end) => {
                self.pos += 1 + end + 1;
                if self.after_repetition {
                    // a{2}{3} isn't possessive, but a+{2} isn't valid in
                    // either engine, so it doesn't matter what we say.
                    return false;
                }
                self.after_repetition = true;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::QuickCheck;

    use super::*;

    fn ext(pattern: &str) -> bool {
        needs_extended(pattern)
    }

    #[test]
    fn simple_patterns() {
        let simple = [
            "",
            "hello",
            r"p([a-z]+)ch",
            r"\b\w+@\w+\.\w+\b",
            r"\d{4}-\d{2}-\d{2}",
            r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$",
            r"(?i)foo|bar",
            r"(?P<year>\d{4})",
            r"(?<year>\d{4})",
            r"(?:abc)+?",
            r"(?-u:\xFF)",
            r"a{2,}b{,3}",
            r"x{foo}",
            r"[[:alpha:]]+",
            r"[^]]",
            r"[]a]",
            r"\pL\p{Greek}\P{Lu}",
            r"\u{1F600}",
            r"\x{41}+",
            r"\u{0041}+",
            r"\U{0001F600}+",
            r"\x{41}{2}",
            r"[[a]b]+",
            r"[[a]++]",
            r"[a[^b[c]]]+",
            r"[[:alpha:][0-9]]+",
        ];
        for pattern in simple {
            assert!(!ext(pattern), "expected simple: {:?}", pattern);
        }
    }

    #[test]
    fn extended_patterns() {
        let extended = [
            "foo(?=bar)",
            "foo(?!bar)",
            "(?<=foo)bar",
            "(?<!foo)bar",
            r"(foo)\1",
            r"(\w+)\s+\1",
            r"(?<w>\w+)\s+\k<w>",
            r"(?P<w>\w+)\s+(?P=w)",
            r"(\w)\g1",
            "(?>abc)",
            "(?R)",
            r"\((?:[^()]|(?1))*\)",
            "(?-1)",
            "(?+1)(a)",
            "(?&name)",
            "(?P>name)",
            "(?(1)a|b)",
            "(?|(a)|(b))",
            "(?#comment)",
            "a(*SKIP)(*FAIL)|b",
            "a*+",
            "a++",
            "a?+",
            r"\d{2}+",
            r"a\Xb",
            r"a\hb",
            r"a\Rb",
            r"foo\Kbar",
            r"\Qa.b\E",
            r"\p{Xan}",
            r"\p{L&}",
            r"[\p{Xwd}]",
            r"[\h]",
        ];
        for pattern in extended {
            assert!(ext(pattern), "expected extended: {:?}", pattern);
        }
    }

    #[test]
    fn class_contents_are_not_constructs() {
        assert!(!ext(r"[\1]"));
        assert!(!ext(r"[(?=]"));
        assert!(!ext(r"[\]\1]"));
        assert!(!ext(r"[^\]++]"));
        assert!(!ext(r"[[:digit:]\]]"));
        assert!(!ext(r"[a[b]](?:c)"));
        assert!(ext(r"[a[b]]\1"));
        assert!(ext(r"[[a]]++"));
        assert!(ext(r"[\]]\1"));
        assert!(ext(r"[]](?=x)"));
    }

    #[test]
    fn escaped_constructs_are_literals() {
        assert!(!ext(r"\(?=foo\)"));
        assert!(!ext(r"\\"));
        assert!(ext(r"\\\1"));
        assert!(!ext(r"a\++"));
    }

    #[test]
    fn lazy_is_not_possessive() {
        assert!(!ext("a+?"));
        assert!(!ext("a*?"));
        assert!(!ext("a??"));
        assert!(!ext("a{2,3}?"));
    }

    #[test]
    fn truncated_patterns_defer() {
        // These are all errors. The scanner doesn't panic and leaves the
        // reporting to the compiler.
        assert!(!ext("["));
        assert!(!ext(r"[\"));
        assert!(!ext("abc\\"));
        assert!(!ext(r"\p{Xan"));
        assert!(!ext("(?"));
        assert!(!ext("a{2"));
        assert!(!ext(r"\x{41"));
        assert!(!ext("[["));
        // Evidence found before the truncation still counts.
        assert!(ext(r"(?=a)["));
    }

    #[test]
    fn backreference_existence_is_not_checked() {
        assert!(ext(r"\1(a)"));
        assert!(ext(r"\9"));
    }

    #[test]
    fn never_panics() {
        fn prop(pattern: String) -> bool {
            let _ = classify(&pattern);
            true
        }
        QuickCheck::new().tests(1_000).quickcheck(prop as fn(String) -> bool);
    }

    #[test]
    fn regular_alphabet_is_simple() {
        // Literals, classes, quantifiers (without `+`, which could form a
        // possessive quantifier), anchors and alternation.
        const ALPHABET: &[&str] =
            &["a", "b", "0", ".", "|", "^", "$", "*", "?", "[a-z]", r"\d"];

        fn build(choices: &[u8]) -> String {
            choices
                .iter()
                .map(|&i| ALPHABET[usize::from(i) % ALPHABET.len()])
                .collect()
        }

        fn simple(choices: Vec<u8>) -> bool {
            !needs_extended(&build(&choices))
        }

        fn wrapped_in_lookaround(choices: Vec<u8>) -> bool {
            let pattern = build(&choices);
            needs_extended(&format!("(?={})", pattern))
                && needs_extended(&format!("(?<!{})", pattern))
        }

        QuickCheck::new().tests(1_000).quickcheck(simple as fn(Vec<u8>) -> bool);
        QuickCheck::new()
            .tests(1_000)
            .quickcheck(wrapped_in_lookaround as fn(Vec<u8>) -> bool);
    }
}
