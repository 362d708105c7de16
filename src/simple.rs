use crate::{
    classify::EngineKind,
    error::Error,
    re_builder::RegexOptions,
    re_trait::{Engine, Input, Slot},
};

/// The finite automata engine, backed by the `regex` crate. Searches run in
/// time linear in the haystack and never fail once compiled.
#[derive(Debug)]
pub(crate) struct SimpleEngine {
    prog: Program,
}

/// `&str` regexes use a Unicode program so that matches (in particular,
/// empty matches) never split a codepoint.
#[derive(Debug)]
enum Program {
    Unicode(regex::Regex),
    Bytes(regex::bytes::Regex),
}

impl SimpleEngine {
    pub(crate) fn new(
        opts: &RegexOptions,
        utf8: bool,
    ) -> Result<SimpleEngine, Error> {
        // Both builders take the same options, but have distinct types.
        macro_rules! build {
            ($builder:ty) => {
                <$builder>::new(&opts.pattern)
                    .case_insensitive(opts.case_insensitive)
                    .multi_line(opts.multi_line)
                    .dot_matches_new_line(opts.dot_matches_new_line)
                    .swap_greed(opts.swap_greed)
                    .ignore_whitespace(opts.ignore_whitespace)
                    .unicode(opts.unicode)
                    .size_limit(opts.size_limit)
                    .dfa_size_limit(opts.dfa_size_limit)
                    .nest_limit(opts.nest_limit)
                    .build()
                    .map_err(|err| compile_error(opts, utf8, err))
            };
        }
        let prog = if utf8 {
            Program::Unicode(build!(regex::RegexBuilder)?)
        } else {
            Program::Bytes(build!(regex::bytes::RegexBuilder)?)
        };
        Ok(SimpleEngine { prog })
    }
}

/// The `regex` crate doesn't expose where a pattern went wrong, so the
/// pattern is parsed again with the same options to find the span. Errors
/// that come from compilation rather than parsing, like exceeding the size
/// limit, have no offset.
fn compile_error(opts: &RegexOptions, utf8: bool, err: regex::Error) -> Error {
    let parsed = regex_syntax::ParserBuilder::new()
        .case_insensitive(opts.case_insensitive)
        .multi_line(opts.multi_line)
        .dot_matches_new_line(opts.dot_matches_new_line)
        .swap_greed(opts.swap_greed)
        .ignore_whitespace(opts.ignore_whitespace)
        .unicode(opts.unicode)
        .utf8(utf8)
        .nest_limit(opts.nest_limit)
        .build()
        .parse(&opts.pattern);
    let offset = match parsed {
        Err(regex_syntax::Error::Parse(ref err)) => {
            Some(err.span().start.offset)
        }
        Err(regex_syntax::Error::Translate(ref err)) => {
            Some(err.span().start.offset)
        }
        _ => None,
    };
    Error::compile(EngineKind::Simple, 0, offset, err.to_string())
}

/// Copies group offsets into slots, two per group. Groups that didn't
/// participate are set to `None`.
fn write_slots(
    slots: &mut [Slot],
    get: impl Fn(usize) -> Option<(usize, usize)>,
) {
    for (i, pair) in slots.chunks_exact_mut(2).enumerate() {
        let (start, end) = match get(i) {
            None => (None, None),
            Some((s, e)) => (Some(s), Some(e)),
        };
        pair[0] = start;
        pair[1] = end;
    }
}

impl Engine for SimpleEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Simple
    }

    fn captures_len(&self) -> usize {
        match self.prog {
            Program::Unicode(ref re) => re.captures_len(),
            Program::Bytes(ref re) => re.captures_len(),
        }
    }

    fn group_names(&self) -> Vec<Option<String>> {
        match self.prog {
            Program::Unicode(ref re) => {
                re.capture_names().map(|n| n.map(String::from)).collect()
            }
            Program::Bytes(ref re) => {
                re.capture_names().map(|n| n.map(String::from)).collect()
            }
        }
    }

    fn search(
        &self,
        input: Input<'_>,
        start: usize,
        slots: &mut [Slot],
    ) -> Result<Option<(usize, usize)>, Error> {
        let m = match (&self.prog, input) {
            (Program::Unicode(re), Input::Str(haystack)) => {
                if slots.is_empty() {
                    re.find_at(haystack, start).map(|m| (m.start(), m.end()))
                } else {
                    let mut locs = re.capture_locations();
                    let m = re
                        .captures_read_at(&mut locs, haystack, start)
                        .map(|m| (m.start(), m.end()));
                    write_slots(slots, |i| locs.get(i));
                    m
                }
            }
            (Program::Bytes(re), input) => {
                let haystack = input.as_bytes();
                if slots.is_empty() {
                    re.find_at(haystack, start).map(|m| (m.start(), m.end()))
                } else {
                    let mut locs = re.capture_locations();
                    let m = re
                        .captures_read_at(&mut locs, haystack, start)
                        .map(|m| (m.start(), m.end()));
                    write_slots(slots, |i| locs.get(i));
                    m
                }
            }
            (Program::Unicode(_), Input::Bytes(_)) => {
                unreachable!("Unicode program searched with a byte haystack")
            }
        };
        trace!("simple search from {} found {:?}", start, m);
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(pattern: &str, utf8: bool) -> SimpleEngine {
        SimpleEngine::new(&RegexOptions::new(pattern), utf8).unwrap()
    }

    #[test]
    fn unicode_search() {
        let re = engine(r"(\w+)@(\w+)?", true);
        assert_eq!(3, re.captures_len());
        let mut slots = vec![None; 6];
        let m = re.search(Input::Str("hi bob@"), 0, &mut slots).unwrap();
        assert_eq!(Some((3, 7)), m);
        assert_eq!(vec![Some(3), Some(7), Some(3), Some(6), None, None], slots);
    }

    #[test]
    fn bytes_search() {
        let re = engine(r"(?-u:\xFF)+", false);
        let m = re.search(Input::Bytes(b"a\xFF\xFFb"), 0, &mut []).unwrap();
        assert_eq!(Some((1, 3)), m);
    }

    #[test]
    fn compile_error_offsets() {
        let err = SimpleEngine::new(&RegexOptions::new(r"ab(c"), true);
        match err {
            Err(Error::Compile(err)) => {
                assert_eq!(EngineKind::Simple, err.engine());
                assert_eq!(Some(2), err.offset());
            }
            _ => panic!("expected a compile error"),
        }

        // Invalid UTF-8 is only an error for a &str program.
        let mut opts = RegexOptions::new(r"a(?-u:\xFF)");
        opts.unicode = true;
        assert!(SimpleEngine::new(&opts, false).is_ok());
        match SimpleEngine::new(&opts, true) {
            Err(Error::Compile(err)) => assert_eq!(Some(6), err.offset()),
            _ => panic!("expected a compile error"),
        }

        let mut opts = RegexOptions::new(r"\w{1000}");
        opts.size_limit = 100;
        match SimpleEngine::new(&opts, true) {
            Err(Error::Compile(err)) => assert_eq!(None, err.offset()),
            _ => panic!("expected a compile error"),
        }
    }

    #[test]
    fn names() {
        let re = engine(r"(?P<a>x)(y)(?<c>z)", true);
        assert_eq!(
            vec![None, Some("a".to_string()), None, Some("c".to_string())],
            re.group_names()
        );
    }

    #[test]
    fn compile_error_is_simple() {
        let err = SimpleEngine::new(&RegexOptions::new("["), true).unwrap_err();
        match err {
            Error::Compile(err) => {
                assert_eq!(EngineKind::Simple, err.engine());
                assert_eq!(Some(0), err.offset());
            }
            err => panic!("unexpected error: {:?}", err),
        }
    }

    #[test]
    fn next_after_empty_steps_over_codepoints() {
        let re = engine("", true);
        assert_eq!(3, re.next_after_empty(Input::Str("☃x"), 0));
        assert_eq!(1, re.next_after_empty(Input::Bytes(b"\xE2\x98\x83"), 0));
    }
}
