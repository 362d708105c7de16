use regex_pcre::{Error, JitOption, MatchErrorKind, RegexBuilder};

macro_rules! ismatch {
    ($name:ident, $re:expr, $text:expr, $want:expr) => {
        #[test]
        fn $name() {
            let re = regex!($re);
            assert!(re.is_extended(), "{} is not extended", $re);
            assert_eq!($want, re.is_match($text).unwrap());
        }
    };
}

macro_rules! findstr {
    ($name:ident, $re:expr, $text:expr, $want:expr) => {
        #[test]
        fn $name() {
            let re = regex!($re);
            assert!(re.is_extended(), "{} is not extended", $re);
            let got = re.find($text).unwrap().map(|m| m.as_str());
            assert_eq!($want, got);
        }
    };
}

ismatch!(lookahead_match, "foo(?=bar)", "foobar", true);
ismatch!(lookahead_no_match, "foo(?=bar)", "foobaz", false);
ismatch!(lookbehind_match, "(?<=foo)bar", "foobar", true);
ismatch!(lookbehind_no_match, "(?<=foo)bar", "fobar", false);
ismatch!(backreference_match, r"(foo)\1", "foofoo", true);
ismatch!(backreference_no_match, r"(foo)\1", "foobar", false);
ismatch!(both_lookarounds, "(?<=foo)bar(?=baz)", "foobarbaz", true);
ismatch!(repeated_word, r"(\w+)\s+\1", "hello hello world", true);
ismatch!(horizontal_space, r"a\hb", "a\tb", true);
ismatch!(horizontal_space_not_newline, r"a\hb", "a\nb", false);
ismatch!(grapheme, r"^a\Xb$", "ae\u{301}b", true);
ismatch!(atomic_group_no_backtrack, "(?>a+)ab", "aaab", false);
ismatch!(possessive_no_backtrack, "a++ab", "aaab", false);
ismatch!(balanced_parens, r"^(\((?:[^()]|(?1))*\))$", "(a(b)c)", true);
ismatch!(balanced_parens_not, r"^(\((?:[^()]|(?1))*\))$", "(a(b c)", false);

findstr!(find_lookahead, "foo(?=bar)", "foobar", Some("foo"));
findstr!(find_lookbehind, "(?<=foo)bar", "foobar", Some("bar"));
findstr!(find_none, "(?<=foo)bar", "barfoo", None);
findstr!(find_keep_out, r"foo\Kbar", "foobar", Some("bar"));
findstr!(find_named_backref, r"(?<q>['\x22]).*?\k<q>", r#"say "hi" now"#,
         Some(r#""hi""#));
findstr!(find_unicode_word, r"\w+(?=!)", "¡héllo!", Some("héllo"));

#[test]
fn case_insensitive_unicode() {
    let re = RegexBuilder::new(r"(?=É)é+").case_insensitive(true).build().unwrap();
    assert!(re.is_extended());
    assert_eq!(Some("Éé"), re.find("xÉé").unwrap().map(|m| m.as_str()));
}

#[test]
fn ascii_word_without_unicode() {
    let re = RegexBuilder::new(r"\w+(?=!)").unicode(false).build().unwrap();
    assert_eq!(Some("llo"), re.find("hé llo!").unwrap().map(|m| m.as_str()));
    assert_eq!(None, re.find("é!").unwrap().map(|m| m.as_str()));
}

#[test]
fn builder_flags_apply() {
    let re = RegexBuilder::new(r"^b(?=.)")
        .multi_line(true)
        .build()
        .unwrap();
    assert_eq!(Some(2), re.find("a\nbc").unwrap().map(|m| m.start()));

    let re = RegexBuilder::new(r"a.(?=c)")
        .dot_matches_new_line(true)
        .build()
        .unwrap();
    assert!(re.is_match("a\nc").unwrap());

    let re = RegexBuilder::new(r"a+(?=a)").swap_greed(true).build().unwrap();
    assert_eq!(Some("a"), re.find("aaa").unwrap().map(|m| m.as_str()));

    let re = RegexBuilder::new(r"a b # comment
                                  (?=c)")
        .ignore_whitespace(true)
        .build()
        .unwrap();
    assert!(re.is_match("abc").unwrap());
}

#[test]
fn jit_override_per_pattern() {
    for option in [
        JitOption::Disabled,
        JitOption::Complete,
        JitOption::PartialSoft,
        JitOption::PartialHard,
    ] {
        let re = RegexBuilder::new(r"(\w+)\s+\1").jit(option).build().unwrap();
        assert_eq!(
            Some("hello hello"),
            re.find("hello hello world").unwrap().map(|m| m.as_str()),
            "{:?}",
            option
        );
    }
}

#[test]
fn catastrophic_pattern_returns() {
    // PCRE2's own default limits still apply. Running out of backtracking
    // budget is fine as long as the search comes back.
    let re = regex_ext!(r"(a+)+$");
    let text = format!("{}b", "a".repeat(40));
    match re.is_match(&text) {
        Ok(matched) => assert!(!matched),
        Err(Error::Match(err)) => assert!(
            matches!(
                err.kind(),
                MatchErrorKind::LimitExceeded
                    | MatchErrorKind::JitStackExhausted
            ),
            "{:?}",
            err
        ),
        Err(err) => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn single_code_unit_escape_is_bytes_only() {
    // \C can stop in the middle of a codepoint, which a &str match can't
    // represent.
    assert!(matches!(regex_pcre::Regex::new(r"\C"), Err(Error::Compile(_))));

    let re = regex_pcre::bytes::RegexBuilder::new(r"\C")
        .unicode(false)
        .build()
        .unwrap();
    assert!(re.is_extended());
    let m = re.find("☃".as_bytes()).unwrap().unwrap();
    assert_eq!(0..1, m.range());
}
