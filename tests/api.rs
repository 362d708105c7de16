use regex_pcre::{EngineKind, Error, MatchErrorKind, Regex};

#[test]
fn empty_regex_empty_match() {
    for re in [regex!(""), regex_ext!("")] {
        assert_eq!(vec![(0, 0)], findall!(re, ""));
    }
}

#[test]
fn empty_regex_nonempty_match() {
    for re in [regex!(""), regex_ext!("")] {
        assert_eq!(vec![(0, 0), (1, 1), (2, 2), (3, 3)], findall!(re, "abc"));
    }
}

#[test]
fn one_zero_length_match() {
    for re in [regex!(r"\d*"), regex_ext!(r"\d*")] {
        assert_eq!(vec![(0, 0), (1, 2), (3, 4)], findall!(re, "a1b2"));
    }
}

#[test]
fn many_zero_length_match() {
    for re in [regex!(r"\d*"), regex_ext!(r"\d*")] {
        assert_eq!(
            vec![(0, 0), (1, 2), (3, 3), (4, 4), (5, 6)],
            findall!(re, "a1bbb2")
        );
    }
}

#[test]
fn many_sequential_zero_length_match() {
    for re in [regex!(r"\d?"), regex_ext!(r"\d?")] {
        assert_eq!(
            vec![(0, 0), (1, 2), (2, 3), (4, 5), (6, 6)],
            findall!(re, "a12b3c")
        );
    }
}

#[test]
fn empty_match_unicode_progress() {
    // An empty match never splits a codepoint.
    for re in [regex!(""), regex_ext!("")] {
        assert_eq!(vec![(0, 0), (3, 3), (4, 4)], findall!(re, "☃a"));
    }
}

#[test]
fn word_matches() {
    let re = regex!(r"\b\w+\b");
    assert_eq!(EngineKind::Simple, re.engine_kind());
    let words: Vec<&str> = re
        .find_iter("one two three")
        .map(|m| m.map(|m| m.as_str()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(vec!["one", "two", "three"], words);

    let re = regex_ext!(r"\b\w+\b");
    assert_eq!(3, re.find_iter("one two three").count());
}

#[test]
fn iterator_take() {
    let re = regex!(r"(?<=x)\d");
    let got: Vec<_> = re.find_iter("x1 x2 x3 x4").take(2).collect();
    assert_eq!(2, got.len());
    assert_eq!((1, 2), got[0].as_ref().map(|m| (m.start(), m.end())).unwrap());
}

#[test]
fn find_and_captures() -> anyhow::Result<()> {
    let re = regex!(r"(hello) (world)");
    let caps = re.captures("hello world")?.unwrap();
    assert_eq!("hello world", &caps[0]);
    assert_eq!("hello", &caps[1]);
    assert_eq!("world", &caps[2]);
    assert_eq!(3, caps.len());

    let re = regex!(r"(foo)(?=bar)");
    assert!(re.is_extended());
    let caps = re.captures("foobar")?.unwrap();
    let got: Vec<&str> =
        caps.iter().map(|m| m.map_or("", |m| m.as_str())).collect();
    assert_eq!(vec!["foo", "foo"], got);
    Ok(())
}

#[test]
fn named_groups() -> anyhow::Result<()> {
    for re in [
        regex!(r"(?<year>\d{4})-(?P<month>\d{2})(-(\d{2}))?"),
        regex_ext!(r"(?<year>\d{4})-(?P<month>\d{2})(-(\d{2}))?"),
    ] {
        assert_eq!(5, re.captures_len());
        let names: Vec<Option<&str>> = re.capture_names().collect();
        assert_eq!(vec![None, Some("year"), Some("month"), None, None], names);

        let caps = re.captures("on 2024-05")?.unwrap();
        assert_eq!("2024", &caps["year"]);
        assert_eq!("05", caps.name("month").unwrap().as_str());
        assert_eq!(3..10, caps.get(0).unwrap().range());
        assert!(caps.get(3).is_none());
        assert!(caps.get(4).is_none());
        assert!(caps.get(5).is_none());
        assert!(caps.name("day").is_none());
    }
    Ok(())
}

#[test]
fn captures_iter() {
    for re in [regex!(r"(\w)(\d)?"), regex_ext!(r"(\w)(\d)?")] {
        let got: Vec<(String, Option<String>)> = re
            .captures_iter("a1 b c2")
            .map(|caps| {
                let caps = caps.unwrap();
                (
                    caps[1].to_string(),
                    caps.get(2).map(|m| m.as_str().to_string()),
                )
            })
            .collect();
        assert_eq!(
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("b".to_string(), None),
                ("c".to_string(), Some("2".to_string())),
            ],
            got
        );
    }
}

#[test]
fn search_at() -> anyhow::Result<()> {
    for re in [regex!(r"\d+"), regex_ext!(r"\d+")] {
        assert_eq!(Some((4, 6)), re.find_at("12, 34", 2)?.map(|m| (m.start(), m.end())));
        assert!(!re.is_match_at("12, 34", 6)?);
        assert!(re.captures_at("12, 34", 6)?.is_none());
    }
    // Lookbehind sees the haystack before the start offset.
    let re = regex!(r"(?<=a)b");
    assert_eq!(Some(1), re.find_at("ab", 1)?.map(|m| m.start()));
    Ok(())
}

#[test]
fn invalid_start_offset() {
    for re in [regex!("a"), regex_ext!("a")] {
        let err = re.find_at("abc", 4).unwrap_err();
        match err {
            Error::Match(ref err) => {
                assert_eq!(MatchErrorKind::InvalidArgument, err.kind())
            }
            _ => panic!("unexpected error: {:?}", err),
        }
        // Inside a codepoint.
        assert!(re.is_match_at("☃a", 1).is_err());
        // The end of the haystack is a valid place to start.
        assert_eq!(None, re.find_at("abc", 3).unwrap());
    }
}

#[test]
fn compile_errors() {
    let err = Regex::new("[").unwrap_err();
    assert!(matches!(err, Error::Compile(_)));

    let err = Regex::new(r"ab(c").unwrap_err();
    match err {
        Error::Compile(ref err) => {
            assert_eq!(EngineKind::Simple, err.engine());
            assert_eq!(Some(2), err.offset());
        }
        _ => panic!("unexpected error: {:?}", err),
    }

    let err = Regex::new(r"(?<=a+)b").unwrap_err();
    match err {
        Error::Compile(ref err) => {
            assert_eq!(EngineKind::Extended, err.engine());
            assert!(err.offset().is_some());
            assert!(!err.message().is_empty());
        }
        _ => panic!("unexpected error: {:?}", err),
    }
    assert!(!err.to_string().is_empty());
}

#[test]
#[should_panic]
fn must_compile_panics() {
    Regex::must_compile(r"(?<=a+)b");
}

#[test]
fn display_and_debug() {
    let re = regex!(r"(?=a)\w");
    assert_eq!(r"(?=a)\w", re.to_string());
    assert_eq!(r#"Regex("(?=a)\\w")"#, format!("{:?}", re));
    assert_eq!(r"(?=a)\w", re.as_str());
}

#[test]
fn from_str_and_try_from() -> anyhow::Result<()> {
    let re: Regex = r"(\w)\1".parse()?;
    assert!(re.is_extended());
    let re = Regex::try_from(String::from("abc"))?;
    assert!(!re.is_extended());
    assert!(Regex::try_from("(").is_err());
    Ok(())
}

#[test]
fn match_accessors() {
    let re = regex!(r"(?<=\$)\d*");
    let m = re.find("cost: $").unwrap().unwrap();
    assert!(m.is_empty());
    assert_eq!(0, m.len());
    assert_eq!(7, m.start());

    let m = re.find("cost: $42").unwrap().unwrap();
    assert_eq!("42", m.as_str());
    assert_eq!(2, m.len());
    let range: std::ops::Range<usize> = m.into();
    assert_eq!(7..9, range);
    let s: &str = m.into();
    assert_eq!("42", s);
}

#[test]
fn literal_engines_agree() {
    fn prop(needle: String, haystack: String) -> bool {
        let pattern = regex::escape(&needle);
        let simple = regex!(&pattern);
        let extended = regex_ext!(&pattern);
        let a = simple.find(&haystack).unwrap().map(|m| m.range());
        let b = extended.find(&haystack).unwrap().map(|m| m.range());
        a == b
    }
    quickcheck::QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String, String) -> bool);
}
