use std::borrow::Cow;

use regex_pcre::bytes::{Captures, NoExpand, Regex, RegexBuilder};

#[test]
fn invalid_utf8_haystack() {
    let re = bregex!(r"(?<=\d)\w+");
    assert!(re.is_extended());
    let m = re.find(b"\xFF1bc\xFE").unwrap().unwrap();
    assert_eq!(b"bc", m.as_bytes());
    assert_eq!(2..4, m.range());
}

#[test]
fn invalid_utf8_iteration() {
    let re = bregex!("");
    let got: Vec<(usize, usize)> = re
        .find_iter(b"a\xFFb")
        .map(|m| m.map(|m| (m.start(), m.end())))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(vec![(0, 0), (1, 1), (2, 2), (3, 3)], got);
}

#[test]
fn ascii_mode_matches_any_byte() {
    let re = RegexBuilder::new(r"\xFF(?=a)").unicode(false).build().unwrap();
    assert!(re.is_extended());
    assert_eq!(Some(1..2), re.find(b"b\xFFa").unwrap().map(|m| m.range()));

    let re = bregex!(r"(?-u:\xFF)a");
    assert!(!re.is_extended());
    assert_eq!(Some(1..3), re.find(b"b\xFFa").unwrap().map(|m| m.range()));
}

#[test]
fn captures_and_names() {
    let re = bregex!(r"(?<key>\w+)=(?<value>[^;]*)(?=;)");
    let pairs: Vec<(Vec<u8>, Vec<u8>)> = re
        .captures_iter(b"\xFFa=1;b=2;c=3")
        .map(|caps| {
            let caps = caps.unwrap();
            (caps["key"].to_vec(), caps["value"].to_vec())
        })
        .collect();
    assert_eq!(
        vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())],
        pairs
    );
}

#[test]
fn replace_bytes() {
    let re = bregex!(r"(\w)\1");
    assert_eq!(&b"[a]\xFF[b]"[..], &*re.replace_all(b"aa\xFFbb", &b"[$1]"[..]).unwrap());
    assert_eq!(
        &b"$1\xFF$1"[..],
        &*re.replace_all(b"aa\xFFbb", NoExpand(b"$1")).unwrap()
    );
    let out = re
        .replace_all(b"aa\xFFbb", |caps: &Captures| caps[1].to_ascii_uppercase())
        .unwrap();
    assert_eq!(&b"A\xFFB"[..], &*out);
    let out = re.replace_all(b"abc", b"x".to_vec()).unwrap();
    assert!(matches!(out, Cow::Borrowed(_)));
}

#[test]
fn expand_bytes() {
    let re = bregex!(r"(?<a>\w)(?=(\w))");
    let caps = re.captures(b"xy").unwrap().unwrap();
    let mut dst = vec![];
    caps.expand(b"$2${a}$$", &mut dst);
    assert_eq!(b"yx$".to_vec(), dst);
}

#[test]
fn debug_captures_escapes_bytes() {
    let re = bregex!(r"(?-u:(\xFF))(x)?");
    let caps = re.captures(b"\xFF").unwrap().unwrap();
    assert_eq!(
        r#"Captures({0: 0..1/"\xFF", 1: 0..1/"\xFF", 2: None})"#,
        format!("{:?}", caps)
    );
}

#[test]
fn parse() {
    let re: Regex = r"(?<=a)b".parse().unwrap();
    assert_eq!(r"(?<=a)b", re.as_str());
    assert_eq!(r#"Regex("(?<=a)b")"#, format!("{:?}", re));
}
