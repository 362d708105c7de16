// The JIT option and stack sizing are process-wide, so these tests take a
// lock and put the defaults back when they're done.

use std::sync::{Mutex, MutexGuard, PoisonError};

use regex_pcre::{
    jit_option, jit_stack_size, set_jit_option, set_jit_stack_size, Error,
    JitOption, JitStackSize, MatchErrorKind, Regex, RegexBuilder,
    DEFAULT_JIT_STACK_MAX_SIZE, DEFAULT_JIT_STACK_START_SIZE,
};

static LOCK: Mutex<()> = Mutex::new(());

struct Restore {
    _guard: MutexGuard<'static, ()>,
}

fn lock() -> Restore {
    Restore { _guard: LOCK.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl Drop for Restore {
    fn drop(&mut self) {
        set_jit_option(JitOption::Complete);
        set_jit_stack_size(
            DEFAULT_JIT_STACK_START_SIZE,
            DEFAULT_JIT_STACK_MAX_SIZE,
        )
        .unwrap();
    }
}

const CASES: &[(&str, &str, bool)] = &[
    (r"p([a-z]+)ch", "peach", true),
    (r"(?<=foo)bar(?=baz)", "foobarbaz", true),
    (r"(\w+)\s+\1", "hello hello world", true),
    (r"(\w+)\s+\1", "hello world", false),
];

#[test]
fn defaults() {
    let _restore = lock();
    assert_eq!(JitOption::Complete, jit_option());
    assert_eq!(JitStackSize::default(), jit_stack_size());
    assert_eq!(32 * 1024, jit_stack_size().start);
    assert_eq!(512 * 1024, jit_stack_size().max);
}

#[test]
fn stack_sizes() {
    let _restore = lock();
    let sizes = [
        (DEFAULT_JIT_STACK_START_SIZE, DEFAULT_JIT_STACK_MAX_SIZE),
        (4 * 1024, 16 * 1024),
        (64 * 1024, 1024 * 1024),
    ];
    for (start, max) in sizes {
        set_jit_stack_size(start, max).unwrap();
        assert_eq!(JitStackSize { start, max }, jit_stack_size());
        for &(pattern, text, want) in CASES {
            let re = Regex::new(pattern).unwrap();
            assert_eq!(
                want,
                re.is_match(text).unwrap(),
                "{} against {:?} with stack {}..{}",
                pattern,
                text,
                start,
                max
            );
            re.close();
        }
    }
}

#[test]
fn repeated_searches() {
    let _restore = lock();
    set_jit_stack_size(64 * 1024, 1024 * 1024).unwrap();
    let cases = [
        (r"\b\w+@\w+\.\w+\b", "test@example.com"),
        (r"\d{4}-\d{2}-\d{2}", "2025-05-15"),
    ];
    for (pattern, text) in cases {
        let re =
            RegexBuilder::new(pattern).always_extended(true).build().unwrap();
        for i in 0..1000 {
            assert!(re.is_match(text).unwrap(), "{} failed at {}", pattern, i);
        }
    }
}

#[test]
fn tiny_stack_does_not_panic() {
    let _restore = lock();
    set_jit_stack_size(1024, 2048).unwrap();
    let pattern = r#"(?:(^|[^\\])(?:\\\\)*)((?:(")(?:[^"\\]|\\.|\\\\)*")|(?:(')(?:[^'\\]|\\.|\\\\)*')|(?:\/{2}[^\r\n]*)|(?:\/\*[^*]*\*+(?:[^*\/][^*]*\*+)*\/))"#;
    let re = RegexBuilder::new(pattern).always_extended(true).build().unwrap();
    let text = "\"".repeat(31);
    // Any outcome but a panic is fine.
    let _ = re.is_match(&text);
    let _ = re.find_iter(&text).count();
}

#[test]
fn stack_exhaustion_is_a_match_error() {
    let _restore = lock();
    let text = "a".repeat(200_000);
    let build = || {
        RegexBuilder::new(r"^(a|b)*\z").always_extended(true).build().unwrap()
    };

    set_jit_stack_size(8 * 1024, 16 * 1024).unwrap();
    let re = build();
    match re.is_match(&text) {
        Err(Error::Match(err)) => {
            assert_eq!(MatchErrorKind::JitStackExhausted, err.kind());
        }
        got => panic!("expected JIT stack exhaustion, got {:?}", got),
    }
    // The regex is still usable afterwards.
    assert!(re.is_match("ab").unwrap());

    set_jit_stack_size(1024 * 1024, 256 * 1024 * 1024).unwrap();
    assert!(build().is_match(&text).unwrap());
}

#[test]
fn invalid_stack_sizes() {
    let _restore = lock();
    let before = jit_stack_size();
    assert!(matches!(set_jit_stack_size(0, 1024), Err(Error::Config(_))));
    assert!(matches!(set_jit_stack_size(64 * 1024, 32 * 1024), Err(Error::Config(_))));
    assert_eq!(before, jit_stack_size());
}

#[test]
fn jit_options() {
    let _restore = lock();
    for option in [
        JitOption::Disabled,
        JitOption::PartialSoft,
        JitOption::PartialHard,
        JitOption::Complete,
    ] {
        set_jit_option(option);
        assert_eq!(option, jit_option());
        for &(pattern, text, want) in CASES {
            let re =
                RegexBuilder::new(pattern).always_extended(true).build().unwrap();
            assert_eq!(want, re.is_match(text).unwrap(), "{:?}", option);
        }
    }
}

#[test]
fn option_applies_at_compile_time() {
    let _restore = lock();
    set_jit_option(JitOption::Disabled);
    let re = Regex::new(r"(\w+)\s+\1").unwrap();
    set_jit_option(JitOption::Complete);
    assert!(re.is_match("bye bye").unwrap());

    // A per-pattern option wins over the process-wide one.
    set_jit_option(JitOption::Disabled);
    let re = RegexBuilder::new(r"(\w+)\s+\1")
        .jit(JitOption::Complete)
        .build()
        .unwrap();
    assert!(re.is_match("bye bye").unwrap());
}
