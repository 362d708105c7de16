/*!
This crate provides regular expressions that run on one of two engines. Every
pattern is classified when it is compiled. Patterns the [`regex`] crate can
run execute on it with its linear time guarantee. Patterns that need a
backtracking engine (lookaround, backreferences, atomic groups, possessive
quantifiers, recursion, conditionals and the like) execute on PCRE2 instead.

Both engines sit behind a single API that mirrors the API of the `regex`
crate, so a caller never needs to know which engine runs a given pattern.

# Usage

```toml
[dependencies]
regex-pcre = "0.1"
```

# Example: a backreference

```rust
use regex_pcre::Regex;

let re = Regex::new(r"\b(\w+)\s+\1\b")?;
assert!(re.is_extended());
let m = re.find("Paris in the the spring")?.unwrap();
assert_eq!("the the", m.as_str());
# Ok::<(), regex_pcre::Error>(())
```

# Example: the same API on both engines

```rust
use regex_pcre::{EngineKind, Regex};

let simple = Regex::new(r"(?<y>\d{4})-(?<m>\d{2})")?;
let extended = Regex::new(r"(?<y>\d{4})-(?<m>\d{2})(?=-)")?;
assert_eq!(EngineKind::Simple, simple.engine_kind());
assert_eq!(EngineKind::Extended, extended.engine_kind());

for re in [&simple, &extended] {
    let out = re.replace_all("on 2024-01-15 and 2025-02-28", "$m/$y")?;
    assert_eq!("on 01/2024-15 and 02/2025-28", out);
}
# Ok::<(), regex_pcre::Error>(())
```

# Fallible searches

Unlike the `regex` crate, every search returns a `Result`. A search on the
extended engine can fail, for example when it exceeds the process-wide
[`MatchLimits`], and any search fails with [`Error::Closed`] after a regex has
been [closed](Regex::close). Iterators yield `Result` items and stop after the
first error.

# Configuration

The extended engine reads a few process-wide settings:

* [`set_jit_option`] chooses how patterns are JIT compiled. It applies to
  patterns compiled after the call.
* [`set_jit_stack_size`] sizes the JIT stack each search is given. It also
  applies to patterns compiled after the call.
* [`set_match_limits`] caps the work a single search may do. It applies to
  every search that starts after the call.

The simple engine ignores all of them.

# Crate features

* **logging** (enabled by default) - Emits log messages through the `log`
  crate when patterns are compiled and released and when the JIT falls back
  to the interpreter.

# Bytes

The [`bytes`] module provides the same API for searching `&[u8]` haystacks,
which need not be valid UTF-8.
*/

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod macros;

mod classify;
mod config;
mod error;
mod exec;
mod expand;
mod extended;
mod pcre2;
mod pool;
mod re_builder;
mod re_bytes;
mod re_trait;
mod re_unicode;
mod simple;

pub use crate::{
    classify::{classify, needs_extended, EngineKind},
    config::{
        jit_option, jit_stack_size, match_limits, set_jit_option,
        set_jit_stack_size, set_match_limits, JitOption, JitStackSize,
        MatchLimits, DEFAULT_JIT_STACK_MAX_SIZE,
        DEFAULT_JIT_STACK_START_SIZE,
    },
    error::{CompileError, ConfigError, Error, MatchError, MatchErrorKind},
    re_builder::unicode::RegexBuilder,
    re_unicode::{
        CaptureMatches, CaptureNames, Captures, Match, Matches, NoExpand,
        Regex, Replacer, ReplacerRef, SubCaptureMatches,
    },
};

/**
Search for regex matches in `&[u8]` haystacks.

This module provides a nearly identical API to the one found in the top-level
of this crate. The difference is that haystacks, replacements and matches are
byte strings, and the haystack need not be valid UTF-8.

# Example

```
use regex_pcre::bytes::Regex;

let re = Regex::new(r"(?<=id=)\w+")?;
let ids: Vec<&[u8]> = re
    .find_iter(b"id=a1 \xFF\xFE id=b2")
    .map(|m| m.map(|m| m.as_bytes()))
    .collect::<Result<_, _>>()?;
assert_eq!(vec![&b"a1"[..], &b"b2"[..]], ids);
# Ok::<(), regex_pcre::Error>(())
```
*/
pub mod bytes {
    pub use crate::re_builder::bytes::RegexBuilder;
    pub use crate::re_bytes::{
        CaptureMatches, CaptureNames, Captures, Match, Matches, NoExpand,
        Regex, Replacer, ReplacerRef, SubCaptureMatches,
    };
}
