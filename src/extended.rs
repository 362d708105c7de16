use std::sync::Arc;

use crate::{
    classify::EngineKind,
    config::{self, JitStackSize},
    error::{Error, MatchErrorKind},
    pcre2::{
        self, Code, JitStack, MatchContext, MatchData, PCRE2_CASELESS,
        PCRE2_DOTALL, PCRE2_ERROR_NOMATCH, PCRE2_EXTENDED,
        PCRE2_MATCH_INVALID_UTF, PCRE2_MULTILINE, PCRE2_NEVER_BACKSLASH_C,
        PCRE2_UCP, PCRE2_UNGREEDY, PCRE2_UTF,
    },
    pool::Pool,
    re_builder::RegexOptions,
    re_trait::{Engine, Input, Slot},
};

/// The type of the closure we use to create new scratch space.
type ScratchFn = Box<dyn Fn() -> Result<Scratch, Error> + Send + Sync>;

/// The backtracking engine, backed by PCRE2.
///
/// The compiled code is shared by every search. Everything a search writes
/// to (match data and the JIT stack) lives in a pool, so each concurrent
/// search gets its own.
#[derive(Debug)]
pub(crate) struct ExtendedEngine {
    code: Arc<Code>,
    /// True when the code was compiled in UTF mode.
    utf: bool,
    captures_len: usize,
    names: Vec<(usize, String)>,
    scratch: Pool<Scratch, ScratchFn>,
}

/// Mutable state used by one search at a time.
#[derive(Debug)]
struct Scratch {
    data: MatchData,
    /// A context with `stack` assigned, used when no match limits are
    /// configured. `None` when there is no JIT stack.
    base: Option<MatchContext>,
    stack: Option<JitStack>,
}

impl Scratch {
    fn new(code: &Code, size: JitStackSize) -> Result<Scratch, Error> {
        let data = MatchData::new(code)?;
        if !code.is_jit_complete() {
            return Ok(Scratch { data, base: None, stack: None });
        }
        let stack = match JitStack::new(size.start, size.max) {
            Some(stack) => stack,
            None => {
                warn!(
                    "could not allocate a {}..{} byte JIT stack, \
                     falling back to the machine stack",
                    size.start, size.max,
                );
                return Ok(Scratch { data, base: None, stack: None });
            }
        };
        let mut base = MatchContext::new()?;
        base.assign_jit_stack(&stack);
        Ok(Scratch { data, base: Some(base), stack: Some(stack) })
    }
}

impl ExtendedEngine {
    pub(crate) fn new(
        opts: &RegexOptions,
        utf8: bool,
    ) -> Result<ExtendedEngine, Error> {
        let mut flags = 0;
        if opts.case_insensitive {
            flags |= PCRE2_CASELESS;
        }
        if opts.multi_line {
            flags |= PCRE2_MULTILINE;
        }
        if opts.dot_matches_new_line {
            flags |= PCRE2_DOTALL;
        }
        if opts.swap_greed {
            flags |= PCRE2_UNGREEDY;
        }
        if opts.ignore_whitespace {
            flags |= PCRE2_EXTENDED;
        }
        if utf8 {
            // A &str haystack is always UTF-8, so UTF mode is always on.
            // The unicode option only decides whether \w, \d and friends
            // match beyond ASCII. \C could end a match inside of a
            // codepoint, so it's rejected.
            flags |= PCRE2_UTF | PCRE2_NEVER_BACKSLASH_C;
            if opts.unicode {
                flags |= PCRE2_UCP;
            }
        } else if opts.unicode {
            // Byte haystacks may contain invalid UTF-8. They're searched as
            // UTF-8 anyway, skipping over anything invalid.
            flags |= PCRE2_UTF | PCRE2_UCP | PCRE2_MATCH_INVALID_UTF;
        }

        let (default_jit, stack) = config::compile_defaults();
        let jit = opts.jit.unwrap_or(default_jit);
        let mut code = Code::new(&opts.pattern, flags)?;
        if let Some(modes) = jit.modes() {
            if let Err(_code) = code.jit_compile(modes) {
                warn!(
                    "JIT compilation of {:?} failed, using the interpreter: {}",
                    opts.pattern,
                    pcre2::error_message(_code),
                );
            }
        }
        let captures_len = code.capture_count()? as usize + 1;
        let names = code.names()?;
        debug!(
            "compiled extended program (jit: {:?}, complete: {}, groups: {})",
            jit,
            code.is_jit_complete(),
            captures_len,
        );

        let code = Arc::new(code);
        let create_code = Arc::clone(&code);
        let create: ScratchFn =
            Box::new(move || Scratch::new(&create_code, stack));
        Ok(ExtendedEngine {
            code,
            utf: flags & PCRE2_UTF != 0,
            captures_len,
            names,
            scratch: Pool::new(create),
        })
    }
}

impl Engine for ExtendedEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Extended
    }

    fn captures_len(&self) -> usize {
        self.captures_len
    }

    fn group_names(&self) -> Vec<Option<String>> {
        let mut names = vec![None; self.captures_len];
        for (i, name) in self.names.iter() {
            if let Some(slot) = names.get_mut(*i) {
                *slot = Some(name.clone());
            }
        }
        names
    }

    fn next_after_empty(&self, input: Input<'_>, i: usize) -> usize {
        match input {
            Input::Str(s) => {
                i + s[i..].chars().next().map_or(1, |c| c.len_utf8())
            }
            // In UTF mode a match never starts inside of a valid encoding,
            // so step over the whole thing. Invalid bytes are stepped over
            // one maximal invalid sequence at a time.
            Input::Bytes(b) if self.utf => {
                let (_, len) = bstr::decode_utf8(&b[i.min(b.len())..]);
                i + len.max(1)
            }
            Input::Bytes(_) => i + 1,
        }
    }

    fn search(
        &self,
        input: Input<'_>,
        start: usize,
        slots: &mut [Slot],
    ) -> Result<Option<(usize, usize)>, Error> {
        // Snapshot the limits first. If they're replaced while we search,
        // our copy keeps the old ones alive.
        let limits = config::limit_context();
        let mut guard = self.scratch.get()?;
        let scratch = &mut *guard;

        let local;
        let ctx = match limits {
            None => scratch.base.as_ref(),
            Some(ref limits) => {
                let mut ctx = limits.duplicate()?;
                if let Some(ref stack) = scratch.stack {
                    ctx.assign_jit_stack(stack);
                }
                local = ctx;
                Some(&local)
            }
        };
        let valid_utf = matches!(input, Input::Str(_));
        let rc = self.code.try_match(
            input.as_bytes(),
            start,
            valid_utf,
            &mut scratch.data,
            ctx,
        );
        if rc == PCRE2_ERROR_NOMATCH {
            trace!("extended search from {} found nothing", start);
            return Ok(None);
        }
        if rc == 0 {
            return Err(Error::matching(MatchErrorKind::BufferTooSmall, 0));
        }
        if rc < 0 {
            let err = pcre2::match_error(rc);
            debug!("extended search from {} failed: {}", start, err);
            return Err(err);
        }
        // Only the first `rc` groups are valid. The rest didn't participate,
        // but may hold offsets left over from an earlier match.
        let set = rc as usize;
        for (i, pair) in slots.chunks_exact_mut(2).enumerate() {
            let group = if i < set { scratch.data.group(i) } else { None };
            let (s, e) = match group {
                None => (None, None),
                Some((s, e)) => (Some(s), Some(e)),
            };
            pair[0] = s;
            pair[1] = e;
        }
        let m = scratch.data.group(0);
        trace!("extended search from {} found {:?}", start, m);
        Ok(m)
    }
}
