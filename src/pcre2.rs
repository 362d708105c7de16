/*!
Owned handles for the PCRE2 objects used by the extended engine.

Every native object is wrapped in a type that frees it on `Drop`, so each
object is freed exactly once by whoever owns it last. Nothing outside of this
module touches a raw PCRE2 pointer.
*/

use std::ptr::{self, NonNull};

use libc::{c_int, c_void};
use pcre2_sys::{
    pcre2_code_8, pcre2_code_free_8, pcre2_compile_8,
    pcre2_get_error_message_8, pcre2_get_ovector_count_8,
    pcre2_get_ovector_pointer_8, pcre2_jit_compile_8, pcre2_jit_match_8,
    pcre2_jit_stack_8, pcre2_jit_stack_assign_8, pcre2_jit_stack_create_8,
    pcre2_jit_stack_free_8, pcre2_match_8, pcre2_match_context_8,
    pcre2_match_context_copy_8, pcre2_match_context_create_8,
    pcre2_match_context_free_8, pcre2_match_data_8,
    pcre2_match_data_create_from_pattern_8, pcre2_match_data_free_8,
    pcre2_pattern_info_8, pcre2_set_depth_limit_8, pcre2_set_match_limit_8,
};

use crate::{
    classify::EngineKind,
    error::{Error, MatchErrorKind},
};

// PCRE2 FFI constants. We only name the bits we need.

pub(crate) const PCRE2_CASELESS: u32 = 0x00000008;
pub(crate) const PCRE2_DOTALL: u32 = 0x00000020;
pub(crate) const PCRE2_EXTENDED: u32 = 0x00000080;
pub(crate) const PCRE2_MULTILINE: u32 = 0x00000400;
pub(crate) const PCRE2_UCP: u32 = 0x00020000;
pub(crate) const PCRE2_UNGREEDY: u32 = 0x00040000;
pub(crate) const PCRE2_UTF: u32 = 0x00080000;
pub(crate) const PCRE2_NEVER_BACKSLASH_C: u32 = 0x00100000;
pub(crate) const PCRE2_MATCH_INVALID_UTF: u32 = 0x04000000;
const PCRE2_NO_UTF_CHECK: u32 = 0x40000000;

pub(crate) const PCRE2_JIT_COMPLETE: u32 = 0x00000001;
pub(crate) const PCRE2_JIT_PARTIAL_SOFT: u32 = 0x00000002;
pub(crate) const PCRE2_JIT_PARTIAL_HARD: u32 = 0x00000004;

const PCRE2_INFO_CAPTURECOUNT: u32 = 4;
const PCRE2_INFO_NAMECOUNT: u32 = 17;
const PCRE2_INFO_NAMEENTRYSIZE: u32 = 18;
const PCRE2_INFO_NAMETABLE: u32 = 19;

pub(crate) const PCRE2_ERROR_NOMATCH: c_int = -1;
const PCRE2_ERROR_UTF8_ERR1: c_int = -3;
const PCRE2_ERROR_UTF8_ERR21: c_int = -23;
const PCRE2_ERROR_BADOFFSET: c_int = -33;
const PCRE2_ERROR_BADUTFOFFSET: c_int = -36;
const PCRE2_ERROR_JIT_STACKLIMIT: c_int = -46;
const PCRE2_ERROR_MATCHLIMIT: c_int = -47;
const PCRE2_ERROR_NOMEMORY: c_int = -48;
const PCRE2_ERROR_DEPTHLIMIT: c_int = -53;
const PCRE2_ERROR_HEAPLIMIT: c_int = -63;

/// The value PCRE2 writes to both halves of an ovector pair for a group that
/// didn't participate in the match.
const PCRE2_UNSET: usize = usize::MAX;

/// Returns PCRE2's description of the given error code.
pub(crate) fn error_message(code: c_int) -> String {
    const BUF_LEN: usize = 256;
    let mut buf = [0u8; BUF_LEN];
    let len = unsafe {
        pcre2_get_error_message_8(code, buf.as_mut_ptr(), BUF_LEN)
    };
    if len < 0 {
        format!("unknown PCRE2 error code {}", code)
    } else {
        String::from_utf8_lossy(&buf[..len as usize]).into_owned()
    }
}

/// Maps a negative return code from a match function to an error.
pub(crate) fn match_error(code: c_int) -> Error {
    let kind = match code {
        PCRE2_ERROR_MATCHLIMIT
        | PCRE2_ERROR_DEPTHLIMIT
        | PCRE2_ERROR_HEAPLIMIT => MatchErrorKind::LimitExceeded,
        PCRE2_ERROR_JIT_STACKLIMIT => MatchErrorKind::JitStackExhausted,
        PCRE2_ERROR_UTF8_ERR21..=PCRE2_ERROR_UTF8_ERR1
        | PCRE2_ERROR_BADOFFSET
        | PCRE2_ERROR_BADUTFOFFSET => MatchErrorKind::InvalidArgument,
        _ => MatchErrorKind::Engine,
    };
    Error::matching(kind, code)
}

fn out_of_memory() -> Error {
    Error::matching(MatchErrorKind::Engine, PCRE2_ERROR_NOMEMORY)
}

/// A compiled pattern.
#[derive(Debug)]
pub(crate) struct Code {
    code: NonNull<pcre2_code_8>,
    utf: bool,
    jit_complete: bool,
}

// SAFETY: Compiled code is immutable after JIT compilation, which requires
// `&mut Code`. PCRE2 documents compiled code as safe to share between
// threads, each using its own match data.
unsafe impl Send for Code {}
unsafe impl Sync for Code {}

impl Drop for Code {
    fn drop(&mut self) {
        unsafe { pcre2_code_free_8(self.code.as_ptr()) }
    }
}

impl Code {
    /// Compile the given pattern with the given `PCRE2_*` options.
    pub(crate) fn new(pattern: &str, options: u32) -> Result<Code, Error> {
        let mut error_code: c_int = 0;
        let mut error_offset: usize = 0;
        let code = unsafe {
            pcre2_compile_8(
                pattern.as_ptr(),
                pattern.len(),
                options,
                &mut error_code,
                &mut error_offset,
                ptr::null_mut(),
            )
        };
        match NonNull::new(code) {
            None => Err(Error::compile(
                EngineKind::Extended,
                error_code,
                Some(error_offset),
                error_message(error_code),
            )),
            Some(code) => Ok(Code {
                code,
                utf: options & PCRE2_UTF != 0,
                jit_complete: false,
            }),
        }
    }

    /// JIT compile this pattern for the given `PCRE2_JIT_*` modes. On
    /// failure, the pattern stays usable through the interpreter and the
    /// PCRE2 error code is returned.
    pub(crate) fn jit_compile(&mut self, modes: u32) -> Result<(), c_int> {
        let rc = unsafe { pcre2_jit_compile_8(self.code.as_ptr(), modes) };
        if rc < 0 {
            return Err(rc);
        }
        self.jit_complete = modes & PCRE2_JIT_COMPLETE != 0;
        Ok(())
    }

    /// Returns true if complete matches can run on JIT compiled code.
    pub(crate) fn is_jit_complete(&self) -> bool {
        self.jit_complete
    }

    /// Returns the number of capturing groups, not including the implicit
    /// group for the overall match.
    pub(crate) fn capture_count(&self) -> Result<u32, Error> {
        let mut count: u32 = 0;
        self.info(
            PCRE2_INFO_CAPTURECOUNT,
            &mut count as *mut u32 as *mut c_void,
        )?;
        Ok(count)
    }

    /// Returns the group index and name of every named group.
    pub(crate) fn names(&self) -> Result<Vec<(usize, String)>, Error> {
        let (mut count, mut entry_size): (u32, u32) = (0, 0);
        let mut table: *const u8 = ptr::null();
        self.info(
            PCRE2_INFO_NAMECOUNT,
            &mut count as *mut u32 as *mut c_void,
        )?;
        if count == 0 {
            return Ok(vec![]);
        }
        self.info(
            PCRE2_INFO_NAMEENTRYSIZE,
            &mut entry_size as *mut u32 as *mut c_void,
        )?;
        self.info(
            PCRE2_INFO_NAMETABLE,
            &mut table as *mut *const u8 as *mut c_void,
        )?;
        if table.is_null() || entry_size < 3 {
            return Ok(vec![]);
        }
        let (count, entry_size) = (count as usize, entry_size as usize);
        // SAFETY: The name table is `count` entries of `entry_size` bytes
        // each, owned by the compiled code.
        let table =
            unsafe { std::slice::from_raw_parts(table, count * entry_size) };
        // Each entry is a big endian group index followed by a NUL
        // terminated name.
        let names = table
            .chunks_exact(entry_size)
            .map(|entry| {
                let index = usize::from(entry[0]) << 8 | usize::from(entry[1]);
                let name = &entry[2..];
                let end =
                    name.iter().position(|&b| b == 0).unwrap_or(name.len());
                (index, String::from_utf8_lossy(&name[..end]).into_owned())
            })
            .collect();
        Ok(names)
    }

    fn info(&self, what: u32, out: *mut c_void) -> Result<(), Error> {
        let rc =
            unsafe { pcre2_pattern_info_8(self.code.as_ptr(), what, out) };
        if rc != 0 {
            return Err(Error::matching(MatchErrorKind::Engine, rc));
        }
        Ok(())
    }

    /// Run one match attempt starting at `start`.
    ///
    /// `valid_utf` must be true only when the subject is known to be valid
    /// UTF-8, which lets PCRE2 skip validation and use the JIT fast path.
    /// Otherwise the interpreter is used for UTF patterns, which validates
    /// the subject (or, with `PCRE2_MATCH_INVALID_UTF`, skips invalid
    /// sequences).
    ///
    /// Returns PCRE2's return code unchanged.
    pub(crate) fn try_match(
        &self,
        subject: &[u8],
        start: usize,
        valid_utf: bool,
        data: &mut MatchData,
        context: Option<&MatchContext>,
    ) -> c_int {
        let ctx = context.map_or(ptr::null_mut(), |c| c.as_ptr());
        let use_jit = self.jit_complete && (valid_utf || !self.utf);
        let options =
            if valid_utf && self.utf { PCRE2_NO_UTF_CHECK } else { 0 };
        unsafe {
            if use_jit {
                pcre2_jit_match_8(
                    self.code.as_ptr(),
                    subject.as_ptr(),
                    subject.len(),
                    start,
                    0,
                    data.as_ptr(),
                    ctx,
                )
            } else {
                pcre2_match_8(
                    self.code.as_ptr(),
                    subject.as_ptr(),
                    subject.len(),
                    start,
                    options,
                    data.as_ptr(),
                    ctx,
                )
            }
        }
    }
}

/// The buffer a match writes its group offsets to.
#[derive(Debug)]
pub(crate) struct MatchData {
    data: NonNull<pcre2_match_data_8>,
    ovector: *const usize,
    pairs: usize,
}

// SAFETY: Match data is only ever used through `&mut` or `&` borrows of its
// single owner.
unsafe impl Send for MatchData {}

impl Drop for MatchData {
    fn drop(&mut self) {
        unsafe { pcre2_match_data_free_8(self.data.as_ptr()) }
    }
}

impl MatchData {
    /// Create match data big enough for every group in `code`.
    pub(crate) fn new(code: &Code) -> Result<MatchData, Error> {
        let data = unsafe {
            pcre2_match_data_create_from_pattern_8(
                code.code.as_ptr(),
                ptr::null_mut(),
            )
        };
        let data = NonNull::new(data).ok_or_else(out_of_memory)?;
        let (ovector, pairs) = unsafe {
            (
                pcre2_get_ovector_pointer_8(data.as_ptr()),
                pcre2_get_ovector_count_8(data.as_ptr()),
            )
        };
        Ok(MatchData { data, ovector, pairs: pairs as usize })
    }

    fn as_ptr(&mut self) -> *mut pcre2_match_data_8 {
        self.data.as_ptr()
    }

    /// Returns the offsets of group `i` from the last successful match, or
    /// `None` if it didn't participate.
    pub(crate) fn group(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.pairs {
            return None;
        }
        // SAFETY: The ovector has `pairs` pairs and lives as long as the
        // match data.
        let (start, end) = unsafe {
            (*self.ovector.add(2 * i), *self.ovector.add(2 * i + 1))
        };
        if start == PCRE2_UNSET || end == PCRE2_UNSET {
            return None;
        }
        Some((start, end))
    }
}

/// Per-match settings: resource limits and the JIT stack.
#[derive(Debug)]
pub(crate) struct MatchContext {
    ctx: NonNull<pcre2_match_context_8>,
}

// SAFETY: Every mutation requires `&mut MatchContext`. A shared context is
// only ever read, either by copying it or by passing it to a match function.
unsafe impl Send for MatchContext {}
unsafe impl Sync for MatchContext {}

impl Drop for MatchContext {
    fn drop(&mut self) {
        unsafe { pcre2_match_context_free_8(self.ctx.as_ptr()) }
    }
}

impl MatchContext {
    pub(crate) fn new() -> Result<MatchContext, Error> {
        let ctx = unsafe { pcre2_match_context_create_8(ptr::null_mut()) };
        let ctx = NonNull::new(ctx).ok_or_else(out_of_memory)?;
        Ok(MatchContext { ctx })
    }

    /// Returns an independent copy of this context.
    pub(crate) fn duplicate(&self) -> Result<MatchContext, Error> {
        let ctx = unsafe { pcre2_match_context_copy_8(self.ctx.as_ptr()) };
        let ctx = NonNull::new(ctx).ok_or_else(out_of_memory)?;
        Ok(MatchContext { ctx })
    }

    /// Set the maximum number of times PCRE2's internal match function may
    /// be called during a single match.
    pub(crate) fn set_match_limit(&mut self, limit: u32) -> Result<(), Error> {
        let rc = unsafe { pcre2_set_match_limit_8(self.ctx.as_ptr(), limit) };
        if rc != 0 {
            return Err(Error::config(format!(
                "could not set match limit (code: {})",
                rc
            )));
        }
        Ok(())
    }

    /// Set the maximum backtracking depth of a single match.
    pub(crate) fn set_depth_limit(&mut self, limit: u32) -> Result<(), Error> {
        let rc = unsafe { pcre2_set_depth_limit_8(self.ctx.as_ptr(), limit) };
        if rc != 0 {
            return Err(Error::config(format!(
                "could not set depth limit (code: {})",
                rc
            )));
        }
        Ok(())
    }

    /// Make JIT matches using this context run on the given stack.
    ///
    /// The stack must outlive every match that uses this context.
    pub(crate) fn assign_jit_stack(&mut self, stack: &JitStack) {
        unsafe {
            pcre2_jit_stack_assign_8(
                self.ctx.as_ptr(),
                None,
                stack.stack.as_ptr() as *mut c_void,
            )
        }
    }

    fn as_ptr(&self) -> *mut pcre2_match_context_8 {
        self.ctx.as_ptr()
    }
}

/// A growable stack for JIT compiled code.
#[derive(Debug)]
pub(crate) struct JitStack {
    stack: NonNull<pcre2_jit_stack_8>,
}

// SAFETY: A JIT stack is used by at most one match at a time, which is
// guaranteed by its single owner.
unsafe impl Send for JitStack {}

impl Drop for JitStack {
    fn drop(&mut self) {
        unsafe { pcre2_jit_stack_free_8(self.stack.as_ptr()) }
    }
}

impl JitStack {
    /// Allocate a stack that starts at `start` bytes and may grow to `max`
    /// bytes. Returns `None` if the allocation failed.
    pub(crate) fn new(start: usize, max: usize) -> Option<JitStack> {
        let stack =
            unsafe { pcre2_jit_stack_create_8(start, max, ptr::null_mut()) };
        NonNull::new(stack).map(|stack| JitStack { stack })
    }
}
