/*!
Process-wide defaults for the extended engine.

Three settings are shared by every regex in the process: the JIT option and
the JIT stack sizing, which are read once when a pattern is compiled, and the
match limits, which are read at the start of every extended search. All three
sit behind a single lock. A search takes a snapshot of the current limits, so
changing them never affects a search that is already running, and the old
native context is freed once the last search using it finishes.
*/

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::Error,
    pcre2::{
        MatchContext, PCRE2_JIT_COMPLETE, PCRE2_JIT_PARTIAL_HARD,
        PCRE2_JIT_PARTIAL_SOFT,
    },
};

/// The default initial size, in bytes, of the JIT stack given to each
/// extended search.
pub const DEFAULT_JIT_STACK_START_SIZE: usize = 32 * 1024;

/// The default maximum size, in bytes, that a JIT stack may grow to.
pub const DEFAULT_JIT_STACK_MAX_SIZE: usize = 512 * 1024;

/// Controls how patterns routed to the extended engine are JIT compiled.
///
/// JIT compilation never causes a pattern to fail. If it isn't available (or
/// fails), searches run on PCRE2's interpreter instead.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum JitOption {
    /// Don't JIT compile. Every search uses the interpreter.
    Disabled,
    /// JIT compile for complete matches. This is the default.
    #[default]
    Complete,
    /// JIT compile for soft partial matching only. Complete matches, which
    /// are the only kind this crate runs, use the interpreter.
    PartialSoft,
    /// JIT compile for hard partial matching only. Complete matches use the
    /// interpreter.
    PartialHard,
}

impl JitOption {
    /// The `PCRE2_JIT_*` bits passed to the JIT compiler, or `None` when JIT
    /// compilation is disabled.
    pub(crate) fn modes(self) -> Option<u32> {
        match self {
            JitOption::Disabled => None,
            JitOption::Complete => Some(PCRE2_JIT_COMPLETE),
            JitOption::PartialSoft => Some(PCRE2_JIT_PARTIAL_SOFT),
            JitOption::PartialHard => Some(PCRE2_JIT_PARTIAL_HARD),
        }
    }
}

/// The size of the JIT stack allocated for each concurrent extended search.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct JitStackSize {
    /// The initial size in bytes.
    pub start: usize,
    /// The size in bytes the stack may grow to.
    pub max: usize,
}

impl Default for JitStackSize {
    fn default() -> JitStackSize {
        JitStackSize {
            start: DEFAULT_JIT_STACK_START_SIZE,
            max: DEFAULT_JIT_STACK_MAX_SIZE,
        }
    }
}

/// Limits on the work a single extended search may do.
///
/// A search that exceeds either limit fails with an error for which
/// [`Error::is_limit_exceeded`] returns true. This is the way to bound the
/// cost of patterns prone to catastrophic backtracking. A limit of `0` means
/// PCRE2's built in default applies. The simple engine runs in linear time
/// and ignores these limits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct MatchLimits {
    /// The maximum number of times PCRE2's internal match function may be
    /// called during one search.
    pub match_limit: u32,
    /// The maximum backtracking depth of one search.
    pub depth_limit: u32,
}

impl MatchLimits {
    /// Returns true if neither limit is set.
    pub fn is_unlimited(&self) -> bool {
        self.match_limit == 0 && self.depth_limit == 0
    }
}

/// A native match context with limits applied. Searches never use it
/// directly: they duplicate it so that they can assign their own JIT stack.
#[derive(Debug)]
pub(crate) struct LimitContext {
    limits: MatchLimits,
    ctx: MatchContext,
}

impl LimitContext {
    fn new(limits: MatchLimits) -> Result<LimitContext, Error> {
        let mut ctx = MatchContext::new()?;
        if limits.match_limit > 0 {
            ctx.set_match_limit(limits.match_limit)?;
        }
        if limits.depth_limit > 0 {
            ctx.set_depth_limit(limits.depth_limit)?;
        }
        Ok(LimitContext { limits, ctx })
    }

    /// Returns a call-local copy of this context.
    pub(crate) fn duplicate(&self) -> Result<MatchContext, Error> {
        self.ctx.duplicate()
    }
}

#[derive(Debug)]
struct Defaults {
    jit: JitOption,
    stack: JitStackSize,
    limits: Option<Arc<LimitContext>>,
}

static DEFAULTS: RwLock<Defaults> = RwLock::new(Defaults {
    jit: JitOption::Complete,
    stack: JitStackSize {
        start: DEFAULT_JIT_STACK_START_SIZE,
        max: DEFAULT_JIT_STACK_MAX_SIZE,
    },
    limits: None,
});

// Nothing holding the lock can panic in a way that leaves the defaults
// half-written, so a poisoned lock is still usable.

fn read() -> RwLockReadGuard<'static, Defaults> {
    DEFAULTS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, Defaults> {
    DEFAULTS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Set the JIT option used for patterns compiled from now on.
///
/// Patterns already compiled keep the option they were compiled with. A
/// [`RegexBuilder`](crate::RegexBuilder) can override this per pattern.
pub fn set_jit_option(option: JitOption) {
    debug!("setting default JIT option to {:?}", option);
    write().jit = option;
}

/// Returns the JIT option used for newly compiled patterns.
pub fn jit_option() -> JitOption {
    read().jit
}

/// Set the JIT stack size used by patterns compiled from now on.
///
/// `start` is the initial size of each stack in bytes and `max` the size it
/// may grow to. An error is returned when `start` is zero or larger than
/// `max`, in which case the current sizes are left unchanged.
///
/// # Example
///
/// ```
/// use regex_pcre::{jit_stack_size, set_jit_stack_size};
///
/// assert!(set_jit_stack_size(0, 1024).is_err());
/// assert!(set_jit_stack_size(4096, 1024).is_err());
/// assert_eq!(32 * 1024, jit_stack_size().start);
/// ```
pub fn set_jit_stack_size(start: usize, max: usize) -> Result<(), Error> {
    if start == 0 {
        return Err(Error::config("JIT stack start size must be non-zero"));
    }
    if start > max {
        return Err(Error::config(format!(
            "JIT stack start size {} exceeds maximum size {}",
            start, max,
        )));
    }
    debug!("setting default JIT stack size to {}..{}", start, max);
    write().stack = JitStackSize { start, max };
    Ok(())
}

/// Returns the JIT stack size used by newly compiled patterns.
pub fn jit_stack_size() -> JitStackSize {
    read().stack
}

/// Set the limits applied to every extended search started from now on.
///
/// Passing [`MatchLimits::default()`] (both limits zero) removes the limits.
/// Searches already running keep the limits they started with.
///
/// # Example
///
/// ```
/// use regex_pcre::{match_limits, set_match_limits, MatchLimits};
///
/// let limits = MatchLimits { match_limit: 100_000, depth_limit: 0 };
/// set_match_limits(limits)?;
/// assert_eq!(limits, match_limits());
///
/// set_match_limits(MatchLimits::default())?;
/// assert!(match_limits().is_unlimited());
/// # Ok::<(), regex_pcre::Error>(())
/// ```
pub fn set_match_limits(limits: MatchLimits) -> Result<(), Error> {
    // Build the new context before taking the lock so that readers are
    // never blocked on native allocation.
    let ctx = if limits.is_unlimited() {
        None
    } else {
        Some(Arc::new(LimitContext::new(limits)?))
    };
    let old = std::mem::replace(&mut write().limits, ctx);
    debug!(
        "replaced match limit context ({:?} -> {:?})",
        old.as_ref().map(|c| c.limits),
        limits,
    );
    // The old context is freed here, or later by the last search that
    // snapshotted it.
    drop(old);
    Ok(())
}

/// Returns the limits applied to extended searches.
pub fn match_limits() -> MatchLimits {
    read().limits.as_ref().map_or(MatchLimits::default(), |c| c.limits)
}

/// Returns the jit option and stack size to compile a pattern with.
pub(crate) fn compile_defaults() -> (JitOption, JitStackSize) {
    let defaults = read();
    (defaults.jit, defaults.stack)
}

/// Returns a snapshot of the current limit context, if any.
pub(crate) fn limit_context() -> Option<Arc<LimitContext>> {
    read().limits.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests only exercise paths that leave the process-wide defaults
    // untouched, since other unit tests compile and search concurrently.

    #[test]
    fn invalid_stack_sizes() {
        let before = jit_stack_size();
        let err = set_jit_stack_size(0, 0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = set_jit_stack_size(2048, 1024).unwrap_err();
        assert!(err.to_string().contains("2048"), "{}", err);
        assert_eq!(before, jit_stack_size());
    }

    #[test]
    fn jit_modes() {
        assert_eq!(None, JitOption::Disabled.modes());
        assert_eq!(Some(PCRE2_JIT_COMPLETE), JitOption::Complete.modes());
        assert_eq!(JitOption::Complete, JitOption::default());
    }

    #[test]
    fn limit_context_copies() {
        let limits = MatchLimits { match_limit: 10, depth_limit: 5 };
        let ctx = LimitContext::new(limits).unwrap();
        assert_eq!(limits, ctx.limits);
        let copy = ctx.duplicate().unwrap();
        drop(ctx);
        drop(copy);
    }

    #[test]
    fn defaults() {
        let size = JitStackSize::default();
        assert_eq!(32 * 1024, size.start);
        assert_eq!(512 * 1024, size.max);
        assert!(MatchLimits::default().is_unlimited());
        assert!(!MatchLimits { match_limit: 1, depth_limit: 0 }.is_unlimited());
    }
}
