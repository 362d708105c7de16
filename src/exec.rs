use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use crate::{
    classify::{classify, EngineKind},
    error::Error,
    extended::ExtendedEngine,
    re_builder::RegexOptions,
    re_trait::{Engine, FindCaptures, FindMatches, Input, Slot},
    simple::SimpleEngine,
};

/// Exec manages the execution of a regular expression.
///
/// In particular, this owns the compiled program of a single regular
/// expression, routes each search to it and releases it exactly once, either
/// through an explicit `release` or when dropped.
///
/// A search holds its own reference to the compiled program while it runs,
/// so releasing a regex that is being searched on another thread is safe:
/// the release returns immediately and the native resources are freed when
/// the last running search finishes.
#[derive(Debug)]
pub(crate) struct Exec {
    pattern: Arc<str>,
    kind: EngineKind,
    captures_len: usize,
    names: Arc<[Option<String>]>,
    name_idx: Arc<HashMap<String, usize>>,
    /// The compiled program. `None` once released.
    engine: RwLock<Option<Arc<dyn Engine>>>,
    released: AtomicBool,
}

impl Exec {
    /// Classify and compile the pattern in `opts`. `utf8` is true when the
    /// regex searches `&str` haystacks.
    pub(crate) fn open(opts: &RegexOptions, utf8: bool) -> Result<Exec, Error> {
        let kind = if opts.always_extended {
            EngineKind::Extended
        } else {
            classify(&opts.pattern)
        };
        let engine: Arc<dyn Engine> = match kind {
            EngineKind::Simple => Arc::new(SimpleEngine::new(opts, utf8)?),
            EngineKind::Extended => Arc::new(ExtendedEngine::new(opts, utf8)?),
        };
        debug!("opened {:?} regex for {:?}", kind, opts.pattern);
        let names = engine.group_names();
        let name_idx = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.as_ref().map(|n| (n.clone(), i)))
            .collect();
        Ok(Exec {
            pattern: Arc::from(opts.pattern.as_str()),
            kind,
            captures_len: engine.captures_len(),
            names: Arc::from(names),
            name_idx: Arc::new(name_idx),
            engine: RwLock::new(Some(engine)),
            released: AtomicBool::new(false),
        })
    }

    /// Release the compiled program. Returns true for the call that actually
    /// released it, and false for every call after that.
    pub(crate) fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }
        let engine = self
            .engine
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(
            "released {:?} regex for {:?} ({} other references)",
            self.kind,
            self.pattern,
            engine.as_ref().map_or(0, |e| Arc::strong_count(e) - 1),
        );
        drop(engine);
        true
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Returns a reference to the compiled program that stays valid even if
    /// the regex is released while it is used.
    fn engine(&self) -> Result<Arc<dyn Engine>, Error> {
        if self.is_released() {
            return Err(Error::Closed);
        }
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::Closed)
    }

    /// Returns the leftmost-first match at or after `start` and fills in
    /// `slots`, which is either empty or has two slots per group.
    pub(crate) fn search(
        &self,
        input: Input<'_>,
        start: usize,
        slots: &mut [Slot],
    ) -> Result<Option<(usize, usize)>, Error> {
        let engine = self.engine()?;
        if start > input.len() || !input.is_valid_start(start) {
            return Err(Error::invalid_argument());
        }
        debug_assert!(slots.is_empty() || slots.len() == 2 * self.captures_len);
        engine.search(input, start, slots)
    }

    pub(crate) fn next_after_empty(&self, input: Input<'_>, i: usize) -> usize {
        match self.engine() {
            Ok(engine) => engine.next_after_empty(input, i),
            // The next search reports that the regex was released.
            Err(_) => i + 1,
        }
    }

    pub(crate) fn find_iter<'r, 'h>(
        &'r self,
        input: Input<'h>,
    ) -> FindMatches<'r, 'h> {
        FindMatches::new(self, input)
    }

    pub(crate) fn captures_iter<'r, 'h>(
        &'r self,
        input: Input<'h>,
    ) -> FindCaptures<'r, 'h> {
        FindCaptures::new(self, input)
    }

    /// Returns empty slots big enough for every group.
    pub(crate) fn alloc_slots(&self) -> Vec<Slot> {
        vec![None; 2 * self.captures_len]
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn kind(&self) -> EngineKind {
        self.kind
    }

    pub(crate) fn captures_len(&self) -> usize {
        self.captures_len
    }

    pub(crate) fn capture_names(&self) -> &Arc<[Option<String>]> {
        &self.names
    }

    pub(crate) fn capture_name_idx(&self) -> &Arc<HashMap<String, usize>> {
        &self.name_idx
    }
}

impl Drop for Exec {
    fn drop(&mut self) {
        self.release();
    }
}
