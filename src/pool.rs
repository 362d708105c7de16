use std::{
    panic::{RefUnwindSafe, UnwindSafe},
    sync::Mutex,
};

use crate::error::Error;

/// A thread safe pool of values that may only be used by one caller at a
/// time, such as the match data and JIT stack of an extended search.
///
/// Values are created lazily, so the pool grows to the number of searches
/// that have ever run concurrently on the same regex. Creating a value can
/// fail (native allocation), in which case the error is returned to the
/// caller that asked for it and the pool is unchanged.
pub(crate) struct Pool<T, F> {
    /// A stack of T values to hand out.
    stack: Mutex<Vec<Box<T>>>,
    /// A function to create more T values when stack is empty and a caller
    /// has requested a T.
    create: F,
}

// Since we provide exclusive access to any particular value in the pool, it
// should also be considered RefUnwindSafe when T is UnwindSafe.
impl<T: UnwindSafe, F: UnwindSafe> RefUnwindSafe for Pool<T, F> {}

impl<T, F> Pool<T, F> {
    /// Create a new pool. The given closure is used to create values in
    /// the pool when necessary.
    pub(crate) const fn new(create: F) -> Pool<T, F> {
        Pool { stack: Mutex::new(vec![]), create }
    }
}

impl<T: Send, F: Fn() -> Result<T, Error>> Pool<T, F> {
    /// Get a value from the pool, creating one if none are free. This may
    /// block if another thread is also attempting to retrieve a value from
    /// the pool.
    pub(crate) fn get(&self) -> Result<PoolGuard<'_, T, F>, Error> {
        let popped = self.stack.lock().unwrap().pop();
        let value = match popped {
            Some(value) => value,
            // Created outside the lock, since this may allocate a JIT stack.
            None => Box::new((self.create)()?),
        };
        Ok(PoolGuard { pool: self, value: Some(value) })
    }

    /// Puts a value back into the pool. Callers don't need to call this.
    /// Once the guard that's returned by 'get' is dropped, it is put back
    /// into the pool automatically.
    fn put_value(&self, value: Box<T>) {
        let mut stack = self.stack.lock().unwrap();
        stack.push(value);
    }
}

impl<T: core::fmt::Debug, F> core::fmt::Debug for Pool<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool").field("stack", &self.stack).finish()
    }
}

/// A guard that is returned when a caller requests a value from the pool.
pub(crate) struct PoolGuard<'a, T: Send, F: Fn() -> Result<T, Error>> {
    /// The pool that this guard is attached to.
    pool: &'a Pool<T, F>,
    /// This is None after the guard has been put back into the pool.
    value: Option<Box<T>>,
}

impl<'a, T: Send, F: Fn() -> Result<T, Error>> Drop for PoolGuard<'a, T, F> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.put_value(value);
        }
    }
}

impl<'a, T: Send, F: Fn() -> Result<T, Error>> core::ops::Deref
    for PoolGuard<'a, T, F>
{
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_deref().unwrap()
    }
}

impl<'a, T: Send, F: Fn() -> Result<T, Error>> core::ops::DerefMut
    for PoolGuard<'a, T, F>
{
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_deref_mut().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::MatchErrorKind;

    #[test]
    fn values_are_reused() {
        let created = AtomicUsize::new(0);
        let pool = Pool::new(|| {
            Ok::<_, Error>(created.fetch_add(1, Ordering::SeqCst))
        });
        {
            let a = pool.get().unwrap();
            let b = pool.get().unwrap();
            assert_eq!((0, 1), (*a, *b));
        }
        let c = pool.get().unwrap();
        assert!(*c < 2);
        assert_eq!(2, created.load(Ordering::SeqCst));
    }

    #[test]
    fn creation_failure_is_returned() {
        let pool: Pool<u8, _> = Pool::new(|| {
            Err(Error::matching(MatchErrorKind::Engine, -48))
        });
        assert!(pool.get().is_err());
    }
}
