use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BasaltResult;
use crate::memo::{GroupId, Memo};
use crate::plan::PlanNodeRef;

/// A [`Memo`] shared between optimizer threads.
///
/// Lookup and creation of group expressions happen under one lock, and a whole tree is
/// inserted in a single critical section, so racing insertions of equal trees end up in the
/// same groups.
#[derive(Clone, Default)]
pub struct SharedMemo {
    inner: Arc<Mutex<Memo>>,
}

impl SharedMemo {
    pub fn new(memo: Memo) -> Self {
        Self {
            inner: Arc::new(Mutex::new(memo)),
        }
    }

    pub fn insert(&self, plan: &PlanNodeRef) -> BasaltResult<GroupId> {
        self.inner.lock().insert(plan)
    }

    /// Runs `f` with exclusive access to the memo.
    pub fn with_memo<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Memo) -> R,
    {
        f(&mut self.inner.lock())
    }

    /// Returns the memo if this is the last handle.
    pub fn try_into_inner(self) -> Result<Memo, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}
