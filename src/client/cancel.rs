use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a [`CancelScope`] stopped.
pub enum CancelCause {
    /// [`CancelScope::cancel`] was called.
    Cancelled,
    /// The scope's deadline passed.
    DeadlineExceeded,
    /// Cancelled with a caller-supplied reason.
    Reason(String),
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("operation cancelled"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
            Self::Reason(reason) => write!(f, "operation cancelled: {reason}"),
        }
    }
}

#[derive(Debug)]
struct Inner {
    cause: OnceLock<CancelCause>,
    notify: Notify,
    deadline: Option<Instant>,
    children: Mutex<Vec<Weak<Inner>>>,
}

impl Inner {
    fn new(deadline: Option<Instant>) -> Self {
        Self {
            cause: OnceLock::new(),
            notify: Notify::new(),
            deadline,
            children: Mutex::new(Vec::new()),
        }
    }

    fn cancel(&self, cause: CancelCause) {
        if self.cause.set(cause.clone()).is_err() {
            return;
        }
        self.notify.notify_waiters();

        let children = std::mem::take(
            &mut *self
                .children
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for child in children.iter().filter_map(Weak::upgrade) {
            child.cancel(cause.clone());
        }
    }

    fn cause(&self) -> Option<CancelCause> {
        if let Some(cause) = self.cause.get() {
            return Some(cause.clone());
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.cancel(CancelCause::DeadlineExceeded);
                self.cause.get().cloned()
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Ambient cancellation scope passed to every engine call.
///
/// Clones share state: cancelling one clone cancels all of them. A [`child`]
/// scope is cancelled together with its parent but can also be cancelled on
/// its own. Timeouts are expressed as deadlines on the scope; the engine never
/// imposes one by itself.
///
/// [`child`]: CancelScope::child
pub struct CancelScope {
    inner: Arc<Inner>,
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelScope {
    /// A scope with no deadline that is only cancelled explicitly.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::new(None)),
        }
    }

    /// Must be called within a tokio runtime.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(Inner::new(Some(deadline))),
        }
    }

    /// A scope cancelled whenever `self` is. It keeps the earlier of the two deadlines.
    pub fn child(&self) -> Self {
        self.child_with_deadline(None)
    }

    /// Like [`CancelScope::child`], with its own timeout.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.child_with_deadline(Some(Instant::now() + timeout))
    }

    fn child_with_deadline(&self, deadline: Option<Instant>) -> Self {
        let deadline = match (self.inner.deadline, deadline) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        let child = Arc::new(Inner::new(deadline));

        {
            let mut children = self
                .inner
                .children
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            children.retain(|weak| weak.strong_count() > 0);
            children.push(Arc::downgrade(&child));
        }

        if let Some(cause) = self.inner.cause() {
            child.cancel(cause);
        }
        Self { inner: child }
    }

    pub fn cancel(&self) {
        self.inner.cancel(CancelCause::Cancelled);
    }

    /// Cancel with a specific cause. Only the first cause sticks.
    pub fn cancel_with(&self, cause: CancelCause) {
        self.inner.cancel(cause);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cause().is_some()
    }

    /// `None` while the scope is live.
    pub fn cause(&self) -> Option<CancelCause> {
        self.inner.cause()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Resolve once the scope is cancelled or its deadline passes.
    pub async fn cancelled(&self) -> CancelCause {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(cause) = self.inner.cause() {
                return cause;
            }

            match self.inner.deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = &mut notified => {}
                        _ = tokio::time::sleep_until(deadline) => {}
                    }
                }
                None => notified.await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scope_is_live() {
        let scope = CancelScope::new();
        assert!(!scope.is_cancelled());
        assert_eq!(scope.cause(), None);
    }

    #[test]
    fn first_cause_wins() {
        let scope = CancelScope::new();
        scope.cancel_with(CancelCause::Reason("shutdown".to_owned()));
        scope.cancel();
        assert_eq!(
            scope.cause(),
            Some(CancelCause::Reason("shutdown".to_owned()))
        );
        assert_eq!(
            scope.cause().unwrap().to_string(),
            "operation cancelled: shutdown"
        );
    }

    #[test]
    fn clones_share_state() {
        let scope = CancelScope::new();
        let clone = scope.clone();
        clone.cancel();
        assert!(scope.is_cancelled());
    }

    #[test]
    fn children_follow_parent_but_not_the_reverse() {
        let parent = CancelScope::new();
        let child = parent.child();
        let grandchild = child.child();

        child.cancel();
        assert!(!parent.is_cancelled());
        assert!(grandchild.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert_eq!(other.cause(), Some(CancelCause::Cancelled));
    }

    #[test]
    fn child_of_cancelled_parent_starts_cancelled() {
        let parent = CancelScope::new();
        parent.cancel_with(CancelCause::Reason("done".to_owned()));
        assert_eq!(
            parent.child().cause(),
            Some(CancelCause::Reason("done".to_owned()))
        );
    }

    #[tokio::test]
    async fn deadline_in_the_past_is_exceeded() {
        let scope = CancelScope::with_deadline(Instant::now());
        assert_eq!(scope.cause(), Some(CancelCause::DeadlineExceeded));
        assert_eq!(scope.cancelled().await, CancelCause::DeadlineExceeded);
    }

    #[tokio::test]
    async fn child_keeps_the_earlier_deadline() {
        let parent = CancelScope::with_timeout(Duration::from_secs(1));
        let child = parent.child_with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let child = parent.child_with_timeout(Duration::from_millis(1));
        assert!(child.deadline() < parent.deadline());
    }

    #[tokio::test]
    async fn cancelled_wakes_on_cancel() {
        let scope = CancelScope::new();
        let waiter = scope.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        tokio::task::yield_now().await;
        scope.cancel();

        let cause = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cause, CancelCause::Cancelled);
    }

    #[tokio::test]
    async fn cancelled_wakes_on_deadline() {
        let scope = CancelScope::with_timeout(Duration::from_millis(20));
        let cause = tokio::time::timeout(Duration::from_secs(5), scope.cancelled())
            .await
            .unwrap();
        assert_eq!(cause, CancelCause::DeadlineExceeded);
    }
}
