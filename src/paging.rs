/// Period paging with last-requested-offset-wins semantics.
///
/// Each chart pages through weeks or months by offset. A fetch for an old offset
/// may resolve after a newer one; its result must be dropped rather than
/// overwrite the panel. Every request takes a generation [`Ticket`] and a commit
/// only lands if no newer request has started since.
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    offset: i32,
}

impl Ticket {
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer request started; the value was discarded
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub offset: i32,
    pub value: T,
}

/// Holds the committed page for one chart.
pub struct OffsetPager<T> {
    generation: AtomicU64,
    current: Mutex<Option<Page<T>>>,
}

impl<T> Default for OffsetPager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OffsetPager<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Registers a request for `offset`, invalidating all earlier tickets.
    pub fn begin(&self, offset: i32) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(offset, generation, "page request started");
        Ticket { generation, offset }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    pub fn commit(&self, ticket: Ticket, value: T) -> Commit {
        let mut current = self.current.lock();
        if !self.is_current(&ticket) {
            tracing::debug!(
                offset = ticket.offset,
                generation = ticket.generation,
                "discarding stale page"
            );
            return Commit::Stale;
        }
        *current = Some(Page {
            offset: ticket.offset,
            value,
        });
        Commit::Applied
    }

    /// Begins a request, awaits `fetch`, then commits its output.
    pub async fn load<F>(&self, offset: i32, fetch: F) -> Commit
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin(offset);
        let value = fetch.await;
        self.commit(ticket, value)
    }

    pub fn current_offset(&self) -> Option<i32> {
        self.current.lock().as_ref().map(|p| p.offset)
    }
}

impl<T: Clone> OffsetPager<T> {
    pub fn current(&self) -> Option<Page<T>> {
        self.current.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn commit_applies_for_latest_ticket() {
        let pager = OffsetPager::new();
        let ticket = pager.begin(0);
        assert_eq!(pager.commit(ticket, "now"), Commit::Applied);
        assert_eq!(
            pager.current(),
            Some(Page {
                offset: 0,
                value: "now"
            })
        );
    }

    #[test]
    fn older_ticket_is_stale_after_newer_begin() {
        let pager = OffsetPager::new();
        let old = pager.begin(0);
        let new = pager.begin(1);
        assert!(!pager.is_current(&old));
        assert_eq!(pager.commit(new, "previous week"), Commit::Applied);
        assert_eq!(pager.commit(old, "this week"), Commit::Stale);
        assert_eq!(pager.current_offset(), Some(1));
        assert_eq!(pager.current().unwrap().value, "previous week");
    }

    #[test]
    fn stale_commit_before_newer_finishes_is_dropped() {
        let pager = OffsetPager::new();
        let old = pager.begin(3);
        let _pending = pager.begin(4);
        assert_eq!(pager.commit(old, 3), Commit::Stale);
        assert_eq!(pager.current(), None);
    }

    #[tokio::test]
    async fn slow_old_request_does_not_overwrite_new_one() {
        let pager = OffsetPager::new();
        let (release, gate) = oneshot::channel::<()>();

        let slow = pager.load(1, async {
            gate.await.ok();
            "offset 1"
        });
        let fast = async {
            let outcome = pager.load(2, async { "offset 2" }).await;
            release.send(()).ok();
            outcome
        };

        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);
        assert_eq!(fast_outcome, Commit::Applied);
        assert_eq!(slow_outcome, Commit::Stale);
        assert_eq!(
            pager.current(),
            Some(Page {
                offset: 2,
                value: "offset 2"
            })
        );
    }
}
