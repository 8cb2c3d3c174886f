use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// An unbounded FIFO channel built from a [`Mutex`] and a [`Condvar`].
///
/// Every message moves into the channel on [`send`](Self::send) and moves out
/// to exactly one caller of [`receive`](Self::receive). Messages come out in
/// the order they went in, regardless of how many threads are receiving.
/// Which of several blocked receivers gets a given message is left to the
/// scheduler.
///
/// The channel is unbounded: nothing stops senders from outpacing receivers,
/// in which case the queue simply grows.
pub struct MessageChannel<T> {
    queue: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> MessageChannel<T> {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    /// Push `message` onto the tail of the queue and wake one blocked receiver.
    ///
    /// Never blocks beyond taking the queue lock. With no receiver waiting the
    /// message stays queued for the next [`receive`](Self::receive).
    pub fn send(&self, message: T) {
        self.lock().push_back(message);
        // The lock is already released here, so the woken receiver does not
        // immediately block on it again.
        self.ready.notify_one();
    }

    /// Block until a message is available, then remove and return the head.
    ///
    /// There is no timeout: if nothing is ever sent this waits forever.
    pub fn receive(&self) -> T {
        let mut queue = self.lock();
        loop {
            if let Some(message) = queue.pop_front() {
                return message;
            }
            tracing::trace!("channel empty, waiting");
            // Atomically unlocks the queue while asleep and relocks on wake.
            // Wakes may be spurious or lose a race to another receiver, hence
            // the loop.
            queue = self
                .ready
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Remove and return the head without waiting, if there is one.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Number of queued messages at the time of the call.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Pushing or popping a `VecDeque` cannot leave it half-modified, so a
    // panic elsewhere while the lock was held is safe to ignore.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for MessageChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}
