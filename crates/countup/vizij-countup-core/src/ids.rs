//! Frame handles and a simple allocator for clocks that mint their own.

use serde::{Deserialize, Serialize};

/// Opaque registration returned by a [`FrameClock`](crate::FrameClock).
/// Used to cancel a pending frame and to match a delivered frame against the
/// one the animator is waiting for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// Monotonic allocator for FrameHandle.
/// Starts at 1 so a zero handle from a host API never collides with a minted one.
#[derive(Debug)]
pub struct HandleAllocator {
    next: u32,
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> FrameHandle {
        let id = FrameHandle(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
