/// Generational handle: `(index, generation)`.
///
/// Slots are reused by bumping the generation, so a stale handle never
/// aliases a newer object that happens to land in the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}

/// Allocates handles and recycles freed slots with a bumped generation.
#[derive(Debug, Default, Clone)]
pub struct HandleAllocator {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: Vec<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> Handle {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.live[slot] = true;
            return Handle::new(index, self.generations[slot]);
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.live.push(true);
        Handle::new(index, 0)
    }

    /// Frees `handle`. Returns `false` if it was already freed or is stale.
    pub fn free(&mut self, handle: Handle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let slot = handle.index() as usize;
        self.live[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push(handle.index());
        true
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        let slot = handle.index() as usize;
        self.live.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == handle.generation()
    }

    /// Current handle for slot `index`, if that slot is live.
    pub fn live_handle(&self, index: u32) -> Option<Handle> {
        let slot = index as usize;
        if self.live.get(slot).copied().unwrap_or(false) {
            Some(Handle::new(index, self.generations[slot]))
        } else {
            None
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.iter().filter(|l| **l).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Handle, HandleAllocator};

    #[test]
    fn alloc_hands_out_distinct_slots() {
        let mut alloc = HandleAllocator::new();
        let a = alloc.alloc();
        let b = alloc.alloc();
        assert_ne!(a, b);
        assert_eq!(alloc.live_count(), 2);
    }

    #[test]
    fn freed_slot_is_reused_with_new_generation() {
        let mut alloc = HandleAllocator::new();
        let a = alloc.alloc();
        assert!(alloc.free(a));
        let b = alloc.alloc();
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), a.generation() + 1);
        assert!(!alloc.is_live(a));
        assert!(alloc.is_live(b));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut alloc = HandleAllocator::new();
        let a = alloc.alloc();
        assert!(alloc.free(a));
        assert!(!alloc.free(a));
        assert!(!alloc.free(Handle::new(42, 0)));
        assert_eq!(alloc.live_count(), 0);
    }
}
