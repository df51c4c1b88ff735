/// A value holding resources inside some context `C` (a GPU, a scene, or
/// both) that must be handed back explicitly.
pub trait Release<C: ?Sized> {
    type Error;

    /// Hands the resources back. On error nothing was released and the value
    /// stays valid, so the caller may retry.
    fn release(&self, ctx: &mut C) -> Result<(), Self::Error>;
}

/// Holds at most one live `T` and releases whatever it replaces.
///
/// There is no `Drop` impl: releasing needs the context, so a slot that goes
/// out of scope while occupied leaks. Callers `retire` on shutdown.
#[derive(Debug)]
pub struct ResourceSlot<T> {
    current: Option<T>,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> ResourceSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// Installs `new` and releases the previous value.
    pub fn replace<C: ?Sized>(&mut self, new: T, ctx: &mut C) -> Result<&T, T::Error>
    where
        T: Release<C>,
    {
        if let Some(old) = self.current.take() {
            // `new` is installed even if releasing the old value fails.
            let released = old.release(ctx);
            let installed = self.current.insert(new);
            released?;
            return Ok(installed);
        }
        Ok(self.current.insert(new))
    }

    /// Releases the old value first, then builds the new one. Peak residency
    /// is one value. A failed release keeps the old value; a failed build
    /// leaves the slot empty.
    pub fn rebuild_with<C, E, F>(&mut self, ctx: &mut C, build: F) -> Result<&T, E>
    where
        C: ?Sized,
        T: Release<C>,
        E: From<T::Error>,
        F: FnOnce(&mut C) -> Result<T, E>,
    {
        self.retire(ctx)?;
        let value = build(ctx)?;
        Ok(self.current.insert(value))
    }

    /// Builds the new value first and only then releases the old one. A failed
    /// build leaves the old value in place.
    pub fn swap_with<C, E, F>(&mut self, ctx: &mut C, build: F) -> Result<&T, E>
    where
        C: ?Sized,
        T: Release<C>,
        E: From<T::Error>,
        F: FnOnce(&mut C) -> Result<T, E>,
    {
        let value = build(ctx)?;
        Ok(self.replace(value, ctx)?)
    }

    /// Releases and empties the slot. A no-op when already empty. If the
    /// release fails the value stays in the slot for a later retry.
    pub fn retire<C: ?Sized>(&mut self, ctx: &mut C) -> Result<(), T::Error>
    where
        T: Release<C>,
    {
        if let Some(current) = &self.current {
            current.release(ctx)?;
        }
        self.current = None;
        Ok(())
    }
}
