//! Owned, replaceable resource handles.
//!
//! Controllers keep each live resource (a scroll trigger, a timer) in an
//! [`Owned`] slot. Replacing the content always releases the previous handle
//! against its owner before the new one is created, so a slot never holds
//! more than one live instance.

/// A handle that must be given back to the context that issued it.
pub trait Release<Ctx: ?Sized> {
    /// Tear the resource down. Releasing a handle the context no longer
    /// knows about is a no-op.
    fn release(self, ctx: &mut Ctx);
}

/// Slot holding at most one live handle.
#[derive(Debug)]
pub struct Owned<H> {
    current: Option<H>,
}

impl<H> Default for Owned<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H> Owned<H> {
    /// Empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held handle
    #[must_use]
    pub fn get(&self) -> Option<&H> {
        self.current.as_ref()
    }

    /// Whether the slot holds a handle
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    /// Release the held handle, if any, leaving the slot empty
    pub fn clear<Ctx: ?Sized>(&mut self, ctx: &mut Ctx)
    where
        H: Release<Ctx>,
    {
        if let Some(old) = self.current.take() {
            old.release(ctx);
        }
    }

    /// Release the held handle, then store whatever `make` creates.
    ///
    /// `make` runs only after the old handle is gone.
    pub fn replace_with<Ctx: ?Sized, F>(&mut self, ctx: &mut Ctx, make: F) -> Option<&H>
    where
        H: Release<Ctx>,
        F: FnOnce(&mut Ctx) -> Option<H>,
    {
        self.clear(ctx);
        self.current = make(ctx);
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Registry {
        live: Vec<u32>,
        next: u32,
    }

    impl Registry {
        fn create(&mut self) -> u32 {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }
    }

    #[derive(Debug, PartialEq)]
    struct Token(u32);

    impl Release<Registry> for Token {
        fn release(self, ctx: &mut Registry) {
            ctx.live.retain(|id| *id != self.0);
        }
    }

    #[test]
    fn test_replace_releases_before_create() {
        let mut reg = Registry::default();
        let mut slot: Owned<Token> = Owned::new();

        slot.replace_with(&mut reg, |r| Some(Token(r.create())));
        assert_eq!(reg.live, vec![1]);

        slot.replace_with(&mut reg, |r| {
            // old handle already released when the factory runs
            assert!(r.live.is_empty());
            Some(Token(r.create()))
        });
        assert_eq!(reg.live, vec![2]);
        assert_eq!(slot.get(), Some(&Token(2)));
    }

    #[test]
    fn test_replace_with_none_empties_slot() {
        let mut reg = Registry::default();
        let mut slot: Owned<Token> = Owned::new();
        slot.replace_with(&mut reg, |r| Some(Token(r.create())));
        slot.replace_with(&mut reg, |_| None);
        assert!(!slot.is_live());
        assert!(reg.live.is_empty());
    }

    #[test]
    fn test_clear_empty_slot_is_noop() {
        let mut reg = Registry::default();
        let mut slot: Owned<Token> = Owned::new();
        slot.clear(&mut reg);
        assert!(!slot.is_live());
    }
}
