//! Lifecycle hooks for the instance under test.

/// A stateful value whose state is carried across the steps of a chain.
///
/// The runner calls [`cleanup`](Fixture::cleanup) before every first step, on
/// every halt, and authors usually call it once more at the end of a chain.
/// Implementations must therefore tolerate repeated `cleanup` calls, including
/// calls made before `setup` ever ran.
pub trait Fixture {
    /// Establishes fixture state. Default: no-op.
    fn setup(&mut self) {}

    /// Releases fixture state. Must be idempotent. Default: no-op.
    fn cleanup(&mut self) {}
}

impl<T: Fixture + ?Sized> Fixture for &mut T {
    fn setup(&mut self) {
        (**self).setup();
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }
}

impl<T: Fixture + ?Sized> Fixture for Box<T> {
    fn setup(&mut self) {
        (**self).setup();
    }

    fn cleanup(&mut self) {
        (**self).cleanup();
    }
}

/// Stateless fixture for chains whose state lives entirely in the step closures.
impl Fixture for () {}

/// Fixture assembled from a pair of closures.
///
/// Use this when the state under test is owned elsewhere and only the
/// lifecycle procedures need to be handed to the runner.
pub struct Hooks<S, C> {
    setup: S,
    cleanup: C,
}

impl<S, C> Hooks<S, C>
where
    S: FnMut(),
    C: FnMut(),
{
    /// Creates a fixture that runs `setup` and `cleanup` as its hooks.
    pub fn new(setup: S, cleanup: C) -> Self {
        Self { setup, cleanup }
    }
}

impl<S, C> Fixture for Hooks<S, C>
where
    S: FnMut(),
    C: FnMut(),
{
    fn setup(&mut self) {
        (self.setup)();
    }

    fn cleanup(&mut self) {
        (self.cleanup)();
    }
}

impl<S, C> std::fmt::Debug for Hooks<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Hooks(<setup>, <cleanup>)")
    }
}
