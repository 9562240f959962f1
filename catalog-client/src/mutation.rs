//! Optimistic mutation coordinator
//!
//! A mutation is described by four steps over the store state:
//! `snapshot` captures what a rollback restores, `apply` makes the expected
//! change locally, `commit` finishes it once the gateway confirms, and
//! `rollback` restores the snapshot when the gateway fails. Locks are taken
//! per step and never held across the gateway call.

use parking_lot::RwLock;
use std::future::Future;

/// Steps of one optimistic mutation over state `S`
pub trait OptimisticMutation<S> {
    type Snapshot;

    fn snapshot(&self, state: &S) -> Self::Snapshot;

    fn apply(&self, state: &mut S);

    fn commit(&self, _state: &mut S) {}

    fn rollback(&self, state: &mut S, snapshot: Self::Snapshot);
}

/// Phase reached by an optimistic mutation, reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Applied,
    Committed,
    RolledBack,
}

/// Run `mutation` around the gateway call `remote`
///
/// `notify` is called after each phase changes the state.
pub async fn run_optimistic<S, M, F, T, E>(
    state: &RwLock<S>,
    mutation: &M,
    remote: F,
    notify: impl Fn(MutationPhase),
) -> Result<T, E>
where
    M: OptimisticMutation<S>,
    F: Future<Output = Result<T, E>>,
{
    let snapshot = {
        let mut guard = state.write();
        let snapshot = mutation.snapshot(&guard);
        mutation.apply(&mut guard);
        snapshot
    };
    notify(MutationPhase::Applied);

    match remote.await {
        Ok(value) => {
            mutation.commit(&mut state.write());
            notify(MutationPhase::Committed);
            Ok(value)
        }
        Err(err) => {
            mutation.rollback(&mut state.write(), snapshot);
            notify(MutationPhase::RolledBack);
            Err(err)
        }
    }
}
