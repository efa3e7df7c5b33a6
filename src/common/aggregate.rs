use crate::common::{DomainEvent, DomainResult};
use serde::{Deserialize, Serialize};

pub trait AggregateRoot: Send + Sync + Clone {
    type Event: DomainEvent + Serialize + for<'de> Deserialize<'de>;

    fn aggregate_id(&self) -> &str;
    fn version(&self) -> u64;

    /// Apply an event to update the aggregate state
    fn apply(&mut self, event: &Self::Event) -> DomainResult<()>;

    /// Get uncommitted events
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Mark events as committed
    fn mark_events_as_committed(&mut self);

    /// Add a new event to the uncommitted events list
    fn add_event(&mut self, event: Self::Event);

    /// Record an event and fold it into the state in one step.
    fn record(&mut self, event: Self::Event) -> DomainResult<()> {
        self.apply(&event)?;
        self.add_event(event);
        Ok(())
    }
}

/// Rebuild an aggregate by replaying a history of events onto an initial state.
pub fn load_from_history<T: AggregateRoot>(mut aggregate: T, events: &[T::Event]) -> DomainResult<T> {
    for event in events {
        aggregate.apply(event)?;
    }
    Ok(aggregate)
}
