//! Scheduler event bus
//!
//! Four events are dispatched around each state change. Listeners receive
//! the variant by value and return it, possibly substituted; the pipeline
//! threads the returned value forward so no stale reference survives.

use nodestore::{NodeVariant, ScheduleAction};

/// The events dispatched around scheduled transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerEventKind {
    PrePublish,
    Publish,
    PreUnpublish,
    Unpublish,
}

impl SchedulerEventKind {
    /// The event dispatched before the action's state change
    pub fn pre(action: ScheduleAction) -> Self {
        match action {
            ScheduleAction::Publish => SchedulerEventKind::PrePublish,
            ScheduleAction::Unpublish => SchedulerEventKind::PreUnpublish,
        }
    }

    /// The event dispatched after the action's state change
    pub fn post(action: ScheduleAction) -> Self {
        match action {
            ScheduleAction::Publish => SchedulerEventKind::Publish,
            ScheduleAction::Unpublish => SchedulerEventKind::Unpublish,
        }
    }
}

/// Observer of scheduler events. May return a substituted variant.
pub trait EventListener {
    fn on_event(&self, kind: SchedulerEventKind, variant: NodeVariant) -> NodeVariant;
}

/// Ordered chain of event listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventBus {
    pub fn register(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Dispatch an event through all listeners in registration order,
    /// threading each returned variant into the next listener
    pub fn dispatch(&self, kind: SchedulerEventKind, variant: NodeVariant) -> NodeVariant {
        self.listeners
            .iter()
            .fold(variant, |variant, listener| listener.on_event(kind, variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Retitle(&'static str);
    impl EventListener for Retitle {
        fn on_event(&self, kind: SchedulerEventKind, mut variant: NodeVariant) -> NodeVariant {
            if kind == SchedulerEventKind::PrePublish {
                variant.title = self.0.to_string();
            }
            variant
        }
    }

    struct AppendBang;
    impl EventListener for AppendBang {
        fn on_event(&self, _kind: SchedulerEventKind, mut variant: NodeVariant) -> NodeVariant {
            variant.title.push('!');
            variant
        }
    }

    #[test]
    fn test_pre_post_mapping() {
        assert_eq!(SchedulerEventKind::pre(ScheduleAction::Publish), SchedulerEventKind::PrePublish);
        assert_eq!(SchedulerEventKind::post(ScheduleAction::Publish), SchedulerEventKind::Publish);
        assert_eq!(
            SchedulerEventKind::pre(ScheduleAction::Unpublish),
            SchedulerEventKind::PreUnpublish
        );
        assert_eq!(
            SchedulerEventKind::post(ScheduleAction::Unpublish),
            SchedulerEventKind::Unpublish
        );
    }

    #[test]
    fn test_dispatch_threads_substitutions_in_order() {
        let mut bus = EventBus::default();
        bus.register(Box::new(Retitle("Replaced")));
        bus.register(Box::new(AppendBang));

        let variant = NodeVariant::new("article", "Original", "en", 100);
        let out = bus.dispatch(SchedulerEventKind::PrePublish, variant);
        assert_eq!(out.title, "Replaced!");

        // A kind the first listener ignores still flows through the chain
        let variant = NodeVariant::new("article", "Original", "en", 100);
        let out = bus.dispatch(SchedulerEventKind::Unpublish, variant);
        assert_eq!(out.title, "Original!");
    }

    #[test]
    fn test_dispatch_with_no_listeners_is_identity() {
        let bus = EventBus::default();
        let variant = NodeVariant::new("article", "Original", "en", 100);
        let out = bus.dispatch(SchedulerEventKind::Publish, variant.clone());
        assert_eq!(out, variant);
    }
}
