use super::events::GenerationEvent;

pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &GenerationEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&GenerationEvent) + Send + Sync,
{
    fn handle(&mut self, event: &GenerationEvent) {
        (self)(event)
    }
}
