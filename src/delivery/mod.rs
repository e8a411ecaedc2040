pub mod in_process;
pub mod pipe;
pub mod wire;

use crate::skyline::Segment;
use anyhow::Result;

pub use in_process::InProcessFactory;
pub use pipe::{PipeEndpoint, SubprocessFactory};

/// A live consumer of overlays: a viewer window inbox or a viewer process.
pub trait Endpoint {
    fn send(&mut self, overlay: &[Segment]) -> Result<()>;

    /// Called when the channel gives up on this endpoint after a failed send.
    fn discard(self)
    where
        Self: Sized,
    {
    }
}

pub trait EndpointFactory {
    type Endpoint: Endpoint;

    fn create(&mut self) -> Result<Self::Endpoint>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The first send failed and the overlay went to a fresh endpoint.
    Recovered,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
}

/// Anything the command front end can hand extracted overlays to.
pub trait OverlaySink {
    fn deliver(&mut self, overlay: &[Segment]) -> DeliveryOutcome;
}

/// Owns the current endpoint and replaces it when a send fails.
///
/// The endpoint is created on first delivery. A failed send discards it,
/// creates exactly one replacement and retries exactly once; a second
/// failure drops the overlay. Nothing is ever returned as an error.
pub struct DeliveryChannel<F: EndpointFactory> {
    factory: F,
    endpoint: Option<F::Endpoint>,
}

impl<F: EndpointFactory> DeliveryChannel<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            endpoint: None,
        }
    }

    pub fn state(&self) -> ChannelState {
        if self.endpoint.is_some() {
            ChannelState::Connected
        } else {
            ChannelState::Disconnected
        }
    }

    /// Discards the current endpoint, if any, and creates a new one.
    pub fn recreate(&mut self) -> Result<()> {
        if let Some(old) = self.endpoint.take() {
            old.discard();
        }
        self.endpoint = Some(self.factory.create()?);
        Ok(())
    }

    fn send_current(&mut self, overlay: &[Segment]) -> Result<()> {
        match self.endpoint.as_mut() {
            Some(endpoint) => endpoint.send(overlay),
            None => Err(anyhow::anyhow!("no viewer endpoint")),
        }
    }

    pub fn deliver(&mut self, overlay: &[Segment]) -> DeliveryOutcome {
        if self.endpoint.is_none() {
            match self.factory.create() {
                Ok(endpoint) => {
                    tracing::info!("viewer endpoint created");
                    self.endpoint = Some(endpoint);
                }
                Err(err) => {
                    tracing::error!(?err, "unable to create viewer endpoint; overlay dropped");
                    return DeliveryOutcome::Dropped;
                }
            }
        }

        let err = match self.send_current(overlay) {
            Ok(()) => return DeliveryOutcome::Delivered,
            Err(err) => err,
        };
        tracing::warn!(?err, "overlay delivery failed; recreating viewer");

        if let Err(err) = self.recreate() {
            tracing::error!(?err, "viewer recreation failed; overlay dropped");
            return DeliveryOutcome::Dropped;
        }
        match self.send_current(overlay) {
            Ok(()) => DeliveryOutcome::Recovered,
            Err(err) => {
                tracing::error!(?err, "retry against new viewer failed; overlay dropped");
                if let Some(dead) = self.endpoint.take() {
                    dead.discard();
                }
                DeliveryOutcome::Dropped
            }
        }
    }
}

impl<F: EndpointFactory> OverlaySink for DeliveryChannel<F> {
    fn deliver(&mut self, overlay: &[Segment]) -> DeliveryOutcome {
        DeliveryChannel::deliver(self, overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        created: usize,
        discarded: usize,
        sends: Vec<(usize, usize)>,
    }

    struct FakeEndpoint {
        id: usize,
        fail: bool,
        log: Rc<RefCell<Log>>,
    }

    impl Endpoint for FakeEndpoint {
        fn send(&mut self, overlay: &[Segment]) -> Result<()> {
            self.log.borrow_mut().sends.push((self.id, overlay.len()));
            if self.fail {
                bail!("broken pipe");
            }
            Ok(())
        }

        fn discard(self) {
            self.log.borrow_mut().discarded += 1;
        }
    }

    /// Each created endpoint takes the next scripted "fails?" flag.
    struct ScriptedFactory {
        script: VecDeque<bool>,
        log: Rc<RefCell<Log>>,
    }

    impl EndpointFactory for ScriptedFactory {
        type Endpoint = FakeEndpoint;

        fn create(&mut self) -> Result<FakeEndpoint> {
            let Some(fail) = self.script.pop_front() else {
                bail!("no more viewers");
            };
            let mut log = self.log.borrow_mut();
            log.created += 1;
            Ok(FakeEndpoint {
                id: log.created,
                fail,
                log: Rc::clone(&self.log),
            })
        }
    }

    fn channel(script: &[bool]) -> (DeliveryChannel<ScriptedFactory>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let factory = ScriptedFactory {
            script: script.iter().copied().collect(),
            log: Rc::clone(&log),
        };
        (DeliveryChannel::new(factory), log)
    }

    fn overlay() -> Vec<Segment> {
        vec![Segment::new(0.0, 0.0, 1.0, 1.0).expect("segment")]
    }

    #[test]
    fn first_delivery_creates_endpoint_and_reuses_it() {
        let (mut ch, log) = channel(&[false]);
        assert_eq!(ch.state(), ChannelState::Disconnected);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Delivered);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Delivered);
        assert_eq!(ch.state(), ChannelState::Connected);
        assert_eq!(log.borrow().created, 1);
        assert_eq!(log.borrow().sends, vec![(1, 1), (1, 1)]);
    }

    #[test]
    fn failed_send_recreates_once_and_retries_once() {
        let (mut ch, log) = channel(&[true, false]);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Recovered);
        let log = log.borrow();
        assert_eq!(log.created, 2);
        assert_eq!(log.discarded, 1);
        assert_eq!(log.sends, vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn second_failure_drops_overlay_without_further_attempts() {
        let (mut ch, log) = channel(&[true, true, false]);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Dropped);
        assert_eq!(ch.state(), ChannelState::Disconnected);
        {
            let log = log.borrow();
            assert_eq!(log.created, 2);
            assert_eq!(log.sends.len(), 2);
        }
        // the next overlay starts over with a fresh endpoint
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Delivered);
        assert_eq!(log.borrow().created, 3);
    }

    #[test]
    fn factory_failure_drops_overlay() {
        let (mut ch, log) = channel(&[]);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Dropped);
        assert!(log.borrow().sends.is_empty());
    }

    #[test]
    fn recreate_failure_after_broken_send_drops_overlay() {
        let (mut ch, log) = channel(&[true]);
        assert_eq!(ch.deliver(&overlay()), DeliveryOutcome::Dropped);
        assert_eq!(log.borrow().created, 1);
        assert_eq!(ch.state(), ChannelState::Disconnected);
    }
}
