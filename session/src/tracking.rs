use std::sync::mpsc::{self, Receiver, Sender};

use geocache_core::GeoPoint;

/// Source of player positions, either polled once or watched continuously.
pub trait PositionSensor {
    /// Reports whether the platform provides positions at all.
    fn is_supported(&self) -> bool;

    /// Most recent position known to the sensor, if any.
    fn current(&mut self) -> Option<GeoPoint>;

    /// Starts delivering readings. The sensor may push into the returned
    /// channel from any thread at its own cadence.
    fn watch(&mut self) -> Receiver<GeoPoint>;

    /// Stops delivering readings.
    fn unwatch(&mut self) {}
}

/// Sensor fed through a channel, e.g. by a device thread or a script.
#[derive(Debug)]
pub struct ChannelSensor {
    sender: Sender<GeoPoint>,
    receiver: Option<Receiver<GeoPoint>>,
    initial: Option<GeoPoint>,
}

impl ChannelSensor {
    /// Creates a sensor with an optional fix available before any reading.
    #[must_use]
    pub fn new(initial: Option<GeoPoint>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Some(receiver),
            initial,
        }
    }

    /// Handle used to push readings into the sensor.
    #[must_use]
    pub fn feeder(&self) -> Sender<GeoPoint> {
        self.sender.clone()
    }
}

impl PositionSensor for ChannelSensor {
    fn is_supported(&self) -> bool {
        true
    }

    fn current(&mut self) -> Option<GeoPoint> {
        self.initial
    }

    fn watch(&mut self) -> Receiver<GeoPoint> {
        self.receiver.take().unwrap_or_else(|| {
            let (sender, receiver) = mpsc::channel();
            self.sender = sender;
            receiver
        })
    }
}

/// Sensor standing in for a platform without positioning.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedSensor;

impl PositionSensor for UnsupportedSensor {
    fn is_supported(&self) -> bool {
        false
    }

    fn current(&mut self) -> Option<GeoPoint> {
        None
    }

    fn watch(&mut self) -> Receiver<GeoPoint> {
        mpsc::channel().1
    }
}
