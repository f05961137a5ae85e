//! A ring buffer that holds emitted spikes until their delivery step is reached,
//! implementing connection delays.

/// A single spike waiting to be delivered to a target node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeDelivery {
    /// Global index of the target node
    pub target: usize,
    /// Receptor port on the target node
    pub receptor: usize,
    /// Delivered weight, the connection weight scaled by the spike height (pA)
    pub weight: f32,
}

/// Ring buffer of pending spike deliveries indexed by steps ahead of the current one
#[derive(Debug, Clone)]
pub struct SpikeBuffer {
    slots: Vec<Vec<SpikeDelivery>>,
    current: usize,
}

impl SpikeBuffer {
    /// Creates a buffer that can schedule deliveries up to `max_delay_steps` ahead
    pub fn new(max_delay_steps: usize) -> Self {
        SpikeBuffer {
            slots: vec![Vec::new(); max_delay_steps + 1],
            current: 0,
        }
    }

    /// Schedules a delivery `delay_steps` steps ahead of the current step,
    /// `delay_steps` must be at least 1 and at most the buffer's maximum delay
    pub fn schedule(&mut self, delay_steps: usize, delivery: SpikeDelivery) {
        let slot = (self.current + delay_steps) % self.slots.len();
        self.slots[slot].push(delivery);
    }

    /// Removes and returns every delivery due at the current step
    pub fn drain_current(&mut self) -> Vec<SpikeDelivery> {
        std::mem::take(&mut self.slots[self.current])
    }

    /// Moves the buffer forward by one step
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.slots.len();
    }

    /// Number of steps ahead the buffer can schedule
    pub fn max_delay_steps(&self) -> usize {
        self.slots.len() - 1
    }
}
