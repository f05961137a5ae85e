//! Generator node groups that drive downstream neurons, one emitting at a
//! preset list of times and one emitting at a Poisson rate.

use rand::{Rng, SeedableRng, rngs::StdRng};
use crate::error::{RecordError, StatusError};
use super::{NodeGroup, Spike};


/// A single spike generator node holding its preset emission schedule
#[derive(Debug, Clone, Default)]
struct SpikeGeneratorNode {
    /// Emission times (ms), kept sorted
    spike_times: Vec<f32>,
    /// Height multiplier per emission, parallel to `spike_times`
    spike_heights: Vec<f32>,
    /// Index of the next emission to consider
    cursor: usize,
}

/// A group of generators that emit spikes at preset times, each spike is
/// emitted at the time step nearest to its requested time
pub struct SpikeGeneratorGroup {
    nodes: Vec<SpikeGeneratorNode>,
    dt: f32,
    step: usize,
}

impl SpikeGeneratorGroup {
    /// Creates a group of the given size with empty emission schedules
    pub fn new(n: usize) -> Self {
        SpikeGeneratorGroup {
            nodes: vec![SpikeGeneratorNode::default(); n],
            dt: 0.1,
            step: 0,
        }
    }

    fn check_node(&self, i_node: usize) -> Result<(), StatusError> {
        if i_node >= self.nodes.len() {
            return Err(StatusError::NodeNotFound);
        }

        Ok(())
    }
}

impl NodeGroup for SpikeGeneratorGroup {
    fn model_name(&self) -> &str {
        "spike_generator"
    }

    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn receptor_ports(&self) -> usize {
        0
    }

    fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    fn set_scalar_param(&mut self, name: &str, _i_node: usize, _value: f32) -> Result<(), StatusError> {
        match name {
            "spike_times" | "spike_heights" => Err(StatusError::ExpectedArrayValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_scalar_param(&self, name: &str, _i_node: usize) -> Result<f32, StatusError> {
        match name {
            "spike_times" | "spike_heights" => Err(StatusError::ExpectedArrayValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn set_array_param(&mut self, name: &str, i_node: usize, values: &[f32]) -> Result<(), StatusError> {
        self.check_node(i_node)?;

        match name {
            "spike_times" => {
                if values.iter().any(|t| *t <= 0.) {
                    return Err(StatusError::NonPositiveSpikeTime);
                }

                let node = &mut self.nodes[i_node];

                // sorted so emission order never depends on the caller's order,
                // heights follow their times through the sort
                let mut order: Vec<usize> = (0..values.len()).collect();
                order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));

                let heights = if node.spike_heights.len() == values.len() {
                    order.iter().map(|i| node.spike_heights[*i]).collect()
                } else {
                    vec![1.; values.len()]
                };

                node.spike_times = order.iter().map(|i| values[*i]).collect();
                node.spike_heights = heights;
                node.cursor = 0;

                Ok(())
            },
            "spike_heights" => {
                let node = &mut self.nodes[i_node];

                if values.len() != node.spike_times.len() {
                    return Err(StatusError::ArrayLengthMismatch {
                        parameter: name.to_string(),
                        expected: node.spike_times.len(),
                        found: values.len(),
                    });
                }

                node.spike_heights = values.to_vec();

                Ok(())
            },
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_array_param(&self, name: &str, i_node: usize) -> Result<Vec<f32>, StatusError> {
        self.check_node(i_node)?;
        let node = &self.nodes[i_node];

        match name {
            "spike_times" => Ok(node.spike_times.clone()),
            "spike_heights" => Ok(node.spike_heights.clone()),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_record_value(&self, var_name: &str, _i_node: usize, _port: usize) -> Result<f32, RecordError> {
        Err(RecordError::UnknownVariable(var_name.to_string()))
    }

    fn receive_spike(&mut self, _i_node: usize, _receptor: usize, _weight: f32) {}

    fn update(&mut self, spikes: &mut Vec<Spike>) {
        let emission_step = self.step + 1;

        for (i, node) in self.nodes.iter_mut().enumerate() {
            while node.cursor < node.spike_times.len() {
                // a positive time below half the resolution still lands on
                // the first step rather than being dropped
                let target_step = ((node.spike_times[node.cursor] / self.dt).round() as usize).max(1);

                if target_step > emission_step {
                    break;
                }
                if target_step == emission_step {
                    spikes.push(Spike { node: i, height: node.spike_heights[node.cursor] });
                }

                node.cursor += 1;
            }
        }

        self.step += 1;
    }
}

/// A group of generators where each node emits spikes at a Poisson rate,
/// drawing from a group owned seeded generator so runs are reproducible
pub struct PoissonGeneratorGroup {
    rates: Vec<f32>,
    rng: StdRng,
    dt: f32,
}

impl PoissonGeneratorGroup {
    /// Creates a group of the given size where every node emits at the given
    /// rate (Hz)
    pub fn new(n: usize, rate: f32) -> Self {
        PoissonGeneratorGroup {
            rates: vec![rate; n],
            rng: StdRng::seed_from_u64(0),
            dt: 0.1,
        }
    }

    fn check_node(&self, i_node: usize) -> Result<(), StatusError> {
        if i_node >= self.rates.len() {
            return Err(StatusError::NodeNotFound);
        }

        Ok(())
    }
}

impl NodeGroup for PoissonGeneratorGroup {
    fn model_name(&self) -> &str {
        "poisson_generator"
    }

    fn size(&self) -> usize {
        self.rates.len()
    }

    fn receptor_ports(&self) -> usize {
        0
    }

    fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn set_scalar_param(&mut self, name: &str, i_node: usize, value: f32) -> Result<(), StatusError> {
        self.check_node(i_node)?;

        match name {
            "rate" => {
                self.rates[i_node] = value;

                Ok(())
            },
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_scalar_param(&self, name: &str, i_node: usize) -> Result<f32, StatusError> {
        self.check_node(i_node)?;

        match name {
            "rate" => Ok(self.rates[i_node]),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn set_array_param(&mut self, name: &str, i_node: usize, _values: &[f32]) -> Result<(), StatusError> {
        self.check_node(i_node)?;

        match name {
            "rate" => Err(StatusError::ExpectedScalarValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_array_param(&self, name: &str, i_node: usize) -> Result<Vec<f32>, StatusError> {
        self.check_node(i_node)?;

        match name {
            "rate" => Err(StatusError::ExpectedScalarValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_record_value(&self, var_name: &str, _i_node: usize, _port: usize) -> Result<f32, RecordError> {
        Err(RecordError::UnknownVariable(var_name.to_string()))
    }

    fn receive_spike(&mut self, _i_node: usize, _receptor: usize, _weight: f32) {}

    fn update(&mut self, spikes: &mut Vec<Spike>) {
        for (i, rate) in self.rates.iter().enumerate() {
            if *rate <= 0. {
                continue;
            }

            let chance_of_firing = rate * self.dt / 1000.;
            if self.rng.gen::<f32>() < chance_of_firing {
                spikes.push(Spike { node: i, height: 1. });
            }
        }
    }
}
