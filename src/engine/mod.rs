//! The engine facade that a driver talks to, creating node groups, setting
//! their status, wiring them together, recording state variables, and running
//! the simulation loop.

use std::{
    collections::HashMap,
    time::Instant,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use crate::connection::{Connection, ConnectionRule, NetConnections, SynapseSpec};
use crate::error::{
    ConnectError, RecordError, SimulationError, SpikingNetworkEngineError, StatusError,
};
use crate::multimeter::Multimeter;
use crate::neuron::{
    aeif_psc_exp::AeifPscExpGroup,
    spike_train::{PoissonGeneratorGroup, SpikeGeneratorGroup},
    NodeGroup, Spike,
};
use crate::spike_buffer::{SpikeBuffer, SpikeDelivery};


/// Builds a [`StatusMap`] from `name => value` entries where a value is either
/// a scalar or a bracketed array
///
/// ```rust
/// use spiking_network_engine::status;
///
/// let status = status! {
///     "V_peak" => 0.0,
///     "E_L" => -70.6,
///     "tau_syn" => [40.0, 20.0],
/// };
///
/// assert_eq!(status.len(), 3);
/// ```
#[macro_export]
macro_rules! status {
    (@entry $map:ident $(,)?) => {};
    (@entry $map:ident, $($rest:tt)*) => {
        $crate::status!(@entry $map $($rest)*);
    };
    (@entry $map:ident $name:expr => [ $($value:expr),* $(,)? ] $($rest:tt)*) => {
        $map.insert(
            $name.to_string(),
            $crate::engine::StatusValue::Array(vec![ $( $value as f32 ),* ]),
        );
        $crate::status!(@entry $map $($rest)*);
    };
    (@entry $map:ident $name:expr => $value:expr $(, $($rest:tt)*)?) => {
        $map.insert(
            $name.to_string(),
            $crate::engine::StatusValue::Scalar($value as f32),
        );
        $( $crate::status!(@entry $map, $($rest)*); )?
    };
    ( $($entries:tt)* ) => {{
        #[allow(unused_mut)]
        let mut map = $crate::engine::StatusMap::new();
        $crate::status!(@entry map $($entries)*);
        map
    }};
}

/// An opaque handle to a contiguous range of engine owned nodes, returned by
/// the create calls and passed back to later calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    /// Global index of the first node in the range
    pub i0: usize,
    /// Number of nodes in the range
    pub n: usize,
}

impl NodeRange {
    /// Creates a range starting at the given global index
    pub fn new(i0: usize, n: usize) -> Self {
        NodeRange { i0, n }
    }

    /// Number of nodes in the range
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the range holds no nodes
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Global index of the `i`th node of the range, `None` when out of range
    pub fn get(&self, i: usize) -> Option<usize> {
        if i < self.n {
            Some(self.i0 + i)
        } else {
            None
        }
    }

    /// Subrange from `first` to `last` inclusive, `None` when the bounds do
    /// not fall within the range
    pub fn subrange(&self, first: usize, last: usize) -> Option<NodeRange> {
        if first > last || last >= self.n {
            return None;
        }

        Some(NodeRange::new(self.i0 + first, last - first + 1))
    }

    /// Global indices of every node in the range
    pub fn to_vec(&self) -> Vec<usize> {
        (self.i0..self.i0 + self.n).collect()
    }
}

/// A scalar or array parameter value inside a [`StatusMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum StatusValue {
    Scalar(f32),
    Array(Vec<f32>),
}

/// A mapping from parameter name to value used to configure nodes
pub type StatusMap = HashMap<String, StatusValue>;

/// An opaque handle to a created multimeter record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub usize);

/// A network of node groups, connections, and records that can be stepped
/// forward in time, consecutive simulate calls continue where the last ended
pub struct NetworkEngine {
    time_resolution: f32,
    seed: u64,
    rng: StdRng,
    calibrated: bool,
    step: usize,
    groups: Vec<Box<dyn NodeGroup>>,
    group_offsets: Vec<usize>,
    total_nodes: usize,
    connections: NetConnections,
    spike_buffer: SpikeBuffer,
    multimeter: Multimeter,
    rec_spike_times: HashMap<usize, Vec<f32>>,
}

impl Default for NetworkEngine {
    fn default() -> Self {
        NetworkEngine::new()
    }
}

impl NetworkEngine {
    /// Creates an empty engine at the default time resolution of 0.1 ms
    pub fn new() -> Self {
        NetworkEngine {
            time_resolution: 0.1, // ms
            seed: 0,
            rng: StdRng::seed_from_u64(0),
            calibrated: false,
            step: 0,
            groups: Vec::new(),
            group_offsets: Vec::new(),
            total_nodes: 0,
            connections: NetConnections::default(),
            spike_buffer: SpikeBuffer::new(1),
            multimeter: Multimeter::default(),
            rec_spike_times: HashMap::new(),
        }
    }

    /// Current time resolution (ms)
    pub fn time_resolution(&self) -> f32 {
        self.time_resolution
    }

    /// Sets the time resolution (ms), must be positive and must happen before
    /// calibration
    pub fn set_time_resolution(&mut self, time_resolution: f32) -> Result<(), SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        if !time_resolution.is_finite() || time_resolution <= 0. {
            return Err(SimulationError::InvalidTimeResolution.into());
        }

        self.time_resolution = time_resolution;

        Ok(())
    }

    /// Seeds the engine owned random state used by random connection rules and
    /// Poisson generators, must happen before calibration
    pub fn set_random_seed(&mut self, seed: u64) -> Result<(), SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);

        Ok(())
    }

    /// Current simulated time (ms)
    pub fn time(&self) -> f32 {
        self.step as f32 * self.time_resolution
    }

    /// Total number of created nodes
    pub fn node_count(&self) -> usize {
        self.total_nodes
    }

    fn check_uncalibrated(&self) -> Result<(), SimulationError> {
        if self.calibrated {
            return Err(SimulationError::AlreadyCalibrated);
        }

        Ok(())
    }

    fn add_group(&mut self, group: Box<dyn NodeGroup>) -> NodeRange {
        let i0 = self.total_nodes;
        let n = group.size();

        self.group_offsets.push(i0);
        self.groups.push(group);
        self.total_nodes += n;
        self.connections.ensure_nodes(self.total_nodes);

        NodeRange::new(i0, n)
    }

    /// Creates a group of `n` nodes of the named model, `n_ports` receptor
    /// ports each for neuron models and ignored for generators, returns the
    /// handle to pass to later calls
    pub fn create(&mut self, model_name: &str, n: usize, n_ports: usize) -> Result<NodeRange, SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        if n == 0 {
            return Err(SimulationError::EmptyNodeGroup.into());
        }

        let group: Box<dyn NodeGroup> = match model_name {
            "aeif_psc_exp" => Box::new(AeifPscExpGroup::new(n, n_ports)),
            "spike_generator" => Box::new(SpikeGeneratorGroup::new(n)),
            "poisson_generator" => Box::new(PoissonGeneratorGroup::new(n, 0.)),
            _ => return Err(SimulationError::UnknownModel(model_name.to_string()).into()),
        };

        Ok(self.add_group(group))
    }

    /// Creates a group of spike generators with empty emission schedules
    pub fn create_spike_generator(&mut self, n: usize) -> Result<NodeRange, SpikingNetworkEngineError> {
        self.create("spike_generator", n, 0)
    }

    /// Creates a group of Poisson generators already set to the given
    /// rate (Hz)
    pub fn create_poisson_generator(&mut self, n: usize, rate: f32) -> Result<NodeRange, SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        if n == 0 {
            return Err(SimulationError::EmptyNodeGroup.into());
        }

        Ok(self.add_group(Box::new(PoissonGeneratorGroup::new(n, rate))))
    }

    fn locate(&self, i_node: usize) -> Option<(usize, usize)> {
        if i_node >= self.total_nodes {
            return None;
        }

        let i_group = match self.group_offsets.binary_search(&i_node) {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        Some((i_group, i_node - self.group_offsets[i_group]))
    }

    /// Applies every entry of the status map to every node in the range
    pub fn set_status(&mut self, nodes: &NodeRange, status: &StatusMap) -> Result<(), SpikingNetworkEngineError> {
        for (name, value) in status.iter() {
            for i_node in nodes.i0..nodes.i0 + nodes.n {
                let (i_group, i_local) = self.locate(i_node)
                    .ok_or(StatusError::NodeNotFound)?;

                match value {
                    StatusValue::Scalar(scalar) =>
                        self.groups[i_group].set_scalar_param(name, i_local, *scalar)?,
                    StatusValue::Array(array) =>
                        self.groups[i_group].set_array_param(name, i_local, array)?,
                }
            }
        }

        Ok(())
    }

    /// Reads a named scalar parameter back from one node
    pub fn get_scalar_param(&self, i_node: usize, name: &str) -> Result<f32, SpikingNetworkEngineError> {
        let (i_group, i_local) = self.locate(i_node)
            .ok_or(StatusError::NodeNotFound)?;

        Ok(self.groups[i_group].get_scalar_param(name, i_local)?)
    }

    /// Reads a named array parameter back from one node
    pub fn get_array_param(&self, i_node: usize, name: &str) -> Result<Vec<f32>, SpikingNetworkEngineError> {
        let (i_group, i_local) = self.locate(i_node)
            .ok_or(StatusError::NodeNotFound)?;

        Ok(self.groups[i_group].get_array_param(name, i_local)?)
    }

    /// Connects the source range to the target range under the given topology
    /// rule, every created connection takes the receptor port, weight, and
    /// delay of the synapse specification, must happen before calibration
    pub fn connect(
        &mut self,
        source: &NodeRange,
        target: &NodeRange,
        rule: ConnectionRule,
        syn_spec: &SynapseSpec,
    ) -> Result<(), SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        let sources = source.to_vec();
        let targets = target.to_vec();

        for i_node in sources.iter() {
            if self.locate(*i_node).is_none() {
                return Err(ConnectError::SourceNotFound.into());
            }
        }
        for i_node in targets.iter() {
            let (i_group, _) = self.locate(*i_node)
                .ok_or(ConnectError::TargetNotFound)?;

            if syn_spec.receptor >= self.groups[i_group].receptor_ports() {
                return Err(ConnectError::ReceptorPortOutOfRange.into());
            }
        }
        if syn_spec.delay < self.time_resolution {
            return Err(ConnectError::DelayBelowResolution.into());
        }

        let pairs = rule.pairs(&sources, &targets, &mut self.rng)?;
        for (i_source, i_target) in pairs {
            self.connections.add(Connection {
                source: i_source,
                target: i_target,
                receptor: syn_spec.receptor,
                weight: syn_spec.weight,
                delay: syn_spec.delay,
            });
        }

        Ok(())
    }

    /// Every connection leaving the given source node in creation order
    pub fn connections_from(&self, i_node: usize) -> &[Connection] {
        self.connections.connections_from(i_node)
    }

    /// Total number of created connections
    pub fn connection_count(&self) -> usize {
        self.connections.count()
    }

    /// Registers a record sampling the named variables of the given nodes at
    /// the given receptor ports every step, streamed to `file_name` as well
    /// when it is not empty, must happen before calibration
    pub fn create_record(
        &mut self,
        file_name: &str,
        var_names: &[&str],
        nodes: &[usize],
        ports: &[usize],
    ) -> Result<RecordId, SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        if var_names.len() != nodes.len() || nodes.len() != ports.len() {
            return Err(RecordError::MismatchedRecordArrays.into());
        }

        for ((var_name, i_node), port) in var_names.iter().zip(nodes.iter()).zip(ports.iter()) {
            let (i_group, i_local) = self.locate(*i_node)
                .ok_or(RecordError::NodeNotFound)?;

            // sampled once so unknown variables and bad ports fail at
            // creation instead of mid simulation
            self.groups[i_group].get_record_value(var_name, i_local, *port)?;
        }

        let i_record = self.multimeter.create_record(
            file_name,
            var_names.iter().map(|name| name.to_string()).collect(),
            nodes.to_vec(),
            ports.to_vec(),
        );

        Ok(RecordId(i_record))
    }

    /// Turns on emitted spike time recording for every node in the range,
    /// must happen before calibration
    pub fn activate_rec_spike_times(&mut self, nodes: &NodeRange) -> Result<(), SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        for i_node in nodes.i0..nodes.i0 + nodes.n {
            if self.locate(i_node).is_none() {
                return Err(RecordError::NodeNotFound.into());
            }

            self.rec_spike_times.entry(i_node).or_default();
        }

        Ok(())
    }

    /// Emission times (ms) recorded for the given node, recording must have
    /// been activated for it before calibration
    pub fn get_rec_spike_times(&self, i_node: usize) -> Result<&[f32], SpikingNetworkEngineError> {
        if i_node >= self.total_nodes {
            return Err(RecordError::NodeNotFound.into());
        }

        match self.rec_spike_times.get(&i_node) {
            Some(times) => Ok(times),
            None => Err(RecordError::SpikeRecordingNotActivated.into()),
        }
    }

    /// Fixes the time resolution on every group, sizes the spike buffer from
    /// the longest connection delay, opens record files, and writes the
    /// initial record row at t = 0, called implicitly by the first simulate
    /// call and allowed explicitly once
    pub fn calibrate(&mut self) -> Result<(), SpikingNetworkEngineError> {
        self.check_uncalibrated()?;

        // connect checks delays against the resolution current at connect
        // time, the resolution may have changed since, a delay that rounds
        // to zero steps would otherwise wrap around the spike buffer
        if let Some(min_delay) = self.connections.min_delay() {
            if ((min_delay / self.time_resolution).round() as usize) < 1 {
                return Err(ConnectError::DelayBelowResolution.into());
            }
        }

        let build_start = Instant::now();

        for (i, group) in self.groups.iter_mut().enumerate() {
            group.set_dt(self.time_resolution);
            group.reseed(self.seed.wrapping_add(1 + i as u64));
        }

        let max_delay_steps = ((self.connections.max_delay() / self.time_resolution).round() as usize).max(1);
        self.spike_buffer = SpikeBuffer::new(max_delay_steps);

        self.multimeter.open_files()?;
        self.calibrated = true;
        self.write_record_rows(0.)?;

        tracing::info!(
            "network calibrated in {:?}, {} nodes, {} connections, spike buffer of {} steps",
            build_start.elapsed(),
            self.total_nodes,
            self.connections.count(),
            max_delay_steps,
        );

        Ok(())
    }

    fn write_record_rows(&mut self, t: f32) -> Result<(), SpikingNetworkEngineError> {
        for i_record in 0..self.multimeter.records.len() {
            let values = {
                let record = &self.multimeter.records[i_record];
                let mut values = Vec::with_capacity(record.var_names.len());

                for ((var_name, i_node), port) in record.var_names.iter()
                    .zip(record.nodes.iter())
                    .zip(record.ports.iter()) {
                    let (i_group, i_local) = self.locate(*i_node)
                        .ok_or(RecordError::NodeNotFound)?;

                    values.push(self.groups[i_group].get_record_value(var_name, i_local, *port)?);
                }

                values
            };

            self.multimeter.records[i_record].push_row(t, values)?;
        }

        Ok(())
    }

    /// Advances the network by the given amount of simulated time (ms),
    /// blocking until it completes, calibrates first when the engine has not
    /// been calibrated yet, consecutive calls continue in time
    pub fn simulate(&mut self, sim_time: f32) -> Result<(), SpikingNetworkEngineError> {
        // validated before the implicit calibration so a rejected call
        // leaves the engine untouched
        if !sim_time.is_finite() || sim_time <= 0. {
            return Err(SimulationError::InvalidSimulationTime.into());
        }
        let n_steps = (sim_time / self.time_resolution).round() as usize;
        if n_steps == 0 {
            return Err(SimulationError::InvalidSimulationTime.into());
        }

        if !self.calibrated {
            self.calibrate()?;
        }

        tracing::info!(
            "simulating {} ms in {} steps from t = {} ms",
            sim_time,
            n_steps,
            self.time(),
        );
        let sim_start = Instant::now();

        let mut emitted: Vec<(usize, f32)> = Vec::new();
        let mut group_spikes: Vec<Spike> = Vec::new();

        for _ in 0..n_steps {
            for delivery in self.spike_buffer.drain_current() {
                if let Some((i_group, i_local)) = self.locate(delivery.target) {
                    self.groups[i_group].receive_spike(i_local, delivery.receptor, delivery.weight);
                }
            }

            emitted.clear();
            for (i_group, group) in self.groups.iter_mut().enumerate() {
                group_spikes.clear();
                group.update(&mut group_spikes);

                let offset = self.group_offsets[i_group];
                for spike in group_spikes.iter() {
                    emitted.push((offset + spike.node, spike.height));
                }
            }

            self.step += 1;
            let t = self.time();

            for (i_node, height) in emitted.iter() {
                if let Some(times) = self.rec_spike_times.get_mut(i_node) {
                    times.push(t);
                }

                for connection in self.connections.connections_from(*i_node) {
                    let delay_steps = (connection.delay / self.time_resolution).round() as usize;
                    self.spike_buffer.schedule(delay_steps, SpikeDelivery {
                        target: connection.target,
                        receptor: connection.receptor,
                        weight: connection.weight * height,
                    });
                }
            }

            self.spike_buffer.advance();
            self.write_record_rows(t)?;
        }

        self.multimeter.flush_files()?;

        tracing::info!(
            "simulation of {} steps finished at t = {} ms in {:?}",
            n_steps,
            self.time(),
            sim_start.elapsed(),
        );

        Ok(())
    }

    /// Sampled rows of the given record, each `[t, value, ...]` in time order
    /// from t = 0 through the last simulated step
    pub fn get_record_data(&self, record: RecordId) -> Result<&[Vec<f32>], SpikingNetworkEngineError> {
        Ok(self.multimeter.get_record_data(record.0)?)
    }

    /// Draws `n` values uniformly from `[0, 1)`
    pub fn random_uniform(&mut self, n: usize) -> Vec<f32> {
        (0..n).map(|_| self.rng.gen::<f32>()).collect()
    }

    /// Draws `n` normally distributed values, a standard deviation of `0.`
    /// always returns the mean
    pub fn random_normal(&mut self, n: usize, mean: f32, std: f32) -> Vec<f32> {
        if std == 0. {
            return vec![mean; n];
        }

        match Normal::new(mean, std) {
            Ok(normal) => (0..n).map(|_| normal.sample(&mut self.rng)).collect(),
            Err(_) => vec![mean; n],
        }
    }

    /// Draws `n` normally distributed values clamped between the given
    /// minimum and maximum
    pub fn random_normal_clipped(&mut self, n: usize, mean: f32, std: f32, minimum: f32, maximum: f32) -> Vec<f32> {
        self.random_normal(n, mean, std)
            .into_iter()
            .map(|value| value.max(minimum).min(maximum))
            .collect()
    }
}
