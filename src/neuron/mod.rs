//! Node group models that the engine steps, the adaptive exponential
//! integrate and fire neuron with exponential postsynaptic currents as well
//! as spike generators and Poisson generators, all behind one object safe
//! trait so the engine can hold any mix of models.

use crate::error::{RecordError, StatusError};
pub mod aeif_psc_exp;
pub mod spike_train;


/// A spike emitted by a node during an update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    /// Index of the emitting node within its group
    pub node: usize,
    /// Height multiplier applied to the weight of every outgoing connection
    pub height: f32,
}

/// A group of nodes of one model that the engine creates, configures, and steps,
/// node indices are local to the group
pub trait NodeGroup {
    /// Name of the model the group was created from
    fn model_name(&self) -> &str;
    /// Number of nodes in the group
    fn size(&self) -> usize;
    /// Number of receptor ports per node, `0` for generators that
    /// cannot receive spikes
    fn receptor_ports(&self) -> usize;
    /// Fixes the time resolution (ms), called once at calibration
    fn set_dt(&mut self, dt: f32);
    /// Reseeds any group owned random state, generators without
    /// random state ignore this
    fn reseed(&mut self, _seed: u64) {}
    /// Sets a named scalar parameter on one node
    fn set_scalar_param(&mut self, name: &str, i_node: usize, value: f32) -> Result<(), StatusError>;
    /// Gets a named scalar parameter from one node
    fn get_scalar_param(&self, name: &str, i_node: usize) -> Result<f32, StatusError>;
    /// Sets a named array parameter on one node
    fn set_array_param(&mut self, name: &str, i_node: usize, values: &[f32]) -> Result<(), StatusError>;
    /// Gets a named array parameter from one node
    fn get_array_param(&self, name: &str, i_node: usize) -> Result<Vec<f32>, StatusError>;
    /// Samples a recordable state variable from one node, scalar variables
    /// ignore the port
    fn get_record_value(&self, var_name: &str, i_node: usize, port: usize) -> Result<f32, RecordError>;
    /// Delivers an incoming spike to the given receptor port of one node
    fn receive_spike(&mut self, i_node: usize, receptor: usize, weight: f32);
    /// Advances every node by one time step, pushing emitted spikes
    fn update(&mut self, spikes: &mut Vec<Spike>);
}
