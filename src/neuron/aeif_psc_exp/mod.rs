//! An adaptive exponential integrate and fire neuron where each receptor port
//! carries an exponentially decaying postsynaptic current.

use rayon::prelude::*;
use crate::error::{RecordError, StatusError};
use super::{NodeGroup, Spike};


/// Number of cells above which a group update runs in parallel
const PARALLEL_UPDATE_THRESHOLD: usize = 128;

/// An adaptive exponential integrate and fire neuron with per receptor port
/// exponential postsynaptic currents
#[derive(Debug, Clone, PartialEq)]
pub struct AeifPscExpNeuron {
    /// Membrane potential (mV)
    pub current_voltage: f32,
    /// Adaptation current (pA)
    pub w_value: f32,
    /// Exponential threshold potential (mV)
    pub v_th: f32,
    /// Spike detection potential (mV)
    pub v_peak: f32,
    /// Voltage reset value (mV)
    pub v_reset: f32,
    /// Leak reversal potential (mV)
    pub e_l: f32,
    /// Leak conductance (nS)
    pub g_l: f32,
    /// Membrane capacitance (pF)
    pub c_m: f32,
    /// Subthreshold adaptation conductance (nS)
    pub a: f32,
    /// Spike triggered adaptation increment (pA)
    pub b: f32,
    /// Adaptation time constant (ms)
    pub tau_w: f32,
    /// Slope factor of the exponential term (mV), `0.` disables the term
    pub slope_factor: f32,
    /// Total refractory period (ms)
    pub tref: f32,
    /// Constant input current (pA)
    pub i_e: f32,
    /// Synaptic time constant per receptor port (ms)
    pub tau_syn: Vec<f32>,
    /// Postsynaptic current per receptor port (pA)
    pub syn_current: Vec<f32>,
    /// Counter for refractory period
    pub refractory_count: f32,
    /// Time step (ms)
    pub dt: f32,
    /// Whether the neuron is spiking
    pub is_spiking: bool,
}

impl Default for AeifPscExpNeuron {
    fn default() -> Self {
        AeifPscExpNeuron {
            current_voltage: -70.6, // initial potential, leak reversal potential (mV)
            w_value: 0., // initial adaptation current (pA)
            v_th: -50.4, // exponential threshold potential (mV)
            v_peak: 0., // spike detection potential (mV)
            v_reset: -60., // reset potential (mV)
            e_l: -70.6, // leak reversal potential (mV)
            g_l: 30., // leak conductance (nS)
            c_m: 281., // membrane capacitance (pF)
            a: 4., // subthreshold adaptation conductance (nS)
            b: 80.5, // spike triggered adaptation increment (pA)
            tau_w: 144., // adaptation time constant (ms)
            slope_factor: 2., // exponential slope factor (mV)
            tref: 0., // refractory time (ms)
            i_e: 0., // constant input current (pA)
            tau_syn: vec![2.], // synaptic time constant per port (ms)
            syn_current: vec![0.],
            refractory_count: 0.,
            dt: 0.1, // simulation time step (ms)
            is_spiking: false,
        }
    }
}

impl AeifPscExpNeuron {
    /// Creates a neuron at the default parameters with the given number of
    /// receptor ports
    pub fn with_ports(n_ports: usize) -> Self {
        AeifPscExpNeuron {
            tau_syn: vec![2.; n_ports],
            syn_current: vec![0.; n_ports],
            ..AeifPscExpNeuron::default()
        }
    }

    /// Calculates the change in voltage given the summed synaptic and
    /// constant input currents, the exponential term evaluates the voltage
    /// clamped at the spike detection potential
    pub fn get_dv_change(&self) -> f32 {
        let v = self.current_voltage.min(self.v_peak);
        let exp_term = if self.slope_factor != 0. {
            self.g_l * self.slope_factor * ((v - self.v_th) / self.slope_factor).exp()
        } else {
            0.
        };
        let syn_input: f32 = self.syn_current.iter().sum();

        (
            -self.g_l * (v - self.e_l) + exp_term - self.w_value + syn_input + self.i_e
        ) * (self.dt / self.c_m)
    }

    /// Calculates the change in the adaptation current
    pub fn get_dw_change(&self) -> f32 {
        (
            self.a * (self.current_voltage.min(self.v_peak) - self.e_l) - self.w_value
        ) * (self.dt / self.tau_w)
    }

    /// Determines whether the neuron is spiking, resets the voltage and
    /// updates the adaptation current if spiking, also handles refractory period
    pub fn handle_spiking(&mut self) -> bool {
        let mut is_spiking = false;

        if self.refractory_count > 0. {
            self.current_voltage = self.v_reset;
            self.refractory_count -= 1.;
        } else if self.current_voltage >= self.v_peak {
            is_spiking = !is_spiking;
            self.current_voltage = self.v_reset;
            self.w_value += self.b;
            self.refractory_count = self.tref / self.dt;
        }

        self.is_spiking = is_spiking;

        is_spiking
    }

    /// Advances the neuron by one time step, returns whether it is spiking
    pub fn iterate(&mut self) -> bool {
        let dv = self.get_dv_change();
        let dw = self.get_dw_change();

        if self.refractory_count <= 0. {
            self.current_voltage += dv;
            self.w_value += dw;
        } else {
            self.w_value += dw;
        }

        for (current, tau) in self.syn_current.iter_mut().zip(self.tau_syn.iter()) {
            *current *= (-self.dt / tau).exp();
        }

        self.handle_spiking()
    }
}

/// A group of `aeif_psc_exp` neurons
pub struct AeifPscExpGroup {
    /// Cells of the group, indexed by local node index
    pub cells: Vec<AeifPscExpNeuron>,
    n_ports: usize,
}

impl AeifPscExpGroup {
    /// Creates a group of the given size with every cell at the default
    /// parameters and the given number of receptor ports
    pub fn new(n: usize, n_ports: usize) -> Self {
        AeifPscExpGroup {
            cells: vec![AeifPscExpNeuron::with_ports(n_ports); n],
            n_ports,
        }
    }

    fn check_node(&self, i_node: usize) -> Result<(), StatusError> {
        if i_node >= self.cells.len() {
            return Err(StatusError::NodeNotFound);
        }

        Ok(())
    }
}

impl NodeGroup for AeifPscExpGroup {
    fn model_name(&self) -> &str {
        "aeif_psc_exp"
    }

    fn size(&self) -> usize {
        self.cells.len()
    }

    fn receptor_ports(&self) -> usize {
        self.n_ports
    }

    fn set_dt(&mut self, dt: f32) {
        for cell in self.cells.iter_mut() {
            cell.dt = dt;
        }
    }

    fn set_scalar_param(&mut self, name: &str, i_node: usize, value: f32) -> Result<(), StatusError> {
        self.check_node(i_node)?;
        let cell = &mut self.cells[i_node];

        match name {
            "V_m" => cell.current_voltage = value,
            "w" => cell.w_value = value,
            "V_th" => cell.v_th = value,
            "V_peak" => cell.v_peak = value,
            "V_reset" => cell.v_reset = value,
            "E_L" => cell.e_l = value,
            "g_L" => cell.g_l = value,
            "C_m" => cell.c_m = value,
            "a" => cell.a = value,
            "b" => cell.b = value,
            "tau_w" => cell.tau_w = value,
            "Delta_T" => cell.slope_factor = value,
            "t_ref" => cell.tref = value,
            "I_e" => cell.i_e = value,
            "tau_syn" | "I_syn" => return Err(StatusError::ExpectedArrayValue(name.to_string())),
            _ => return Err(StatusError::UnknownParameter(name.to_string())),
        }

        Ok(())
    }

    fn get_scalar_param(&self, name: &str, i_node: usize) -> Result<f32, StatusError> {
        self.check_node(i_node)?;
        let cell = &self.cells[i_node];

        match name {
            "V_m" => Ok(cell.current_voltage),
            "w" => Ok(cell.w_value),
            "V_th" => Ok(cell.v_th),
            "V_peak" => Ok(cell.v_peak),
            "V_reset" => Ok(cell.v_reset),
            "E_L" => Ok(cell.e_l),
            "g_L" => Ok(cell.g_l),
            "C_m" => Ok(cell.c_m),
            "a" => Ok(cell.a),
            "b" => Ok(cell.b),
            "tau_w" => Ok(cell.tau_w),
            "Delta_T" => Ok(cell.slope_factor),
            "t_ref" => Ok(cell.tref),
            "I_e" => Ok(cell.i_e),
            "tau_syn" | "I_syn" => Err(StatusError::ExpectedArrayValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn set_array_param(&mut self, name: &str, i_node: usize, values: &[f32]) -> Result<(), StatusError> {
        self.check_node(i_node)?;
        let cell = &mut self.cells[i_node];

        match name {
            "tau_syn" => {
                if values.len() != self.n_ports {
                    return Err(StatusError::ArrayLengthMismatch {
                        parameter: name.to_string(),
                        expected: self.n_ports,
                        found: values.len(),
                    });
                }

                cell.tau_syn = values.to_vec();

                Ok(())
            },
            "I_syn" => {
                if values.len() != self.n_ports {
                    return Err(StatusError::ArrayLengthMismatch {
                        parameter: name.to_string(),
                        expected: self.n_ports,
                        found: values.len(),
                    });
                }

                cell.syn_current = values.to_vec();

                Ok(())
            },
            "V_m" | "w" | "V_th" | "V_peak" | "V_reset" | "E_L" | "g_L" | "C_m" | "a" | "b"
                | "tau_w" | "Delta_T" | "t_ref" | "I_e" =>
                Err(StatusError::ExpectedScalarValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_array_param(&self, name: &str, i_node: usize) -> Result<Vec<f32>, StatusError> {
        self.check_node(i_node)?;
        let cell = &self.cells[i_node];

        match name {
            "tau_syn" => Ok(cell.tau_syn.clone()),
            "I_syn" => Ok(cell.syn_current.clone()),
            "V_m" | "w" | "V_th" | "V_peak" | "V_reset" | "E_L" | "g_L" | "C_m" | "a" | "b"
                | "tau_w" | "Delta_T" | "t_ref" | "I_e" =>
                Err(StatusError::ExpectedScalarValue(name.to_string())),
            _ => Err(StatusError::UnknownParameter(name.to_string())),
        }
    }

    fn get_record_value(&self, var_name: &str, i_node: usize, port: usize) -> Result<f32, RecordError> {
        let cell = match self.cells.get(i_node) {
            Some(cell) => cell,
            None => return Err(RecordError::NodeNotFound),
        };

        match var_name {
            "V_m" => Ok(cell.current_voltage),
            "w" => Ok(cell.w_value),
            "I_syn" => {
                match cell.syn_current.get(port) {
                    Some(current) => Ok(*current),
                    None => Err(RecordError::PortOutOfRange),
                }
            },
            _ => Err(RecordError::UnknownVariable(var_name.to_string())),
        }
    }

    fn receive_spike(&mut self, i_node: usize, receptor: usize, weight: f32) {
        if let Some(cell) = self.cells.get_mut(i_node) {
            if let Some(current) = cell.syn_current.get_mut(receptor) {
                *current += weight;
            }
        }
    }

    fn update(&mut self, spikes: &mut Vec<Spike>) {
        if self.cells.len() >= PARALLEL_UPDATE_THRESHOLD {
            self.cells.par_iter_mut()
                .for_each(|cell| { cell.iterate(); });
        } else {
            for cell in self.cells.iter_mut() {
                cell.iterate();
            }
        }

        // collected serially in index order so emission order is deterministic
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_spiking {
                spikes.push(Spike { node: i, height: 1. });
            }
        }
    }
}
