//! # Spiking Network Engine
//!
//! `spiking_network_engine` is a package for building and simulating small
//! spiking neural networks through a single engine facade. Node groups are
//! created by model name, configured through status maps, wired together with
//! topology rules and synapse specifications, and sampled through multimeter
//! records that return a time ordered table after the simulation has run.
//! Spikes travel through a delay ring buffer so connection delays are honored
//! exactly, and every source of randomness is seeded through the engine so
//! identically configured runs are bit identical.
//!
//! Currently implements the adaptive exponential integrate and fire neuron
//! with per receptor port exponential postsynaptic currents (`aeif_psc_exp`),
//! a preset time spike generator, and a Poisson generator, along with
//! `all_to_all`, `one_to_one`, `fixed_indegree`, `fixed_outdegree`, and
//! `fixed_total_number` connection rules.
//!
//! ## Example Code
//!
//! See the `demos` folder for complete driver binaries that write the
//! recorded traces to `.csv` files for plotting.
//!
//! ### Driving a neuron with a spike generator
//!
//! Creates one `aeif_psc_exp` neuron with two receptor ports, drives it from
//! a spike generator through an excitatory and an inhibitory connection, and
//! reads the membrane potential trace back after 800 ms of simulated time:
//!
//! ```rust
//! use spiking_network_engine::status;
//! use spiking_network_engine::engine::NetworkEngine;
//! use spiking_network_engine::connection::{ConnectionRule, SynapseSpec};
//! use spiking_network_engine::error::SpikingNetworkEngineError;
//!
//! fn run() -> Result<(), SpikingNetworkEngineError> {
//!     let mut engine = NetworkEngine::new();
//!
//!     let neuron = engine.create("aeif_psc_exp", 1, 2)?;
//!     engine.set_status(&neuron, &status! {
//!         "V_peak" => 0.0,
//!         "a" => 4.0,
//!         "b" => 80.5,
//!         "E_L" => -70.6,
//!         "g_L" => 300.0,
//!         "tau_syn" => [40.0, 20.0],
//!     })?;
//!
//!     let spike = engine.create_spike_generator(1)?;
//!     engine.set_status(&spike, &status! {
//!         "spike_times" => [10.0, 400.0],
//!     })?;
//!
//!     engine.connect(
//!         &spike,
//!         &neuron,
//!         ConnectionRule::AllToAll,
//!         &SynapseSpec { receptor: 0, weight: 1.0, delay: 1.0 },
//!     )?;
//!     engine.connect(
//!         &spike,
//!         &neuron,
//!         ConnectionRule::AllToAll,
//!         &SynapseSpec { receptor: 1, weight: -2.0, delay: 100.0 },
//!     )?;
//!
//!     let record = engine.create_record(
//!         "",
//!         &["V_m"],
//!         &[neuron.get(0).unwrap()],
//!         &[0],
//!     )?;
//!
//!     engine.simulate(800.0)?;
//!
//!     let data = engine.get_record_data(record)?;
//!     let (times, voltages): (Vec<f32>, Vec<f32>) = data.iter()
//!         .map(|row| (row[0], row[1]))
//!         .unzip();
//!
//!     assert_eq!(times.len(), voltages.len());
//!     assert_eq!(times[0], 0.0);
//!
//!     Ok(())
//! }
//!
//! run().unwrap();
//! ```
//!
//! ### Driving a population with Poisson noise
//!
//! Creates a population of neurons driven by Poisson generators under a
//! fixed indegree rule and records emitted spike times:
//!
//! ```rust
//! use spiking_network_engine::engine::NetworkEngine;
//! use spiking_network_engine::connection::{ConnectionRule, SynapseSpec};
//! use spiking_network_engine::error::SpikingNetworkEngineError;
//!
//! fn run() -> Result<(), SpikingNetworkEngineError> {
//!     let mut engine = NetworkEngine::new();
//!     engine.set_random_seed(1234)?;
//!
//!     let noise = engine.create_poisson_generator(20, 50.0)?;
//!     let population = engine.create("aeif_psc_exp", 10, 1)?;
//!
//!     engine.connect(
//!         &noise,
//!         &population,
//!         ConnectionRule::FixedIndegree(5),
//!         &SynapseSpec { receptor: 0, weight: 200.0, delay: 1.0 },
//!     )?;
//!
//!     engine.activate_rec_spike_times(&population)?;
//!     engine.simulate(100.0)?;
//!
//!     for i in 0..population.len() {
//!         let _times = engine.get_rec_spike_times(population.get(i).unwrap())?;
//!     }
//!
//!     Ok(())
//! }
//!
//! run().unwrap();
//! ```

pub mod connection;
pub mod engine;
pub mod error;
pub mod multimeter;
pub mod neuron;
pub mod spike_buffer;
