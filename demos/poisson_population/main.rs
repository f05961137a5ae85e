use std::{
    fs::File,
    io::{BufWriter, Write},
};
extern crate spiking_network_engine;
use spiking_network_engine::status;
use spiking_network_engine::connection::{ConnectionRule, SynapseSpec};
use spiking_network_engine::engine::NetworkEngine;


// Drives a small population of aeif_psc_exp neurons with Poisson noise under
// a fixed indegree rule, tracks one neuron's membrane potential and the
// emitted spike times of the whole population, .csv files are written to the
// working directory when the simulation is finished
fn main() {
    tracing_subscriber::fmt::init();

    let mut engine = NetworkEngine::new();
    engine.set_random_seed(1234).expect("Could not set seed");

    let noise = engine.create_poisson_generator(20, 100.0)
        .expect("Could not create Poisson generators");
    let population = engine.create("aeif_psc_exp", 10, 1)
        .expect("Could not create population");
    engine.set_status(&population, &status! {
        "tau_syn" => [10.0],
    }).expect("Could not set population status");

    engine.connect(
        &noise,
        &population,
        ConnectionRule::FixedIndegree(5),
        &SynapseSpec { receptor: 0, weight: 400.0, delay: 1.0 },
    ).expect("Could not connect noise to population");

    let record = engine.create_record(
        "",
        &["V_m", "I_syn"],
        &[population.get(0).expect("Population range is empty"); 2],
        &[0, 0],
    ).expect("Could not create record");
    engine.activate_rec_spike_times(&population)
        .expect("Could not activate spike time recording");

    engine.simulate(1000.0).expect("Simulation failed");

    let data = engine.get_record_data(record).expect("Could not get record data");

    let mut trace_file = BufWriter::new(File::create("poisson_population_trace.csv")
        .expect("Could not create file"));
    writeln!(trace_file, "t,V_m,I_syn").expect("Could not write to file");
    for row in data.iter() {
        writeln!(trace_file, "{},{},{}", row[0], row[1], row[2])
            .expect("Could not write to file");
    }

    let mut spike_file = BufWriter::new(File::create("poisson_population_spikes.csv")
        .expect("Could not create file"));
    writeln!(spike_file, "node,t").expect("Could not write to file");
    for i in 0..population.len() {
        let i_node = population.get(i).expect("Population index out of range");
        let times = engine.get_rec_spike_times(i_node)
            .expect("Could not get recorded spike times");

        for t in times {
            writeln!(spike_file, "{},{}", i_node, t).expect("Could not write to file");
        }
    }

    println!("wrote {} rows to poisson_population_trace.csv", data.len());
}
