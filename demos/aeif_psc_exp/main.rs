use std::{
    fs::File,
    io::{BufWriter, Write},
};
extern crate spiking_network_engine;
use spiking_network_engine::status;
use spiking_network_engine::connection::{ConnectionRule, SynapseSpec};
use spiking_network_engine::engine::NetworkEngine;


// Drives one aeif_psc_exp neuron with two receptor ports from a spike
// generator, one excitatory and one inhibitory connection, and tracks the
// membrane potential over 800 ms, .csv containing the trace is written to a
// file in the working directory when the simulation is finished
fn main() {
    tracing_subscriber::fmt::init();

    let mut engine = NetworkEngine::new();

    let neuron = engine.create("aeif_psc_exp", 1, 2)
        .expect("Could not create neuron");
    engine.set_status(&neuron, &status! {
        "V_peak" => 0.0,
        "a" => 4.0,
        "b" => 80.5,
        "E_L" => -70.6,
        "g_L" => 300.0,
        "tau_syn" => [40.0, 20.0],
    }).expect("Could not set neuron status");

    let spike = engine.create_spike_generator(1)
        .expect("Could not create spike generator");
    engine.set_status(&spike, &status! {
        "spike_times" => [10.0, 400.0],
    }).expect("Could not set spike times");

    let weight = [1.0, -2.0];
    let delay = [1.0, 100.0];

    engine.connect(
        &spike,
        &neuron,
        ConnectionRule::AllToAll,
        &SynapseSpec { receptor: 0, weight: weight[0], delay: delay[0] },
    ).expect("Could not connect excitatory synapse");
    engine.connect(
        &spike,
        &neuron,
        ConnectionRule::AllToAll,
        &SynapseSpec { receptor: 1, weight: weight[1], delay: delay[1] },
    ).expect("Could not connect inhibitory synapse");

    let record = engine.create_record(
        "",
        &["V_m"],
        &[neuron.get(0).expect("Neuron range is empty")],
        &[0],
    ).expect("Could not create record");

    engine.simulate(800.0).expect("Simulation failed");

    let data = engine.get_record_data(record).expect("Could not get record data");
    let (times, voltages): (Vec<f32>, Vec<f32>) = data.iter()
        .map(|row| (row[0], row[1]))
        .unzip();

    let mut file = BufWriter::new(File::create("aeif_psc_exp_output.csv")
        .expect("Could not create file"));

    writeln!(file, "t,V_m").expect("Could not write to file");
    for (t, v_m) in times.iter().zip(voltages.iter()) {
        writeln!(file, "{},{}", t, v_m).expect("Could not write to file");
    }

    println!("wrote {} rows to aeif_psc_exp_output.csv", times.len());
}
