#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use spiking_network_engine::status;
    use spiking_network_engine::connection::{ConnectionRule, SynapseSpec};
    use spiking_network_engine::engine::{NetworkEngine, NodeRange};
    use spiking_network_engine::error::{ConnectError, SpikingNetworkEngineError};


    fn gather_pairs(engine: &NetworkEngine, sources: &NodeRange) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for i in 0..sources.len() {
            let i_source = sources.get(i).unwrap();
            for connection in engine.connections_from(i_source) {
                pairs.push((connection.source, connection.target));
            }
        }

        pairs
    }

    #[test]
    fn test_dual_receptor_synapses_are_independent() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 2).unwrap();
        let spike = engine.create_spike_generator(1).unwrap();
        engine.set_status(&spike, &status! {
            "spike_times" => [10.0, 400.0],
        }).unwrap();

        engine.connect(
            &spike,
            &neuron,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 0, weight: 1.0, delay: 1.0 },
        ).unwrap();
        engine.connect(
            &spike,
            &neuron,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 1, weight: -2.0, delay: 100.0 },
        ).unwrap();

        let connections = engine.connections_from(spike.get(0).unwrap());

        assert_eq!(connections.len(), 2);

        assert_eq!(connections[0].receptor, 0);
        assert_eq!(connections[0].weight, 1.0);
        assert_eq!(connections[0].delay, 1.0);

        assert_eq!(connections[1].receptor, 1);
        assert_eq!(connections[1].weight, -2.0);
        assert_eq!(connections[1].delay, 100.0);
    }

    #[test]
    fn test_all_to_all_connects_every_pair() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(3).unwrap();
        let targets = engine.create("aeif_psc_exp", 4, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::AllToAll,
            &SynapseSpec::default(),
        ).unwrap();

        let pairs = gather_pairs(&engine, &sources);

        assert_eq!(engine.connection_count(), 12);
        assert_eq!(pairs.len(), 12);
        for i in 0..sources.len() {
            for j in 0..targets.len() {
                assert!(pairs.contains(&(sources.get(i).unwrap(), targets.get(j).unwrap())));
            }
        }
    }

    #[test]
    fn test_one_to_one_pairs_by_index() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(3).unwrap();
        let targets = engine.create("aeif_psc_exp", 3, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::OneToOne,
            &SynapseSpec::default(),
        ).unwrap();

        let pairs = gather_pairs(&engine, &sources);

        assert_eq!(pairs.len(), 3);
        for i in 0..3 {
            assert!(pairs.contains(&(sources.get(i).unwrap(), targets.get(i).unwrap())));
        }
    }

    #[test]
    fn test_one_to_one_requires_matching_sizes() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(3).unwrap();
        let targets = engine.create("aeif_psc_exp", 4, 1).unwrap();

        let result = engine.connect(
            &sources,
            &targets,
            ConnectionRule::OneToOne,
            &SynapseSpec::default(),
        );

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::SourceTargetSizeMismatch
            )),
        ));
    }

    #[test]
    fn test_fixed_indegree_counts() {
        let indegree = 3;

        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(5).unwrap();
        let targets = engine.create("aeif_psc_exp", 4, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::FixedIndegree(indegree),
            &SynapseSpec::default(),
        ).unwrap();

        let mut incoming: HashMap<usize, usize> = HashMap::new();
        for (_, i_target) in gather_pairs(&engine, &sources) {
            *incoming.entry(i_target).or_insert(0) += 1;
        }

        assert_eq!(engine.connection_count(), targets.len() * indegree);
        for j in 0..targets.len() {
            assert_eq!(incoming[&targets.get(j).unwrap()], indegree);
        }
    }

    #[test]
    fn test_fixed_outdegree_counts() {
        let outdegree = 2;

        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(5).unwrap();
        let targets = engine.create("aeif_psc_exp", 4, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::FixedOutdegree(outdegree),
            &SynapseSpec::default(),
        ).unwrap();

        assert_eq!(engine.connection_count(), sources.len() * outdegree);
        for i in 0..sources.len() {
            assert_eq!(engine.connections_from(sources.get(i).unwrap()).len(), outdegree);
        }
    }

    #[test]
    fn test_fixed_total_number_counts() {
        let total = 17;

        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(5).unwrap();
        let targets = engine.create("aeif_psc_exp", 4, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::FixedTotalNumber(total),
            &SynapseSpec::default(),
        ).unwrap();

        assert_eq!(engine.connection_count(), total);
        assert_eq!(gather_pairs(&engine, &sources).len(), total);
    }

    #[test]
    fn test_zero_rule_parameter_is_rejected() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(2).unwrap();
        let targets = engine.create("aeif_psc_exp", 2, 1).unwrap();

        let result = engine.connect(
            &sources,
            &targets,
            ConnectionRule::FixedIndegree(0),
            &SynapseSpec::default(),
        );

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::RuleParameterOutOfRange
            )),
        ));
    }

    #[test]
    fn test_delay_below_resolution_is_rejected() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(1).unwrap();
        let targets = engine.create("aeif_psc_exp", 1, 1).unwrap();

        let result = engine.connect(
            &sources,
            &targets,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 0, weight: 1.0, delay: 0.05 },
        );

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::DelayBelowResolution
            )),
        ));
    }

    #[test]
    fn test_resolution_change_after_connect_invalidates_delay() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(1).unwrap();
        let targets = engine.create("aeif_psc_exp", 1, 1).unwrap();

        engine.connect(
            &sources,
            &targets,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 0, weight: 1.0, delay: 0.1 },
        ).unwrap();

        // the delay was valid at connect time but rounds to zero steps
        // at the coarser resolution, calibration must reject it instead
        // of delivering the spike a ring wrap late
        engine.set_time_resolution(1.0).unwrap();

        assert!(matches!(
            engine.simulate(10.0),
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::DelayBelowResolution
            )),
        ));

        // the failed calibration leaves the engine reconfigurable
        engine.set_time_resolution(0.1).unwrap();
        engine.simulate(10.0).unwrap();
    }

    #[test]
    fn test_receptor_port_out_of_range_is_rejected() {
        let mut engine = NetworkEngine::new();

        let sources = engine.create_spike_generator(1).unwrap();
        let targets = engine.create("aeif_psc_exp", 1, 2).unwrap();

        let result = engine.connect(
            &sources,
            &targets,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 2, weight: 1.0, delay: 1.0 },
        );

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::ReceptorPortOutOfRange
            )),
        ));
    }

    #[test]
    fn test_generators_cannot_be_targets() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 1).unwrap();
        let spike = engine.create_spike_generator(1).unwrap();

        let result = engine.connect(
            &neuron,
            &spike,
            ConnectionRule::AllToAll,
            &SynapseSpec::default(),
        );

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::ConnectRelatedError(
                ConnectError::ReceptorPortOutOfRange
            )),
        ));
    }

    #[test]
    fn test_inhibitory_connection_lowers_voltage() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 2).unwrap();
        engine.set_status(&neuron, &status! {
            "V_peak" => 0.0,
            "a" => 4.0,
            "b" => 80.5,
            "E_L" => -70.6,
            "g_L" => 300.0,
            "tau_syn" => [40.0, 20.0],
        }).unwrap();

        let spike = engine.create_spike_generator(1).unwrap();
        engine.set_status(&spike, &status! {
            "spike_times" => [10.0, 400.0],
        }).unwrap();

        engine.connect(
            &spike,
            &neuron,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 0, weight: 1.0, delay: 1.0 },
        ).unwrap();
        engine.connect(
            &spike,
            &neuron,
            ConnectionRule::AllToAll,
            &SynapseSpec { receptor: 1, weight: -2.0, delay: 100.0 },
        ).unwrap();

        let record = engine.create_record(
            "",
            &["V_m"],
            &[neuron.get(0).unwrap()],
            &[0],
        ).unwrap();

        engine.simulate(800.0).unwrap();

        let data = engine.get_record_data(record).unwrap();
        let voltages: Vec<f32> = data.iter().map(|row| row[1]).collect();

        let resting = voltages[0];
        let max_voltage = voltages.iter().cloned().fold(f32::MIN, f32::max);
        let min_voltage = voltages.iter().cloned().fold(f32::MAX, f32::min);

        // the excitatory synapse pushes the trace above rest and the
        // inhibitory one pulls it below
        assert!(max_voltage > resting);
        assert!(min_voltage < resting);
    }
}
