#[cfg(test)]
mod test {
    use spiking_network_engine::status;
    use spiking_network_engine::engine::{NetworkEngine, NodeRange, StatusValue};
    use spiking_network_engine::error::{
        SimulationError, SpikingNetworkEngineError, StatusError,
    };


    #[test]
    fn test_default_time_resolution() {
        let engine = NetworkEngine::new();

        assert_eq!(engine.time_resolution(), 0.1);
    }

    #[test]
    fn test_time_resolution_changes_row_spacing() {
        let mut engine = NetworkEngine::new();
        engine.set_time_resolution(0.5).unwrap();

        let neuron = engine.create("aeif_psc_exp", 1, 1).unwrap();
        let record = engine.create_record(
            "",
            &["V_m"],
            &[neuron.get(0).unwrap()],
            &[0],
        ).unwrap();

        engine.simulate(10.0).unwrap();

        let data = engine.get_record_data(record).unwrap();

        assert_eq!(data.len(), 21);
        assert!((data[1][0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_time_resolution_is_rejected() {
        let mut engine = NetworkEngine::new();

        for resolution in [0.0, -0.1, f32::NAN] {
            assert!(matches!(
                engine.set_time_resolution(resolution),
                Err(SpikingNetworkEngineError::SimulationRelatedError(
                    SimulationError::InvalidTimeResolution
                )),
            ));
        }
    }

    #[test]
    fn test_calibration_freezes_configuration() {
        let mut engine = NetworkEngine::new();

        engine.create("aeif_psc_exp", 1, 1).unwrap();
        engine.calibrate().unwrap();

        assert!(engine.calibrate().is_err());
        assert!(engine.set_time_resolution(0.5).is_err());
        assert!(engine.set_random_seed(1).is_err());
        assert!(engine.create("aeif_psc_exp", 1, 1).is_err());
    }

    #[test]
    fn test_simulate_after_explicit_calibration() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 1).unwrap();
        engine.calibrate().unwrap();
        engine.simulate(10.0).unwrap();

        assert!(engine.get_scalar_param(neuron.get(0).unwrap(), "V_m").is_ok());
        assert!((engine.time() - 10.0).abs() < 0.05);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let mut engine = NetworkEngine::new();

        assert!(matches!(
            engine.create("iaf_psc_exp", 1, 1),
            Err(SpikingNetworkEngineError::SimulationRelatedError(
                SimulationError::UnknownModel(_)
            )),
        ));
    }

    #[test]
    fn test_empty_node_group_is_rejected() {
        let mut engine = NetworkEngine::new();

        assert!(matches!(
            engine.create("aeif_psc_exp", 0, 1),
            Err(SpikingNetworkEngineError::SimulationRelatedError(
                SimulationError::EmptyNodeGroup
            )),
        ));
    }

    #[test]
    fn test_invalid_simulation_time_is_rejected() {
        let mut engine = NetworkEngine::new();
        engine.create("aeif_psc_exp", 1, 1).unwrap();

        for sim_time in [0.0, -10.0, 0.01] {
            assert!(matches!(
                engine.simulate(sim_time),
                Err(SpikingNetworkEngineError::SimulationRelatedError(
                    SimulationError::InvalidSimulationTime
                )),
            ));
        }
    }

    #[test]
    fn test_failed_simulate_does_not_calibrate() {
        let mut engine = NetworkEngine::new();
        engine.create("aeif_psc_exp", 1, 1).unwrap();

        assert!(engine.simulate(-1.0).is_err());
        assert!(engine.simulate(0.0).is_err());

        // the rejected calls must leave the engine uncalibrated and
        // its configuration still changeable
        engine.set_time_resolution(0.5).unwrap();
        engine.set_random_seed(9).unwrap();
        engine.simulate(10.0).unwrap();

        assert!((engine.time() - 10.0).abs() < 0.05);
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 1).unwrap();
        let result = engine.set_status(&neuron, &status! {
            "V_x" => 1.0,
        });

        assert!(matches!(
            result,
            Err(SpikingNetworkEngineError::StatusRelatedError(
                StatusError::UnknownParameter(_)
            )),
        ));
    }

    #[test]
    fn test_scalar_and_array_kinds_are_enforced() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 2).unwrap();

        assert!(matches!(
            engine.set_status(&neuron, &status! { "V_peak" => [1.0, 2.0] }),
            Err(SpikingNetworkEngineError::StatusRelatedError(
                StatusError::ExpectedScalarValue(_)
            )),
        ));
        assert!(matches!(
            engine.set_status(&neuron, &status! { "tau_syn" => 5.0 }),
            Err(SpikingNetworkEngineError::StatusRelatedError(
                StatusError::ExpectedArrayValue(_)
            )),
        ));
        assert!(matches!(
            engine.set_status(&neuron, &status! { "tau_syn" => [5.0] }),
            Err(SpikingNetworkEngineError::StatusRelatedError(
                StatusError::ArrayLengthMismatch { .. }
            )),
        ));
    }

    #[test]
    fn test_scalar_parameter_read_back() {
        let mut engine = NetworkEngine::new();

        let neuron = engine.create("aeif_psc_exp", 1, 1).unwrap();
        engine.set_status(&neuron, &status! {
            "a" => 7.5,
        }).unwrap();

        assert_eq!(engine.get_scalar_param(neuron.get(0).unwrap(), "a").unwrap(), 7.5);
    }

    #[test]
    fn test_status_macro_builds_scalars_and_arrays() {
        let status = status! {
            "V_peak" => 0.0,
            "E_L" => -70.6,
            "tau_syn" => [40.0, 20.0],
        };

        assert_eq!(status.len(), 3);
        assert_eq!(status["V_peak"], StatusValue::Scalar(0.0));
        assert_eq!(status["E_L"], StatusValue::Scalar(-70.6));
        assert_eq!(status["tau_syn"], StatusValue::Array(vec![40.0, 20.0]));
    }

    #[test]
    fn test_node_range_indexing_and_subranges() {
        let mut engine = NetworkEngine::new();

        engine.create_spike_generator(3).unwrap();
        let neurons = engine.create("aeif_psc_exp", 10, 1).unwrap();

        assert_eq!(neurons.len(), 10);
        assert_eq!(neurons.get(0), Some(3));
        assert_eq!(neurons.get(9), Some(12));
        assert_eq!(neurons.get(10), None);

        let subrange = neurons.subrange(2, 5).unwrap();

        assert_eq!(subrange, NodeRange::new(5, 4));
        assert_eq!(subrange.to_vec(), vec![5, 6, 7, 8]);
        assert!(neurons.subrange(5, 2).is_none());
        assert!(neurons.subrange(2, 10).is_none());
    }

    #[test]
    fn test_subrange_status_only_touches_its_nodes() {
        let mut engine = NetworkEngine::new();

        let neurons = engine.create("aeif_psc_exp", 4, 1).unwrap();
        engine.set_status(&neurons.subrange(1, 2).unwrap(), &status! {
            "I_e" => 500.0,
        }).unwrap();

        let currents: Vec<f32> = (0..4)
            .map(|i| engine.get_scalar_param(neurons.get(i).unwrap(), "I_e").unwrap())
            .collect();

        assert_eq!(currents, vec![0.0, 500.0, 500.0, 0.0]);
    }

    #[test]
    fn test_random_helpers() {
        let mut engine = NetworkEngine::new();
        engine.set_random_seed(7).unwrap();

        for value in engine.random_uniform(100) {
            assert!((0.0..1.0).contains(&value));
        }

        assert_eq!(engine.random_normal(5, 2.5, 0.0), vec![2.5; 5]);

        for value in engine.random_normal_clipped(100, 0.0, 10.0, -1.0, 1.0) {
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
