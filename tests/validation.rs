//! Rejected measurements: nothing is computed and the error names the problem.

use fiberloss::{evaluate_measurement, FiberType, Field, LossError, MeasurementInput, Wavelength};

fn powers() -> MeasurementInput {
    MeasurementInput::from_milliwatts(1.5, 0.5)
}

#[test]
fn singlemode_850_is_always_invalid() {
    for length_m in [1.0, 100.0, 1000.0, 40_000.0] {
        for (connectors, splices) in [(0, 0), (2, 1), (10, 10)] {
            let input = powers().with_fiber(FiberType::Singlemode, 850, length_m, connectors, splices);
            assert_eq!(
                evaluate_measurement(&input).unwrap_err(),
                LossError::InvalidConfiguration(vec![
                    "Singlemode fiber does not support 850nm wavelength.".to_string()
                ])
            );
        }
    }
}

#[test]
fn multimode_long_wavelengths_are_invalid() {
    for wavelength in [Wavelength::Nm1310, Wavelength::Nm1550] {
        let input = powers().with_fiber(FiberType::Multimode, wavelength.nm(), 100.0, 0, 0);
        let err = evaluate_measurement(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("invalid configuration: Multimode fiber does not support {wavelength}nm wavelength.")
        );
    }
}

#[test]
fn fiber_length_alone_names_type_and_wavelength() {
    let input = MeasurementInput {
        fiber_length_m: Some(1000.0),
        ..powers()
    };
    assert_eq!(
        evaluate_measurement(&input).unwrap_err(),
        LossError::MissingInput(vec![Field::FiberType, Field::Wavelength])
    );
}

#[test]
fn fiber_type_alone_names_wavelength_and_length() {
    let input = MeasurementInput {
        fiber_type: Some(FiberType::Multimode),
        ..powers()
    };
    assert_eq!(
        evaluate_measurement(&input).unwrap_err(),
        LossError::MissingInput(vec![Field::Wavelength, Field::FiberLength])
    );
}

#[test]
fn missing_power_and_partial_fiber_are_reported_together() {
    let input = MeasurementInput {
        tx_dbm: Some(0.0),
        wavelength_nm: Some(1310),
        ..Default::default()
    };
    assert_eq!(
        evaluate_measurement(&input).unwrap_err(),
        LossError::MissingInput(vec![Field::Rx, Field::FiberType, Field::FiberLength])
    );
}

#[test]
fn negative_milliwatts_is_a_domain_error() {
    let input = MeasurementInput::from_milliwatts(-1.0, 0.5);
    assert!(matches!(
        evaluate_measurement(&input),
        Err(LossError::Domain(_))
    ));
}

#[test]
fn sub_meter_fiber_is_a_domain_error() {
    let input = powers().with_fiber(FiberType::Singlemode, 1310, 0.5, 0, 0);
    assert!(matches!(
        evaluate_measurement(&input),
        Err(LossError::Domain(_))
    ));
}

#[test]
fn singlemode_850_without_length_is_still_invalid() {
    let input = MeasurementInput {
        fiber_type: Some(FiberType::Singlemode),
        wavelength_nm: Some(850),
        ..powers()
    };
    let err = evaluate_measurement(&input).unwrap_err();
    assert_eq!(err.missing_fields(), &[Field::FiberLength]);
    assert_eq!(
        err.invalid_messages(),
        &["Singlemode fiber does not support 850nm wavelength.".to_string()]
    );
}

#[test]
fn overflowing_dbm_is_a_domain_error() {
    let input = MeasurementInput::from_dbm(4000.0, 0.0).with_fiber(
        FiberType::Singlemode,
        1310,
        1000.0,
        2,
        1,
    );
    assert!(matches!(
        evaluate_measurement(&input),
        Err(LossError::Domain(_))
    ));
}

#[test]
fn nan_target_band_is_a_domain_error() {
    let input = MeasurementInput {
        rx_target_min_dbm: Some(f64::NAN),
        ..powers()
    };
    assert!(matches!(
        evaluate_measurement(&input),
        Err(LossError::Domain(_))
    ));
}
