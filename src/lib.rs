mod attenuation;
mod budget;
pub mod cli;
pub mod constants;
mod error;
mod evaluate;
mod fiber;
pub mod file;
mod input;
mod power;
mod report;
mod validate;

use tracing::debug;

pub use attenuation::{compute_attenuation, AttenuationResult};
pub use budget::{compute_budget, fiber_loss, BudgetMode, FiberLoss, LossBudget, Tier, FIBER_LOSS_TABLE};
pub use error::{LossError, Result};
pub use evaluate::{evaluate, Evaluation, Verdict};
pub use fiber::{check_pairing, FiberPath, FiberType, Wavelength};
pub use input::MeasurementInput;
pub use power::{to_dbm, to_milliwatts, PowerReading};
pub use report::{error_json, error_json_value, LossEvaluation, PowerEvaluation, Report};
pub use validate::{validate, Field};

// runs the whole measurement pipeline, either every record is produced or none
pub fn evaluate_measurement(input: &MeasurementInput) -> Result<Report> {
    validate(input)?;

    let tx = PowerReading::resolve(input.tx_mw, input.tx_dbm, Field::Tx)?;
    let rx = PowerReading::resolve(input.rx_mw, input.rx_dbm, Field::Rx)?;
    let attenuation = compute_attenuation(&tx, &rx)?;

    let power_eval = PowerEvaluation {
        tx,
        rx,
        attenuation,
        rx_target_min_dbm: input.rx_target_min_dbm(),
        rx_target_max_dbm: input.rx_target_max_dbm(),
    };

    let loss_eval = match input.fiber_path()? {
        Some(path) => Some(evaluate_loss(path, attenuation, input.budget_mode())?),
        None => {
            debug!("no fiber path supplied, skipping loss budget evaluation");
            None
        }
    };

    Ok(Report {
        power_eval,
        loss_eval,
    })
}

pub fn evaluate_loss(
    path: FiberPath,
    attenuation: AttenuationResult,
    mode: BudgetMode,
) -> Result<LossEvaluation> {
    let budget = LossBudget::for_path(&path, mode)?;
    let evaluation = evaluate(&attenuation, &budget);
    debug!(verdict = %evaluation.verdict, excess_percent = ?evaluation.excess_percent, "evaluated loss");

    Ok(LossEvaluation {
        path,
        attenuation,
        budget,
        evaluation,
    })
}
