use std::fmt;

use crate::attenuation::AttenuationResult;
use crate::budget::LossBudget;
use crate::constants::REFERENCE_STANDARD;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Warn => write!(f, "WARN"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

impl Verdict {
    /// Place an observed loss into one of three bands:
    /// `(-inf, typical]` passes, `(typical, max]` warns, `(max, inf)` fails.
    pub fn classify(observed_db: f64, budget: &LossBudget) -> Verdict {
        if observed_db <= budget.typical_db {
            Verdict::Pass
        } else if observed_db <= budget.max_db {
            Verdict::Warn
        } else {
            Verdict::Fail
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// How far past the maximum budget the loss is, in percent. Only on FAIL.
    pub excess_percent: Option<f64>,
    pub findings: String,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.verdict, self.findings)
    }
}

pub fn evaluate(attenuation: &AttenuationResult, budget: &LossBudget) -> Evaluation {
    let observed_db = attenuation.loss_db;
    let verdict = Verdict::classify(observed_db, budget);
    let single_tier = budget.typical_db == budget.max_db;

    let excess_percent = match verdict {
        Verdict::Fail if budget.max_db > 0.0 => {
            Some((observed_db - budget.max_db) / budget.max_db * 100.0)
        }
        _ => None,
    };

    let findings = match verdict {
        Verdict::Pass if single_tier => format!(
            "Attenuation of {attenuation} is within the calculated {REFERENCE_STANDARD} maximum loss budget of {:.2} dB.",
            budget.max_db
        ),
        Verdict::Pass => format!(
            "Attenuation of {attenuation} is within both the calculated typical loss budget of {:.2} dB and the {REFERENCE_STANDARD} maximum of {:.2} dB.",
            budget.typical_db, budget.max_db
        ),
        Verdict::Warn => format!(
            "Attenuation of {attenuation} is higher than the calculated typical loss budget of {:.2} dB but within the {REFERENCE_STANDARD} maximum of {:.2} dB.",
            budget.typical_db, budget.max_db
        ),
        Verdict::Fail => match excess_percent {
            Some(excess) => format!(
                "Attenuation of {attenuation} exceeds the calculated {REFERENCE_STANDARD} maximum loss budget of {:.2} dB by {excess:.2}%.",
                budget.max_db
            ),
            None => format!(
                "Attenuation of {attenuation} exceeds the calculated {REFERENCE_STANDARD} maximum loss budget of {:.2} dB.",
                budget.max_db
            ),
        },
    };

    Evaluation {
        verdict,
        excess_percent,
        findings,
    }
}
