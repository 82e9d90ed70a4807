//! Result records and their text and JSON renderings.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::attenuation::AttenuationResult;
use crate::budget::LossBudget;
use crate::error::LossError;
use crate::evaluate::Evaluation;
use crate::fiber::FiberPath;
use crate::power::PowerReading;

/// The only value kept verbatim in JSON; every other value has its spaces stripped.
const FINDINGS_KEY: &str = "Findings";

#[derive(Clone, Debug, PartialEq)]
pub struct PowerEvaluation {
    pub tx: PowerReading,
    pub rx: PowerReading,
    pub attenuation: AttenuationResult,
    pub rx_target_min_dbm: f64,
    pub rx_target_max_dbm: f64,
}

impl PowerEvaluation {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TX mW", format!("{:.4}", self.tx.milliwatts)),
            ("TX dBm", format!("{:.2}", self.tx.dbm)),
            ("RX mW", format!("{:.4}", self.rx.milliwatts)),
            ("RX dBm", format!("{:.2}", self.rx.dbm)),
            ("RX Attenuation mW", format!("{:.4}", self.attenuation.loss_mw)),
            ("RX Attenuation dB", format!("{:.2}", self.attenuation.loss_db)),
            ("RX Min dBm", format!("{:.2}", self.rx_target_min_dbm)),
            ("RX Max dBm", format!("{:.2}", self.rx_target_max_dbm)),
        ]
    }
}

// only built when a complete, valid fiber path was supplied
#[derive(Clone, Debug, PartialEq)]
pub struct LossEvaluation {
    pub path: FiberPath,
    pub attenuation: AttenuationResult,
    pub budget: LossBudget,
    pub evaluation: Evaluation,
}

impl LossEvaluation {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Fiber Type", self.path.fiber_type.to_string()),
            ("Fiber Wavelength", self.path.wavelength.to_string()),
            ("Fiber Length Meters", self.path.length_m.to_string()),
            ("Number of Mated Connectors", self.path.connectors.to_string()),
            ("Number of Splices", self.path.splices.to_string()),
            ("RX Attenuation mW", format!("{:.4}", self.attenuation.loss_mw)),
            ("RX Attenuation dB", format!("{:.2}", self.attenuation.loss_db)),
            ("Typical Loss Budget dB", format!("{:.2}", self.budget.typical_db)),
            ("TIA-568 Max Loss Budget dB", format!("{:.2}", self.budget.max_db)),
            ("Result", self.evaluation.verdict.to_string()),
            (FINDINGS_KEY, self.evaluation.findings.clone()),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub power_eval: PowerEvaluation,
    pub loss_eval: Option<LossEvaluation>,
}

impl Report {
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        push_section(&mut text, "Summary of Inputs and Attenuation:", &self.power_eval.fields());
        if let Some(loss_eval) = &self.loss_eval {
            push_section(&mut text, "Loss Budget Evaluation:", &loss_eval.fields());
        }
        text.push('\n');
        text
    }

    pub fn to_json_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "power_eval".to_string(),
            Value::Object(json_fields(&self.power_eval.fields())),
        );
        if let Some(loss_eval) = &self.loss_eval {
            root.insert(
                "loss_eval".to_string(),
                Value::Object(json_fields(&loss_eval.fields())),
            );
        }
        Value::Object(root)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        to_pretty_json(&self.to_json_value())
    }
}

fn push_section(text: &mut String, title: &str, fields: &[(&'static str, String)]) {
    // writing into a String cannot fail
    let _ = writeln!(text, "\n{title}");
    for (key, value) in fields {
        let _ = writeln!(text, "    {key}: {value}");
    }
}

fn json_fields(fields: &[(&'static str, String)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| {
            let value = if *key == FINDINGS_KEY {
                value.clone()
            } else {
                value.replace(' ', "")
            };
            (key.replace(' ', "_"), Value::String(value))
        })
        .collect()
}

pub fn error_json_value(err: &LossError) -> Value {
    let detail = match err {
        LossError::MissingInput(fields) => json!({
            "missing_input": fields.iter().map(|field| field.to_string()).collect::<Vec<_>>(),
        }),
        LossError::InvalidConfiguration(messages) => json!({ "invalid_input": messages }),
        LossError::Rejected { missing, invalid } => json!({
            "missing_input": missing.iter().map(|field| field.to_string()).collect::<Vec<_>>(),
            "invalid_input": invalid,
        }),
        LossError::Domain(message) => json!({ "domain": message }),
    };
    json!({ "error": detail })
}

pub fn error_json(err: &LossError) -> serde_json::Result<String> {
    to_pretty_json(&error_json_value(err))
}

fn to_pretty_json(value: &Value) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
