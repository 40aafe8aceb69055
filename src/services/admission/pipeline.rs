//! Ordered chain of gates run ahead of route dispatch.
//!
//! Each gate is evaluated in order and the first rejection is terminal:
//! no later gate runs and no handler is invoked.
//!
//! The deployed order is `token` then `header`. The header check is cheaper and
//! could run first; the order is kept as deployed and can be flipped with
//! `GATE_ORDER=header,token`.

use std::fmt;
use std::str::FromStr;

use super::gate::{Gate, GateResult, Rejection, RequestHead};
use super::header::HeaderGuard;
use super::token::TokenAuthorizer;
use crate::config::AdmissionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Token,
    Header,
}

impl GateKind {
    pub const DEPLOYED_ORDER: [GateKind; 2] = [GateKind::Token, GateKind::Header];
}

impl FromStr for GateKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "header" => Ok(Self::Header),
            _ => Err(()),
        }
    }
}

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected {
        gate: &'static str,
        rejection: Rejection,
    },
}

#[derive(Default)]
pub struct AdmissionPipeline {
    gates: Vec<Box<dyn Gate>>,
}

impl AdmissionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(mut self, gate: impl Gate + 'static) -> Self {
        self.gates.push(Box::new(gate));
        self
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        config
            .order
            .iter()
            .fold(Self::new(), |pipeline, kind| match kind {
                GateKind::Token => {
                    pipeline.with_gate(TokenAuthorizer::new(config.expected_token.clone()))
                }
                GateKind::Header => pipeline.with_gate(HeaderGuard::new(
                    config.required_header.clone(),
                    config.header_filter.clone(),
                )),
            })
    }

    pub fn gate_names(&self) -> Vec<&'static str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    pub fn evaluate(&self, head: &RequestHead<'_>) -> Admission {
        for gate in &self.gates {
            match gate.check(head) {
                GateResult::Pass => {
                    tracing::trace!(gate = gate.name(), "gate passed");
                }
                GateResult::Reject(rejection) => {
                    tracing::info!(
                        gate = gate.name(),
                        status = rejection.status.as_u16(),
                        method = %head.method,
                        path = head.path,
                        "request rejected"
                    );
                    return Admission::Rejected {
                        gate: gate.name(),
                        rejection,
                    };
                }
            }
        }

        Admission::Admitted
    }
}

impl fmt::Debug for AdmissionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionPipeline")
            .field("gates", &self.gate_names())
            .finish()
    }
}
