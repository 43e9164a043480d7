use crate::error::BfhlError;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::Value;

/// The operations `/bfhl` can perform, in the order their keys are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fibonacci,
    Prime,
    Lcm,
    Hcf,
    Ai,
}

impl Operation {
    pub const PRIORITY: [Operation; 5] = [
        Operation::Fibonacci,
        Operation::Prime,
        Operation::Lcm,
        Operation::Hcf,
        Operation::Ai,
    ];

    /// Request body key that selects this operation.
    pub fn key(self) -> &'static str {
        match self {
            Operation::Fibonacci => "fibonacci",
            Operation::Prime => "prime",
            Operation::Lcm => "lcm",
            Operation::Hcf => "hcf",
            Operation::Ai => "AI",
        }
    }
}

/// A `/bfhl` body reduced to the one operation it selects.
///
/// The payload is kept as raw JSON: validation happens per operation, after
/// the branch is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum BfhlRequest {
    Fibonacci(Value),
    Prime(Value),
    Lcm(Value),
    Hcf(Value),
    Ai(Value),
}

impl BfhlRequest {
    /// Pick the first recognized key in priority order.
    ///
    /// A key counts as present whatever its value, `null` included, so an
    /// invalid `fibonacci` never falls through to `prime`. Bodies that are not
    /// JSON objects carry no keys at all.
    pub fn from_payload(payload: Value) -> Result<Self, BfhlError> {
        let Value::Object(mut fields) = payload else {
            return Err(BfhlError::MissingKey);
        };

        Operation::PRIORITY
            .into_iter()
            .find_map(|operation| {
                fields
                    .remove(operation.key())
                    .map(|value| Self::new(operation, value))
            })
            .ok_or(BfhlError::MissingKey)
    }

    fn new(operation: Operation, value: Value) -> Self {
        match operation {
            Operation::Fibonacci => BfhlRequest::Fibonacci(value),
            Operation::Prime => BfhlRequest::Prime(value),
            Operation::Lcm => BfhlRequest::Lcm(value),
            Operation::Hcf => BfhlRequest::Hcf(value),
            Operation::Ai => BfhlRequest::Ai(value),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            BfhlRequest::Fibonacci(_) => Operation::Fibonacci,
            BfhlRequest::Prime(_) => Operation::Prime,
            BfhlRequest::Lcm(_) => Operation::Lcm,
            BfhlRequest::Hcf(_) => Operation::Hcf,
            BfhlRequest::Ai(_) => Operation::Ai,
        }
    }
}

/// Successful operation result, serialized bare into the envelope's `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BfhlData {
    Series(FibonacciSeries),
    Integers(Vec<i64>),
    Integer(i64),
    Text(String),
}

/// 2^64: doubles below this that hold whole numbers fit a `u64` exactly.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Fibonacci terms as doubles.
///
/// Whole terms below 2^64 are written as JSON integers, larger ones as
/// floats, and infinite ones as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciSeries(pub Vec<f64>);

impl Serialize for FibonacciSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for &term in &self.0 {
            if (0.0..U64_LIMIT).contains(&term) && term.fract() == 0.0 {
                seq.serialize_element(&(term as u64))?;
            } else {
                seq.serialize_element(&term)?;
            }
        }
        seq.end()
    }
}
