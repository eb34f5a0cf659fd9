use crate::pot::{Pot, PotId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a transfer: either the account's spendable balance or a pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    Account,
    Pot { id: PotId, name: String },
}

impl Endpoint {
    pub fn pot(pot: &Pot) -> Self {
        Endpoint::Pot {
            id: pot.id.clone(),
            name: pot.name.clone(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Account => f.write_str("main account"),
            Endpoint::Pot { name, .. } => f.write_str(name),
        }
    }
}

/// A transfer proposed on the ledger, tagged with the rule that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub label: String,
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Always positive, in minor currency units.
    pub amount: i64,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "creator: ({}), sending funds from ({}) to ({}), value moved: {}",
            self.label, self.source, self.destination, self.amount
        )
    }
}
