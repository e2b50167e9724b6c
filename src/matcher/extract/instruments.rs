use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matcher::catalog::{Catalog, Register};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub register: Register,
    pub label: String,
}

/// Every catalog instrument mentioned anywhere in `text`, once each, in
/// catalog order.
pub fn extract(catalog: &Catalog, text: &str) -> Vec<Instrument> {
    catalog
        .instruments()
        .filter(|(_, entry)| entry.is_match(text))
        .map(|(register, entry)| Instrument {
            register,
            label: entry.label.to_string(),
        })
        .collect()
}

pub fn by_register(instruments: &[Instrument]) -> HashMap<Register, Vec<&Instrument>> {
    let mut buckets: HashMap<Register, Vec<&Instrument>> = HashMap::new();
    for instr in instruments {
        buckets.entry(instr.register).or_default().push(instr);
    }
    buckets
}

/// Registers with at least one instrument, in canonical order.
pub fn registers_present(instruments: &[Instrument]) -> Vec<Register> {
    let buckets = by_register(instruments);
    Register::CANONICAL
        .into_iter()
        .filter(|r| buckets.contains_key(r))
        .collect()
}
