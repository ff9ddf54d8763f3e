use std::collections::HashMap;

use crate::error::SampQueryError;
use crate::packet::ResponsePacket;
use crate::parse::{get_string, get_u16};

/// Server rules, name to value.
pub type RuleSet = HashMap<String, String>;

/// Parse a rules [ResponsePacket]: a `u16` count, then per rule a
/// length-prefixed name and a length-prefixed value.
///
/// A name seen twice keeps the last value.
pub fn parse(packet: &ResponsePacket) -> Result<RuleSet, SampQueryError> {
    let data: &[u8] = packet.body();
    let mut offset: usize = 0;

    let count: u16 = get_u16(data, &mut offset)?;
    let mut rules: RuleSet = HashMap::with_capacity((count as usize).min(data.len()));
    for _ in 0..count {
        let name: String = get_string(data, &mut offset)?;
        let value: String = get_string(data, &mut offset)?;
        rules.insert(name, value);
    }

    Ok(rules)
}
