use serde::{Deserialize, Serialize};
use std::fmt;

/// SwimCloud numeric team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TeamId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// SwimCloud numeric swimmer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwimmerId(pub u32);

impl fmt::Display for SwimmerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SwimmerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_bare_numbers() {
        assert_eq!(TeamId(417).to_string(), "417");
        assert_eq!(SwimmerId(90210).to_string(), "90210");
    }

    #[test]
    fn ids_are_hashable_map_keys() {
        use std::collections::HashMap;
        let mut m: HashMap<TeamId, usize> = HashMap::new();
        m.insert(TeamId(1), 25);
        assert_eq!(m[&TeamId(1)], 25);
    }
}
