use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two tracked tickers. The set is closed; anything else coming
/// from the CLI or the backend is rejected at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "SBET")]
    Sbet,
    #[serde(rename = "BMNR")]
    Bmnr,
}

impl Symbol {
    pub const ALL: [Symbol; 2] = [Symbol::Sbet, Symbol::Bmnr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Sbet => "SBET",
            Symbol::Bmnr => "BMNR",
        }
    }

    /// Built-in fallback configuration: (shares outstanding, ETH holdings).
    /// Used by the reset-to-defaults action.
    pub fn default_config(&self) -> (f64, f64) {
        match self {
            Symbol::Sbet => (129_038_060.0, 521_939.0),
            Symbol::Bmnr => (121_700_000.0, 833_137.0),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SBET" => Ok(Symbol::Sbet),
            "BMNR" => Ok(Symbol::Bmnr),
            other => Err(format!("unknown symbol: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        for symbol in Symbol::ALL {
            assert_eq!(symbol.as_str().parse::<Symbol>().unwrap(), symbol);
        }
    }

    #[test]
    fn test_symbol_parse_is_case_insensitive() {
        assert_eq!("sbet".parse::<Symbol>().unwrap(), Symbol::Sbet);
        assert_eq!(" bmnr ".parse::<Symbol>().unwrap(), Symbol::Bmnr);
    }

    #[test]
    fn test_symbol_rejects_unknown() {
        assert!("ETHX".parse::<Symbol>().is_err());
        assert!("".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_serde_uses_ticker_string() {
        assert_eq!(serde_json::to_string(&Symbol::Sbet).unwrap(), "\"SBET\"");
        let parsed: Symbol = serde_json::from_str("\"BMNR\"").unwrap();
        assert_eq!(parsed, Symbol::Bmnr);
    }
}
