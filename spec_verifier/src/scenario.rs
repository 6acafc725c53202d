use std::{fmt, str::FromStr};

/// The MLPerf load-pattern modes that some compliance rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    SingleStream,
    MultiStream,
    Server,
    Offline,
}

impl Scenario {
    /// Scenarios whose latency target and query count are fixed per model.
    pub fn is_latency_bound(self) -> bool {
        matches!(self, Scenario::MultiStream | Scenario::Server)
    }
}

impl FromStr for Scenario {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SingleStream" => Ok(Scenario::SingleStream),
            "MultiStream" => Ok(Scenario::MultiStream),
            "Server" => Ok(Scenario::Server),
            "Offline" => Ok(Scenario::Offline),
            _ => Err("Unknown scenario name"),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::SingleStream => write!(f, "SingleStream"),
            Scenario::MultiStream => write!(f, "MultiStream"),
            Scenario::Server => write!(f, "Server"),
            Scenario::Offline => write!(f, "Offline"),
        }
    }
}
