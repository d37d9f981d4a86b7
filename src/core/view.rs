use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The top-level screens a logged-in user can switch between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Investments,
    Markets,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Investments, View::Markets];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Investments => "Investments",
            View::Markets => "Markets",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                View::Dashboard => "dashboard",
                View::Investments => "investments",
                View::Markets => "markets",
            }
        )
    }
}

impl FromStr for View {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Ok(View::Dashboard),
            "investments" => Ok(View::Investments),
            "markets" => Ok(View::Markets),
            _ => {
                let names: Vec<String> = View::ALL.iter().map(View::to_string).collect();
                Err(anyhow::anyhow!(
                    "Invalid view: {} (expected one of {})",
                    s,
                    names.join(", ")
                ))
            }
        }
    }
}
