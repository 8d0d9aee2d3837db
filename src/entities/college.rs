// 🏫 College & Branch - the two fixed enumerations of the directory
//
// A club belongs to exactly one college; a registering student picks one branch.

use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COLLEGE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum College {
    #[default]
    #[serde(rename = "GGITS")]
    Ggits,

    #[serde(rename = "GGCT")]
    Ggct,

    #[serde(rename = "GGCE")]
    Ggce,
}

impl College {
    /// Display order used by every college picker
    pub const ALL: [College; 3] = [College::Ggits, College::Ggct, College::Ggce];

    pub fn as_str(&self) -> &'static str {
        match self {
            College::Ggits => "GGITS",
            College::Ggct => "GGCT",
            College::Ggce => "GGCE",
        }
    }

    /// Campus picture served from the static assets directory
    pub fn image_path(&self) -> &'static str {
        match self {
            College::Ggits => "/ggits.png",
            College::Ggct => "/ggct.png",
            College::Ggce => "/ggce.png",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            College::Ggits => College::Ggct,
            College::Ggct => College::Ggce,
            College::Ggce => College::Ggits,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            College::Ggits => College::Ggce,
            College::Ggct => College::Ggits,
            College::Ggce => College::Ggct,
        }
    }
}

impl fmt::Display for College {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for College {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        College::ALL
            .into_iter()
            .find(|college| college.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::UnknownCollege(s.to_string()))
    }
}

// ============================================================================
// BRANCH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "Computer Science")]
    ComputerScience,

    #[serde(rename = "Mechanical Engineering")]
    MechanicalEngineering,

    #[serde(rename = "Electrical Engineering")]
    ElectricalEngineering,

    #[serde(rename = "Civil Engineering")]
    CivilEngineering,

    #[serde(rename = "Electronics & Communication")]
    ElectronicsCommunication,

    #[serde(rename = "Information Technology")]
    InformationTechnology,

    #[serde(rename = "Chemical Engineering")]
    ChemicalEngineering,

    #[serde(rename = "Biotechnology")]
    Biotechnology,
}

impl Branch {
    pub const ALL: [Branch; 8] = [
        Branch::ComputerScience,
        Branch::MechanicalEngineering,
        Branch::ElectricalEngineering,
        Branch::CivilEngineering,
        Branch::ElectronicsCommunication,
        Branch::InformationTechnology,
        Branch::ChemicalEngineering,
        Branch::Biotechnology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::ComputerScience => "Computer Science",
            Branch::MechanicalEngineering => "Mechanical Engineering",
            Branch::ElectricalEngineering => "Electrical Engineering",
            Branch::CivilEngineering => "Civil Engineering",
            Branch::ElectronicsCommunication => "Electronics & Communication",
            Branch::InformationTechnology => "Information Technology",
            Branch::ChemicalEngineering => "Chemical Engineering",
            Branch::Biotechnology => "Biotechnology",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|branch| branch.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::UnknownBranch(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
