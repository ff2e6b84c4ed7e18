// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Model unit systems

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl UnitSystem {
    /// Lowercase plural name used in prompts: "grams per cubic millimeters"
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Millimeters => "millimeters",
            UnitSystem::Centimeters => "centimeters",
            UnitSystem::Meters => "meters",
            UnitSystem::Inches => "inches",
            UnitSystem::Feet => "feet",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::Millimeters => "mm",
            UnitSystem::Centimeters => "cm",
            UnitSystem::Meters => "m",
            UnitSystem::Inches => "in",
            UnitSystem::Feet => "ft",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(UnitSystem::Millimeters),
            "cm" | "centimeter" | "centimeters" => Ok(UnitSystem::Centimeters),
            "m" | "meter" | "meters" => Ok(UnitSystem::Meters),
            "in" | "inch" | "inches" => Ok(UnitSystem::Inches),
            "ft" | "foot" | "feet" => Ok(UnitSystem::Feet),
            other => Err(format!("Unknown unit system: {}", other)),
        }
    }
}
