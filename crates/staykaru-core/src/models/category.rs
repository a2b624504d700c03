use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Namespace partition for uploaded images.
///
/// The category decides the storage subdirectory and the URL prefix, so a file
/// stored under one category is never reachable through another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UploadCategory {
    Accommodations,
    FoodProviders,
    MenuItems,
    General,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 4] = [
        UploadCategory::Accommodations,
        UploadCategory::FoodProviders,
        UploadCategory::MenuItems,
        UploadCategory::General,
    ];

    /// Directory name under the uploads root (also the URL segment).
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadCategory::Accommodations => "accommodations",
            UploadCategory::FoodProviders => "food-providers",
            UploadCategory::MenuItems => "menu-items",
            UploadCategory::General => "general",
        }
    }
}

impl FromStr for UploadCategory {
    type Err = anyhow::Error;

    /// Accepts the directory names and the singular route aliases
    /// (`accommodation`, `food-provider`, `menu-item`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accommodations" | "accommodation" => Ok(UploadCategory::Accommodations),
            "food-providers" | "food-provider" => Ok(UploadCategory::FoodProviders),
            "menu-items" | "menu-item" => Ok(UploadCategory::MenuItems),
            "general" => Ok(UploadCategory::General),
            _ => Err(anyhow::anyhow!("Invalid upload type: {}", s)),
        }
    }
}

impl Display for UploadCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.dir_name())
    }
}
