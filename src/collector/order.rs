// src/collector/order.rs
// =============================================================================
// The order in which link categories are listed in the media sequence.
//
// This is a presentation choice, not source order: galleries show pictures
// before players. The default is images, embed tags, 3speak links, then
// YouTube links. Any permutation of the four categories is accepted.
// =============================================================================

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::scanner::LinkKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LinkKind>", into = "Vec<LinkKind>")]
pub struct CategoryOrder(Vec<LinkKind>);

impl CategoryOrder {
    // Accepts only a permutation of all link kinds
    pub fn new(kinds: Vec<LinkKind>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = kinds.iter().find(|kind| !seen.insert(**kind)) {
            return Err(ConfigError::CategoryOrder(format!(
                "{:?} is listed twice",
                duplicate
            )));
        }

        let missing: Vec<_> = LinkKind::ALL
            .iter()
            .filter(|kind| !seen.contains(*kind))
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::CategoryOrder(format!("missing {:?}", missing)));
        }

        Ok(Self(kinds))
    }

    pub fn kinds(&self) -> &[LinkKind] {
        &self.0
    }
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self(LinkKind::ALL.to_vec())
    }
}

impl TryFrom<Vec<LinkKind>> for CategoryOrder {
    type Error = ConfigError;

    fn try_from(kinds: Vec<LinkKind>) -> Result<Self, Self::Error> {
        Self::new(kinds)
    }
}

impl From<CategoryOrder> for Vec<LinkKind> {
    fn from(order: CategoryOrder) -> Self {
        order.0
    }
}
