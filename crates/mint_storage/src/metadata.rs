use serde::{Deserialize, Serialize};

/// The JSON document a token URI points at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl NftMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image.into(),
        }
    }
}
