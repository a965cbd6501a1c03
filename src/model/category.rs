use serde::{Deserialize, Deserializer, Serialize};

/// The fixed set of categories a transaction can be filed under.
///
/// Stored records may carry a category we do not know, or none at all. Those are read as
/// `Category::Other` (see `lenient`), so a bad category never prevents a list from loading.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Shopping,
    Entertainment,
    Salary,
    Business,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// All categories, in the order they are offered to the user.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Shopping,
        Category::Entertainment,
        Category::Salary,
        Category::Business,
        Category::Other,
    ];

    /// Parses `key`, falling back to `Category::Other` for anything unrecognized.
    pub fn from_key(key: &str) -> Category {
        key.trim().to_lowercase().parse().unwrap_or_default()
    }
}

/// Deserializes a category field that may be missing, `null`, or an unknown string.
///
/// Use together with `#[serde(default)]` so that a missing field also becomes `Other`.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Category::from_key).unwrap_or_default())
}
