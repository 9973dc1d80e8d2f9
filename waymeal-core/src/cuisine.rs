//! Cuisine preferences offered by the trip form.
//!
//! The enum covers the reference choices and stays open through
//! [`CuisinePreference::Custom`].
//!
//! # Examples
//! ```
//! use waymeal_core::CuisinePreference;
//!
//! assert_eq!(CuisinePreference::Italian.as_filter(), "italian");
//! assert_eq!(CuisinePreference::NoPreference.as_filter(), "");
//! ```

/// A cuisine filter applied to restaurant `cuisine` tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CuisinePreference {
    /// Accept any restaurant that carries a cuisine tag.
    #[default]
    NoPreference,
    /// Regional cooking.
    Regional,
    /// Italian cooking.
    Italian,
    /// Chinese cooking.
    Chinese,
    /// Indian cooking.
    Indian,
    /// German cooking.
    German,
    /// French cooking.
    French,
    /// Any other OpenStreetMap cuisine value.
    Custom(String),
}

impl CuisinePreference {
    /// The substring matched against restaurant cuisine tags.
    ///
    /// The empty string means "no preference": it is a substring of every
    /// tag, so no special case is needed downstream.
    #[must_use]
    pub fn as_filter(&self) -> &str {
        match self {
            Self::NoPreference => "",
            Self::Regional => "regional",
            Self::Italian => "italian",
            Self::Chinese => "chinese",
            Self::Indian => "indian",
            Self::German => "german",
            Self::French => "french",
            Self::Custom(tag) => tag,
        }
    }
}

impl std::fmt::Display for CuisinePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPreference => f.write_str("any"),
            other => f.write_str(other.as_filter()),
        }
    }
}

impl std::str::FromStr for CuisinePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "any" | "none" | "no-preference" => Ok(Self::NoPreference),
            "regional" => Ok(Self::Regional),
            "italian" => Ok(Self::Italian),
            "chinese" => Ok(Self::Chinese),
            "indian" => Ok(Self::Indian),
            "german" => Ok(Self::German),
            "french" => Ok(Self::French),
            _ if trimmed.contains(char::is_whitespace) => {
                Err(format!("unknown cuisine '{trimmed}'"))
            }
            _ => Ok(Self::Custom(trimmed.to_owned())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CuisinePreference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CuisinePreference {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
