//! Local file collision policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when a downloaded file's target path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Replace the local file unconditionally (default).
    #[default]
    #[serde(rename = "overwrite.local")]
    OverwriteLocal,
    /// Leave the local file alone and skip the download.
    #[serde(rename = "keep.local")]
    KeepLocal,
    /// Keep the local file and write the download under a numbered name.
    #[serde(rename = "keep.both")]
    KeepBoth,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::OverwriteLocal => write!(f, "overwrite.local"),
            CollisionPolicy::KeepLocal => write!(f, "keep.local"),
            CollisionPolicy::KeepBoth => write!(f, "keep.both"),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite.local" | "overwrite" => Ok(CollisionPolicy::OverwriteLocal),
            "keep.local" => Ok(CollisionPolicy::KeepLocal),
            "keep.both" => Ok(CollisionPolicy::KeepBoth),
            _ => Err(format!("Unknown collision policy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            "overwrite.local".parse::<CollisionPolicy>().unwrap(),
            CollisionPolicy::OverwriteLocal
        );
        assert_eq!(
            "Keep.Both".parse::<CollisionPolicy>().unwrap(),
            CollisionPolicy::KeepBoth
        );
        assert!("replace".parse::<CollisionPolicy>().is_err());
    }

    #[test]
    fn test_policy_toml_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: CollisionPolicy,
        }

        let w: Wrapper = toml::from_str(r#"policy = "keep.local""#).unwrap();
        assert_eq!(w.policy, CollisionPolicy::KeepLocal);
        assert_eq!(CollisionPolicy::default().to_string(), "overwrite.local");
    }
}
