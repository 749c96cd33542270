//! Numerical frameworks that can be probed for accelerator support.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::ValidationError;

/// The closed set of probe-able frameworks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    #[strum(to_string = "torch")]
    Torch,
    #[strum(to_string = "tensorflow")]
    TensorFlow,
}

impl Framework {
    /// Name used in user-facing messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Torch => "PyTorch",
            Self::TensorFlow => "TensorFlow",
        }
    }
}

impl FromStr for Framework {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "torch" | "pytorch" => Ok(Self::Torch),
            "tensorflow" | "tf" => Ok(Self::TensorFlow),
            _ => Err(ValidationError::UnsupportedFramework(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("torch".parse::<Framework>().unwrap(), Framework::Torch);
        assert_eq!("PyTorch".parse::<Framework>().unwrap(), Framework::Torch);
        assert_eq!("tf".parse::<Framework>().unwrap(), Framework::TensorFlow);
        assert!(matches!(
            "jax".parse::<Framework>(),
            Err(ValidationError::UnsupportedFramework(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for framework in Framework::iter() {
            assert_eq!(framework.to_string().parse::<Framework>().unwrap(), framework);
        }
    }

    #[test]
    fn test_default_is_torch() {
        assert_eq!(Framework::default(), Framework::Torch);
    }
}
