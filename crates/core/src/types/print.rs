//! Print parameters: materials, colors, and model dimensions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a material or color name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// What was being parsed ("material" or "color").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Print material, as accepted by the quote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Material {
    /// Polylactic acid, the default for new quotes.
    #[default]
    Pla,
    /// Acrylonitrile butadiene styrene.
    Abs,
    /// Polyethylene terephthalate glycol.
    Petg,
    /// Stereolithography resin.
    Resin,
}

impl Material {
    /// Wire name sent in form fields (e.g. `"PLA"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pla => "PLA",
            Self::Abs => "ABS",
            Self::Petg => "PETG",
            Self::Resin => "RESIN",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Material {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLA" => Ok(Self::Pla),
            "ABS" => Ok(Self::Abs),
            "PETG" => Ok(Self::Petg),
            "RESIN" => Ok(Self::Resin),
            _ => Err(ParseEnumError {
                kind: "material",
                value: s.to_string(),
            }),
        }
    }
}

/// Print color, as accepted by the quote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    /// Default for new quotes.
    #[default]
    White,
    Black,
    Gray,
    Blue,
    Red,
}

impl Color {
    /// Wire name sent in form fields (e.g. `"WHITE"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "WHITE",
            Self::Black => "BLACK",
            Self::Gray => "GRAY",
            Self::Blue => "BLUE",
            Self::Red => "RED",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Color {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WHITE" => Ok(Self::White),
            "BLACK" => Ok(Self::Black),
            "GRAY" => Ok(Self::Gray),
            "BLUE" => Ok(Self::Blue),
            "RED" => Ok(Self::Red),
            _ => Err(ParseEnumError {
                kind: "color",
                value: s.to_string(),
            }),
        }
    }
}

/// Bounding-box dimensions of a model, in millimeters.
///
/// Measured by the quote service, never by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Decimal,
    pub length: Decimal,
    pub height: Decimal,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} x {} mm", self.width, self.length, self.height)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_material_wire_names() {
        assert_eq!(Material::Pla.as_str(), "PLA");
        assert_eq!(Material::default(), Material::Pla);
        assert_eq!("petg".parse::<Material>().unwrap(), Material::Petg);
        assert!("wood".parse::<Material>().is_err());
    }

    #[test]
    fn test_color_wire_names() {
        assert_eq!(Color::default().as_str(), "WHITE");
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
    }

    #[test]
    fn test_material_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Material::Pla).unwrap(), "\"PLA\"");
        let color: Color = serde_json::from_str("\"WHITE\"").unwrap();
        assert_eq!(color, Color::White);
    }
}
