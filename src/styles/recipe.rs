use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// An opaque sRGB color authored as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` literal
    pub const fn from_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parse `#RRGGBB` or `#RGB`
    pub fn from_hex(value: &str) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidColor { value: value.to_string() };
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Which half of the face a paired feature sits on, in image space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for the left side, +1 for the right side
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Category-wide colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

fn default_outline_opacity() -> f32 {
    0.5
}

fn default_line_width() -> f32 {
    1.0
}

fn default_tiger_thickness() -> f32 {
    3.0
}

/// Base wash over the whole face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceOutline {
    /// Falls back to the palette's primary color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(default = "default_outline_opacity")]
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyebrowStyle {
    Straight,
    Curved,
    Upturned,
    Phoenix,
}

impl EyebrowStyle {
    /// How many stroke widths the curve control point rises above the segment
    pub fn arch_factor(self) -> f32 {
        match self {
            EyebrowStyle::Straight => 0.0,
            EyebrowStyle::Curved => 2.0,
            EyebrowStyle::Upturned => 3.0,
            EyebrowStyle::Phoenix => 4.0,
        }
    }

    /// Horizontal shift of the control point, mirrored per side
    pub fn lateral_offset(self, side: Side) -> f32 {
        match self {
            EyebrowStyle::Phoenix => 10.0 * side.sign(),
            _ => 0.0,
        }
    }

    pub fn is_curved(self) -> bool {
        !matches!(self, EyebrowStyle::Straight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eyebrows {
    pub style: EyebrowStyle,
    pub color: Color,
    pub thickness: f32,

    /// Authored brow length as a fraction of face width
    #[serde(default)]
    pub length: f32,

    /// Authored tilt in degrees
    #[serde(default)]
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EyeDecoration {
    /// Upper and lower lid lines
    Liner { color: Color, thickness: f32 },

    /// Soft radial shadow around the eye center
    Shadow {
        color: Color,
        #[serde(alias = "thickness")]
        radius: f32,
    },

    /// Flick outward from the eye center ending in a dot
    Dramatic { color: Color, thickness: f32 },

    /// Almond outline with a swept tail
    PhoenixEye {
        color: Color,
        #[serde(default = "default_line_width")]
        thickness: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchShape {
    Oval,
    #[default]
    Round,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoseDecoration {
    WhitePatch {
        color: Color,
        size: f32,
        #[serde(default)]
        shape: PatchShape,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blush {
    pub color: Color,
    pub opacity: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum MouthDecoration {
    Exaggerated { color: Color, thickness: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum ForeheadDecoration {
    Tiger {
        color: Color,
        #[serde(default = "default_tiger_thickness")]
        thickness: f32,
    },
    Phoenix { color: Color, size: f32 },
    Moon { color: Color, size: f32 },
}

/// Per-feature sub-recipes; an absent section means the feature is not painted
///
/// The same shape doubles as an override patch, where a present section replaces the base
/// section wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_outline: Option<FaceOutline>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyebrows: Option<Eyebrows>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_decoration: Option<EyeDecoration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nose: Option<NoseDecoration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blush: Option<Blush>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth: Option<MouthDecoration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forehead: Option<ForeheadDecoration>,
}

/// Named landmark groups a recipe reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    LeftEyebrow,
    RightEyebrow,
    LeftEye,
    RightEye,
    Nose,
    Mouth,
    Forehead,
    Chin,
}

impl FeatureGroup {
    pub fn eyebrow(side: Side) -> Self {
        match side {
            Side::Left => FeatureGroup::LeftEyebrow,
            Side::Right => FeatureGroup::RightEyebrow,
        }
    }

    pub fn eye(side: Side) -> Self {
        match side {
            Side::Left => FeatureGroup::LeftEye,
            Side::Right => FeatureGroup::RightEye,
        }
    }
}

/// Feature name to ordered landmark indices
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_eyebrow: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_eyebrow: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_eye: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_eye: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nose: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forehead: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chin: Option<Vec<usize>>,
}

impl LandmarkMapping {
    pub fn group(&self, feature: FeatureGroup) -> Option<&[usize]> {
        let group = match feature {
            FeatureGroup::LeftEyebrow => &self.left_eyebrow,
            FeatureGroup::RightEyebrow => &self.right_eyebrow,
            FeatureGroup::LeftEye => &self.left_eye,
            FeatureGroup::RightEye => &self.right_eye,
            FeatureGroup::Nose => &self.nose,
            FeatureGroup::Mouth => &self.mouth,
            FeatureGroup::Forehead => &self.forehead,
            FeatureGroup::Chin => &self.chin,
        };
        group.as_deref()
    }

    pub fn has(&self, feature: FeatureGroup) -> bool {
        self.group(feature).is_some()
    }
}

/// Everything needed to paint one makeup category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecipe {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub colors: Palette,
    #[serde(default)]
    pub pattern: Pattern,
    #[serde(default)]
    pub landmark_mapping: LandmarkMapping,
}
