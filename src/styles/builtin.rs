//! Hand-authored recipes shipped with the crate.
//!
//! Four role categories (sheng, dan, jing, chou) and three historical characters painted as jing
//! variants. Character tags that have no dedicated geometry are authored with the closest variant:
//! Bao Zheng's sword brows are straight, Cao Cao's slanted brows are upturned, and both characters'
//! stern/sly eyes are lid liners.

use super::overrides::{Character, PartialPalette, PartialStyleRecipe};
use super::recipe::{
    Blush, Color, EyeDecoration, EyebrowStyle, Eyebrows, FaceOutline, ForeheadDecoration,
    LandmarkMapping, MouthDecoration, NoseDecoration, Palette, PatchShape, Pattern, StyleRecipe,
};

const LEFT_EYEBROW: [usize; 6] = [70, 107, 66, 105, 63, 70];
const RIGHT_EYEBROW: [usize; 6] = [300, 336, 296, 334, 293, 300];
const LEFT_EYE: [usize; 8] = [33, 133, 155, 154, 153, 145, 144, 163];
const RIGHT_EYE: [usize; 8] = [263, 362, 384, 385, 386, 387, 388, 390];
const NOSE: [usize; 10] = [1, 2, 3, 4, 5, 6, 168, 197, 195, 5];
const MOUTH: [usize; 20] = [
    13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95, 78, 191, 80, 81, 82,
];
const FOREHEAD: [usize; 8] = [10, 109, 67, 103, 54, 21, 162, 127];
const CHIN: [usize; 8] = [152, 377, 400, 378, 379, 365, 397, 288];

const fn hex(value: u32) -> Color {
    Color::from_u32(value)
}

fn palette(primary: u32, secondary: u32, accent: u32) -> Palette {
    Palette {
        primary: hex(primary),
        secondary: hex(secondary),
        accent: hex(accent),
    }
}

fn outline(color: u32, opacity: f32) -> Option<FaceOutline> {
    Some(FaceOutline { color: Some(hex(color)), opacity })
}

fn brows(style: EyebrowStyle, color: u32, thickness: f32, length: f32, angle: f32) -> Option<Eyebrows> {
    Some(Eyebrows { style, color: hex(color), thickness, length, angle })
}

fn face_mapping() -> LandmarkMapping {
    LandmarkMapping {
        left_eyebrow: Some(LEFT_EYEBROW.to_vec()),
        right_eyebrow: Some(RIGHT_EYEBROW.to_vec()),
        left_eye: Some(LEFT_EYE.to_vec()),
        right_eye: Some(RIGHT_EYE.to_vec()),
        nose: Some(NOSE.to_vec()),
        mouth: Some(MOUTH.to_vec()),
        forehead: None,
        chin: None,
    }
}

fn sheng() -> StyleRecipe {
    StyleRecipe {
        category: "sheng".to_string(),
        name: "Sheng".to_string(),
        description: "Upright male leads; a restrained face with clean brows and bright eyes.".to_string(),
        colors: palette(0xF5DEB3, 0x8B4513, 0xDC143C),
        pattern: Pattern {
            face_outline: outline(0xF5DEB3, 0.3),
            eyebrows: brows(EyebrowStyle::Straight, 0x8B4513, 6.0, 0.15, 0.0),
            eye_decoration: Some(EyeDecoration::Liner { color: hex(0x654321), thickness: 2.0 }),
            blush: Some(Blush { color: hex(0xFFB6C1), opacity: 0.4, size: 15.0 }),
            ..Default::default()
        },
        landmark_mapping: face_mapping(),
    }
}

fn dan() -> StyleRecipe {
    StyleRecipe {
        category: "dan".to_string(),
        name: "Dan".to_string(),
        description: "Female roles; soft washes, arched brows and rosy cheeks.".to_string(),
        colors: palette(0xFFE4E1, 0xFFB6C1, 0xFF69B4),
        pattern: Pattern {
            face_outline: outline(0xFFE4E1, 0.4),
            eyebrows: brows(EyebrowStyle::Curved, 0x8B4513, 3.0, 0.12, 15.0),
            eye_decoration: Some(EyeDecoration::Shadow { color: hex(0xFFB6C1), radius: 8.0 }),
            blush: Some(Blush { color: hex(0xFF69B4), opacity: 0.6, size: 18.0 }),
            ..Default::default()
        },
        landmark_mapping: face_mapping(),
    }
}

fn jing() -> StyleRecipe {
    StyleRecipe {
        category: "jing".to_string(),
        name: "Jing".to_string(),
        description: "Painted-face roles of strong character; saturated color and bold patterns.".to_string(),
        colors: palette(0x4169E1, 0x000080, 0xFFD700),
        pattern: Pattern {
            face_outline: outline(0x4169E1, 0.7),
            eyebrows: brows(EyebrowStyle::Upturned, 0x000000, 10.0, 0.2, 30.0),
            eye_decoration: Some(EyeDecoration::Dramatic { color: hex(0xFFD700), thickness: 5.0 }),
            forehead: Some(ForeheadDecoration::Tiger { color: hex(0x000000), thickness: 4.0 }),
            ..Default::default()
        },
        landmark_mapping: LandmarkMapping {
            forehead: Some(FOREHEAD.to_vec()),
            chin: Some(CHIN.to_vec()),
            ..face_mapping()
        },
    }
}

fn chou() -> StyleRecipe {
    StyleRecipe {
        category: "chou".to_string(),
        name: "Chou".to_string(),
        description: "Clowns; a white patch over the nose and an exaggerated grin.".to_string(),
        colors: palette(0xFFFFFF, 0xFFA500, 0xFF0000),
        pattern: Pattern {
            face_outline: outline(0xFFA500, 0.5),
            eyebrows: brows(EyebrowStyle::Curved, 0x000000, 5.0, 0.1, 45.0),
            nose: Some(NoseDecoration::WhitePatch {
                color: hex(0xFFFFFF),
                size: 30.0,
                shape: PatchShape::Oval,
            }),
            mouth: Some(MouthDecoration::Exaggerated { color: hex(0xDC143C), thickness: 8.0 }),
            ..Default::default()
        },
        landmark_mapping: face_mapping(),
    }
}

/// All built-in role categories
pub fn categories() -> Vec<StyleRecipe> {
    vec![sheng(), dan(), jing(), chou()]
}

fn customizations(colors: (u32, u32, u32), pattern: Pattern) -> PartialStyleRecipe {
    PartialStyleRecipe {
        colors: Some(PartialPalette {
            primary: Some(hex(colors.0)),
            secondary: Some(hex(colors.1)),
            accent: Some(hex(colors.2)),
        }),
        pattern: Some(pattern),
        ..Default::default()
    }
}

/// All built-in historical characters, keyed by character id
pub fn characters() -> Vec<(String, Character)> {
    let guanyu = Character {
        name: "Guan Yu".to_string(),
        base_type: "jing".to_string(),
        description: "Three Kingdoms general famed for loyalty; a red face for courage.".to_string(),
        customizations: customizations(
            (0xDC143C, 0x8B0000, 0x000000),
            Pattern {
                face_outline: outline(0xDC143C, 0.8),
                eyebrows: brows(EyebrowStyle::Phoenix, 0x000000, 12.0, 0.0, 0.0),
                eye_decoration: Some(EyeDecoration::PhoenixEye { color: hex(0xFFD700), thickness: 1.0 }),
                forehead: Some(ForeheadDecoration::Phoenix { color: hex(0xFFD700), size: 40.0 }),
                ..Default::default()
            },
        ),
    };

    let baozheng = Character {
        name: "Bao Zheng".to_string(),
        base_type: "jing".to_string(),
        description: "Song dynasty judge known for incorruptibility; a black face with a crescent moon.".to_string(),
        customizations: customizations(
            (0x000000, 0x2F4F4F, 0xFFFFFF),
            Pattern {
                face_outline: outline(0x000000, 0.9),
                eyebrows: brows(EyebrowStyle::Straight, 0xFFFFFF, 8.0, 0.0, 0.0),
                eye_decoration: Some(EyeDecoration::Liner { color: hex(0xFFFFFF), thickness: 2.0 }),
                forehead: Some(ForeheadDecoration::Moon { color: hex(0xFFFFFF), size: 25.0 }),
                ..Default::default()
            },
        ),
    };

    let caocao = Character {
        name: "Cao Cao".to_string(),
        base_type: "jing".to_string(),
        description: "Three Kingdoms statesman; a white face for cunning and suspicion.".to_string(),
        customizations: customizations(
            (0xFFFFFF, 0xF5F5DC, 0x8B4513),
            Pattern {
                face_outline: outline(0xFFFFFF, 0.7),
                eyebrows: brows(EyebrowStyle::Upturned, 0x000000, 6.0, 0.0, 20.0),
                eye_decoration: Some(EyeDecoration::Liner { color: hex(0x8B4513), thickness: 3.0 }),
                ..Default::default()
            },
        ),
    };

    vec![
        ("guanyu".to_string(), guanyu),
        ("baozheng".to_string(), baozheng),
        ("caocao".to_string(), caocao),
    ]
}
