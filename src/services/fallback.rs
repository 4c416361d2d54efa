//! Static look table
//!
//! Served whenever remote generation is disabled or fails. Rules are checked in
//! order and the first predicate that matches the (occasion, mood) pair wins; the
//! last rule matches everything.

use crate::models::{
    ColorPalette, ColorSpec, LookRequest, MakeupLook, MakeupStep, Mood, Occasion,
};

/// One curated look, stored as static content
pub struct FallbackEntry {
    pub look_name: &'static str,
    pub vibe: &'static str,
    /// eyeshadow, eyeliner, lips, blush, brows as (hex, name, detail)
    pub palette: [(&'static str, &'static str, &'static str); 5],
    /// (area, instruction, tip)
    pub steps: [(&'static str, &'static str, &'static str); 6],
}

impl FallbackEntry {
    /// Builds a fresh look carrying the request's occasion and mood
    pub fn build(&self, request: &LookRequest) -> MakeupLook {
        let [eyeshadow, eyeliner, lips, blush, brows] =
            self.palette.map(|(hex, name, detail)| ColorSpec::new(hex, name, Some(detail)));

        let steps = self
            .steps
            .iter()
            .map(|(area, instruction, tip)| MakeupStep::new(area, instruction, Some(*tip)))
            .collect();

        MakeupLook::curated(
            self.look_name,
            self.vibe,
            request.occasion,
            request.mood,
            ColorPalette {
                eyeshadow,
                eyeliner,
                lips,
                blush,
                brows,
            },
            steps,
        )
    }
}

type Rule = (fn(Occasion, Mood) -> bool, &'static FallbackEntry);

static RULES: [Rule; 6] = [
    (
        |o, m| o == Occasion::DateNight && matches!(m, Mood::Confident | Mood::Bold),
        &SULTRY_SIREN,
    ),
    (|o, _| o == Occasion::Business, &POLISHED_PROFESSIONAL),
    (
        |o, m| o == Occasion::Party || (o == Occasion::Event && m == Mood::Bold),
        &GLAMOUR_NIGHT,
    ),
    (
        |o, m| o == Occasion::Casual && matches!(m, Mood::Fresh | Mood::Playful),
        &EFFORTLESS_GLOW,
    ),
    (|o, _| o == Occasion::Wedding, &ROMANTIC_ELEGANCE),
    (|_, _| true, &GOLDEN_HOUR_GLOW),
];

/// Picks the entry for an (occasion, mood) pair
pub fn select_entry(occasion: Occasion, mood: Mood) -> &'static FallbackEntry {
    RULES
        .iter()
        .find(|(matches, _)| matches(occasion, mood))
        .map(|(_, entry)| *entry)
        .unwrap_or(&GOLDEN_HOUR_GLOW)
}

/// Builds the static look for a request
pub fn fallback_look(request: &LookRequest) -> MakeupLook {
    select_entry(request.occasion, request.mood).build(request)
}

pub static SULTRY_SIREN: FallbackEntry = FallbackEntry {
    look_name: "Sultry Siren",
    vibe: "Bold & Seductive",
    palette: [
        ("8B4513", "Smoky Bronze", "shimmer"),
        ("000000", "Jet Black", "dramatic wing"),
        ("8B0000", "Deep Red", "matte"),
        ("DC143C", "Berry Flush", "contour"),
        ("3D2B1F", "Dark Brown", "defined"),
    ],
    steps: [
        (
            "Base",
            "Apply medium-coverage foundation for a flawless canvas. Contour cheekbones and jawline.",
            "Set with powder to ensure longevity",
        ),
        (
            "Eyes",
            "Apply bronze shimmer on lid, blend dark brown into crease. Build smoky effect at outer corner.",
            "Use tape for sharp outer edge",
        ),
        (
            "Eyeliner",
            "Create a dramatic winged liner, extending past outer corner.",
            "Draw wing first, then fill in",
        ),
        (
            "Lips",
            "Line lips with deep red liner, fill with matte lipstick. Blot and reapply.",
            "Use concealer around lips for crisp edges",
        ),
        (
            "Blush",
            "Apply berry blush below cheekbones in a draping technique.",
            "Blend upward toward temples",
        ),
        (
            "Highlight",
            "Apply highlight to high points: cheekbones, nose tip, cupid's bow.",
            "Use sparingly for sophistication",
        ),
    ],
};

pub static POLISHED_PROFESSIONAL: FallbackEntry = FallbackEntry {
    look_name: "Polished Professional",
    vibe: "Clean & Confident",
    palette: [
        ("D2B48C", "Soft Taupe", "matte"),
        ("4A3728", "Espresso", "subtle"),
        ("BC8F8F", "Rosy Mauve", "satin"),
        ("FFB6C1", "Soft Pink", "apples"),
        ("5D4E37", "Taupe Brown", "natural"),
    ],
    steps: [
        (
            "Base",
            "Apply light foundation or tinted moisturizer. Conceal under eyes and any blemishes.",
            "Keep it natural-looking",
        ),
        (
            "Eyes",
            "Apply soft taupe across lid, slightly darker shade in crease for definition.",
            "Blend well for seamless transition",
        ),
        (
            "Eyeliner",
            "Tightline upper waterline with espresso pencil. Optional: thin line on upper lid.",
            "Keep it subtle and professional",
        ),
        (
            "Lips",
            "Apply rosy mauve lipstick for a polished, put-together look.",
            "Blot for natural finish",
        ),
        (
            "Blush",
            "Apply soft pink blush to apples of cheeks.",
            "Smile and apply to the roundest part",
        ),
        (
            "Brows",
            "Fill in sparse areas with light strokes. Set with clear gel.",
            "Follow natural brow shape",
        ),
    ],
};

pub static GLAMOUR_NIGHT: FallbackEntry = FallbackEntry {
    look_name: "Glamour Night",
    vibe: "Sparkling & Festive",
    palette: [
        ("FFD700", "Gold Glitter", "shimmer"),
        ("000000", "Black", "winged"),
        ("FF69B4", "Hot Pink", "gloss"),
        ("FF6B6B", "Coral Pop", "apples"),
        ("3D2B1F", "Dark Brown", "defined"),
    ],
    steps: [
        (
            "Base",
            "Apply illuminating primer, then full-coverage foundation. Set with setting spray.",
            "Mix in liquid highlighter for all-over glow",
        ),
        (
            "Eyes",
            "Pack gold glitter onto center of lid. Blend darker shade into crease and outer corner.",
            "Use glitter glue for maximum payoff",
        ),
        (
            "Eyeliner",
            "Create bold winged liner. Add rhinestones at outer corner for extra glam.",
            "Waterproof formula is key for lasting wear",
        ),
        (
            "Lips",
            "Apply hot pink lip color topped with clear gloss for dimension.",
            "Apply lip plumper first for fuller look",
        ),
        (
            "Blush",
            "Apply coral blush to apples and blend up to temples.",
            "Layer for buildable color",
        ),
        (
            "Highlight",
            "Apply intense highlight to all high points. Add body shimmer to shoulders.",
            "Go bold - it's a party!",
        ),
    ],
};

pub static EFFORTLESS_GLOW: FallbackEntry = FallbackEntry {
    look_name: "Effortless Glow",
    vibe: "Fresh & Dewy",
    palette: [
        ("F5DEB3", "Champagne", "shimmer"),
        ("6B4423", "Brown", "smudged"),
        ("E8B4B8", "Nude Pink", "balm"),
        ("FFDAB9", "Peachy Nude", "cream"),
        ("8B7355", "Soft Brown", "feathered"),
    ],
    steps: [
        (
            "Base",
            "Apply tinted moisturizer or skin tint. Spot conceal only where needed.",
            "Less is more for everyday freshness",
        ),
        (
            "Eyes",
            "Sweep champagne shimmer across lid. Add touch of brown to outer corner.",
            "Use fingers for quick application",
        ),
        (
            "Eyeliner",
            "Smudge brown pencil along upper lash line. Skip if you prefer minimal.",
            "Blend with finger for soft effect",
        ),
        (
            "Lips",
            "Apply tinted lip balm in nude pink for healthy, hydrated lips.",
            "Reapply throughout the day",
        ),
        (
            "Blush",
            "Dab cream blush on cheeks and blend with fingers.",
            "Tap onto apples for natural flush",
        ),
        (
            "Brows",
            "Brush brows up with clear gel. Fill lightly if needed.",
            "Keep brows fluffy and natural",
        ),
    ],
};

pub static ROMANTIC_ELEGANCE: FallbackEntry = FallbackEntry {
    look_name: "Romantic Elegance",
    vibe: "Soft & Timeless",
    palette: [
        ("DEB887", "Rose Gold", "shimmer"),
        ("4A3728", "Soft Brown", "subtle wing"),
        ("CD5C5C", "Dusty Rose", "satin"),
        ("FFB6C1", "Soft Rose", "draping"),
        ("6B4423", "Warm Brown", "defined"),
    ],
    steps: [
        (
            "Base",
            "Apply long-wear foundation for all-day coverage. Set with fine setting powder.",
            "Use waterproof formulas for emotional moments",
        ),
        (
            "Eyes",
            "Apply rose gold shimmer on lid, soft brown in crease. Highlight inner corner and brow bone.",
            "Blend for soft, romantic effect",
        ),
        (
            "Eyeliner",
            "Create subtle wing with brown liner. Add individual false lashes for photos.",
            "Individual lashes look more natural",
        ),
        (
            "Lips",
            "Apply dusty rose lipstick. Blot and layer for lasting color.",
            "Bring lipstick for touch-ups",
        ),
        (
            "Blush",
            "Apply soft rose blush in draping technique for lifted look.",
            "Build gradually for photography",
        ),
        (
            "Highlight",
            "Apply subtle highlight to cheekbones and cupid's bow.",
            "Avoid glitter - opt for satin finish",
        ),
    ],
};

pub static GOLDEN_HOUR_GLOW: FallbackEntry = FallbackEntry {
    look_name: "Golden Hour Glow",
    vibe: "Warm & Radiant",
    palette: [
        ("C4956A", "Warm Bronze", "shimmer"),
        ("4A3728", "Deep Brown", "subtle wing"),
        ("B85C5C", "Dusty Rose", "satin"),
        ("E8A090", "Peach Glow", "apples"),
        ("5D4037", "Soft Brown", "feathered"),
    ],
    steps: [
        (
            "Base",
            "Apply light-coverage foundation, focusing on evening out skin tone.",
            "Use a damp beauty sponge",
        ),
        (
            "Eyes",
            "Apply warm bronze on lid, blend darker shade into crease.",
            "Build color gradually",
        ),
        (
            "Eyeliner",
            "Line upper lash line with brown liner, subtle wing.",
            "Keep wing short and angled up",
        ),
        (
            "Lips",
            "Apply dusty rose lipstick, blot and reapply.",
            "Use lip liner to prevent bleeding",
        ),
        (
            "Blush",
            "Apply peach blush to apples of cheeks.",
            "Start light, build up",
        ),
        (
            "Highlight",
            "Dab highlighter on cheekbones, brow bone, cupid's bow.",
            "Use fingers for natural placement",
        ),
    ],
};
