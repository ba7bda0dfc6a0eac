//! Static content: brew methods with their default recipes, bean origins,
//! tasting notes and latte-art tutorials.

use serde::{Deserialize, Serialize};

use crate::brew::{BrewStep, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// `(time_start, duration, action, description, water grams)`
type StepSpec = (u32, u32, &'static str, &'static str, Option<f64>);

#[derive(Debug, Clone, Serialize)]
pub struct BrewMethod {
    pub id: &'static str,
    pub name: &'static str,
    pub image: &'static str,
    pub difficulty: MethodDifficulty,
    pub body: Body,
    pub description: &'static str,
    #[serde(skip)]
    defaults: Defaults,
}

#[derive(Debug, Clone)]
struct Defaults {
    coffee: f64,
    water: f64,
    temp: f64,
    grind: &'static str,
    ratio: &'static str,
    description: &'static str,
    flavor: &'static str,
    steps: &'static [StepSpec],
}

impl BrewMethod {
    /// A fresh copy of this method's house recipe.
    pub fn default_recipe(&self) -> Recipe {
        let d = &self.defaults;
        Recipe {
            id: None,
            date_saved: None,
            method: self.name.to_string(),
            coffee_amount: d.coffee,
            water_amount: d.water,
            water_temp: d.temp,
            grind_size: d.grind.to_string(),
            ratio: d.ratio.to_string(),
            steps: d
                .steps
                .iter()
                .map(|&(start, duration, action, description, water)| BrewStep {
                    time_start: start,
                    duration,
                    action: action.to_string(),
                    description: description.to_string(),
                    water_amount: water,
                })
                .collect(),
            description: d.description.to_string(),
            flavor_expectation: d.flavor.to_string(),
        }
    }
}

pub static BREW_METHODS: &[BrewMethod] = &[
    BrewMethod {
        id: "v60",
        name: "Hario V60",
        image: "https://images.unsplash.com/photo-1555396273-367ea4eb4db5?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Medium,
        body: Body::Light,
        description: "A cone-shaped dripper that highlights acidity and floral notes. Great for light roasts.",
        defaults: Defaults {
            coffee: 20.0,
            water: 320.0,
            temp: 94.0,
            grind: "Medium-Fine",
            ratio: "1:16",
            description: "The standard 2-pour technique. Provides a balanced cup with good clarity and sweetness.",
            flavor: "Clean, floral, acidic",
            steps: &[
                (0, 45, "Bloom", "Pour 40g of water ensuring all grounds are wet. Swirl gently.", Some(40.0)),
                (45, 30, "First Pour", "Pour in concentric circles up to 200g total weight.", Some(200.0)),
                (75, 30, "Second Pour", "Gently pour the remaining water up to 320g.", Some(320.0)),
                (105, 60, "Draw Down", "Allow the water to drain completely through the coffee bed.", None),
            ],
        },
    },
    BrewMethod {
        id: "french_press",
        name: "French Press",
        image: "https://images.unsplash.com/photo-1556742502-ec7c0e9f34b1?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Easy,
        body: Body::Heavy,
        description: "Immersion brewing that produces a rich, full-bodied cup. Excellent for medium to dark roasts.",
        defaults: Defaults {
            coffee: 30.0,
            water: 500.0,
            temp: 95.0,
            grind: "Coarse",
            ratio: "1:16",
            description: "The classic immersion method for a rich, full-bodied cup. Patience is key here.",
            flavor: "Rich, textured, chocolatey",
            steps: &[
                (0, 60, "Pour", "Pour all 500g of water vigorously to ensure all grounds are wet.", Some(500.0)),
                (60, 240, "Steep", "Let the coffee sit undisturbed for 4 minutes.", None),
                (300, 30, "Break Crust", "Stir the surface crust gently with a spoon. Scoop off floating foam and grounds.", None),
                (330, 300, "Settle & Plunge", "Wait for grounds to settle (5-8 min total), then insert plunger and press gently.", None),
            ],
        },
    },
    BrewMethod {
        id: "aeropress",
        name: "AeroPress",
        image: "https://images.unsplash.com/photo-1519087532306-69970c679a97?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Medium,
        body: Body::Medium,
        description: "Versatile immersion and pressure brewer. Can mimic espresso or drip coffee.",
        defaults: Defaults {
            coffee: 15.0,
            water: 250.0,
            temp: 90.0,
            grind: "Medium",
            ratio: "1:16",
            description: "The standard upright method. Quick, clean, and impossible to mess up.",
            flavor: "Sweet, full-bodied, low acidity",
            steps: &[
                (0, 30, "Pour", "Pour 250g of water over the coffee.", Some(250.0)),
                (30, 10, "Stir", "Stir gently back and forth 3 times.", None),
                (40, 60, "Steep", "Insert plunger slightly to create a vacuum and let steep.", None),
                (100, 30, "Press", "Press the plunger down gently and steadily. Stop at the hiss.", None),
            ],
        },
    },
    BrewMethod {
        id: "chemex",
        name: "Chemex",
        image: "https://images.unsplash.com/photo-1595928642581-f50f4f3453a5?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Hard,
        body: Body::Light,
        description: "Thick filters result in an incredibly clean cup with highlighted sweetness.",
        defaults: Defaults {
            coffee: 30.0,
            water: 500.0,
            temp: 96.0,
            grind: "Medium-Coarse",
            ratio: "1:16",
            description: "A slow flow method that produces a tea-like body and highlights delicate notes.",
            flavor: "Clean, sweet, tea-like",
            steps: &[
                (0, 45, "Bloom", "Pour 60g water to wet grounds. Swirl.", Some(60.0)),
                (45, 60, "First Pour", "Pour in concentric circles to 300g.", Some(300.0)),
                (105, 60, "Second Pour", "Pour gently to 500g, avoiding the filter walls.", Some(500.0)),
                (165, 120, "Draw Down", "Let the water drain completely. Discard filter and serve.", None),
            ],
        },
    },
    BrewMethod {
        id: "moka_pot",
        name: "Moka Pot",
        image: "https://images.unsplash.com/photo-1520623351280-5a3d463d1a3a?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Medium,
        body: Body::Heavy,
        description: "Stovetop espresso maker. Produces strong, intense coffee.",
        defaults: Defaults {
            coffee: 18.0,
            water: 180.0,
            temp: 99.0,
            grind: "Fine",
            ratio: "1:10",
            description: "Classic stove-top espresso. Strong, intense, and syrupy.",
            flavor: "Intense, bittersweet, heavy body",
            steps: &[
                (0, 120, "Heat", "Place on low-medium heat with lid open.", None),
                (120, 60, "Extract", "Coffee will start to flow smoothly like honey.", None),
                (180, 10, "Stop", "When the flow becomes pale and bubbles rapidly (strombolian phase), run base under cold water to stop extraction.", None),
            ],
        },
    },
    BrewMethod {
        id: "espresso",
        name: "Espresso",
        image: "https://images.unsplash.com/photo-1515442261605-65987783cb6a?auto=format&fit=crop&w=600&q=80",
        difficulty: MethodDifficulty::Hard,
        body: Body::Heavy,
        description: "High pressure extraction. The base for lattes and cappuccinos.",
        defaults: Defaults {
            coffee: 18.0,
            water: 36.0,
            temp: 93.0,
            grind: "Fine (Espresso)",
            ratio: "1:2",
            description: "The golden standard double shot.",
            flavor: "Complex, concentrated, lingering finish",
            steps: &[
                (0, 5, "Pre-infusion", "Saturate puck with low pressure.", None),
                (5, 25, "Extract", "Pull shot at 9 bars of pressure. Aim for steady mouse-tail flow.", None),
            ],
        },
    },
];

pub static ORIGINS: &[&str] = &[
    "Ethiopia", "Colombia", "Brazil", "Kenya", "Guatemala", "Costa Rica", "Indonesia", "Rwanda", "Panama",
];

pub static TASTING_NOTES: &[&str] = &[
    "Chocolate", "Nutty", "Caramel", "Berry", "Citrus", "Floral", "Spicy", "Earthy", "Stone Fruit", "Vanilla",
];

/// Find a method by id or display name, ignoring case.
pub fn find_method(key: &str) -> Option<&'static BrewMethod> {
    let key = key.trim();
    BREW_METHODS
        .iter()
        .find(|m| m.id.eq_ignore_ascii_case(key) || m.name.eq_ignore_ascii_case(key))
}

/// A latte-art tutorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatteArtPattern {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_saved: Option<i64>,
    pub name: String,
    pub difficulty: ArtDifficulty,
    pub description: String,
    pub steps: Vec<String>,
    pub video_prompt: String,
    pub image: String,
}

struct ArtSpec {
    id: &'static str,
    name: &'static str,
    difficulty: ArtDifficulty,
    description: &'static str,
    image: &'static str,
    steps: &'static [&'static str],
    video_prompt: &'static str,
}

impl ArtSpec {
    fn to_pattern(&self) -> LatteArtPattern {
        LatteArtPattern {
            id: self.id.to_string(),
            date_saved: None,
            name: self.name.to_string(),
            difficulty: self.difficulty,
            description: self.description.to_string(),
            steps: self.steps.iter().map(|s| s.to_string()).collect(),
            video_prompt: self.video_prompt.to_string(),
            image: self.image.to_string(),
        }
    }
}

static LATTE_ART: &[ArtSpec] = &[
    ArtSpec {
        id: "monks_head",
        name: "The Monk's Head",
        difficulty: ArtDifficulty::Beginner,
        description: "The foundation of all patterns. A solid white circle surrounded by a symmetric crema ring.",
        image: "https://images.unsplash.com/photo-1556742031-c6961e8560b0?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Tilt the cup 45 degrees.",
            "Pour from 5-7cm height into the center to mix milk and espresso (canvas building).",
            "When cup is 60% full, lower pitcher spout as close to surface as possible.",
            "Increase pour rate aggressively in the center.",
            "A white circle will bloom. Stop pouring and level the cup.",
        ],
        video_prompt: "Top down close up view of barista pouring milk into espresso. The milk forms a perfect solid white circle in the center of the dark brown crema. High contrast, cinematic lighting, 4k.",
    },
    ArtSpec {
        id: "heart",
        name: "The Heart",
        difficulty: ArtDifficulty::Beginner,
        description: "A classic symbol of coffee love. Mastering this unlocks the Rosetta and Tulip.",
        image: "https://images.unsplash.com/photo-1577968897966-3d4325b36b61?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Follow Monk's Head steps to create a white circle.",
            "Remain in the center until the circle is large.",
            "Lift the pitcher up 2 inches.",
            "Pour a thin stream while moving forward through the circle (the cut-through).",
            "This pulls the circle into a heart shape.",
        ],
        video_prompt: "Cinematic close up of a barista pouring a heart latte art pattern. Show the pitcher spout lowering, the white foam appearing, and the final pull-through that creates the heart tip. Slow motion, warm lighting.",
    },
    ArtSpec {
        id: "tulip",
        name: "The Tulip",
        difficulty: ArtDifficulty::Intermediate,
        description: "Multiple stacked hearts creating a floral appearance. Requires start-stop pouring control.",
        image: "https://images.unsplash.com/photo-1570968992193-96aa877477c7?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Create a small Monk's Head, then stop pouring.",
            "Move spout back slightly.",
            "Lower and pour again to push the first circle forward.",
            "Repeat 2-3 times to create layers.",
            "Lift and cut through all layers to finish.",
        ],
        video_prompt: "Macro video of pouring a stacked tulip latte art pattern. Distinct layers of white foam pushing into each other. Golden crema contrast. Professional barista technique.",
    },
    ArtSpec {
        id: "rosetta",
        name: "The Rosetta",
        difficulty: ArtDifficulty::Advanced,
        description: "A fern-like leaf pattern created by wiggling the pitcher while moving backwards.",
        image: "https://images.unsplash.com/photo-1497935586351-b67a49e012bf?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Establish base, then lower spout close to surface.",
            "Gently rock pitcher side-to-side while moving backward.",
            "This creates the leaves (ripples).",
            "At the top, pause to create the heart.",
            "Lift and pull through the center quickly to create the stem.",
        ],
        video_prompt: "Slow motion top down view of pouring a Rosetta latte art pattern. Rhythmic wiggling of the pitcher, white ripples forming in the cup. Elegant and smooth motion.",
    },
    ArtSpec {
        id: "swan",
        name: "The Swan",
        difficulty: ArtDifficulty::Advanced,
        description: "An elegant combination of a Rosetta base and a precise neck draw, creating a bird silhouette.",
        image: "https://images.unsplash.com/photo-1541167760496-1628856ab772?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Pour a Rosetta base, but place it slightly off-center.",
            "At the top of the Rosetta, lift the pitcher to stop the leaves.",
            "Pour a thin stream up the side of the Rosetta to create the neck (drag method).",
            "At the top of the neck, drop the spout close again to pour a small heart for the head.",
            "Lift and cut through the head to finish.",
        ],
        video_prompt: "Cinematic close up of pouring a Swan latte art pattern. Base rosetta forming, then the pitcher lifts to draw a thin neck line up the side, finishing with a small heart head. Elegant and artistic.",
    },
    ArtSpec {
        id: "winged_tulip",
        name: "The Winged Tulip",
        difficulty: ArtDifficulty::Advanced,
        description: "Combines the flow of a Rosetta with the structure of a Tulip. A wide base wraps around the central stack.",
        image: "https://images.unsplash.com/photo-1559496417-e7f25cb247f3?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Start with a Rosetta motion to create a wide, wrapping base.",
            "Stop pouring, then move spout to the center of the base.",
            "Pour a standard Tulip stack (2-3 layers) inside the wings.",
            "Lift and cut through all layers to connect the design.",
        ],
        video_prompt: "Macro top-down view of a Winged Tulip pour. Wide, flowing white wings wrapping around a central stack of distinct hearts. High contrast espresso canvas.",
    },
    ArtSpec {
        id: "seahorse",
        name: "The Seahorse",
        difficulty: ArtDifficulty::Advanced,
        description: "A whimsical creature created by distorting a Rosetta neck. Features a curved body and detailed snout.",
        image: "https://images.unsplash.com/photo-1578314675249-a6910f80cc4e?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Pour a curved Rosetta base, favoring one side of the cup.",
            "Drag the stream up the concave side to form the back.",
            "Stop at the top, then pour a small heart for the head.",
            "Drag the stream forward to create the snout.",
        ],
        video_prompt: "Top down view of pouring a Seahorse latte art pattern. Curved rosetta body, distinct head pour, and snout detail. High contrast and playful.",
    },
    ArtSpec {
        id: "phoenix",
        name: "The Phoenix",
        difficulty: ArtDifficulty::Advanced,
        description: "A majestic double-wing design surrounding a central body. Requires perfect symmetry and flow control.",
        image: "https://images.unsplash.com/photo-1459755486867-b55449bb39ff?auto=format&fit=crop&w=600&q=80",
        steps: &[
            "Pour a wide, wrapping Rosetta base for the outer wings.",
            "Pour a second, smaller inner Rosetta for inner feathers.",
            "Stack a central Tulip for the bird's body.",
            "Finish with a heart for the head and a sharp cut-through.",
        ],
        video_prompt: "Cinematic close-up of pouring a Phoenix latte art design. Wide wrapping wings, central body stack, and precise symmetry. Professional barista competition style.",
    },
];

pub fn latte_art_patterns() -> Vec<LatteArtPattern> {
    LATTE_ART.iter().map(ArtSpec::to_pattern).collect()
}

pub fn find_latte_art(key: &str) -> Option<LatteArtPattern> {
    let key = key.trim();
    LATTE_ART
        .iter()
        .find(|a| a.id.eq_ignore_ascii_case(key) || a.name.eq_ignore_ascii_case(key))
        .map(ArtSpec::to_pattern)
}
