use crate::foundation::error::{PhysclipError, PhysclipResult};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Material family, one per actor surface kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    Object,
    Wall,
    Floor,
}

/// Named material with the flat color used by the headless capture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub category: MaterialCategory,
    pub rgb: [u8; 3],
}

/// Materials available to the parameter generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
}

const BUILTIN: &[(&str, MaterialCategory, [u8; 3])] = &[
    ("BlackMetal", MaterialCategory::Object, [38, 38, 44]),
    ("BluePlastic", MaterialCategory::Object, [40, 90, 200]),
    ("GreenRubber", MaterialCategory::Object, [50, 160, 70]),
    ("OrangeClay", MaterialCategory::Object, [220, 120, 40]),
    ("RedPaint", MaterialCategory::Object, [190, 40, 40]),
    ("WhiteMarble", MaterialCategory::Object, [235, 232, 225]),
    ("YellowFoam", MaterialCategory::Object, [230, 205, 60]),
    ("Brick", MaterialCategory::Wall, [150, 70, 55]),
    ("Concrete", MaterialCategory::Wall, [140, 140, 135]),
    ("Plaster", MaterialCategory::Wall, [200, 195, 180]),
    ("Wallpaper", MaterialCategory::Wall, [170, 150, 190]),
    ("Carpet", MaterialCategory::Floor, [110, 60, 60]),
    ("Parquet", MaterialCategory::Floor, [160, 115, 70]),
    ("Stone", MaterialCategory::Floor, [120, 118, 110]),
    ("Tiles", MaterialCategory::Floor, [190, 190, 200]),
];

impl MaterialCatalog {
    pub fn builtin() -> Self {
        Self {
            materials: BUILTIN
                .iter()
                .map(|&(name, category, rgb)| Material {
                    name: name.to_string(),
                    category,
                    rgb,
                })
                .collect(),
        }
    }

    pub fn from_materials(materials: Vec<Material>) -> PhysclipResult<Self> {
        for category in [
            MaterialCategory::Object,
            MaterialCategory::Wall,
            MaterialCategory::Floor,
        ] {
            if !materials.iter().any(|m| m.category == category) {
                return Err(PhysclipError::validation(format!(
                    "material catalog has no {category:?} material"
                )));
            }
        }
        Ok(Self { materials })
    }

    pub fn in_category(&self, category: MaterialCategory) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(move |m| m.category == category)
    }

    /// Pick a material of `category` uniformly.
    pub fn random(&self, category: MaterialCategory, rng: &mut dyn RngCore) -> &str {
        let n = self.in_category(category).count();
        let i = rng.random_range(0..n.max(1));
        self.in_category(category)
            .nth(i)
            .map(|m| m.name.as_str())
            .unwrap_or("Default")
    }

    /// Flat color of a material; unknown names get a grey.
    pub fn color(&self, name: &str) -> [u8; 3] {
        self.materials
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.rgb)
            .unwrap_or([128, 128, 128])
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
