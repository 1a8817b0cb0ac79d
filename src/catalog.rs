//! Obstacle templates and random spawning.

use log::debug;
use rand::Rng;

use crate::entities::{Entity, Field, DAMAGE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Template {
    pub width: f64,
    pub height: f64,
    pub image: &'static str,
    pub strength: i32,
}

const HEAL: i32 = 20;

/// Trash hurts, animals help.
pub const CATALOG: [Template; 10] = [
    Template { width: 70.0, height: 79.0, image: "bag.png", strength: DAMAGE },
    Template { width: 25.0, height: 65.0, image: "bottle.png", strength: DAMAGE },
    Template { width: 96.0, height: 62.0, image: "stone.png", strength: DAMAGE },
    Template { width: 45.0, height: 62.0, image: "dog.png", strength: HEAL },
    Template { width: 45.0, height: 70.0, image: "girafe.png", strength: HEAL },
    Template { width: 45.0, height: 48.0, image: "kenguru.png", strength: HEAL },
    Template { width: 45.0, height: 42.0, image: "horse.png", strength: HEAL },
    Template { width: 45.0, height: 48.0, image: "lion.png", strength: HEAL },
    Template { width: 45.0, height: 44.0, image: "panthera.png", strength: HEAL },
    Template { width: 45.0, height: 46.0, image: "sheep.png", strength: HEAL },
];

/// Largest template extent on each axis, used to validate field sizes.
pub fn max_template_size() -> (f64, f64) {
    CATALOG
        .iter()
        .fold((0.0, 0.0), |(w, h), t| (f64::max(w, t.width), f64::max(h, t.height)))
}

impl Template {
    /// Place this template at the right edge, at vertical offset `y`.
    pub fn instantiate(&self, field: &Field, y: f64) -> Entity {
        Entity {
            width: self.width,
            height: self.height,
            image: self.image,
            x: field.width,
            y,
            strength: self.strength,
        }
    }
}

/// Pick a template uniformly and place it just off the right edge with a
/// random vertical offset in `[0, field.height - template.height)`.
pub fn spawn_random(rng: &mut impl Rng, field: &Field) -> Entity {
    let template = &CATALOG[rng.gen_range(0..CATALOG.len())];
    let span = (field.height - template.height).max(0.0);
    let y = rng.gen::<f64>() * span;
    debug!("spawn {} at y={:.1}", template.image, y);
    template.instantiate(field, y)
}
