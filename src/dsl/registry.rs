use super::primitives::{self, PrimError};
use super::types::DslType;
use super::value::Value;
use std::collections::HashMap;

pub type ImplFn = fn(&[Value]) -> Result<Value, PrimError>;

/// A registry entry: name, full call signature (including the leading `input` the
/// interpreter may implicitly prepend), the implementation, documentation, and an
/// MDL cost contribution.
#[derive(Clone)]
pub struct PrimitiveSpec {
    pub name: &'static str,
    pub signature: DslType,
    pub implementation: ImplFn,
    pub doc: &'static str,
    pub cost: u32,
}

impl std::fmt::Debug for PrimitiveSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PrimitiveSpec")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("cost", &self.cost)
            .finish()
    }
}

/// An explicit, constructed-once, read-only handle over the set of known primitives.
/// Passed by reference into every component that needs to resolve a primitive by
/// name; there is no hidden global singleton.
#[derive(Debug, Clone)]
pub struct PrimitiveRegistry {
    specs: HashMap<&'static str, PrimitiveSpec>,
}

impl PrimitiveRegistry {
    pub fn get(&self, name: &str) -> Option<&PrimitiveSpec> {
        self.specs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn insert(&mut self, spec: PrimitiveSpec) {
        let prior = self.specs.insert(spec.name, spec);
        assert!(prior.is_none(), "primitive registered twice under the same name");
    }

    /// Builds the standard registry: every primitive named in the specification,
    /// including `scale` registered uniformly for factors 2, 3, and 4 (see DESIGN.md).
    pub fn standard() -> Self {
        let mut registry = PrimitiveRegistry {
            specs: HashMap::new(),
        };
        registry.insert(PrimitiveSpec {
            name: "identity",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::identity,
            doc: "returns the input grid unchanged",
            cost: 1,
        });
        registry.insert(PrimitiveSpec {
            name: "crop_to_content",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::crop_to_content,
            doc: "crops to the bounding box of non-background pixels",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "rotate90",
            signature: DslType::function(vec![DslType::Grid, DslType::Int], DslType::Grid),
            implementation: primitives::rotate90,
            doc: "rotates clockwise 90 degrees, n times",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "reflect_h",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::reflect_h,
            doc: "mirrors left-right",
            cost: 1,
        });
        registry.insert(PrimitiveSpec {
            name: "reflect_v",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::reflect_v,
            doc: "mirrors top-bottom",
            cost: 1,
        });
        registry.insert(PrimitiveSpec {
            name: "transpose",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::transpose,
            doc: "swaps rows and columns",
            cost: 1,
        });
        registry.insert(PrimitiveSpec {
            name: "scale",
            signature: DslType::function(vec![DslType::Grid, DslType::Int], DslType::Grid),
            implementation: primitives::scale,
            doc: "uniform 2D upscale by an integer factor (registered for 2, 3, 4)",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "tile_h",
            signature: DslType::function(vec![DslType::Grid, DslType::Int], DslType::Grid),
            implementation: primitives::tile_h,
            doc: "repeats the grid n times horizontally",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "tile_v",
            signature: DslType::function(vec![DslType::Grid, DslType::Int], DslType::Grid),
            implementation: primitives::tile_v,
            doc: "repeats the grid n times vertically",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "tile_repeat",
            signature: DslType::function(
                vec![DslType::Grid, DslType::Int, DslType::Int],
                DslType::Grid,
            ),
            implementation: primitives::tile_repeat,
            doc: "repeats the grid rows x cols times",
            cost: 3,
        });
        registry.insert(PrimitiveSpec {
            name: "fill_background",
            signature: DslType::function(vec![DslType::Grid, DslType::Color], DslType::Grid),
            implementation: primitives::fill_background,
            doc: "replaces background (0) cells with the given color",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "invert_mask",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::invert_mask,
            doc: "swaps foreground and background",
            cost: 2,
        });
        registry.insert(PrimitiveSpec {
            name: "recolor_map",
            signature: DslType::function(vec![DslType::Grid, DslType::ColorMap], DslType::Grid),
            implementation: primitives::recolor_map,
            doc: "remaps each cell's color through the given mapping",
            cost: 3,
        });
        registry.insert(PrimitiveSpec {
            name: "translate",
            signature: DslType::function(
                vec![DslType::Grid, DslType::Int, DslType::Int],
                DslType::Grid,
            ),
            implementation: primitives::translate,
            doc: "shifts content by (dx, dy), zero-filling vacated cells",
            cost: 2,
        });
        registry
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_every_documented_primitive() {
        let registry = PrimitiveRegistry::standard();
        for name in [
            "identity",
            "crop_to_content",
            "rotate90",
            "reflect_h",
            "reflect_v",
            "transpose",
            "scale",
            "tile_h",
            "tile_v",
            "tile_repeat",
            "fill_background",
            "invert_mask",
            "recolor_map",
            "translate",
        ] {
            assert!(registry.get(name).is_some(), "missing primitive {name}");
        }
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn double_registration_panics() {
        let mut registry = PrimitiveRegistry::standard();
        registry.insert(PrimitiveSpec {
            name: "identity",
            signature: DslType::function(vec![DslType::Grid], DslType::Grid),
            implementation: primitives::identity,
            doc: "dup",
            cost: 1,
        });
    }
}
