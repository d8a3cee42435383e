use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    SwapPrimitive,
    TweakArg,
    InsertPrimitive,
    RemovePrimitive,
    SwapOrder,
    TranslateTweak,
    RecolorTweak,
}

impl EditType {
    pub fn as_str(self) -> &'static str {
        match self {
            EditType::SwapPrimitive => "swap_primitive",
            EditType::TweakArg => "tweak_arg",
            EditType::InsertPrimitive => "insert_primitive",
            EditType::RemovePrimitive => "remove_primitive",
            EditType::SwapOrder => "swap_order",
            EditType::TranslateTweak => "translate_tweak",
            EditType::RecolorTweak => "recolor_tweak",
        }
    }
}

/// A single reified edit. `location` is the edited node's pre-order index in the
/// candidate tree at the moment the edit was generated -- recomputed per iteration,
/// never cached, since arena indices are only stable within one immutable `Ast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOperation {
    pub edit_type: EditType,
    pub location: usize,
    pub original: Option<String>,
    pub replacement: Option<String>,
    pub details: String,
}
