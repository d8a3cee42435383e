use std::fmt::{Display, Formatter, Result as FmtResult};

/// The DSL's type system. Subtyping is flat except `Color <: Int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslType {
    Grid,
    Int,
    Bool,
    Color,
    Object,
    Point,
    BBox,
    ColorMap,
    List(Box<DslType>),
    Function(Vec<DslType>, Box<DslType>),
}

impl DslType {
    pub fn list_of(inner: DslType) -> DslType {
        DslType::List(Box::new(inner))
    }

    pub fn function(args: Vec<DslType>, ret: DslType) -> DslType {
        DslType::Function(args, Box::new(ret))
    }

    /// `true` iff `self` is a subtype of `other`.
    pub fn is_subtype_of(&self, other: &DslType) -> bool {
        if self == other {
            return true;
        }
        matches!((self, other), (DslType::Color, DslType::Int))
    }
}

impl Display for DslType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            DslType::Grid => write!(f, "Grid"),
            DslType::Int => write!(f, "Int"),
            DslType::Bool => write!(f, "Bool"),
            DslType::Color => write!(f, "Color"),
            DslType::Object => write!(f, "Object"),
            DslType::Point => write!(f, "Point"),
            DslType::BBox => write!(f, "BBox"),
            DslType::ColorMap => write!(f, "ColorMap"),
            DslType::List(inner) => write!(f, "List<{}>", inner),
            DslType::Function(args, ret) => {
                write!(f, "(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ") -> {}", ret)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: DslType,
    pub actual: DslType,
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "expected {}, found {} (not a subtype)",
            self.expected, self.actual
        )
    }
}

/// Succeeds iff `actual` is a subtype of `expected`.
pub fn type_check(expected: &DslType, actual: &DslType) -> Result<(), TypeMismatch> {
    if actual.is_subtype_of(expected) {
        Ok(())
    } else {
        Err(TypeMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_subtype_of_int() {
        assert!(type_check(&DslType::Int, &DslType::Color).is_ok());
    }

    #[test]
    fn int_is_not_subtype_of_color() {
        assert!(type_check(&DslType::Color, &DslType::Int).is_err());
    }

    #[test]
    fn unrelated_types_mismatch() {
        assert!(type_check(&DslType::Grid, &DslType::Bool).is_err());
    }
}
