//! Abstract type to target-language type mapping

use crate::codec::AbstractType;

/// Per-language spelling of abstract types and of the expressions that
/// decode them in generated drivers.
pub trait TypeMapper: Send + Sync {
    /// Spelling of a non-array type, `None` when the language has no fixed
    /// spelling for it
    fn scalar(&self, ty: &AbstractType) -> Option<String>;

    /// Sequence type wrapping an already mapped element type
    fn sequence(&self, inner: &str) -> String;

    /// Expression decoding the serialized text held by `source` as `ty`
    fn deserialize_expr(&self, ty: &AbstractType, source: &str) -> String;

    /// Concrete type name; unmapped names pass through unchanged
    fn map_type(&self, ty: &AbstractType) -> String {
        match ty {
            AbstractType::Array(inner) => self.sequence(&self.map_type(inner)),
            AbstractType::Other(name) => name.clone(),
            _ => self.scalar(ty).unwrap_or_else(|| ty.to_string()),
        }
    }
}
