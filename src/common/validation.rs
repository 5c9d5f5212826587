// src/common/validation.rs

use validator::ValidationError;

/// Recusa texto vazio depois do `trim`. O `length` sozinho aceita "   ",
/// que viraria "" ao ser gravado.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O valor não pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}
