use validator::ValidationError;

pub mod catalog;
pub mod dashboard;
pub mod documents;
pub mod drafts;
pub mod quotes;

// Texto só com espaços conta como vazio
pub(crate) fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Por favor, preencha todos os campos.".into());
        return Err(err);
    }
    Ok(())
}
