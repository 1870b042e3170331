use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {field} '{value}', must be one of: {accepted}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        accepted: &'static str,
    },
}
