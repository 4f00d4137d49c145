use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Account data too small for {layout}. Required: {required} bytes, Found: {found}")]
    AccountTooSmall {
        layout: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Account discriminator does not match layout {0}")]
    DiscriminatorMismatch(&'static str),

    #[error("Invalid option kind discriminant: {0}")]
    InvalidOptionKind(u8),

    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),
}
