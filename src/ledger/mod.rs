pub mod deposits;
pub mod investments;
pub mod referrals;
pub mod withdrawals;

use crate::errors::AppError;

/// Sanity-check a destination wallet address. Full address validation is the
/// admin's job at approval time; this only rejects obviously malformed input.
pub(crate) fn validate_wallet_address(address: &str) -> Result<(), AppError> {
    let trimmed = address.trim();
    if trimmed.len() < 20
        || trimmed.len() > 128
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(AppError::Validation("Invalid wallet address".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_address_validation() {
        assert!(validate_wallet_address("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh").is_ok());
        assert!(validate_wallet_address("0x71C7656EC7ab88b098defB751B7401B5f6d8976F").is_ok());
        assert!(validate_wallet_address("short").is_err());
        assert!(validate_wallet_address("addr with spaces not allowed here").is_err());
    }
}
