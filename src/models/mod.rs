pub mod deposit;
pub mod investment;
pub mod outbox;
pub mod plan;
pub mod profile;
pub mod referral;
pub mod withdrawal;

pub use deposit::Deposit;
pub use investment::Investment;
pub use outbox::OutboxEmail;
pub use plan::InvestmentPlan;
pub use profile::Profile;
pub use referral::{Referral, ReferralWithdrawal};
pub use withdrawal::Withdrawal;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CryptoType
// ---------------------------------------------------------------------------

/// Supported payment assets for deposits and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoType {
    Btc,
    Eth,
    Usdt,
    Usdc,
    Ltc,
}

impl CryptoType {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BTC" | "BITCOIN" => Some(CryptoType::Btc),
            "ETH" | "ETHEREUM" => Some(CryptoType::Eth),
            "USDT" => Some(CryptoType::Usdt),
            "USDC" => Some(CryptoType::Usdc),
            "LTC" | "LITECOIN" => Some(CryptoType::Ltc),
            _ => None,
        }
    }
}

impl fmt::Display for CryptoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoType::Btc => write!(f, "BTC"),
            CryptoType::Eth => write!(f, "ETH"),
            CryptoType::Usdt => write!(f, "USDT"),
            CryptoType::Usdc => write!(f, "USDC"),
            CryptoType::Ltc => write!(f, "LTC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_type_parsing() {
        assert_eq!(CryptoType::from_api_str("btc"), Some(CryptoType::Btc));
        assert_eq!(CryptoType::from_api_str("Ethereum"), Some(CryptoType::Eth));
        assert_eq!(CryptoType::from_api_str("USDT"), Some(CryptoType::Usdt));
        assert_eq!(CryptoType::from_api_str("doge"), None);
    }
}
