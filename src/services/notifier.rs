use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rust_decimal::Decimal;

use crate::config::AppConfig;
use crate::models::CryptoType;

/// SMTP mail sender used by the outbox dispatcher. Delivery failures are
/// recorded on the outbox row and never block the ledger flow that
/// produced the email.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build a mailer from SMTP config. Returns `None` when SMTP is not
    /// configured (dev mode — outbox rows accumulate undelivered).
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Option<Self>> {
        if !config.has_smtp() {
            return Ok(None);
        }

        let host = config.smtp_host.as_deref().unwrap();
        let credentials = Credentials::new(
            config.smtp_username.clone().unwrap(),
            config.smtp_password.clone().unwrap(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from: Mailbox = config
            .mail_from
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid MAIL_FROM address: {e}"))?;

        Ok(Some(Self { transport, from }))
    }

    /// Send one HTML email.
    pub async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid recipient {recipient}: {e}"))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Templates — (subject, html body) pairs enqueued by the ledger workflows
// ---------------------------------------------------------------------------

pub fn format_welcome(username: &str, referral_code: &str) -> (String, String) {
    (
        "Welcome to BlockFortune".into(),
        format!(
            "<h2>Welcome, {username}!</h2>\
             <p>Your account is ready. Share your referral code <b>{referral_code}</b> \
             to earn commission on every deposit your referrals make.</p>"
        ),
    )
}

pub fn format_deposit_request_admin(
    username: &str,
    amount: Decimal,
    crypto_type: CryptoType,
    reference: &str,
) -> (String, String) {
    (
        format!("New deposit request {reference}"),
        format!(
            "<h2>Deposit pending review</h2>\
             <p>User <b>{username}</b> requested a deposit of <b>${}</b> in {crypto_type}.</p>\
             <p>Reference: <code>{reference}</code></p>",
            amount.round_dp(2),
        ),
    )
}

pub fn format_deposit_approved(username: &str, amount: Decimal, reference: &str) -> (String, String) {
    (
        format!("Deposit {reference} confirmed"),
        format!(
            "<h2>Deposit confirmed</h2>\
             <p>Hi {username}, your deposit of <b>${}</b> has been credited to your balance.</p>\
             <p>Reference: <code>{reference}</code></p>",
            amount.round_dp(2),
        ),
    )
}

pub fn format_deposit_rejected(
    username: &str,
    amount: Decimal,
    reference: &str,
    notes: Option<&str>,
) -> (String, String) {
    (
        format!("Deposit {reference} rejected"),
        format!(
            "<h2>Deposit rejected</h2>\
             <p>Hi {username}, your deposit of <b>${}</b> was not approved.</p>\
             <p>Reason: {}</p>",
            amount.round_dp(2),
            notes.unwrap_or("not specified"),
        ),
    )
}

pub fn format_withdrawal_request_admin(
    username: &str,
    amount: Decimal,
    crypto_type: CryptoType,
    wallet_address: &str,
) -> (String, String) {
    (
        "New withdrawal request".into(),
        format!(
            "<h2>Withdrawal pending review</h2>\
             <p>User <b>{username}</b> requested a withdrawal of <b>${}</b> in {crypto_type}.</p>\
             <p>Destination: <code>{wallet_address}</code></p>",
            amount.round_dp(2),
        ),
    )
}

pub fn format_withdrawal_approved(
    username: &str,
    amount: Decimal,
    network_fee: Decimal,
    wallet_address: &str,
) -> (String, String) {
    (
        "Withdrawal completed".into(),
        format!(
            "<h2>Withdrawal completed</h2>\
             <p>Hi {username}, your withdrawal of <b>${}</b> (network fee ${}) has been sent to \
             <code>{wallet_address}</code>.</p>",
            amount.round_dp(2),
            network_fee.round_dp(2),
        ),
    )
}

pub fn format_withdrawal_rejected(
    username: &str,
    amount: Decimal,
    notes: Option<&str>,
) -> (String, String) {
    (
        "Withdrawal rejected".into(),
        format!(
            "<h2>Withdrawal rejected</h2>\
             <p>Hi {username}, your withdrawal of <b>${}</b> was not approved and the funds \
             have been returned to your balance.</p>\
             <p>Reason: {}</p>",
            amount.round_dp(2),
            notes.unwrap_or("not specified"),
        ),
    )
}

pub fn format_investment_matured(
    username: &str,
    plan_name: &str,
    expected_return: Decimal,
) -> (String, String) {
    (
        format!("Your {plan_name} investment has matured"),
        format!(
            "<h2>Investment matured</h2>\
             <p>Hi {username}, your {plan_name} investment has completed and <b>${}</b> \
             has been credited to your balance.</p>",
            expected_return.round_dp(2),
        ),
    )
}

pub fn format_referral_payout(
    username: &str,
    amount: Decimal,
    referral_count: usize,
) -> (String, String) {
    (
        "Referral earnings paid out".into(),
        format!(
            "<h2>Referral earnings paid</h2>\
             <p>Hi {username}, <b>${}</b> from {referral_count} referral commission(s) has been \
             credited to your balance.</p>",
            amount.round_dp(2),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_approved_template_mentions_amount_and_reference() {
        let (subject, body) =
            format_deposit_approved("alice", Decimal::new(50000, 2), "DEP-AB12CD34EF");
        assert!(subject.contains("DEP-AB12CD34EF"));
        assert!(body.contains("$500.00"));
        assert!(body.contains("alice"));
    }

    #[test]
    fn test_withdrawal_rejected_template_defaults_reason() {
        let (_, body) = format_withdrawal_rejected("bob", Decimal::from(75), None);
        assert!(body.contains("not specified"));
        assert!(body.contains("returned to your balance"));
    }
}
