use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s {
            "processing" => TransactionStatus::Processing,
            "completed" => TransactionStatus::Completed,
            "failed" => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Dana,
    Ovo,
    Gopay,
    BankTransfer,
    Qris,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Dana,
        PaymentMethod::Ovo,
        PaymentMethod::Gopay,
        PaymentMethod::BankTransfer,
        PaymentMethod::Qris,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Dana => "dana",
            PaymentMethod::Ovo => "ovo",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Qris => "qris",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Dana => "DANA",
            PaymentMethod::Ovo => "OVO",
            PaymentMethod::Gopay => "GoPay",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Qris => "QRIS",
        }
    }

    /// Stored tags the client no longer knows fall back to QRIS.
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(PaymentMethod::Qris)
    }

    /// Step-by-step instructions; `amount` is already formatted for display.
    pub fn instructions(&self, amount: &str) -> Vec<String> {
        let wallet_app = match self {
            PaymentMethod::Dana => Some("DANA"),
            PaymentMethod::Ovo => Some("OVO"),
            PaymentMethod::Gopay => Some("GoJek"),
            _ => None,
        };

        match (self, wallet_app) {
            (PaymentMethod::BankTransfer, _) => vec![
                "1. Transfer ke rekening tujuan yang tertera".to_string(),
                format!("2. Nominal: {amount}"),
                "3. Konfirmasi transfer".to_string(),
                "4. Upload bukti transfer".to_string(),
            ],
            (_, Some(app)) => vec![
                format!("1. Buka aplikasi {app}"),
                "2. Scan QR Code di bawah".to_string(),
                format!("3. Masukkan nominal {amount}"),
                "4. Konfirmasi pembayaran".to_string(),
                "5. Tunggu notifikasi sukses".to_string(),
            ],
            (_, None) => vec![
                "1. Scan QR Code di bawah".to_string(),
                "2. Pilih aplikasi pembayaran".to_string(),
                format!("3. Masukkan nominal {amount}"),
                "4. Konfirmasi pembayaran".to_string(),
                "5. Tunggu notifikasi sukses".to_string(),
            ],
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown payment method: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "gameId")]
    pub game_id: Uuid,
    #[serde(rename = "topupOptionId")]
    pub topup_option_id: String,
    pub amount: i64,
    pub status: TransactionStatus,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "userGameId")]
    pub user_game_id: String,
    pub location: Option<Location>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "gameId", default)]
    pub game_id: String,
    #[serde(rename = "topupOptionId", default)]
    pub topup_option_id: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "userGameId")]
    pub user_game_id: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TransactionStatus,
}
