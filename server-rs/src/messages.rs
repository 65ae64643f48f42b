//! Classifies raw error codes and messages into the fixed set of
//! user-facing (Indonesian) strings shown by clients.

/// Identity failures raised by the auth routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidCredential,
    UserNotFound,
    WrongPassword,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    TooManyRequests,
    NetworkRequestFailed,
    UserDisabled,
    OperationNotAllowed,
    AccountExistsWithDifferentCredential,
}

impl AuthFailure {
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::InvalidCredential => "auth/invalid-credential",
            AuthFailure::UserNotFound => "auth/user-not-found",
            AuthFailure::WrongPassword => "auth/wrong-password",
            AuthFailure::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthFailure::WeakPassword => "auth/weak-password",
            AuthFailure::InvalidEmail => "auth/invalid-email",
            AuthFailure::TooManyRequests => "auth/too-many-requests",
            AuthFailure::NetworkRequestFailed => "auth/network-request-failed",
            AuthFailure::UserDisabled => "auth/user-disabled",
            AuthFailure::OperationNotAllowed => "auth/operation-not-allowed",
            AuthFailure::AccountExistsWithDifferentCredential => {
                "auth/account-exists-with-different-credential"
            }
        }
    }

    pub fn message(&self) -> String {
        auth_message(self.code())
    }
}

pub fn auth_message(raw: &str) -> String {
    const TABLE: &[(&str, &str)] = &[
        ("auth/invalid-credential", "Email atau password salah"),
        ("auth/user-not-found", "Akun tidak ditemukan"),
        ("auth/wrong-password", "Password salah"),
        ("auth/email-already-in-use", "Email sudah terdaftar"),
        ("auth/weak-password", "Password terlalu lemah (minimal 6 karakter)"),
        ("auth/invalid-email", "Format email tidak valid"),
        ("auth/too-many-requests", "Terlalu banyak percobaan. Coba lagi nanti"),
        ("auth/network-request-failed", "Koneksi internet bermasalah"),
        ("auth/user-disabled", "Akun telah dinonaktifkan"),
        ("auth/operation-not-allowed", "Operasi tidak diizinkan"),
        (
            "auth/account-exists-with-different-credential",
            "Akun sudah ada dengan kredensial berbeda",
        ),
    ];

    TABLE
        .iter()
        .find(|(needle, _)| raw.contains(needle))
        .map(|(_, msg)| msg.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `code` is checked first, then the message text.
pub fn store_message(code: &str, message: &str) -> String {
    const BY_CODE: &[(&str, &str)] = &[
        ("permission-denied", "Tidak memiliki izin untuk mengakses data"),
        ("unavailable", "Layanan tidak tersedia. Cek koneksi internet"),
        ("deadline-exceeded", "Permintaan timeout. Coba lagi"),
        ("resource-exhausted", "Batas penggunaan terlampaui"),
        ("failed-precondition", "Kondisi tidak terpenuhi"),
        ("aborted", "Operasi dibatalkan"),
        ("out-of-range", "Data di luar batas"),
        ("unimplemented", "Fitur belum diimplementasi"),
        ("internal", "Kesalahan internal server"),
        ("data-loss", "Data hilang"),
        ("unauthenticated", "Silakan login terlebih dahulu"),
    ];

    if let Some((_, msg)) = BY_CODE
        .iter()
        .find(|(c, _)| code == *c || message.contains(c))
    {
        return msg.to_string();
    }
    connection_message(message).unwrap_or_else(|| message.to_string())
}

fn connection_message(message: &str) -> Option<String> {
    let msg = if message.contains("transport") || message.contains("WebChannelConnection") {
        "Koneksi ke server bermasalah. Coba lagi dalam beberapa saat"
    } else if message.contains("network") || message.contains("connection") {
        "Koneksi internet bermasalah. Pastikan Anda terhubung ke internet"
    } else if message.contains("timeout") {
        "Permintaan timeout. Coba lagi"
    } else {
        return None;
    };
    Some(msg.to_string())
}

pub fn network_message(message: &str) -> String {
    let msg = if message.contains("Network request failed") {
        "Koneksi internet bermasalah"
    } else if message.contains("timeout") {
        "Permintaan timeout"
    } else if message.contains("fetch") {
        "Gagal mengambil data dari server"
    } else if message.contains("transport") {
        "Koneksi ke server bermasalah"
    } else if message.contains("connection") {
        "Koneksi internet bermasalah"
    } else {
        return message.to_string();
    };
    msg.to_string()
}

/// `context` names the operation, e.g. "registrasi".
pub fn generic_message(message: &str, context: &str) -> String {
    connection_message(message).unwrap_or_else(|| format!("Gagal melakukan {context}: {message}"))
}
