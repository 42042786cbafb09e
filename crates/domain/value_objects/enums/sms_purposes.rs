use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmsPurpose {
    Register,
    Login,
    ForgotPassword,
    PasswordReset,
    PhoneUpdate,
    DeleteAccount,
}

impl SmsPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsPurpose::Register => "register",
            SmsPurpose::Login => "login",
            SmsPurpose::ForgotPassword => "forgot_password",
            SmsPurpose::PasswordReset => "password_reset",
            SmsPurpose::PhoneUpdate => "phone_update",
            SmsPurpose::DeleteAccount => "delete_account",
        }
    }

    /// SMS body for the given code.
    pub fn message(&self, code: &str) -> String {
        match self {
            SmsPurpose::Register => format!("Sapi: your registration code is {code}"),
            SmsPurpose::Login => format!("Sapi: your login code is {code}"),
            SmsPurpose::ForgotPassword | SmsPurpose::PasswordReset => {
                format!("Sapi: your password recovery code is {code}")
            }
            SmsPurpose::PhoneUpdate => format!("Sapi: your phone change code is {code}"),
            SmsPurpose::DeleteAccount => {
                format!("Sapi: your account deletion code is {code}. Do not share it.")
            }
        }
    }
}

impl Display for SmsPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
