use crate::services::password_reset::RESET_TOKEN_TTL_MINUTES;

pub fn render_password_reset(reset_url: &str) -> String {
    format!(
        "You are receiving this email because a password reset was requested for your account.\n\n\
         Open the following link within {RESET_TOKEN_TTL_MINUTES} minutes to choose a new password:\n\n\
         {reset_url}\n\n\
         If you did not request this, ignore this email and your password will remain unchanged.\n"
    )
}
