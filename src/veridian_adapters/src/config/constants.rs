use std::sync::LazyLock;

use crate::config::settings::AuthServiceSetting;

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const REDIS_HOST_NAME_ENV_VAR: &str = "REDIS_HOST_NAME";
    pub const RESEND_AUTH_TOKEN_ENV_VAR: &str = "RESEND_AUTH_TOKEN";
    pub const ALLOWED_ORIGINS_ENV_VAR: &str = "VERIDIAN_ALLOWED_ORIGINS";
}

pub static SESSION_COOKIE_NAME: LazyLock<&'static str> = LazyLock::new(|| {
    let cookie_name = AuthServiceSetting::load().session.cookie_name.clone();
    Box::leak(cookie_name.into_boxed_str())
});

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";

    pub mod email_client {
        use std::time::Duration;

        pub const BASE_URL: &str = "https://api.resend.com";
        pub const TIMEOUT: Duration = Duration::from_secs(10);
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";

    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
