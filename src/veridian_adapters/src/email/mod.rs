pub mod mock_email_client;
pub mod resend_email_client;

pub use mock_email_client::MockEmailClient;
pub use resend_email_client::ResendEmailClient;
