mod analysis;
mod health;
mod pages;
mod sessions;

pub use analysis::{analyze, get_result, get_result_html};
pub use health::health_check;
pub use pages::{about_page, dashboard_page, landing_page, login_page, signup_page};
pub use sessions::{capture_boundary, create_session, delete_session, get_session};
