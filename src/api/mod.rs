pub mod middleware;
pub mod services;
pub mod templates;

pub use services::configure_routes;
pub use templates::PageRenderer;
