pub mod session;

pub use session::SessionMiddleware;
