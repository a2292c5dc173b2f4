pub mod dto;
mod merchant;
pub mod response;
mod router;
pub mod validation;

pub use merchant::merchant_router;
pub use router::{AppState, create_router};
