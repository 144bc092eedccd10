//! Domain model (tasks, session, token claims, view state, errors).

pub mod ids;
pub mod task;
pub mod claims;
pub mod session;
pub mod state;
pub mod errors;

pub use ids::TaskId;
pub use task::{parse_optional_prioridade, NewTask, ParsePrioridadeError, Prioridade, Task};
pub use claims::{AccessToken, Roles, TokenClaims, ADMIN_ROLE, DEFAULT_ROLES_CLAIM};
pub use session::{Session, UserProfile};
pub use state::ViewState;
pub use errors::{ApiError, AuthError, ClaimsError, ViewerError};
