// Infrastructure: collaborator traits, adapters and the dependency container

pub mod deps;
pub mod session;
pub mod test_dependencies;
pub mod traits;

pub use deps::{run_migrations, PgAcceptanceStore, PgCustomFieldResolver, SlaDeps};
pub use session::{SessionHandle, SessionStore};
pub use traits::*;
