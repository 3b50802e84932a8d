// handlers/public/auth/mod.rs - Account handlers
//
// There are no sessions or tokens: login only checks credentials and returns
// the matching user.

pub mod login;    // POST /api/login - check credentials
pub mod register; // POST /api/register - create a user account

pub use login::login_post;
pub use register::register_post;
